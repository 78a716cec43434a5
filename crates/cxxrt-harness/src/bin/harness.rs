//! CLI entrypoint for the cxxrt harness.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use cxxrt_core::symbols::{BuildVariant, SizeType, StdMode, Toolchain, render_declarations};
use cxxrt_harness::structured_log::{
    ArtifactIndex, LogEmitter, LogEntry, LogLevel, Outcome, validate_log_file,
};
use cxxrt_harness::{build_manifest, check_exports, fitting_features, parse_features, run_audit};

/// Symbol tooling for the cxxrt runtime-support shim.
#[derive(Debug, Parser)]
#[command(name = "cxxrt-harness")]
#[command(about = "Symbol manifests and link audits for the cxxrt shim")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct VariantArgs {
    /// Compiler family whose symbol expectations apply (`clang` or `gcc`).
    #[arg(long, default_value = "clang")]
    toolchain: Toolchain,
    /// Language standard (`c++11`, `c++14`, `c++17`, `c++20`).
    #[arg(long = "std", default_value = "c++17")]
    std_mode: StdMode,
    /// RTTI enabled for the application build.
    #[arg(long)]
    rtti: bool,
    /// `size_t` mangling: `m` (unsigned long, wasm32) or `j` (unsigned int).
    #[arg(long, default_value = "m")]
    size_type: SizeType,
}

impl VariantArgs {
    fn variant(&self) -> BuildVariant {
        BuildVariant {
            toolchain: self.toolchain,
            std_mode: self.std_mode,
            rtti: self.rtti,
            size_type: self.size_type,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Emit the symbol manifest for a build variant.
    Manifest {
        #[command(flatten)]
        variant: VariantArgs,
        /// Output JSON path (if omitted, prints to stdout).
        #[arg(long)]
        output: Option<PathBuf>,
        /// Also write an artifact index hashing the manifest.
        #[arg(long)]
        artifact_index: Option<PathBuf>,
    },
    /// Render C++ declarations for a build variant.
    Declarations {
        #[command(flatten)]
        variant: VariantArgs,
        /// Output header path (if omitted, prints to stdout).
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Check this build of `cxxrt-abi` against a variant's requirements.
    CheckExports {
        #[command(flatten)]
        variant: VariantArgs,
        /// Check a planned `cxxrt-abi` feature list (comma-separated, `none` for
        /// no features) instead of this build's.
        #[arg(long)]
        features: Option<String>,
        /// Output JSON path (if omitted, prints to stdout).
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Audit `nm` listings of an application against the shim.
    Audit {
        #[command(flatten)]
        variant: VariantArgs,
        /// `nm` listing of an application object (repeatable).
        #[arg(long = "app", required = true)]
        app: Vec<PathBuf>,
        /// `nm` listing of the shim library (repeatable).
        #[arg(long = "shim", required = true)]
        shim: Vec<PathBuf>,
        /// Structured JSONL log path.
        #[arg(long)]
        log: Option<PathBuf>,
        /// Run identifier used in trace ids.
        #[arg(long, default_value = "local")]
        run_id: String,
        /// Output JSON path for the summary (if omitted, prints to stdout).
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Validate a structured JSONL log file.
    ValidateLog {
        /// Log path.
        #[arg(long)]
        log: PathBuf,
    },
}

fn write_or_print(path: Option<&Path>, body: &str) -> std::io::Result<()> {
    if let Some(path) = path {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, body)
    } else {
        println!("{body}");
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Manifest {
            variant,
            output,
            artifact_index,
        } => {
            let variant = variant.variant();
            let manifest = build_manifest(&variant);
            let body = manifest.to_json()?;
            write_or_print(output.as_deref(), &body)?;

            if let Some(index_path) = artifact_index {
                let label = output
                    .as_ref()
                    .map_or_else(|| "<stdout>".to_string(), |p| p.display().to_string());
                let mut index = ArtifactIndex::new(&manifest.required_digest[..12]);
                index.add_bytes(label, "symbol_manifest", body.as_bytes());
                write_or_print(Some(&index_path), &index.to_json()?)?;
            }
            eprintln!(
                "{variant}: {} required symbol(s), digest {}",
                manifest
                    .names_with(cxxrt_core::Requirement::Required)
                    .len(),
                manifest.required_digest
            );
        }
        Command::Declarations { variant, output } => {
            let header = render_declarations(&variant.variant());
            write_or_print(output.as_deref(), header.trim_end())?;
        }
        Command::CheckExports {
            variant,
            features,
            output,
        } => {
            let variant = variant.variant();
            let exported = match features.as_deref() {
                Some(list) => cxxrt_abi::export_set(parse_features(list)?),
                None => cxxrt_abi::exported_symbols(),
            };
            let check = check_exports(&exported, &variant);
            write_or_print(output.as_deref(), &serde_json::to_string_pretty(&check)?)?;

            if !check.is_ok() {
                for fit in fitting_features(&variant) {
                    eprintln!("hint: {variant} fits cxxrt-abi built with {fit:?}");
                }
                return Err(format!(
                    "{variant}: {} missing required, {} stray export(s)",
                    check.missing_required.len(),
                    check.stray.len()
                )
                .into());
            }
        }
        Command::Audit {
            variant,
            app,
            shim,
            log,
            run_id,
            output,
        } => {
            let variant = variant.variant();
            let mut emitter = match &log {
                Some(path) => Some(LogEmitter::to_file(path, "cxxrt_audit", &run_id)?),
                None => None,
            };
            let summary = run_audit(&app, &shim, &variant, emitter.as_mut())?;
            write_or_print(output.as_deref(), &serde_json::to_string_pretty(&summary)?)?;

            for name in &summary.stray {
                eprintln!("warning: shim defines {name}, which {variant} never references");
            }
            if !summary.clean {
                return Err(format!(
                    "link audit failed: {} unresolved, {} duplicate, {} unsupported, {} missing",
                    summary.unresolved.len(),
                    summary.duplicates.len(),
                    summary.unsupported.len(),
                    summary.missing_required.len()
                )
                .into());
            }
        }
        Command::ValidateLog { log } => {
            let (lines, errors) = validate_log_file(&log)?;
            for err in &errors {
                eprintln!("{}: {err}", log.display());
            }
            let entry = LogEntry::new("cxxrt_harness::validate::001", LogLevel::Info, "log_validated")
                .with_artifacts(vec![log.display().to_string()])
                .with_outcome(if errors.is_empty() {
                    Outcome::Pass
                } else {
                    Outcome::Fail
                })
                .with_details(serde_json::json!({ "lines": lines, "errors": errors.len() }));
            println!("{}", entry.to_jsonl()?);

            if !errors.is_empty() {
                return Err(format!("{} invalid field(s) across {lines} line(s)", errors.len()).into());
            }
        }
    }

    Ok(())
}
