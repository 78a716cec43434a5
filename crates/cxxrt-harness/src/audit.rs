//! Link audit runner: reads `nm` listings from disk, runs
//! [`cxxrt_core::link::audit`] and logs every finding.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;

use cxxrt_core::link::{LinkReport, audit};
use cxxrt_core::nm::{SymbolEntry, SymbolKind, parse_listing};
use cxxrt_core::symbols::{BuildVariant, RuntimeSymbol};

use crate::error::HarnessError;
use crate::manifest::{VariantRecord, category_name};
use crate::structured_log::{LogEmitter, LogEntry, LogLevel, Outcome};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateRecord {
    pub name: String,
    pub objects: Vec<String>,
}

/// Serializable audit result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditSummary {
    pub variant: VariantRecord,
    pub clean: bool,
    pub app_symbols: usize,
    pub shim_symbols: usize,
    pub unresolved: Vec<String>,
    pub duplicates: Vec<DuplicateRecord>,
    pub unsupported: Vec<String>,
    pub stray: Vec<String>,
    pub missing_required: Vec<String>,
}

impl AuditSummary {
    #[must_use]
    pub fn from_report(
        report: &LinkReport,
        variant: &BuildVariant,
        app_symbols: usize,
        shim_symbols: usize,
    ) -> Self {
        Self {
            variant: VariantRecord::from(variant),
            clean: report.is_clean(),
            app_symbols,
            shim_symbols,
            unresolved: report.unresolved.clone(),
            duplicates: report
                .duplicates
                .iter()
                .map(|d| DuplicateRecord {
                    name: d.name.clone(),
                    objects: d.objects.clone(),
                })
                .collect(),
            unsupported: report.unsupported.clone(),
            stray: report.stray.clone(),
            missing_required: report.missing_required.clone(),
        }
    }
}

/// Label each listing by its path relative to the deepest directory all of
/// `paths` share, so same-named listings from different directories stay
/// distinct objects. Paths with no shared directory keep their full form.
fn object_labels(paths: &[&Path]) -> Vec<String> {
    let mut common: Option<PathBuf> = None;
    for path in paths {
        let parent = path.parent().unwrap_or_else(|| Path::new(""));
        common = Some(match common {
            None => parent.to_path_buf(),
            Some(prev) => prev
                .components()
                .zip(parent.components())
                .take_while(|(a, b)| a == b)
                .map(|(a, _)| a)
                .collect(),
        });
    }
    let common = common.unwrap_or_default();

    paths
        .iter()
        .map(|path| {
            let rel = path
                .strip_prefix(&common)
                .ok()
                .filter(|rel| !rel.as_os_str().is_empty())
                .unwrap_or(*path);
            if rel.is_relative() {
                rel.components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/")
            } else {
                rel.display().to_string()
            }
        })
        .collect()
}

fn load_labeled(paths: &[&Path]) -> Result<Vec<Vec<SymbolEntry>>, HarnessError> {
    paths
        .iter()
        .zip(object_labels(paths))
        .map(|(path, label)| {
            let text = std::fs::read_to_string(path).map_err(|e| HarnessError::io(*path, e))?;
            Ok(parse_listing(&label, &text))
        })
        .collect()
}

/// Read and parse every listing in `paths`.
pub fn load_listings(paths: &[PathBuf]) -> Result<Vec<SymbolEntry>, HarnessError> {
    let paths: Vec<&Path> = paths.iter().map(PathBuf::as_path).collect();
    Ok(load_labeled(&paths)?.into_iter().flatten().collect())
}

/// Objects in `entries` that list `name` with a kind accepted by `pick`.
fn objects_listing(
    entries: &[SymbolEntry],
    name: &str,
    pick: impl Fn(SymbolKind) -> bool,
) -> Vec<String> {
    let objects: BTreeSet<&str> = entries
        .iter()
        .filter(|e| e.name == name && pick(e.kind))
        .map(|e| e.object.as_str())
        .collect();
    objects.into_iter().map(str::to_string).collect()
}

/// One finding record. `objects` are the listings involved; the first one is
/// the record's `object`, and all of them go into `details` when there are
/// several.
fn finding(
    variant: &BuildVariant,
    level: LogLevel,
    event: &str,
    name: &str,
    objects: &[String],
    outcome: Outcome,
) -> LogEntry {
    let category = RuntimeSymbol::from_link_name(name, variant.size_type)
        .map(|sym| category_name(sym.category()));
    let mut entry = LogEntry::new("", level, event)
        .with_variant(variant.to_string())
        .with_symbol(name, category)
        .with_outcome(outcome);
    if let Some(first) = objects.first() {
        entry = entry.with_object(first.as_str());
    }
    if objects.len() > 1 {
        entry = entry.with_details(serde_json::json!({ "objects": objects }));
    }
    entry
}

/// Audit application listings against shim listings.
///
/// When `log` is given, one record is written per finding plus a summary record.
pub fn run_audit(
    app_paths: &[PathBuf],
    shim_paths: &[PathBuf],
    variant: &BuildVariant,
    mut log: Option<&mut LogEmitter>,
) -> Result<AuditSummary, HarnessError> {
    if app_paths.is_empty() {
        return Err(HarnessError::NoListings("the application"));
    }
    if shim_paths.is_empty() {
        return Err(HarnessError::NoListings("the shim"));
    }

    let started = Instant::now();
    let all_paths: Vec<&Path> = app_paths
        .iter()
        .chain(shim_paths)
        .map(PathBuf::as_path)
        .collect();
    let mut listings = load_labeled(&all_paths)?;
    let shim: Vec<SymbolEntry> = listings
        .split_off(app_paths.len())
        .into_iter()
        .flatten()
        .collect();
    let app: Vec<SymbolEntry> = listings.into_iter().flatten().collect();
    let report = audit(&app, &shim, variant);
    let summary = AuditSummary::from_report(&report, variant, app.len(), shim.len());

    if let Some(log) = log.as_deref_mut() {
        let referencing = |name: &str| {
            objects_listing(&app, name, |kind| kind == SymbolKind::Undefined)
        };
        for name in &report.unresolved {
            log.emit_entry(finding(
                variant,
                LogLevel::Error,
                "unresolved_symbol",
                name,
                &referencing(name),
                Outcome::Fail,
            ))?;
        }
        for dup in &report.duplicates {
            log.emit_entry(finding(
                variant,
                LogLevel::Error,
                "duplicate_symbol",
                &dup.name,
                &dup.objects,
                Outcome::Fail,
            ))?;
        }
        for name in &report.unsupported {
            log.emit_entry(finding(
                variant,
                LogLevel::Error,
                "unsupported_runtime_symbol",
                name,
                &referencing(name),
                Outcome::Fail,
            ))?;
        }
        for name in &report.missing_required {
            log.emit_entry(finding(
                variant,
                LogLevel::Error,
                "missing_required_symbol",
                name,
                &[],
                Outcome::Fail,
            ))?;
        }
        for name in &report.stray {
            log.emit_entry(finding(
                variant,
                LogLevel::Warn,
                "stray_symbol",
                name,
                &objects_listing(&shim, name, SymbolKind::is_definition),
                Outcome::Warn,
            ))?;
        }

        let outcome = if summary.clean {
            Outcome::Pass
        } else {
            Outcome::Fail
        };
        let objects: Vec<String> = app_paths
            .iter()
            .chain(shim_paths)
            .map(|p| p.display().to_string())
            .collect();
        log.emit_entry(
            LogEntry::new(
                "",
                if summary.clean {
                    LogLevel::Info
                } else {
                    LogLevel::Error
                },
                "audit_complete",
            )
            .with_variant(variant.to_string())
            .with_outcome(outcome)
            .with_duration_ms(started.elapsed().as_millis() as u64)
            .with_artifacts(objects)
            .with_details(serde_json::json!({
                "unresolved": report.unresolved.len(),
                "duplicates": report.duplicates.len(),
                "unsupported": report.unsupported.len(),
                "stray": report.stray.len(),
                "missing_required": report.missing_required.len(),
            })),
        )?;
        log.flush()?;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(paths: &[&str]) -> Vec<String> {
        let paths: Vec<&Path> = paths.iter().map(Path::new).collect();
        object_labels(&paths)
    }

    #[test]
    fn labels_drop_the_shared_directory() {
        assert_eq!(
            labels(&["/tmp/run/main.nm", "/tmp/run/shim.nm"]),
            vec!["main.nm", "shim.nm"]
        );
        assert_eq!(labels(&["/tmp/run/shim.nm"]), vec!["shim.nm"]);
    }

    #[test]
    fn same_file_name_in_different_directories_stays_distinct() {
        assert_eq!(
            labels(&["/tmp/run/app/main.nm", "/tmp/run/a/shim.nm", "/tmp/run/b/shim.nm"]),
            vec!["app/main.nm", "a/shim.nm", "b/shim.nm"]
        );
    }

    #[test]
    fn unrelated_paths_keep_their_full_form() {
        assert_eq!(labels(&["a/shim.nm", "/b/shim.nm"]), vec!["a/shim.nm", "/b/shim.nm"]);
        assert_eq!(labels(&["shim.nm", "lib/shim.nm"]), vec!["shim.nm", "lib/shim.nm"]);
    }
}
