//! Tooling for the cxxrt runtime-support shim.
//!
//! This crate provides:
//! - Symbol manifests: the per-variant symbol table as JSON, with a digest
//! - Declarations: include-guarded C++ prototypes for the build pipeline
//! - Export checks: does this `cxxrt-abi` build define exactly what a variant needs
//! - Link audits: unresolved/duplicate/unsupported symbols from `nm` listings
//! - Structured logs: JSONL records for every finding

#![forbid(unsafe_code)]

pub mod audit;
pub mod error;
pub mod exports;
pub mod manifest;
pub mod structured_log;

pub use audit::{AuditSummary, run_audit};
pub use error::HarnessError;
pub use exports::{ExportCheck, check_exports, fitting_features, parse_features};
pub use manifest::{SymbolManifest, build_manifest};
