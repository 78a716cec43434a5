//! Export check: does a shim build define exactly what a variant needs?

use serde::Serialize;

use cxxrt_abi::ExportFeatures;
use cxxrt_core::symbols::{ALL_SYMBOLS, BuildVariant, Requirement, RuntimeSymbol, requirement};

use crate::error::HarnessError;
use crate::manifest::VariantRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportCheck {
    pub variant: VariantRecord,
    /// Required symbols the build does not export (link would fail).
    pub missing_required: Vec<String>,
    /// Excluded symbols the build exports anyway (stray definitions).
    pub stray: Vec<String>,
    /// Optional symbols the build exports.
    pub optional_exported: Vec<String>,
}

impl ExportCheck {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.missing_required.is_empty() && self.stray.is_empty()
    }
}

/// Compare `exported` with the requirements of `variant`.
#[must_use]
pub fn check_exports(exported: &[RuntimeSymbol], variant: &BuildVariant) -> ExportCheck {
    let mut check = ExportCheck {
        variant: VariantRecord::from(variant),
        missing_required: Vec::new(),
        stray: Vec::new(),
        optional_exported: Vec::new(),
    };
    for sym in ALL_SYMBOLS {
        let name = sym.link_name(variant.size_type).to_string();
        let present = exported.contains(&sym);
        match (requirement(sym, variant), present) {
            (Requirement::Required, false) => check.missing_required.push(name),
            (Requirement::Excluded, true) => check.stray.push(name),
            (Requirement::Optional, true) => check.optional_exported.push(name),
            _ => {}
        }
    }
    check
}

/// Parse a comma-separated `cxxrt-abi` feature list. `none` or an empty string
/// selects no features; `default` selects the crate's default features.
pub fn parse_features(list: &str) -> Result<ExportFeatures, HarnessError> {
    let mut features = ExportFeatures {
        rtti: false,
        extended_operators: false,
        sized_deallocation: false,
    };
    for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        match name {
            "none" => {}
            "default" | "sized-deallocation" => features.sized_deallocation = true,
            "rtti" => features.rtti = true,
            "extended-operators" => features.extended_operators = true,
            other => return Err(HarnessError::UnknownFeature(other.to_string())),
        }
    }
    Ok(features)
}

/// Feature sets whose exports fit `variant` exactly.
#[must_use]
pub fn fitting_features(variant: &BuildVariant) -> Vec<ExportFeatures> {
    ExportFeatures::all()
        .into_iter()
        .filter(|&f| check_exports(&cxxrt_abi::export_set(f), variant).is_ok())
        .collect()
}
