//! Per-variant symbol manifest.
//!
//! The manifest is the machine-readable form of the build-variant table: every
//! catalog symbol with its requirement, link name, declaration and exception
//! specification. `required_digest` hashes the sorted required link names so a
//! build pipeline can detect when a toolchain bump changes the contract.

use serde::{Deserialize, Serialize};

use cxxrt_core::symbols::{
    ALL_SYMBOLS, BuildVariant, Requirement, SymbolCategory, exception_spec, requirement,
};

use crate::structured_log::sha256_hex;

pub const MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRecord {
    pub toolchain: String,
    pub std_mode: String,
    pub rtti: bool,
    pub size_type: String,
}

impl From<&BuildVariant> for VariantRecord {
    fn from(variant: &BuildVariant) -> Self {
        Self {
            toolchain: variant.toolchain.to_string(),
            std_mode: variant.std_mode.to_string(),
            rtti: variant.rtti,
            size_type: variant.size_type.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRecord {
    pub link_name: String,
    pub category: String,
    pub requirement: String,
    pub declaration: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolManifest {
    pub manifest_version: u32,
    pub variant: VariantRecord,
    pub symbols: Vec<SymbolRecord>,
    pub required_digest: String,
}

impl SymbolManifest {
    /// Link names with the given requirement, in catalog order.
    #[must_use]
    pub fn names_with(&self, req: Requirement) -> Vec<&str> {
        let wanted = req.to_string();
        self.symbols
            .iter()
            .filter(|s| s.requirement == wanted)
            .map(|s| s.link_name.as_str())
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[must_use]
pub fn category_name(category: SymbolCategory) -> &'static str {
    match category {
        SymbolCategory::Trap => "trap",
        SymbolCategory::Allocation => "allocation",
    }
}

/// Digest of a set of link names, independent of input order.
#[must_use]
pub fn digest_names<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let mut sorted: Vec<&str> = names.into_iter().collect();
    sorted.sort_unstable();
    sorted.dedup();
    sha256_hex(sorted.join("\n").as_bytes())
}

#[must_use]
pub fn build_manifest(variant: &BuildVariant) -> SymbolManifest {
    let symbols: Vec<SymbolRecord> = ALL_SYMBOLS
        .into_iter()
        .map(|sym| SymbolRecord {
            link_name: sym.link_name(variant.size_type).to_string(),
            category: category_name(sym.category()).to_string(),
            requirement: requirement(sym, variant).to_string(),
            declaration: format!(
                "{}{};",
                sym.cxx_signature(),
                exception_spec(sym, variant.std_mode).as_cxx()
            ),
        })
        .collect();

    let required_digest = digest_names(
        symbols
            .iter()
            .filter(|s| s.requirement == Requirement::Required.to_string())
            .map(|s| s.link_name.as_str()),
    );

    SymbolManifest {
        manifest_version: MANIFEST_VERSION,
        variant: VariantRecord::from(variant),
        symbols,
        required_digest,
    }
}
