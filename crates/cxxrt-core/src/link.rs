//! Link audit: would this application link cleanly against this shim?
//!
//! Works on parsed `nm` listings ([`crate::nm`]) rather than on a linker run,
//! so the check is deterministic and can run in CI before the wasm link step.

use std::collections::{BTreeMap, BTreeSet};

use crate::nm::{SymbolEntry, SymbolKind};
use crate::symbols::{
    ALL_SYMBOLS, BuildVariant, Requirement, RuntimeSymbol, is_runtime_namespace, requirement,
};

/// A symbol strongly defined by more than one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
    pub name: String,
    pub objects: Vec<String>,
}

/// Findings of one audit. Lists are sorted and free of repeats.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkReport {
    /// Catalog symbols the application references and nothing defines.
    pub unresolved: Vec<String>,
    /// Symbols with more than one strong definition.
    pub duplicates: Vec<Duplicate>,
    /// Undefined runtime-namespace references outside the catalog
    /// (`__cxa_begin_catch`, `__gxx_personality_v0`, ...).
    pub unsupported: Vec<String>,
    /// Catalog symbols the shim defines although the variant excludes them.
    pub stray: Vec<String>,
    /// Required catalog symbols the shim does not define.
    pub missing_required: Vec<String>,
}

impl LinkReport {
    /// No unresolved, duplicate, unsupported or missing symbols. Stray
    /// definitions are warnings only.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty()
            && self.duplicates.is_empty()
            && self.unsupported.is_empty()
            && self.missing_required.is_empty()
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.stray.is_empty()
    }
}

/// Audit `app` references against `shim` definitions for `variant`.
#[must_use]
pub fn audit(app: &[SymbolEntry], shim: &[SymbolEntry], variant: &BuildVariant) -> LinkReport {
    let mut definitions: BTreeMap<&str, Vec<(&str, bool)>> = BTreeMap::new();
    for entry in app.iter().chain(shim) {
        if entry.kind.is_definition() {
            definitions
                .entry(entry.name.as_str())
                .or_default()
                .push((entry.object.as_str(), entry.kind.is_strong_definition()));
        }
    }

    let duplicates = definitions
        .iter()
        .filter_map(|(name, defs)| {
            let strong: BTreeSet<&str> = defs
                .iter()
                .filter(|(_, is_strong)| *is_strong)
                .map(|(object, _)| *object)
                .collect();
            let strong_count = defs.iter().filter(|(_, is_strong)| *is_strong).count();
            (strong_count > 1).then(|| Duplicate {
                name: (*name).to_string(),
                objects: strong.into_iter().map(str::to_string).collect(),
            })
        })
        .collect();

    let mut unresolved = BTreeSet::new();
    let mut unsupported = BTreeSet::new();
    for entry in app {
        if entry.kind != SymbolKind::Undefined || definitions.contains_key(entry.name.as_str()) {
            continue;
        }
        if RuntimeSymbol::from_link_name(&entry.name, variant.size_type).is_some() {
            unresolved.insert(entry.name.clone());
        } else if is_runtime_namespace(&entry.name) {
            unsupported.insert(entry.name.clone());
        }
    }

    let shim_defined: BTreeSet<&str> = shim
        .iter()
        .filter(|e| e.kind.is_definition())
        .map(|e| e.name.as_str())
        .collect();

    let mut stray = Vec::new();
    let mut missing_required = Vec::new();
    for sym in ALL_SYMBOLS {
        let name = sym.link_name(variant.size_type);
        match requirement(sym, variant) {
            Requirement::Excluded if shim_defined.contains(name) => stray.push(name.to_string()),
            Requirement::Required if !shim_defined.contains(name) => {
                missing_required.push(name.to_string());
            }
            _ => {}
        }
    }
    stray.sort();
    missing_required.sort();

    LinkReport {
        unresolved: unresolved.into_iter().collect(),
        duplicates,
        unsupported: unsupported.into_iter().collect(),
        stray,
        missing_required,
    }
}
