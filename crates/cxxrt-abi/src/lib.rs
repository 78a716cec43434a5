#![cfg_attr(feature = "weak-linkage", feature(linkage))]
// All extern "C" exports are called by compiler-generated code with the
// arguments the Itanium ABI prescribes; per-function safety docs would repeat it.
#![allow(clippy::missing_safety_doc)]
//! # cxxrt-abi
//!
//! Link-time C++ runtime-support symbols for sandboxed wasm modules.
//!
//! This crate produces a `staticlib` that is linked into C++ codec modules
//! built for a target without exception unwinding. It defines exactly the
//! runtime entry points the compiler references:
//!
//! ```text
//! compiled C++ -> __cxa_* / operator new/delete (this crate) -> host libc
//!                                                             -> abort()
//! ```
//!
//! Exception and RTTI entry points trap. Allocation operators use the host
//! allocator and trap instead of returning null. The exact symbol set is
//! selected with cargo features (`rtti`, `extended-operators`), and
//! `weak-linkage` marks every export weak so duplicate copies of the shim
//! link cleanly.
//!
//! Set `CXXRT_TRAP_REPORT=stderr` and call `cxxrt_init_trap_report()` at
//! startup to get a one-line diagnostic before a trap aborts.

#[macro_use]
mod macros;

mod host;

pub mod config_abi;
pub mod cxa_abi;
pub mod operator_abi;

use cxxrt_core::symbols::{ALL_SYMBOLS, RuntimeSymbol, SizeType};

pub use operator_abi::{release, try_allocate};

/// `size_t` mangling this build exports under.
#[must_use]
pub const fn size_type() -> SizeType {
    if cfg!(cxxrt_size_t_uint) {
        SizeType::UnsignedInt
    } else {
        SizeType::UnsignedLong
    }
}

/// The cargo features that change the export set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExportFeatures {
    pub rtti: bool,
    pub extended_operators: bool,
    pub sized_deallocation: bool,
}

impl ExportFeatures {
    /// Features this build was compiled with.
    pub const BUILD: Self = Self {
        rtti: cfg!(feature = "rtti"),
        extended_operators: cfg!(feature = "extended-operators"),
        sized_deallocation: cfg!(feature = "sized-deallocation"),
    };

    /// Every feature combination.
    #[must_use]
    pub fn all() -> Vec<Self> {
        let mut out = Vec::with_capacity(8);
        for rtti in [false, true] {
            for extended_operators in [false, true] {
                for sized_deallocation in [false, true] {
                    out.push(Self {
                        rtti,
                        extended_operators,
                        sized_deallocation,
                    });
                }
            }
        }
        out
    }

    /// Whether a build with these features exports `symbol`.
    #[must_use]
    pub const fn exports(self, symbol: RuntimeSymbol) -> bool {
        match symbol {
            RuntimeSymbol::DynamicCast => self.rtti,
            RuntimeSymbol::DeleteSized => self.sized_deallocation,
            RuntimeSymbol::NewArrayAligned
            | RuntimeSymbol::DeleteArrayAligned
            | RuntimeSymbol::DeleteArraySized
            | RuntimeSymbol::DeleteSizedAligned
            | RuntimeSymbol::DeleteArraySizedAligned => self.extended_operators,
            _ => true,
        }
    }
}

/// Catalog entries a build with `features` exports, in catalog order.
#[must_use]
pub fn export_set(features: ExportFeatures) -> Vec<RuntimeSymbol> {
    ALL_SYMBOLS
        .into_iter()
        .filter(|&sym| features.exports(sym))
        .collect()
}

/// Catalog entries this build exports, in catalog order.
#[must_use]
pub fn exported_symbols() -> Vec<RuntimeSymbol> {
    export_set(ExportFeatures::BUILD)
}

/// Link names of [`exported_symbols`] under this build's mangling.
#[must_use]
pub fn exported_link_names() -> Vec<&'static str> {
    exported_symbols()
        .into_iter()
        .map(|sym| sym.link_name(size_type()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cxxrt_core::symbols::{BuildVariant, StdMode, required_symbols};

    #[test]
    fn exports_follow_catalog_order() {
        let exported = exported_symbols();
        let positions: Vec<usize> = exported
            .iter()
            .map(|sym| ALL_SYMBOLS.iter().position(|s| s == sym).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn default_features_cover_cxx17_and_gcc_cxx14() {
        let exported = export_set(ExportFeatures {
            rtti: false,
            extended_operators: false,
            sized_deallocation: true,
        });
        for variant in [
            BuildVariant::default(),
            BuildVariant {
                toolchain: cxxrt_core::Toolchain::Gcc,
                std_mode: StdMode::Cxx14,
                ..BuildVariant::default()
            },
        ] {
            for sym in required_symbols(&variant) {
                assert!(exported.contains(&sym), "{sym:?} missing for {variant}");
            }
        }
    }

    #[test]
    fn sized_deallocation_feature_controls_sized_delete() {
        let base = ExportFeatures {
            rtti: false,
            extended_operators: false,
            sized_deallocation: false,
        };
        assert!(!export_set(base).contains(&RuntimeSymbol::DeleteSized));
        let sized = ExportFeatures {
            sized_deallocation: true,
            ..base
        };
        assert!(export_set(sized).contains(&RuntimeSymbol::DeleteSized));
        assert_eq!(export_set(sized).len(), export_set(base).len() + 1);
    }

    #[test]
    fn build_features_match_export_list() {
        assert_eq!(exported_symbols(), export_set(ExportFeatures::BUILD));
        assert_eq!(ExportFeatures::all().len(), 8);
    }

    #[test]
    fn link_names_match_size_type() {
        let names = exported_link_names();
        assert!(names.contains(&"__cxa_pure_virtual"));
        assert!(names.contains(&RuntimeSymbol::New.link_name(size_type())));
        assert!(names.contains(&"_ZdlPv"));
    }
}
