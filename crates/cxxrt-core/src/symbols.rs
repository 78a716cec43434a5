//! Runtime-support symbol catalog and the build-variant table.
//!
//! Every entry point a C++ compiler may reference for virtual dispatch,
//! exceptions, RTTI or the global `new`/`delete` operators is one
//! [`RuntimeSymbol`]. Which of them a given build must define depends on the
//! toolchain, the language-standard mode, whether RTTI is enabled and how the
//! target mangles `size_t`; [`requirement`] is the single table that encodes
//! this instead of one hand-maintained header per variant.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Broad responsibility of a runtime symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolCategory {
    /// Exception/RTTI entry points that terminate the process.
    Trap,
    /// Global allocation and deallocation operators.
    Allocation,
}

/// One runtime-support entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuntimeSymbol {
    PureVirtual,
    AllocateException,
    Throw,
    UncaughtExceptions,
    DynamicCast,
    New,
    NewArray,
    NewAligned,
    NewArrayAligned,
    Delete,
    DeleteArray,
    DeleteAligned,
    DeleteArrayAligned,
    DeleteSized,
    DeleteArraySized,
    DeleteSizedAligned,
    DeleteArraySizedAligned,
}

/// Every catalog entry, traps first, in declaration order.
pub const ALL_SYMBOLS: [RuntimeSymbol; 17] = [
    RuntimeSymbol::PureVirtual,
    RuntimeSymbol::AllocateException,
    RuntimeSymbol::Throw,
    RuntimeSymbol::UncaughtExceptions,
    RuntimeSymbol::DynamicCast,
    RuntimeSymbol::New,
    RuntimeSymbol::NewArray,
    RuntimeSymbol::NewAligned,
    RuntimeSymbol::NewArrayAligned,
    RuntimeSymbol::Delete,
    RuntimeSymbol::DeleteArray,
    RuntimeSymbol::DeleteAligned,
    RuntimeSymbol::DeleteArrayAligned,
    RuntimeSymbol::DeleteSized,
    RuntimeSymbol::DeleteArraySized,
    RuntimeSymbol::DeleteSizedAligned,
    RuntimeSymbol::DeleteArraySizedAligned,
];

/// How the target spells `size_t` in Itanium mangling.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeType {
    /// `unsigned long` (`m`): wasm32 and LP64 targets.
    #[default]
    UnsignedLong,
    /// `unsigned int` (`j`): most other ILP32 targets.
    UnsignedInt,
}

impl SizeType {
    #[must_use]
    pub const fn mangling(self) -> char {
        match self {
            Self::UnsignedLong => 'm',
            Self::UnsignedInt => 'j',
        }
    }
}

/// Compiler family that produced the application object.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Toolchain {
    #[default]
    Clang,
    Gcc,
}

/// Language-standard mode the application was compiled in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StdMode {
    Cxx11,
    Cxx14,
    #[default]
    Cxx17,
    Cxx20,
}

/// Whether a variant needs a symbol defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Requirement {
    /// The compiler emits references to it; it must be defined.
    Required,
    /// Only referenced under optional flags or by library extensions.
    Optional,
    /// Never referenced; defining it leaves a stray symbol.
    Excluded,
}

/// Exception specification a declaration carries in a given standard mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExceptionSpec {
    None,
    Noexcept,
    ThrowNothing,
    ThrowBadAlloc,
}

impl ExceptionSpec {
    #[must_use]
    pub const fn as_cxx(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Noexcept => " noexcept",
            Self::ThrowNothing => " throw()",
            Self::ThrowBadAlloc => " throw(std::bad_alloc)",
        }
    }
}

/// The configuration axes that change the required symbol set.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BuildVariant {
    pub toolchain: Toolchain,
    pub std_mode: StdMode,
    pub rtti: bool,
    pub size_type: SizeType,
}

impl RuntimeSymbol {
    #[must_use]
    pub const fn category(self) -> SymbolCategory {
        match self {
            Self::PureVirtual
            | Self::AllocateException
            | Self::Throw
            | Self::UncaughtExceptions
            | Self::DynamicCast => SymbolCategory::Trap,
            _ => SymbolCategory::Allocation,
        }
    }

    /// Link-time name under the given `size_t` mangling.
    #[must_use]
    pub const fn link_name(self, size_type: SizeType) -> &'static str {
        let ulong = matches!(size_type, SizeType::UnsignedLong);
        match self {
            Self::PureVirtual => "__cxa_pure_virtual",
            Self::AllocateException => "__cxa_allocate_exception",
            Self::Throw => "__cxa_throw",
            Self::UncaughtExceptions => "__cxa_uncaught_exceptions",
            Self::DynamicCast => "__dynamic_cast",
            Self::New if ulong => "_Znwm",
            Self::New => "_Znwj",
            Self::NewArray if ulong => "_Znam",
            Self::NewArray => "_Znaj",
            Self::NewAligned if ulong => "_ZnwmSt11align_val_t",
            Self::NewAligned => "_ZnwjSt11align_val_t",
            Self::NewArrayAligned if ulong => "_ZnamSt11align_val_t",
            Self::NewArrayAligned => "_ZnajSt11align_val_t",
            Self::Delete => "_ZdlPv",
            Self::DeleteArray => "_ZdaPv",
            Self::DeleteAligned => "_ZdlPvSt11align_val_t",
            Self::DeleteArrayAligned => "_ZdaPvSt11align_val_t",
            Self::DeleteSized if ulong => "_ZdlPvm",
            Self::DeleteSized => "_ZdlPvj",
            Self::DeleteArraySized if ulong => "_ZdaPvm",
            Self::DeleteArraySized => "_ZdaPvj",
            Self::DeleteSizedAligned if ulong => "_ZdlPvmSt11align_val_t",
            Self::DeleteSizedAligned => "_ZdlPvjSt11align_val_t",
            Self::DeleteArraySizedAligned if ulong => "_ZdaPvmSt11align_val_t",
            Self::DeleteArraySizedAligned => "_ZdaPvjSt11align_val_t",
        }
    }

    /// Resolve a link-time name back to its catalog entry.
    #[must_use]
    pub fn from_link_name(name: &str, size_type: SizeType) -> Option<Self> {
        ALL_SYMBOLS
            .into_iter()
            .find(|sym| sym.link_name(size_type) == name)
    }

    /// C++ declaration, without exception specification or trailing `;`.
    #[must_use]
    pub const fn cxx_signature(self) -> &'static str {
        match self {
            Self::PureVirtual => "extern \"C\" void __cxa_pure_virtual()",
            Self::AllocateException => {
                "extern \"C\" void* __cxa_allocate_exception(std::size_t)"
            }
            Self::Throw => "extern \"C\" void __cxa_throw(void*, std::type_info*, void (*)(void*))",
            Self::UncaughtExceptions => "extern \"C\" unsigned int __cxa_uncaught_exceptions()",
            Self::DynamicCast => {
                "extern \"C\" void* __dynamic_cast(const void*, const void*, const void*, std::ptrdiff_t)"
            }
            Self::New => "void* operator new(std::size_t)",
            Self::NewArray => "void* operator new[](std::size_t)",
            Self::NewAligned => "void* operator new(std::size_t, std::align_val_t)",
            Self::NewArrayAligned => "void* operator new[](std::size_t, std::align_val_t)",
            Self::Delete => "void operator delete(void*)",
            Self::DeleteArray => "void operator delete[](void*)",
            Self::DeleteAligned => "void operator delete(void*, std::align_val_t)",
            Self::DeleteArrayAligned => "void operator delete[](void*, std::align_val_t)",
            Self::DeleteSized => "void operator delete(void*, std::size_t)",
            Self::DeleteArraySized => "void operator delete[](void*, std::size_t)",
            Self::DeleteSizedAligned => {
                "void operator delete(void*, std::size_t, std::align_val_t)"
            }
            Self::DeleteArraySizedAligned => {
                "void operator delete[](void*, std::size_t, std::align_val_t)"
            }
        }
    }

    #[must_use]
    pub const fn is_new(self) -> bool {
        matches!(
            self,
            Self::New | Self::NewArray | Self::NewAligned | Self::NewArrayAligned
        )
    }

    #[must_use]
    pub const fn is_delete(self) -> bool {
        matches!(self.category(), SymbolCategory::Allocation) && !self.is_new()
    }

    #[must_use]
    pub const fn takes_alignment(self) -> bool {
        matches!(
            self,
            Self::NewAligned
                | Self::NewArrayAligned
                | Self::DeleteAligned
                | Self::DeleteArrayAligned
                | Self::DeleteSizedAligned
                | Self::DeleteArraySizedAligned
        )
    }

    #[must_use]
    pub const fn takes_size_hint(self) -> bool {
        matches!(
            self,
            Self::DeleteSized
                | Self::DeleteArraySized
                | Self::DeleteSizedAligned
                | Self::DeleteArraySizedAligned
        )
    }

    #[must_use]
    pub const fn is_array(self) -> bool {
        matches!(
            self,
            Self::NewArray
                | Self::NewArrayAligned
                | Self::DeleteArray
                | Self::DeleteArrayAligned
                | Self::DeleteArraySized
                | Self::DeleteArraySizedAligned
        )
    }
}

impl fmt::Display for RuntimeSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cxx_signature())
    }
}

/// Requirement of `symbol` under `variant`.
#[must_use]
pub fn requirement(symbol: RuntimeSymbol, variant: &BuildVariant) -> Requirement {
    use Requirement::{Excluded, Optional, Required};

    let has_aligned = variant.std_mode >= StdMode::Cxx17;
    let has_sized = variant.std_mode >= StdMode::Cxx14;

    match symbol {
        RuntimeSymbol::PureVirtual
        | RuntimeSymbol::AllocateException
        | RuntimeSymbol::Throw
        | RuntimeSymbol::UncaughtExceptions
        | RuntimeSymbol::New
        | RuntimeSymbol::NewArray
        | RuntimeSymbol::Delete
        | RuntimeSymbol::DeleteArray => Required,
        RuntimeSymbol::DynamicCast if variant.rtti => Required,
        RuntimeSymbol::DynamicCast => Excluded,
        // libc++ declares align_val_t as an extension before C++17.
        RuntimeSymbol::NewAligned | RuntimeSymbol::DeleteAligned if has_aligned => Required,
        RuntimeSymbol::NewAligned | RuntimeSymbol::DeleteAligned => Optional,
        RuntimeSymbol::DeleteSized if !has_sized => Excluded,
        RuntimeSymbol::DeleteSized => match variant.toolchain {
            Toolchain::Gcc => Required,
            // Only with -fsized-deallocation (default from clang 19).
            Toolchain::Clang => Optional,
        },
        RuntimeSymbol::NewArrayAligned | RuntimeSymbol::DeleteArrayAligned if has_aligned => {
            Optional
        }
        RuntimeSymbol::DeleteArraySized if has_sized => Optional,
        RuntimeSymbol::DeleteSizedAligned | RuntimeSymbol::DeleteArraySizedAligned
            if has_aligned =>
        {
            Optional
        }
        RuntimeSymbol::NewArrayAligned
        | RuntimeSymbol::DeleteArrayAligned
        | RuntimeSymbol::DeleteArraySized
        | RuntimeSymbol::DeleteSizedAligned
        | RuntimeSymbol::DeleteArraySizedAligned => Excluded,
    }
}

/// Symbols the variant must define, in catalog order.
#[must_use]
pub fn required_symbols(variant: &BuildVariant) -> Vec<RuntimeSymbol> {
    ALL_SYMBOLS
        .into_iter()
        .filter(|sym| requirement(*sym, variant) == Requirement::Required)
        .collect()
}

/// True when defining `symbol` is acceptable for `variant`.
#[must_use]
pub fn permitted(symbol: RuntimeSymbol, variant: &BuildVariant) -> bool {
    requirement(symbol, variant) != Requirement::Excluded
}

/// Exception specification of the declaration in `std_mode`.
#[must_use]
pub fn exception_spec(symbol: RuntimeSymbol, std_mode: StdMode) -> ExceptionSpec {
    match symbol {
        _ if symbol.is_new() && std_mode < StdMode::Cxx17 => ExceptionSpec::ThrowBadAlloc,
        _ if symbol.is_new() => ExceptionSpec::None,
        _ if symbol.is_delete() => ExceptionSpec::Noexcept,
        // Dynamic exception specifications are gone in C++20.
        RuntimeSymbol::AllocateException if std_mode >= StdMode::Cxx20 => {
            ExceptionSpec::Noexcept
        }
        RuntimeSymbol::AllocateException => ExceptionSpec::ThrowNothing,
        _ => ExceptionSpec::None,
    }
}

/// True for names in the reserved C++ runtime namespace.
///
/// The link audit uses this to tell "a runtime entry point this shim does not
/// provide" apart from ordinary application or libc references.
#[must_use]
pub fn is_runtime_namespace(name: &str) -> bool {
    const PREFIXES: [&str; 8] = [
        "__cxa_",
        "__gxx_personality",
        "_Znw",
        "_Zna",
        "_Zdl",
        "_Zda",
        "_ZTVN10__cxxabiv1",
        "_Unwind_",
    ];
    name == "__dynamic_cast" || PREFIXES.iter().any(|p| name.starts_with(p))
}

/// Render include-guarded C++ prototypes for every non-excluded symbol.
#[must_use]
pub fn render_declarations(variant: &BuildVariant) -> String {
    let mut out = String::new();
    out.push_str("#ifndef CXXRT_RUNTIME_DECLS_HPP\n");
    out.push_str("#define CXXRT_RUNTIME_DECLS_HPP\n\n");
    out.push_str(&format!("// variant: {variant}\n\n"));
    out.push_str("#include <cstddef>\n#include <new>\n#include <typeinfo>\n\n");
    for sym in ALL_SYMBOLS {
        let req = requirement(sym, variant);
        if req == Requirement::Excluded {
            continue;
        }
        if req == Requirement::Optional {
            out.push_str("// optional\n");
        }
        out.push_str(sym.cxx_signature());
        out.push_str(exception_spec(sym, variant.std_mode).as_cxx());
        out.push_str(";\n");
    }
    out.push_str("\n#endif // CXXRT_RUNTIME_DECLS_HPP\n");
    out
}

// ---------------------------------------------------------------------------
// Parsing and display
// ---------------------------------------------------------------------------

/// Unrecognized variant axis value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {axis} '{value}'")]
pub struct VariantParseError {
    pub axis: &'static str,
    pub value: String,
}

impl VariantParseError {
    fn new(axis: &'static str, value: &str) -> Self {
        Self {
            axis,
            value: value.to_string(),
        }
    }
}

impl FromStr for Toolchain {
    type Err = VariantParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "clang" | "clang++" | "llvm" | "wasi-sdk" => Ok(Self::Clang),
            "gcc" | "g++" | "gnu" => Ok(Self::Gcc),
            _ => Err(VariantParseError::new("toolchain", s)),
        }
    }
}

impl FromStr for StdMode {
    type Err = VariantParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        let digits = lower
            .trim_start_matches("-std=")
            .trim_start_matches("gnu++")
            .trim_start_matches("c++")
            .trim_start_matches("cxx");
        match digits {
            "11" | "0x" => Ok(Self::Cxx11),
            "14" | "1y" => Ok(Self::Cxx14),
            "17" | "1z" => Ok(Self::Cxx17),
            "20" | "2a" => Ok(Self::Cxx20),
            _ => Err(VariantParseError::new("standard mode", s)),
        }
    }
}

impl FromStr for SizeType {
    type Err = VariantParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "m" | "ulong" | "unsigned-long" | "lp64" | "wasm32" => Ok(Self::UnsignedLong),
            "j" | "uint" | "unsigned-int" | "ilp32" => Ok(Self::UnsignedInt),
            _ => Err(VariantParseError::new("size_t mangling", s)),
        }
    }
}

impl fmt::Display for Toolchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Clang => "clang",
            Self::Gcc => "gcc",
        })
    }
}

impl fmt::Display for StdMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cxx11 => "c++11",
            Self::Cxx14 => "c++14",
            Self::Cxx17 => "c++17",
            Self::Cxx20 => "c++20",
        })
    }
}

impl fmt::Display for SizeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UnsignedLong => "unsigned long",
            Self::UnsignedInt => "unsigned int",
        })
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Required => "required",
            Self::Optional => "optional",
            Self::Excluded => "excluded",
        })
    }
}

impl fmt::Display for BuildVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} / rtti={} / size_t={}",
            self.toolchain,
            self.std_mode,
            if self.rtti { "on" } else { "off" },
            self.size_type
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_names_are_unique_per_size_type() {
        for size_type in [SizeType::UnsignedLong, SizeType::UnsignedInt] {
            let mut names: Vec<_> = ALL_SYMBOLS
                .iter()
                .map(|s| s.link_name(size_type))
                .collect();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), ALL_SYMBOLS.len());
        }
    }

    #[test]
    fn wasm32_operator_manglings() {
        let m = SizeType::UnsignedLong;
        assert_eq!(RuntimeSymbol::New.link_name(m), "_Znwm");
        assert_eq!(RuntimeSymbol::NewArray.link_name(m), "_Znam");
        assert_eq!(RuntimeSymbol::NewAligned.link_name(m), "_ZnwmSt11align_val_t");
        assert_eq!(RuntimeSymbol::Delete.link_name(m), "_ZdlPv");
        assert_eq!(RuntimeSymbol::DeleteArray.link_name(m), "_ZdaPv");
        assert_eq!(RuntimeSymbol::DeleteAligned.link_name(m), "_ZdlPvSt11align_val_t");
        assert_eq!(RuntimeSymbol::DeleteSized.link_name(m), "_ZdlPvm");
    }

    #[test]
    fn ilp32_manglings_use_j() {
        let j = SizeType::UnsignedInt;
        assert_eq!(RuntimeSymbol::New.link_name(j), "_Znwj");
        assert_eq!(RuntimeSymbol::DeleteArraySized.link_name(j), "_ZdaPvj");
        // size_t-free names do not change
        assert_eq!(RuntimeSymbol::Delete.link_name(j), "_ZdlPv");
        assert_eq!(RuntimeSymbol::Throw.link_name(j), "__cxa_throw");
    }

    #[test]
    fn from_link_name_round_trips_catalog() {
        for sym in ALL_SYMBOLS {
            let name = sym.link_name(SizeType::UnsignedLong);
            assert_eq!(
                RuntimeSymbol::from_link_name(name, SizeType::UnsignedLong),
                Some(sym)
            );
        }
        assert_eq!(
            RuntimeSymbol::from_link_name("_Znwj", SizeType::UnsignedLong),
            None
        );
        assert_eq!(
            RuntimeSymbol::from_link_name("malloc", SizeType::UnsignedLong),
            None
        );
    }

    #[test]
    fn categories_split_traps_and_operators() {
        let traps = ALL_SYMBOLS
            .iter()
            .filter(|s| s.category() == SymbolCategory::Trap)
            .count();
        assert_eq!(traps, 5);
        assert!(RuntimeSymbol::DeleteSized.is_delete());
        assert!(!RuntimeSymbol::NewAligned.is_delete());
        assert!(RuntimeSymbol::NewAligned.takes_alignment());
        assert!(!RuntimeSymbol::Throw.is_delete());
    }

    #[test]
    fn default_variant_is_clang_cxx17_wasm() {
        let v = BuildVariant::default();
        assert_eq!(v.toolchain, Toolchain::Clang);
        assert_eq!(v.std_mode, StdMode::Cxx17);
        assert!(!v.rtti);
        assert_eq!(v.size_type, SizeType::UnsignedLong);
    }

    #[test]
    fn dynamic_cast_follows_rtti() {
        let mut v = BuildVariant::default();
        assert_eq!(
            requirement(RuntimeSymbol::DynamicCast, &v),
            Requirement::Excluded
        );
        v.rtti = true;
        assert_eq!(
            requirement(RuntimeSymbol::DynamicCast, &v),
            Requirement::Required
        );
    }

    #[test]
    fn sized_delete_depends_on_toolchain_and_mode() {
        let mut v = BuildVariant {
            toolchain: Toolchain::Gcc,
            std_mode: StdMode::Cxx14,
            ..BuildVariant::default()
        };
        assert_eq!(requirement(RuntimeSymbol::DeleteSized, &v), Requirement::Required);
        v.toolchain = Toolchain::Clang;
        assert_eq!(requirement(RuntimeSymbol::DeleteSized, &v), Requirement::Optional);
        v.std_mode = StdMode::Cxx11;
        assert_eq!(requirement(RuntimeSymbol::DeleteSized, &v), Requirement::Excluded);
    }

    #[test]
    fn aligned_operators_required_from_cxx17() {
        let mut v = BuildVariant {
            std_mode: StdMode::Cxx14,
            ..BuildVariant::default()
        };
        assert_eq!(requirement(RuntimeSymbol::NewAligned, &v), Requirement::Optional);
        assert_eq!(
            requirement(RuntimeSymbol::NewArrayAligned, &v),
            Requirement::Excluded
        );
        v.std_mode = StdMode::Cxx17;
        assert_eq!(requirement(RuntimeSymbol::NewAligned, &v), Requirement::Required);
        assert_eq!(requirement(RuntimeSymbol::DeleteAligned, &v), Requirement::Required);
        assert_eq!(
            requirement(RuntimeSymbol::NewArrayAligned, &v),
            Requirement::Optional
        );
    }

    #[test]
    fn exception_specs_track_standard_mode() {
        assert_eq!(
            exception_spec(RuntimeSymbol::New, StdMode::Cxx14),
            ExceptionSpec::ThrowBadAlloc
        );
        assert_eq!(
            exception_spec(RuntimeSymbol::New, StdMode::Cxx17),
            ExceptionSpec::None
        );
        assert_eq!(
            exception_spec(RuntimeSymbol::DeleteAligned, StdMode::Cxx11),
            ExceptionSpec::Noexcept
        );
        assert_eq!(
            exception_spec(RuntimeSymbol::AllocateException, StdMode::Cxx17),
            ExceptionSpec::ThrowNothing
        );
        assert_eq!(
            exception_spec(RuntimeSymbol::AllocateException, StdMode::Cxx20),
            ExceptionSpec::Noexcept
        );
        assert_eq!(
            exception_spec(RuntimeSymbol::PureVirtual, StdMode::Cxx20),
            ExceptionSpec::None
        );
    }

    #[test]
    fn runtime_namespace_detection() {
        assert!(is_runtime_namespace("__cxa_begin_catch"));
        assert!(is_runtime_namespace("__dynamic_cast"));
        assert!(is_runtime_namespace("_ZnwmRKSt9nothrow_t"));
        assert!(is_runtime_namespace("__gxx_personality_v0"));
        assert!(is_runtime_namespace(
            "_ZTVN10__cxxabiv117__class_type_infoE"
        ));
        assert!(!is_runtime_namespace("malloc"));
        assert!(!is_runtime_namespace("_ZN5codec6encodeEv"));
    }

    #[test]
    fn declarations_skip_excluded_and_are_guarded() {
        let v = BuildVariant {
            std_mode: StdMode::Cxx14,
            ..BuildVariant::default()
        };
        let text = render_declarations(&v);
        assert!(text.starts_with("#ifndef CXXRT_RUNTIME_DECLS_HPP"));
        assert!(text.trim_end().ends_with("#endif // CXXRT_RUNTIME_DECLS_HPP"));
        assert!(text.contains("void* operator new(std::size_t) throw(std::bad_alloc);"));
        assert!(text.contains("void operator delete(void*) noexcept;"));
        assert!(!text.contains("__dynamic_cast"));
        assert!(!text.contains("operator new[](std::size_t, std::align_val_t)"));
    }

    #[test]
    fn parse_variant_axes() {
        assert_eq!("clang".parse::<Toolchain>(), Ok(Toolchain::Clang));
        assert_eq!("G++".parse::<Toolchain>(), Ok(Toolchain::Gcc));
        assert_eq!("c++17".parse::<StdMode>(), Ok(StdMode::Cxx17));
        assert_eq!("gnu++14".parse::<StdMode>(), Ok(StdMode::Cxx14));
        assert_eq!("-std=c++2a".parse::<StdMode>(), Ok(StdMode::Cxx20));
        assert_eq!("11".parse::<StdMode>(), Ok(StdMode::Cxx11));
        assert_eq!("j".parse::<SizeType>(), Ok(SizeType::UnsignedInt));
        let err = "c++98".parse::<StdMode>().unwrap_err();
        assert_eq!(err.to_string(), "unknown standard mode 'c++98'");
    }
}
