//! Trap taxonomy.
//!
//! A trap is an unconditional process termination standing in for a runtime
//! feature the sandbox does not support. This module only names and describes
//! traps; `cxxrt-abi` executes them through the host `abort()`.

use crate::alloc::AllocError;
use crate::symbols::RuntimeSymbol;

/// Value reported by `__cxa_uncaught_exceptions`. Nothing ever unwinds.
pub const UNCAUGHT_EXCEPTIONS: u32 = 0;

/// Reason the process is being terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrapKind {
    /// A vtable slot that was never overridden was called.
    PureVirtualCall,
    /// A throw expression tried to allocate its exception object.
    ExceptionAllocation,
    /// A throw expression reached the unwinder.
    Throw,
    /// A checked downcast was requested without type metadata.
    DynamicCast,
    /// The host allocator had no memory for a `new` expression.
    AllocationFailure,
    /// Aligned `new` was called with an alignment that is not a power of two.
    InvalidAlignment,
}

impl TrapKind {
    /// Entry point that raises this trap, if it is a single one.
    #[must_use]
    pub const fn symbol(self) -> Option<RuntimeSymbol> {
        match self {
            Self::PureVirtualCall => Some(RuntimeSymbol::PureVirtual),
            Self::ExceptionAllocation => Some(RuntimeSymbol::AllocateException),
            Self::Throw => Some(RuntimeSymbol::Throw),
            Self::DynamicCast => Some(RuntimeSymbol::DynamicCast),
            Self::AllocationFailure | Self::InvalidAlignment => None,
        }
    }

    /// One-line diagnostic, newline-terminated. Static so the abort path never
    /// allocates.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::PureVirtualCall => "cxxrt: pure virtual function called\n",
            Self::ExceptionAllocation => "cxxrt: exception allocation is unsupported\n",
            Self::Throw => "cxxrt: throw is unsupported\n",
            Self::DynamicCast => "cxxrt: dynamic_cast is unsupported\n",
            Self::AllocationFailure => "cxxrt: out of memory in operator new\n",
            Self::InvalidAlignment => "cxxrt: invalid alignment in operator new\n",
        }
    }

    /// Resource exhaustion as opposed to a control-flow trap.
    #[must_use]
    pub const fn is_resource_exhaustion(self) -> bool {
        matches!(self, Self::AllocationFailure)
    }
}

impl From<&AllocError> for TrapKind {
    fn from(err: &AllocError) -> Self {
        match err {
            AllocError::InvalidAlignment { .. } => Self::InvalidAlignment,
            AllocError::SizeOverflow { .. } | AllocError::HostExhausted { .. } => {
                Self::AllocationFailure
            }
        }
    }
}

impl From<AllocError> for TrapKind {
    fn from(err: AllocError) -> Self {
        Self::from(&err)
    }
}
