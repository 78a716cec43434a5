//! ABI layer for the exception/RTTI entry points (`__cxa_*`, `__dynamic_cast`).
//!
//! The compiler references these whenever a translation unit has virtual
//! functions, throw expressions or checked downcasts, reachable or not. None of
//! them may run: each one traps, except the uncaught-exception counter, which
//! reports that nothing is unwinding.
//!
//! Signatures follow the Itanium C++ ABI so wasm-ld sees matching function
//! types at every call site.

use std::ffi::{c_uint, c_void};

use cxxrt_core::TrapKind;
use cxxrt_core::trap::UNCAUGHT_EXCEPTIONS;

use crate::host::terminate;

/// Destructor callback passed to `__cxa_throw`.
pub type ExceptionDestructor = Option<unsafe extern "C" fn(*mut c_void)>;

runtime_fn! {
    /// Called through a vtable slot that was never overridden.
    fn __cxa_pure_virtual() -> ! {
        terminate(TrapKind::PureVirtualCall)
    }
}

runtime_fn! {
    /// First step of a throw expression. Traps, so no exception object ever
    /// exists and `__cxa_throw` is never reached with one.
    fn __cxa_allocate_exception(_thrown_size: usize) -> *mut c_void {
        terminate(TrapKind::ExceptionAllocation)
    }
}

runtime_fn! {
    /// Start of stack unwinding.
    fn __cxa_throw(
        _thrown_exception: *mut c_void,
        _tinfo: *mut c_void,
        _dest: ExceptionDestructor,
    ) -> ! {
        terminate(TrapKind::Throw)
    }
}

runtime_fn! {
    /// Number of exceptions currently in flight. Always zero.
    fn __cxa_uncaught_exceptions() -> c_uint {
        UNCAUGHT_EXCEPTIONS
    }
}

#[cfg(feature = "rtti")]
runtime_fn! {
    /// Checked downcast. Without type metadata no answer would be sound.
    fn __dynamic_cast(
        _static_ptr: *const c_void,
        _static_type: *const c_void,
        _dst_type: *const c_void,
        _src2dst_offset: isize,
    ) -> *mut c_void {
        terminate(TrapKind::DynamicCast)
    }
}
