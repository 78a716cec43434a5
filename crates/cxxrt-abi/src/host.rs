//! Host C runtime primitives and the terminal trap path.
//!
//! Everything the shim consumes from the host goes through this module:
//! `malloc`, `aligned_alloc`, `free`, `write` (diagnostics only) and `abort`.

use std::ffi::{c_int, c_void};

use cxxrt_core::config::cached_trap_report;
use cxxrt_core::{AllocError, TrapKind};

const STDERR_FD: c_int = 2;

unsafe extern "C" {
    // Not every `libc` target module declares this one.
    #[link_name = "aligned_alloc"]
    fn host_aligned_alloc_sym(alignment: usize, size: usize) -> *mut c_void;
}

#[inline]
pub(crate) unsafe fn malloc(size: usize) -> *mut c_void {
    // SAFETY: direct call to the host allocator.
    unsafe { libc::malloc(size) }
}

#[inline]
pub(crate) unsafe fn aligned_alloc(alignment: usize, size: usize) -> *mut c_void {
    // SAFETY: direct call to the host allocator; alignment is a validated
    // power of two and size a multiple of it.
    unsafe { host_aligned_alloc_sym(alignment, size) }
}

#[inline]
pub(crate) unsafe fn free(ptr: *mut c_void) {
    // SAFETY: caller passes a pointer obtained from malloc/aligned_alloc.
    unsafe { libc::free(ptr) }
}

fn write_diagnostic(message: &str) {
    // Best effort: a short or failed write changes nothing about the abort.
    // SAFETY: message is a valid, initialized byte range for its length.
    let _ = unsafe { libc::write(STDERR_FD, message.as_ptr().cast(), message.len()) };
}

fn abort() -> ! {
    // SAFETY: abort has no preconditions and does not return.
    unsafe { libc::abort() }
}

fn terminate_with(kind: TrapKind) -> ! {
    if cached_trap_report().writes_diagnostic() {
        write_diagnostic(kind.message());
    }
    abort()
}

/// Terminate the process for a control-flow trap.
///
/// Only the cached report mode is consulted: a trap never reads the
/// environment or allocates. [`crate::config_abi::cxxrt_init_trap_report`]
/// resolves the mode ahead of time.
#[cold]
#[inline(never)]
pub(crate) fn terminate(kind: TrapKind) -> ! {
    terminate_with(kind)
}

/// Terminate the process for a failed allocation.
#[cold]
#[inline(never)]
pub(crate) fn terminate_alloc(err: AllocError) -> ! {
    terminate_with(TrapKind::from(err))
}
