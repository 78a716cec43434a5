//! ABI layer for the global allocation operators (`operator new`/`delete`).
//!
//! Every `new` goes to the host `malloc` (or `aligned_alloc` for over-aligned
//! types) and never returns null: a failed request terminates the process, so
//! no `std::bad_alloc` machinery is needed. Every `delete` goes to the host
//! `free`; size and alignment hints are accepted for ABI compatibility and
//! ignored, since the host allocator tracks its own metadata.
//!
//! `std::align_val_t` is an `enum class : size_t` and is passed as `usize`.

use std::ffi::c_void;
use std::ptr::NonNull;

use cxxrt_core::AllocError;
use cxxrt_core::alloc::{AllocRequest, release_is_noop};

use crate::host;

/// Ask the host for `request`, reporting failure instead of trapping.
///
/// The exported operators call this and turn `Err` into process termination.
pub fn try_allocate(request: AllocRequest) -> Result<NonNull<u8>, AllocError> {
    // SAFETY: plain calls into the host allocator with a validated request.
    let raw = unsafe {
        match request.align() {
            Some(align) => host::aligned_alloc(align, request.size()),
            None => host::malloc(request.size()),
        }
    };
    request.check_returned(raw as usize)?;
    // SAFETY: check_returned rejected null.
    Ok(unsafe { NonNull::new_unchecked(raw.cast::<u8>()) })
}

/// Return memory to the host. Null is a no-op.
///
/// # Safety
///
/// `ptr` must be null or a live pointer obtained from [`try_allocate`] or one
/// of the `new` operators, released exactly once.
pub unsafe fn release(ptr: *mut c_void) {
    if release_is_noop(ptr as usize) {
        return;
    }
    // SAFETY: caller contract above.
    unsafe { host::free(ptr) }
}

#[inline]
fn allocate_or_trap(request: AllocRequest) -> *mut c_void {
    match try_allocate(request) {
        Ok(ptr) => ptr.as_ptr().cast(),
        Err(err) => host::terminate_alloc(err),
    }
}

#[inline]
fn allocate_aligned_or_trap(size: usize, align: usize) -> *mut c_void {
    match AllocRequest::aligned(size, align) {
        Ok(request) => allocate_or_trap(request),
        Err(err) => host::terminate_alloc(err),
    }
}

// ---------------------------------------------------------------------------
// new
// ---------------------------------------------------------------------------

runtime_fn! {
    /// `void* operator new(std::size_t)`
    @mangled("_Znwm", "_Znwj")
    fn operator_new(size: usize) -> *mut c_void {
        allocate_or_trap(AllocRequest::plain(size))
    }
}

runtime_fn! {
    /// `void* operator new[](std::size_t)`. Same strategy as plain `new`; the
    /// language only requires a separate symbol.
    @mangled("_Znam", "_Znaj")
    fn operator_new_array(size: usize) -> *mut c_void {
        allocate_or_trap(AllocRequest::plain(size))
    }
}

runtime_fn! {
    /// `void* operator new(std::size_t, std::align_val_t)`
    @mangled("_ZnwmSt11align_val_t", "_ZnwjSt11align_val_t")
    fn operator_new_aligned(size: usize, align: usize) -> *mut c_void {
        allocate_aligned_or_trap(size, align)
    }
}

#[cfg(feature = "extended-operators")]
runtime_fn! {
    /// `void* operator new[](std::size_t, std::align_val_t)`
    @mangled("_ZnamSt11align_val_t", "_ZnajSt11align_val_t")
    fn operator_new_array_aligned(size: usize, align: usize) -> *mut c_void {
        allocate_aligned_or_trap(size, align)
    }
}

// ---------------------------------------------------------------------------
// delete
// ---------------------------------------------------------------------------

runtime_fn! {
    /// `void operator delete(void*) noexcept`
    @mangled("_ZdlPv", "_ZdlPv")
    fn operator_delete(ptr: *mut c_void) {
        unsafe { release(ptr) }
    }
}

runtime_fn! {
    /// `void operator delete[](void*) noexcept`
    @mangled("_ZdaPv", "_ZdaPv")
    fn operator_delete_array(ptr: *mut c_void) {
        unsafe { release(ptr) }
    }
}

runtime_fn! {
    /// `void operator delete(void*, std::align_val_t) noexcept`
    @mangled("_ZdlPvSt11align_val_t", "_ZdlPvSt11align_val_t")
    fn operator_delete_aligned(ptr: *mut c_void, _align: usize) {
        unsafe { release(ptr) }
    }
}

#[cfg(feature = "sized-deallocation")]
runtime_fn! {
    /// `void operator delete(void*, std::size_t) noexcept`
    @mangled("_ZdlPvm", "_ZdlPvj")
    fn operator_delete_sized(ptr: *mut c_void, _size: usize) {
        unsafe { release(ptr) }
    }
}

#[cfg(feature = "extended-operators")]
runtime_fn! {
    /// `void operator delete[](void*, std::align_val_t) noexcept`
    @mangled("_ZdaPvSt11align_val_t", "_ZdaPvSt11align_val_t")
    fn operator_delete_array_aligned(ptr: *mut c_void, _align: usize) {
        unsafe { release(ptr) }
    }
}

#[cfg(feature = "extended-operators")]
runtime_fn! {
    /// `void operator delete[](void*, std::size_t) noexcept`
    @mangled("_ZdaPvm", "_ZdaPvj")
    fn operator_delete_array_sized(ptr: *mut c_void, _size: usize) {
        unsafe { release(ptr) }
    }
}

#[cfg(feature = "extended-operators")]
runtime_fn! {
    /// `void operator delete(void*, std::size_t, std::align_val_t) noexcept`
    @mangled("_ZdlPvmSt11align_val_t", "_ZdlPvjSt11align_val_t")
    fn operator_delete_sized_aligned(ptr: *mut c_void, _size: usize, _align: usize) {
        unsafe { release(ptr) }
    }
}

#[cfg(feature = "extended-operators")]
runtime_fn! {
    /// `void operator delete[](void*, std::size_t, std::align_val_t) noexcept`
    @mangled("_ZdaPvmSt11align_val_t", "_ZdaPvjSt11align_val_t")
    fn operator_delete_array_sized_aligned(ptr: *mut c_void, _size: usize, _align: usize) {
        unsafe { release(ptr) }
    }
}
