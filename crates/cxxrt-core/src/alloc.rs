//! Allocation request policy for the global `new`/`delete` operators.
//!
//! The ABI layer hands every request to the host C allocator. This module
//! decides what is actually asked of the host and what counts as failure, so
//! the exported operators reduce to "validate, call host, trap on `Err`".

use thiserror::Error;

/// Smallest byte count ever requested from the host.
///
/// `operator new(0)` must still return a unique non-null pointer, and a host
/// `malloc(0)` is allowed to return null.
pub const MIN_REQUEST: usize = 1;

/// Why an allocation could not be satisfied. Every variant is fatal at the ABI
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AllocError {
    #[error("alignment {align} is not a non-zero power of two")]
    InvalidAlignment { align: usize },
    #[error("size {size} overflows when rounded up to alignment {align}")]
    SizeOverflow { size: usize, align: usize },
    #[error("host allocator returned no memory for {size} bytes")]
    HostExhausted { size: usize },
}

/// A validated request to the host allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocRequest {
    size: usize,
    align: Option<usize>,
}

impl AllocRequest {
    /// Plain and array `new`: host default alignment.
    #[must_use]
    pub const fn plain(size: usize) -> Self {
        Self {
            size: if size < MIN_REQUEST { MIN_REQUEST } else { size },
            align: None,
        }
    }

    /// Over-aligned `new`. The size is rounded up to a multiple of `align`, as
    /// C11 `aligned_alloc` requires.
    pub fn aligned(size: usize, align: usize) -> Result<Self, AllocError> {
        if !align.is_power_of_two() {
            return Err(AllocError::InvalidAlignment { align });
        }
        let size = round_up(size.max(MIN_REQUEST), align)
            .ok_or(AllocError::SizeOverflow { size, align })?;
        Ok(Self {
            size,
            align: Some(align),
        })
    }

    /// Bytes to request from the host.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Requested alignment, `None` for the host default.
    #[must_use]
    pub const fn align(&self) -> Option<usize> {
        self.align
    }

    #[must_use]
    pub const fn is_aligned(&self) -> bool {
        self.align.is_some()
    }

    /// Classify the host's answer. A null address is exhaustion.
    pub fn check_returned(&self, addr: usize) -> Result<usize, AllocError> {
        if addr == 0 {
            return Err(AllocError::HostExhausted { size: self.size });
        }
        Ok(addr)
    }
}

/// Round `size` up to the next multiple of the power-of-two `align`.
#[must_use]
pub fn round_up(size: usize, align: usize) -> Option<usize> {
    debug_assert!(align.is_power_of_two());
    let mask = align - 1;
    size.checked_add(mask).map(|s| s & !mask)
}

#[must_use]
pub const fn is_aligned_to(addr: usize, align: usize) -> bool {
    align != 0 && addr & (align - 1) == 0
}

/// Releasing null is a no-op and must not reach the host or trap.
#[must_use]
pub const fn release_is_noop(addr: usize) -> bool {
    addr == 0
}
