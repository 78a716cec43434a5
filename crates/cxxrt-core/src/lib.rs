//! # cxxrt-core
//!
//! Safe policy logic for the cxxrt runtime-support shim.
//!
//! C++ translation units compiled for a sandboxed wasm target still reference a
//! fixed set of runtime entry points (`__cxa_*`, `operator new`/`delete`) even
//! when no exception is ever thrown. This crate describes that symbol set, the
//! build variants that change it, and the allocation/trap policy the exported
//! entry points in `cxxrt-abi` follow. No `unsafe` code is permitted here.
//!
//! ```text
//! compiled C++ -> link-time symbol (cxxrt-abi) -> policy (this crate) -> host libc / abort
//! ```

#![deny(unsafe_code)]

pub mod alloc;
pub mod config;
pub mod link;
pub mod nm;
pub mod symbols;
pub mod trap;

pub use alloc::{AllocError, AllocRequest};
pub use symbols::{BuildVariant, Requirement, RuntimeSymbol, SizeType, StdMode, Toolchain};
pub use trap::TrapKind;
