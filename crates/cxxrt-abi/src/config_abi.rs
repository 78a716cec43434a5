//! ABI layer for trap-report configuration.
//!
//! Traps only read the cached report mode. A host that wants diagnostics calls
//! `cxxrt_init_trap_report()` once at startup, before any trap can fire.

use std::ffi::c_int;

use cxxrt_core::config::trap_report;

runtime_fn! {
    /// Resolve `CXXRT_TRAP_REPORT` and cache it. Returns 1 when traps will
    /// write a diagnostic line, 0 otherwise.
    fn cxxrt_init_trap_report() -> c_int {
        c_int::from(trap_report().writes_diagnostic())
    }
}
