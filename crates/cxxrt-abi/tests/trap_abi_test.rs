//! Integration tests for the terminate-on-trap contract.
//!
//! A trap kills the process, so each case re-runs this test binary as a child
//! with `CXXRT_TRAP_CASE` set; the child invokes one entry point and the
//! parent asserts the child died with SIGABRT and never reported a return.
//!
//! The test binary counts heap allocations made on the trapping thread after
//! the child arms the counter; a trap must not allocate on its way to `abort()`.
//!
//! Run: cargo test -p cxxrt-abi --test trap_abi_test

#![cfg(unix)]

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::os::unix::process::ExitStatusExt;
use std::process::{Command, Output};

use cxxrt_abi::config_abi::cxxrt_init_trap_report;
use cxxrt_abi::cxa_abi::{__cxa_allocate_exception, __cxa_pure_virtual, __cxa_throw};
use cxxrt_abi::operator_abi::{operator_new, operator_new_aligned, operator_new_array};
use cxxrt_core::config::TRAP_REPORT_ENV;

const CASE_ENV: &str = "CXXRT_TRAP_CASE";
const RETURNED: &str = "trap-case-returned";
const ALLOCATED: &str = "allocated-while-armed";

thread_local! {
    static ARMED: Cell<bool> = const { Cell::new(false) };
}

struct CountingAlloc;

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if ARMED.try_with(Cell::get).unwrap_or(false) {
            let _ = ARMED.try_with(|armed| armed.set(false));
            // SAFETY: static byte string, written without allocating.
            let _ = unsafe { libc::write(2, ALLOCATED.as_ptr().cast(), ALLOCATED.len()) };
        }
        // SAFETY: forwarded unchanged.
        unsafe { System.alloc(layout) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        // SAFETY: forwarded unchanged.
        unsafe { System.dealloc(ptr, layout) }
    }
}

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

fn run_case(case: &str, report: &str) -> Output {
    let exe = std::env::current_exe().expect("test binary path");
    Command::new(exe)
        .args(["trap_case_child", "--exact", "--nocapture", "--test-threads=1"])
        .env(CASE_ENV, case)
        .env(TRAP_REPORT_ENV, report)
        .output()
        .expect("spawn child test binary")
}

fn assert_aborted(case: &str, output: &Output) {
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        !stdout.contains(RETURNED),
        "{case}: entry point returned control to the caller"
    );
    assert!(
        !String::from_utf8_lossy(&output.stderr).contains(ALLOCATED),
        "{case}: trap allocated before aborting"
    );
    assert!(!output.status.success(), "{case}: child exited cleanly");
    assert_eq!(
        output.status.signal(),
        Some(libc::SIGABRT),
        "{case}: expected SIGABRT, got {:?}",
        output.status
    );
}

/// Child side. A no-op unless `CXXRT_TRAP_CASE` is set.
#[test]
fn trap_case_child() {
    let Ok(case) = std::env::var(CASE_ENV) else {
        return;
    };
    // A host that wants diagnostics resolves the mode at startup. The `cold_`
    // cases skip that, leaving the mode unresolved when the trap fires.
    let case = match case.strip_prefix("cold_") {
        Some(rest) => rest.to_string(),
        None => {
            // SAFETY: no preconditions.
            let _ = unsafe { cxxrt_init_trap_report() };
            case
        }
    };
    let _ = ARMED.try_with(|armed| armed.set(true));

    // SAFETY: each entry point is called with ABI-valid arguments; all of them
    // are expected to terminate.
    unsafe {
        match case.as_str() {
            "pure_virtual" => __cxa_pure_virtual(),
            "allocate_exception" => {
                let _ = __cxa_allocate_exception(64);
            }
            "throw" => __cxa_throw(std::ptr::null_mut(), std::ptr::null_mut(), None),
            "new_exhausted" => {
                let _ = operator_new(usize::MAX);
            }
            "new_array_exhausted" => {
                let _ = operator_new_array(usize::MAX - 64);
            }
            "new_aligned_overflow" => {
                let _ = operator_new_aligned(usize::MAX - 8, 64);
            }
            "new_aligned_bad_alignment" => {
                let _ = operator_new_aligned(32, 24);
            }
            #[cfg(feature = "rtti")]
            "dynamic_cast" => {
                let _ = cxxrt_abi::cxa_abi::__dynamic_cast(
                    std::ptr::null(),
                    std::ptr::null(),
                    std::ptr::null(),
                    -1,
                );
            }
            other => panic!("unknown trap case {other}"),
        }
    }
    let _ = ARMED.try_with(|armed| armed.set(false));
    println!("{RETURNED}");
}

#[test]
fn pure_virtual_call_aborts() {
    let output = run_case("pure_virtual", "silent");
    assert_aborted("pure_virtual", &output);
    // silent mode writes nothing of its own
    assert!(!String::from_utf8_lossy(&output.stderr).contains("cxxrt:"));
}

#[test]
fn exception_allocation_aborts() {
    assert_aborted("allocate_exception", &run_case("allocate_exception", "silent"));
}

#[test]
fn throw_aborts() {
    assert_aborted("throw", &run_case("throw", "silent"));
}

#[test]
fn exhausted_new_aborts_instead_of_returning_null() {
    for case in ["new_exhausted", "new_array_exhausted", "new_aligned_overflow"] {
        assert_aborted(case, &run_case(case, "silent"));
    }
}

#[test]
fn bad_alignment_aborts() {
    assert_aborted(
        "new_aligned_bad_alignment",
        &run_case("new_aligned_bad_alignment", "silent"),
    );
}

#[test]
fn unresolved_report_mode_traps_without_allocating() {
    for report in ["silent", "stderr", ""] {
        for case in ["cold_pure_virtual", "cold_throw", "cold_allocate_exception"] {
            let output = run_case(case, report);
            assert_aborted(case, &output);
            // never resolved, so nothing is reported either
            assert!(!String::from_utf8_lossy(&output.stderr).contains("cxxrt:"));
        }
    }
}

#[test]
fn resolved_report_mode_traps_without_allocating() {
    for case in ["pure_virtual", "throw", "new_exhausted"] {
        assert_aborted(case, &run_case(case, "stderr"));
    }
}

#[test]
fn stderr_report_mode_writes_one_line() {
    let output = run_case("throw", "stderr");
    assert_aborted("throw", &output);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cxxrt: throw is unsupported"), "{stderr}");

    let output = run_case("new_exhausted", "stderr");
    assert_aborted("new_exhausted", &output);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cxxrt: out of memory in operator new"), "{stderr}");
}

#[cfg(feature = "rtti")]
#[test]
fn dynamic_cast_aborts() {
    assert_aborted("dynamic_cast", &run_case("dynamic_cast", "silent"));
}
