//! Runtime trap-report configuration.
//!
//! The report mode is set via the `CXXRT_TRAP_REPORT` environment variable:
//! - `silent` (default): traps call `abort()` and nothing else.
//! - `stderr`: traps write a one-line diagnostic to fd 2 first.
//!
//! Unknown values fall back to `silent`.

use std::sync::atomic::{AtomicU8, Ordering};

/// Environment variable read by [`trap_report`].
pub const TRAP_REPORT_ENV: &str = "CXXRT_TRAP_REPORT";

/// What a trap does before terminating.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrapReport {
    #[default]
    Silent,
    Stderr,
}

impl TrapReport {
    /// Parse from string (case-insensitive).
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "stderr" | "report" | "verbose" | "1" | "on" => Self::Stderr,
            _ => Self::Silent,
        }
    }

    #[must_use]
    pub const fn writes_diagnostic(self) -> bool {
        matches!(self, Self::Stderr)
    }
}

// 0=unresolved, 1=Silent, 2=Stderr, 255=resolving.
static CACHED_REPORT: AtomicU8 = AtomicU8::new(0);

const REPORT_UNRESOLVED: u8 = 0;
const REPORT_SILENT: u8 = 1;
const REPORT_STDERR: u8 = 2;
const REPORT_RESOLVING: u8 = 255;

fn report_to_u8(report: TrapReport) -> u8 {
    match report {
        TrapReport::Silent => REPORT_SILENT,
        TrapReport::Stderr => REPORT_STDERR,
    }
}

fn u8_to_report(v: u8) -> TrapReport {
    match v {
        REPORT_STDERR => TrapReport::Stderr,
        _ => TrapReport::Silent,
    }
}

/// Configured report mode. Reads the environment on the first call and caches
/// the result.
///
/// A call that races an in-progress resolution gets `Silent` rather than
/// waiting.
#[must_use]
pub fn trap_report() -> TrapReport {
    let cached = CACHED_REPORT.load(Ordering::Relaxed);

    if cached != REPORT_UNRESOLVED && cached != REPORT_RESOLVING {
        return u8_to_report(cached);
    }

    if cached == REPORT_RESOLVING {
        return TrapReport::Silent;
    }

    if CACHED_REPORT
        .compare_exchange(
            REPORT_UNRESOLVED,
            REPORT_RESOLVING,
            Ordering::SeqCst,
            Ordering::Relaxed,
        )
        .is_err()
    {
        let v = CACHED_REPORT.load(Ordering::Relaxed);
        return if v != REPORT_UNRESOLVED && v != REPORT_RESOLVING {
            u8_to_report(v)
        } else {
            TrapReport::Silent
        };
    }

    let report = std::env::var(TRAP_REPORT_ENV)
        .map(|v| TrapReport::from_str_loose(&v))
        .unwrap_or_default();
    CACHED_REPORT.store(report_to_u8(report), Ordering::Release);
    report
}

/// Report mode without triggering resolution.
///
/// Used on every trap path, where reading the environment would itself
/// allocate. Returns `Silent` until [`trap_report`] has run once.
#[must_use]
pub fn cached_trap_report() -> TrapReport {
    u8_to_report(CACHED_REPORT.load(Ordering::Acquire))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_report_modes() {
        assert_eq!(TrapReport::from_str_loose("stderr"), TrapReport::Stderr);
        assert_eq!(TrapReport::from_str_loose("STDERR"), TrapReport::Stderr);
        assert_eq!(TrapReport::from_str_loose(" report "), TrapReport::Stderr);
        assert_eq!(TrapReport::from_str_loose("1"), TrapReport::Stderr);
        assert_eq!(TrapReport::from_str_loose("silent"), TrapReport::Silent);
        assert_eq!(TrapReport::from_str_loose("off"), TrapReport::Silent);
        assert_eq!(TrapReport::from_str_loose(""), TrapReport::Silent);
        assert_eq!(TrapReport::from_str_loose("garbage"), TrapReport::Silent);
    }

    #[test]
    fn default_is_silent() {
        assert_eq!(TrapReport::default(), TrapReport::Silent);
        assert!(!TrapReport::Silent.writes_diagnostic());
        assert!(TrapReport::Stderr.writes_diagnostic());
    }

    #[test]
    fn u8_round_trip() {
        for r in [TrapReport::Silent, TrapReport::Stderr] {
            assert_eq!(u8_to_report(report_to_u8(r)), r);
        }
        assert_eq!(u8_to_report(REPORT_RESOLVING), TrapReport::Silent);
        assert_eq!(u8_to_report(REPORT_UNRESOLVED), TrapReport::Silent);
    }

    #[test]
    fn resolution_is_cached() {
        let first = trap_report();
        assert_eq!(trap_report(), first);
        assert_eq!(cached_trap_report(), first);
    }
}
