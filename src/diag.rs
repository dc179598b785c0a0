//! Verbosity-gated diagnostics.
//!
//! The original `ctest`-based test drivers print straight to stdout/stderr;
//! this crate keeps that spirit — a crate-level atomic verbosity plus a
//! gated `eprint!` macro — rather than pulling in a structured logging
//! dependency the rest of this codebase has no other use for.
//!
//! 0 = silent; 1 = errors only; 2 = normal (default); 3 = verbose.

use std::sync::atomic::{AtomicU32, Ordering};

static DIAG_LEVEL: AtomicU32 = AtomicU32::new(2);

/// Returns the current diagnostic level.
pub fn diag_level() -> u32 {
    DIAG_LEVEL.load(Ordering::Relaxed)
}

/// Sets the diagnostic level. Used by the demo/bench driver's `-v`/`-q` flags.
pub fn set_diag_level(level: u32) {
    DIAG_LEVEL.store(level, Ordering::Relaxed);
}

/// Conditionally prints to stderr at or above `level`.
#[macro_export]
macro_rules! diaglevel {
    ($level:expr, $($arg:tt)*) => {
        if $crate::diag::diag_level() >= $level {
            eprintln!($($arg)*);
        }
    };
}
