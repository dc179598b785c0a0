//! Host utilities used by the pool and by the demo/bench driver.
//!
//! Submodule:
//! - [`cores`] — CPU core counting via `std::thread::available_parallelism`, used to pick the default
//!   worker count when a caller creates a pool with `workers == 0`.

pub mod cores;

pub use cores::threads_cpu_count;

// ── Sleep helpers ─────────────────────────────────────────────────────────────
// The worker loops in both pools fall back to `sleep(1)` while held; these
// give that call a self-documenting name instead of an inline `Duration`.

/// Blocks the current thread for `secs` seconds.
pub fn sleep_secs(secs: u64) {
    std::thread::sleep(std::time::Duration::from_secs(secs));
}

/// Blocks the current thread for `micros` microseconds.
pub fn sleep_micros(micros: u64) {
    std::thread::sleep(std::time::Duration::from_micros(micros));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cores_at_least_one() {
        assert!(threads_cpu_count() >= 1);
    }
}
