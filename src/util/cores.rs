//! Returns the number of logical CPU cores available on the host.
//!
//! Migrated from `threads_cpu_count()` in `utils.c`. The original implementation
//! switches on platform: `sysctlbyname("hw.ncpu", ...)` on Mach/BSD, `sysconf(_SC_NPROCESSORS_ONLN)`
//! elsewhere. `std::thread::available_parallelism` provides a portable equivalent,
//! the same choice this teacher's own `util::cores` module makes for its
//! `count_cores()`.

/// Equivalent to `int threads_cpu_count()`.
///
/// Falls back to `1` if the host count cannot be determined, matching the
/// pool-creation contract: a caller passing `workers == 0` always gets at
/// least one worker thread.
pub fn threads_cpu_count() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_least_one() {
        assert!(threads_cpu_count() >= 1);
    }
}
