//! Pluggable idle back-off for the lock-free pool.
//!
//! Migrated from `lfthpool_create_sched`'s `sleep_func` parameter
//! (`int (*sleep_func)(useconds_t)`, defaulting to `sched_yield` when
//! `NULL`). A `Box<dyn Fn(u64) + Send + Sync>` is the Rust equivalent of a
//! caller-supplied function pointer here, matching the same
//! schedule-integration hook without the C signature's `useconds_t` return
//! value (which the original never actually inspects).

use std::sync::Arc;

/// A back-off function invoked with a microsecond duration between failed
/// dequeue attempts. Equivalent to `sleep_func`.
pub type SleepFn = Arc<dyn Fn(u64) + Send + Sync>;

/// Default back-off: yield the scheduler once, then sleep for `micros`.
/// Matches `lfthpool_create`'s default of `sched_yield` while still honoring
/// the idle-backoff duration the worker loop asks for.
pub fn default_sleep_fn() -> SleepFn {
    Arc::new(|micros: u64| {
        std::thread::yield_now();
        if micros > 0 {
            crate::util::sleep_micros(micros);
        }
    })
}
