//! A worker-pool runtime built on the same OS-synchronization primitives as
//! the C `libthreads` project it is ported from: two interchangeable pool
//! implementations (mutex/condvar backed, and lock-free ring-queue backed)
//! over a small stack of semaphore types.

pub mod config;
pub mod diag;
pub mod pool;
pub mod queue;
pub mod sem;
pub mod util;

// ─────────────────────────────────────────────────────────────────────────────
// Top-level convenience re-exports for the most common entry points.
// ─────────────────────────────────────────────────────────────────────────────

/// Mutex/condvar-backed worker pool. Equivalent to `thpool_t`.
pub use pool::LockedPool;
/// Lock-free, ring-queue-backed worker pool. Equivalent to `lfthpool_t`.
pub use pool::LockFreePool;

/// A unit of work submitted to either pool.
pub use pool::Task;
/// Errors either pool can report.
pub use pool::PoolError;
/// Occupancy snapshot shared by both pools.
pub use pool::PoolStats;
/// Back-off closure type for [`LockFreePool::with_sleep_fn`].
pub use pool::SleepFn;

/// Bounded lock-free MPMC ring queue underlying [`LockFreePool`].
pub use queue::MpmcRingQueue;

/// Unnamed OS semaphore. Equivalent to `usem_t`.
pub use sem::USem;
/// Atomic-fast-path semaphore over [`USem`]. Equivalent to `lusem_t`.
pub use sem::LightweightSemaphore;
/// Mutex/condvar semaphore. Equivalent to `psem_t`.
pub use sem::PSem;

/// Host logical CPU count, used to default `workers == 0`.
pub use util::threads_cpu_count;
