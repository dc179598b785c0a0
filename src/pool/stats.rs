//! Point-in-time pool occupancy snapshot.
//!
//! Migrated from the separate `thpool_workers_count`/`thpool_active_tasks`/
//! `thpool_total_tasks` accessors; bundled into one struct here since every
//! call site that wants one of these wants the others too, and a single
//! snapshot avoids three separate moments of (benign) inconsistency under
//! concurrent mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Equivalent to `thpool_workers_count`/`lfthpool_workers_count`.
    pub workers: usize,
    /// Equivalent to `thpool_active_tasks`/`lfthpool_active_tasks`: tasks
    /// currently executing on a worker thread.
    pub active_tasks: usize,
    /// Tasks sitting in the queue, not yet picked up by a worker.
    pub queued_tasks: usize,
    /// Whether the pool is currently paused (`pause`/`resume`).
    pub held: bool,
    /// Whether `shutdown` has been called.
    pub shutdown: bool,
}

impl PoolStats {
    /// Equivalent to `thpool_total_tasks`/`lfthpool_total_tasks`.
    pub fn total_tasks(&self) -> usize {
        self.active_tasks + self.queued_tasks
    }
}
