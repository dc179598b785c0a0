//! Lock-free worker pool.
//!
//! Migrated from `lfthpool.c`/`lfthpool.h`. The original backs its queue
//! with a lock-free MPMC ring buffer and has no condition variable to block
//! a worker on — an idle worker instead polls the queue and backs off
//! through a caller-pluggable `sleep_func`. This port keeps that shape:
//! [`MpmcRingQueue`] for storage, atomics for `shutdown`/`hold`/`running`,
//! and a [`SleepFn`] closure standing in for `sleep_func`.

use crate::pool::backoff::{default_sleep_fn, SleepFn};
use crate::pool::error::PoolError;
use crate::pool::stats::PoolStats;
use crate::pool::task::Task;
use crate::queue::MpmcRingQueue;
use std::sync::atomic::{fence, AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

struct Shared {
    queue: MpmcRingQueue<Task>,
    running: AtomicUsize,
    shutdown: AtomicBool,
    hold: AtomicBool,
    workers: usize,
    sleep_fn: SleepFn,
}

/// Equivalent to `lfthpool_t`.
pub struct LockFreePool {
    shared: Arc<Shared>,
    threads: Vec<JoinHandle<()>>,
}

impl LockFreePool {
    /// Equivalent to `lfthpool_create`: `sleep_func` defaults to a
    /// yield-then-sleep back-off.
    pub fn new(workers: usize, queue_size: usize) -> Result<Self, PoolError> {
        Self::with_sleep_fn(workers, queue_size, default_sleep_fn())
    }

    /// Equivalent to `lfthpool_create_sched`. `queue_size` is rounded up to
    /// the next power of two, matching [`MpmcRingQueue`]'s contract.
    pub fn with_sleep_fn(workers: usize, queue_size: usize, sleep_fn: SleepFn) -> Result<Self, PoolError> {
        let workers = if workers == 0 { crate::config::default_workers() } else { workers };
        if workers == 0 {
            return Err(PoolError::InvalidArgument("workers must be >= 1"));
        }
        if queue_size < crate::config::LFP_QUEUE_SIZE_MIN {
            return Err(PoolError::InvalidArgument("queue_size must be >= 2"));
        }

        let shared = Arc::new(Shared {
            queue: MpmcRingQueue::try_new(queue_size)?,
            running: AtomicUsize::new(0),
            shutdown: AtomicBool::new(false),
            hold: AtomicBool::new(false),
            workers,
            sleep_fn,
        });

        let mut threads = Vec::with_capacity(workers);
        for _ in 0..workers {
            let shared = shared.clone();
            threads.push(
                std::thread::Builder::new()
                    .spawn(move || worker_loop(shared))
                    .map_err(PoolError::HostPrimitive)?,
            );
        }

        Ok(LockFreePool { shared, threads })
    }

    /// Equivalent to `lfthpool_workers_count`.
    pub fn workers_count(&self) -> usize {
        self.shared.workers
    }

    /// Equivalent to `lfthpool_add_task`.
    pub fn add_task(&self, task: Task) -> Result<(), PoolError> {
        if self.shared.shutdown.load(Ordering::Acquire) {
            return Err(PoolError::AlreadyShutdown);
        }
        self.shared.queue.try_enqueue(task).map_err(|_| PoolError::Again)
    }

    /// Equivalent to `lfthpool_add_task_try`.
    pub fn add_task_try(&self, task: Task, usec: u64, max_try: i32) -> Result<(), PoolError> {
        let mut task = task;
        let mut tries = 0;
        loop {
            if self.shared.shutdown.load(Ordering::Acquire) {
                return Err(PoolError::AlreadyShutdown);
            }
            match self.shared.queue.try_enqueue(task) {
                Ok(()) => return Ok(()),
                Err(t) => task = t,
            }
            tries += 1;
            if tries >= max_try {
                return Err(PoolError::Again);
            }
            crate::util::sleep_micros(usec);
        }
    }

    /// Equivalent to `lfthpool_pause`.
    pub fn pause(&self) {
        self.shared.hold.store(true, Ordering::Release);
    }

    /// Equivalent to `lfthpool_resume`.
    pub fn resume(&self) {
        self.shared.hold.store(false, Ordering::Release);
    }

    /// Equivalent to `lfthpool_worker_try_once`: dequeues and runs a single
    /// task inline, ignoring `hold`/`shutdown`. Returns `false` if the queue
    /// was empty.
    pub fn worker_try_once(&self) -> bool {
        match self.shared.queue.try_dequeue() {
            None => false,
            Some(task) => {
                self.shared.running.fetch_add(1, Ordering::AcqRel);
                task();
                self.shared.running.fetch_sub(1, Ordering::AcqRel);
                true
            }
        }
    }

    /// Equivalent to `lfthpool_wait`: polls until the queue is empty and no
    /// worker is mid-task, backing off through the pool's `sleep_func`
    /// between checks.
    pub fn wait(&self) {
        loop {
            if self.shared.running.load(Ordering::Relaxed) > 0 {
                (self.shared.sleep_fn)(crate::config::LFP_WAIT_POLL_USEC);
                continue;
            }
            if self.shared.queue.len_relaxed() > 0 {
                (self.shared.sleep_fn)(crate::config::LFP_WAIT_POLL_USEC);
                continue;
            }
            fence(Ordering::Acquire);
            if self.shared.running.load(Ordering::Relaxed) == 0 {
                return;
            }
            (self.shared.sleep_fn)(crate::config::LFP_WAIT_POLL_USEC);
        }
    }

    /// Equivalent to `lfthpool_active_tasks`: relaxed read of `running`.
    pub fn active_tasks(&self) -> usize {
        self.shared.running.load(Ordering::Relaxed)
    }

    /// Equivalent to `lfthpool_total_tasks`: `running + queue_len`, each read
    /// independently and relaxed, so may transiently disagree under
    /// concurrent mutation.
    pub fn total_tasks(&self) -> usize {
        self.shared.running.load(Ordering::Relaxed) + self.shared.queue.len_relaxed()
    }

    /// Occupancy snapshot. `queued_tasks` uses [`MpmcRingQueue::len_relaxed`]
    /// and may be transiently stale under concurrent mutation.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            workers: self.shared.workers,
            active_tasks: self.shared.running.load(Ordering::Relaxed),
            queued_tasks: self.shared.queue.len_relaxed(),
            held: self.shared.hold.load(Ordering::Acquire),
            shutdown: self.shared.shutdown.load(Ordering::Acquire),
        }
    }

    /// Equivalent to `lfthpool_shutdown`. Does not block for workers to
    /// finish; `Drop` does that.
    pub fn shutdown(&self) {
        self.shared.shutdown.store(true, Ordering::Release);
    }
}

fn worker_loop(shared: Arc<Shared>) {
    while !shared.shutdown.load(Ordering::Acquire) {
        if shared.hold.load(Ordering::Acquire) {
            crate::util::sleep_secs(crate::config::HOLD_POLL_SECS);
            continue;
        }

        let task = match shared.queue.try_dequeue() {
            Some(task) => task,
            None => {
                (shared.sleep_fn)(crate::config::LFP_IDLE_BACKOFF_USEC);
                continue;
            }
        };

        shared.running.fetch_add(1, Ordering::AcqRel);
        task();
        shared.running.fetch_sub(1, Ordering::AcqRel);
    }
}

impl Drop for LockFreePool {
    /// Equivalent to `lfthpool_destroy`: shuts the pool down (if not
    /// already) and joins every worker thread.
    fn drop(&mut self) {
        self.shutdown();
        for handle in self.threads.drain(..) {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[test]
    fn rejects_queue_size_below_two() {
        assert!(LockFreePool::new(1, 1).is_err());
    }

    #[test]
    fn rounds_queue_size_up_to_power_of_two() {
        let pool = LockFreePool::new(1, 5).unwrap();
        assert_eq!(pool.shared.queue.capacity(), 8);
    }

    #[test]
    fn runs_submitted_tasks() {
        let pool = LockFreePool::new(4, 32).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..500 {
            let c = counter.clone();
            pool.add_task(Box::new(move || {
                c.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        }
        pool.wait();
        assert_eq!(counter.load(Ordering::SeqCst), 500);
    }

    #[test]
    fn add_task_fails_when_queue_full() {
        let pool = LockFreePool::new(1, 2).unwrap();
        pool.pause();
        pool.add_task(Box::new(|| {})).unwrap();
        pool.add_task(Box::new(|| {})).unwrap();
        match pool.add_task(Box::new(|| {})) {
            Err(PoolError::Again) => {}
            other => panic!("expected Again, got {other:?}"),
        }
    }

    #[test]
    fn add_task_try_retries_until_space_frees() {
        let pool = Arc::new(LockFreePool::new(1, 2).unwrap());
        pool.pause();
        pool.add_task(Box::new(|| {})).unwrap();
        pool.add_task(Box::new(|| {})).unwrap();
        let p = pool.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            p.resume();
        });
        pool.add_task_try(Box::new(|| {}), 5_000, 200)
            .expect("should eventually enqueue once resumed drains a slot");
        handle.join().unwrap();
    }

    #[test]
    fn pause_blocks_progress_until_resume() {
        let pool = LockFreePool::new(2, 8).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        pool.pause();
        for _ in 0..4 {
            let c = counter.clone();
            pool.add_task(Box::new(move || {
                c.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        }
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        pool.resume();
        pool.wait();
        assert_eq!(counter.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn worker_try_once_drains_one_task_at_a_time() {
        let pool = LockFreePool::new(1, 8).unwrap();
        pool.pause();
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..2 {
            let c = counter.clone();
            pool.add_task(Box::new(move || {
                c.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        }
        assert!(pool.worker_try_once());
        assert!(pool.worker_try_once());
        assert!(!pool.worker_try_once());
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn shutdown_rejects_new_tasks() {
        let pool = LockFreePool::new(1, 4).unwrap();
        pool.shutdown();
        match pool.add_task(Box::new(|| {})) {
            Err(PoolError::AlreadyShutdown) => {}
            other => panic!("expected AlreadyShutdown, got {other:?}"),
        }
    }
}
