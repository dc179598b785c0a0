//! Lock-based worker pool.
//!
//! Migrated from `thpool.c`/`thpool.h`. The original guards a circular task
//! array with one mutex and two condition variables (`notify` — a task was
//! queued or the pool state changed; `notify_empty` — the queue drained and
//! no worker is active) plus a `shutdown`/`hold` pair of flags a worker
//! checks on every iteration of its wait loop. This port keeps that exact
//! shape: a `Mutex`-guarded [`VecDeque`] in place of the circular array
//! (capacity is still enforced manually, matching `queue_size`), and the
//! same two `Condvar`s doing the same jobs.

use crate::pool::error::PoolError;
use crate::pool::stats::PoolStats;
use crate::pool::task::Task;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;

struct State {
    queue: VecDeque<Task>,
    capacity: usize,
    running: usize,
}

struct Shared {
    state: Mutex<State>,
    notify: Condvar,
    notify_empty: Condvar,
    shutdown: AtomicBool,
    hold: AtomicBool,
    workers: usize,
}

/// Equivalent to `thpool_t`.
pub struct LockedPool {
    shared: Arc<Shared>,
    threads: Vec<JoinHandle<()>>,
}

impl LockedPool {
    /// Equivalent to `thpool_create`. `workers == 0` defaults to the host's
    /// logical CPU count; `queue_size` below
    /// [`crate::config::LP_QUEUE_SIZE_MIN`] is rejected.
    pub fn new(workers: usize, queue_size: usize) -> Result<Self, PoolError> {
        let workers = if workers == 0 { crate::config::default_workers() } else { workers };
        if workers == 0 {
            return Err(PoolError::InvalidArgument("workers must be >= 1"));
        }
        if queue_size < crate::config::LP_QUEUE_SIZE_MIN {
            return Err(PoolError::InvalidArgument("queue_size must be >= 1"));
        }

        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                queue: VecDeque::with_capacity(queue_size),
                capacity: queue_size,
                running: 0,
            }),
            notify: Condvar::new(),
            notify_empty: Condvar::new(),
            shutdown: AtomicBool::new(false),
            hold: AtomicBool::new(false),
            workers,
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

        Ok(LockedPool { shared, threads })
    }

    /// Equivalent to `thpool_workers_count`.
    pub fn workers_count(&self) -> usize {
        self.shared.workers
    }

    /// Equivalent to `thpool_add_task`. Fails with [`PoolError::Again`]
    /// immediately if the queue is full, rather than retrying.
    pub fn add_task(&self, task: Task) -> Result<(), PoolError> {
        if self.shared.shutdown.load(Ordering::Acquire) {
            return Err(PoolError::AlreadyShutdown);
        }
        let mut state = self.shared.state.lock().unwrap();
        if state.queue.len() >= state.capacity {
            return Err(PoolError::Again);
        }
        state.queue.push_back(task);
        drop(state);
        self.shared.notify.notify_one();
        Ok(())
    }

    /// Equivalent to `thpool_add_task_try`. Retries up to `max_try` times,
    /// sleeping `usec` microseconds between attempts, while the queue stays
    /// full.
    pub fn add_task_try(&self, task: Task, usec: u64, max_try: i32) -> Result<(), PoolError> {
        let mut task = Some(task);
        let mut tries = 0;
        loop {
            if self.shared.shutdown.load(Ordering::Acquire) {
                return Err(PoolError::AlreadyShutdown);
            }
            {
                let mut state = self.shared.state.lock().unwrap();
                if state.queue.len() < state.capacity {
                    state.queue.push_back(task.take().unwrap());
                    drop(state);
                    self.shared.notify.notify_one();
                    return Ok(());
                }
            }
            tries += 1;
            if tries >= max_try {
                return Err(PoolError::Again);
            }
            crate::util::sleep_micros(usec);
        }
    }

    /// Equivalent to `thpool_pause`.
    pub fn pause(&self) {
        self.shared.hold.store(true, Ordering::Release);
    }

    /// Equivalent to `thpool_resume`.
    pub fn resume(&self) {
        self.shared.hold.store(false, Ordering::Release);
        self.shared.notify.notify_all();
    }

    /// Equivalent to `thpool_worker_try_once`: drains and runs a single task
    /// inline on the calling thread, ignoring `hold`/`shutdown`. Returns
    /// `false` if the queue was empty.
    pub fn worker_try_once(&self) -> bool {
        let mut state = self.shared.state.lock().unwrap();
        let task = match state.queue.pop_front() {
            Some(task) => task,
            None => return false,
        };
        state.running += 1;
        drop(state);

        task();

        let mut state = self.shared.state.lock().unwrap();
        state.running -= 1;
        if state.queue.is_empty() && state.running == 0 {
            self.shared.notify_empty.notify_all();
        }
        true
    }

    /// Equivalent to `thpool_wait`: blocks until the queue is empty and no
    /// worker is executing a task.
    pub fn wait(&self) {
        let mut state = self.shared.state.lock().unwrap();
        while !(state.queue.is_empty() && state.running == 0) {
            state = self.shared.notify_empty.wait(state).unwrap();
        }
    }

    /// Equivalent to `thpool_active_tasks`: relaxed read of `running`.
    pub fn active_tasks(&self) -> usize {
        self.shared.state.lock().unwrap().running
    }

    /// Equivalent to `thpool_total_tasks`: `running + queue_count` under `lock`.
    pub fn total_tasks(&self) -> usize {
        let state = self.shared.state.lock().unwrap();
        state.running + state.queue.len()
    }

    /// Snapshot combining `thpool_workers_count`, `thpool_active_tasks`, and
    /// the queued count `thpool_total_tasks` is derived from.
    pub fn stats(&self) -> PoolStats {
        let state = self.shared.state.lock().unwrap();
        PoolStats {
            workers: self.shared.workers,
            active_tasks: state.running,
            queued_tasks: state.queue.len(),
            held: self.shared.hold.load(Ordering::Acquire),
            shutdown: self.shared.shutdown.load(Ordering::Acquire),
        }
    }

    /// Equivalent to `thpool_shutdown`: stops accepting new tasks and wakes
    /// every worker so it observes the flag and exits. Does not block for
    /// workers to finish; `Drop` does that.
    pub fn shutdown(&self) {
        self.shared.shutdown.store(true, Ordering::Release);
        self.shared.notify.notify_all();
    }
}

fn worker_loop(shared: Arc<Shared>) {
    let mut state = shared.state.lock().unwrap();
    loop {
        while state.queue.is_empty() {
            if state.running == 0 {
                shared.notify_empty.notify_all();
            }
            if shared.shutdown.load(Ordering::Acquire) {
                return;
            }
            state = shared.notify.wait(state).unwrap();
        }

        if shared.hold.load(Ordering::Acquire) {
            drop(state);
            crate::util::sleep_secs(crate::config::HOLD_POLL_SECS);
            state = shared.state.lock().unwrap();
            continue;
        }

        let task = state.queue.pop_front().unwrap();
        state.running += 1;
        drop(state);

        task();

        state = shared.state.lock().unwrap();
        state.running -= 1;
    }
}

impl Drop for LockedPool {
    /// Equivalent to `thpool_destroy`: shuts the pool down (if not already)
    /// and joins every worker thread.
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
    fn rejects_zero_queue_size() {
        assert!(LockedPool::new(1, 0).is_err());
    }

    #[test]
    fn runs_submitted_tasks() {
        let pool = LockedPool::new(4, 16).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..100 {
            let c = counter.clone();
            pool.add_task(Box::new(move || {
                c.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        }
        pool.wait();
        assert_eq!(counter.load(Ordering::SeqCst), 100);
    }

    #[test]
    fn add_task_fails_when_queue_full() {
        let pool = LockedPool::new(1, 1).unwrap();
        pool.pause();
        pool.add_task(Box::new(|| {})).unwrap();
        match pool.add_task(Box::new(|| {})) {
            Err(PoolError::Again) => {}
            other => panic!("expected Again, got {other:?}"),
        }
    }

    #[test]
    fn add_task_try_retries_until_space_frees() {
        let pool = LockedPool::new(1, 1).unwrap();
        pool.pause();
        pool.add_task(Box::new(|| {})).unwrap();
        let pool2 = Arc::new(pool);
        let p = pool2.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            p.resume();
        });
        pool2
            .add_task_try(Box::new(|| {}), 5_000, 100)
            .expect("should eventually enqueue once resumed drains the slot");
        handle.join().unwrap();
    }

    #[test]
    fn pause_blocks_progress_until_resume() {
        let pool = LockedPool::new(2, 8).unwrap();
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
        let pool = LockedPool::new(1, 8).unwrap();
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
        let pool = LockedPool::new(1, 4).unwrap();
        pool.shutdown();
        match pool.add_task(Box::new(|| {})) {
            Err(PoolError::AlreadyShutdown) => {}
            other => panic!("expected AlreadyShutdown, got {other:?}"),
        }
    }

    #[test]
    fn stats_report_queue_and_active_counts() {
        let pool = LockedPool::new(1, 8).unwrap();
        pool.pause();
        for _ in 0..3 {
            pool.add_task(Box::new(|| {})).unwrap();
        }
        let stats = pool.stats();
        assert_eq!(stats.workers, 1);
        assert_eq!(stats.queued_tasks, 3);
        assert_eq!(stats.total_tasks(), 3);
    }
}
