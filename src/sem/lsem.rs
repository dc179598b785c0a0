//! Lightweight semaphore: an atomic fast path over an [`USem`] slow path.
//!
//! Migrated from `lusem.h`/`lusem.c`. The count is kept in a single signed
//! atomic; a positive count is available permits, a negative count is the
//! number of threads parked on the underlying OS semaphore. `try_wait` is a
//! pure CAS loop, `wait`/`timed_wait` first retry that CAS loop for
//! `max_spins` iterations (paying no kernel-transition cost for a
//! short-lived contention window) before falling back to the OS semaphore,
//! and on a timed-out slow path they must undo their own decrement unless a
//! `signal` has since claimed it for them — see the `undo` loop in
//! [`LightweightSemaphore::wait_with_part_spin`], a direct port of
//! `lusem_wait_with_part_spin`'s tail.

use crate::sem::usem::USem;
use std::hint::spin_loop;
use std::sync::atomic::{AtomicIsize, Ordering};
use std::time::Duration;

/// Equivalent to `lusem_t`.
pub struct LightweightSemaphore {
    count: AtomicIsize,
    sem: USem,
    max_spins: i32,
}

impl LightweightSemaphore {
    /// Equivalent to `lusem_init`.
    pub fn new(initial_count: u32, max_spins: i32) -> std::io::Result<Self> {
        Ok(LightweightSemaphore {
            count: AtomicIsize::new(initial_count as isize),
            sem: USem::new(initial_count)?,
            max_spins,
        })
    }

    /// Equivalent to `lusem_try_wait`. Pure CAS loop, no spin budget spent.
    pub fn try_wait(&self) -> bool {
        let mut old_count = self.count.load(Ordering::Relaxed);
        while old_count > 0 {
            match self.count.compare_exchange_weak(
                old_count,
                old_count - 1,
                Ordering::Acquire,
                Ordering::Relaxed,
            ) {
                Ok(_) => return true,
                Err(observed) => old_count = observed,
            }
        }
        false
    }

    /// Equivalent to `lusem_wait`: try_wait, then an unbounded part-spin wait.
    pub fn wait(&self) {
        if self.try_wait() {
            return;
        }
        self.wait_with_part_spin(None);
    }

    /// Equivalent to `lusem_timed_wait`.
    pub fn timed_wait(&self, timeout: Duration) -> bool {
        if self.try_wait() {
            return true;
        }
        self.wait_with_part_spin(Some(timeout))
    }

    /// Equivalent to `lusem_wait_with_part_spin`.
    fn wait_with_part_spin(&self, timeout: Option<Duration>) -> bool {
        let mut spin = self.max_spins;
        while spin > 0 {
            spin -= 1;
            let old_count = self.count.load(Ordering::Relaxed);
            if old_count > 0
                && self
                    .count
                    .compare_exchange_weak(old_count, old_count - 1, Ordering::Acquire, Ordering::Relaxed)
                    .is_ok()
            {
                return true;
            }
            spin_loop();
        }

        let old_count = self.count.fetch_sub(1, Ordering::Acquire);
        if old_count > 0 {
            return true;
        }

        let signaled = match timeout {
            None => {
                self.sem.wait();
                true
            }
            Some(d) => self.sem.timed_wait(d),
        };
        if signaled {
            return true;
        }

        // Timed out: the count is still decremented as if we were parked.
        // Undo it, unless a racing signal() has already claimed it for us —
        // in which case we must consume the OS-semaphore token it posted.
        loop {
            let old_count = self.count.load(Ordering::Acquire);
            if old_count >= 0 && self.sem.try_wait() {
                return true;
            }
            if old_count < 0
                && self
                    .count
                    .compare_exchange_weak(old_count, old_count + 1, Ordering::Relaxed, Ordering::Relaxed)
                    .is_ok()
            {
                return false;
            }
        }
    }

    /// Equivalent to `lusem_signal`.
    pub fn signal(&self) {
        self.signal_count(1);
    }

    /// Equivalent to `lusem_signal_count`. Keeps the OS semaphore's posted
    /// count exactly matched to the number of threads actually blocked on
    /// it: only `min(count, max(0, -old_count))` permits are forwarded.
    pub fn signal_count(&self, count: isize) {
        if count <= 0 {
            return;
        }
        let old_count = self.count.fetch_add(count, Ordering::Release);
        let to_release = if -old_count < count { -old_count } else { count };
        if to_release > 0 {
            self.sem.signal_count(to_release as usize);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn try_wait_on_zero_fails() {
        let s = LightweightSemaphore::new(0, 100).unwrap();
        assert!(!s.try_wait());
    }

    #[test]
    fn signal_then_wait_succeeds_via_fast_path() {
        let s = LightweightSemaphore::new(0, 100).unwrap();
        s.signal();
        assert!(s.try_wait());
    }

    #[test]
    fn timed_wait_times_out_and_restores_count() {
        let s = LightweightSemaphore::new(0, 10).unwrap();
        let start = Instant::now();
        let got = s.timed_wait(Duration::from_millis(30));
        assert!(!got);
        assert!(start.elapsed() >= Duration::from_millis(25));
        // Count must be restored to 0: a subsequent signal+wait must succeed.
        s.signal();
        assert!(s.try_wait());
    }

    #[test]
    fn blocking_wait_woken_by_signal() {
        let s = Arc::new(LightweightSemaphore::new(0, 10).unwrap());
        let s2 = s.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(15));
            s2.signal();
        });
        s.wait();
        handle.join().unwrap();
    }

    #[test]
    fn signal_count_wakes_multiple_waiters() {
        let s = Arc::new(LightweightSemaphore::new(0, 10).unwrap());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let s = s.clone();
                thread::spawn(move || s.wait())
            })
            .collect();
        thread::sleep(Duration::from_millis(20));
        s.signal_count(4);
        for h in handles {
            h.join().unwrap();
        }
    }
}
