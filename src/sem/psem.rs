//! Pthreads-style semaphore: a mutex-guarded condition variable.
//!
//! Migrated from `psem.h`. The original is a raw `pthread_mutex_t` +
//! `pthread_cond_t` pair with `psem_signal`/`psem_broadcast`/`psem_wait`
//! manipulating it directly; `std::sync::{Mutex, Condvar}` already encodes
//! that exact pairing, so this wrapper is a thin value type over them rather
//! than a reimplementation.

use std::sync::{Condvar, Mutex};

/// Equivalent to `psem_t`.
pub struct PSem {
    lock: Mutex<()>,
    notify: Condvar,
}

impl PSem {
    /// Equivalent to `psem_init`.
    pub fn new() -> Self {
        PSem {
            lock: Mutex::new(()),
            notify: Condvar::new(),
        }
    }

    /// Equivalent to `psem_signal`. Wakes one waiter.
    pub fn signal(&self) {
        let _guard = self.lock.lock().unwrap();
        self.notify.notify_one();
    }

    /// Equivalent to `psem_broadcast`. Wakes every waiter.
    pub fn broadcast(&self) {
        let _guard = self.lock.lock().unwrap();
        self.notify.notify_all();
    }

    /// Equivalent to `psem_wait`. Blocks until signaled or broadcast.
    ///
    /// Matches the original's raw condvar semantics: one `signal` may wake
    /// this call even with no associated state change, so callers that need
    /// a predicate must loop on their own guarded condition instead of
    /// relying on this call alone (the original carries the same caveat).
    pub fn wait(&self) {
        let guard = self.lock.lock().unwrap();
        let _guard = self.notify.wait(guard).unwrap();
    }
}

impl Default for PSem {
    fn default() -> Self {
        Self::new()
    }
}
