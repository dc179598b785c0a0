//! Unnamed OS semaphore wrapper.
//!
//! Migrated from `usem.h`. The original header branches at compile time:
//! Mach semaphores on `__MACH__` (Apple's unnamed POSIX semaphore is
//! documented as non-functional — see the comment in `usem.h` citing the
//! `darwin-kernel` mailing list), POSIX `sem_t` everywhere else. `libc`
//! exposes the POSIX family but not `semaphore_create`/`semaphore_wait`
//! (those live under Mach-specific headers this crate has no binding for and
//! will not hand-roll), so the Apple branch here falls back to a
//! [`PSem`](crate::sem::psem::PSem)-style mutex/condvar counting semaphore
//! instead of fabricating Mach FFI.

use std::time::Duration;

#[cfg(not(target_vendor = "apple"))]
mod imp {
    use super::Duration;
    use std::io;
    use std::mem::MaybeUninit;

    pub struct UsemImpl {
        sem: libc::sem_t,
    }

    unsafe impl Send for UsemImpl {}
    unsafe impl Sync for UsemImpl {}

    impl UsemImpl {
        pub fn new(initial_count: u32) -> io::Result<Self> {
            let mut sem = MaybeUninit::<libc::sem_t>::uninit();
            let rc = unsafe { libc::sem_init(sem.as_mut_ptr(), 0, initial_count) };
            if rc != 0 {
                return Err(io::Error::last_os_error());
            }
            Ok(UsemImpl {
                sem: unsafe { sem.assume_init() },
            })
        }

        pub fn wait(&self) {
            loop {
                let rc = unsafe { libc::sem_wait(self.sem_ptr()) };
                if rc == 0 {
                    return;
                }
                let err = io::Error::last_os_error();
                if err.kind() != io::ErrorKind::Interrupted {
                    // The only other documented failure is EINVAL, which means
                    // this semaphore was never initialized; that is a logic bug.
                    panic!("sem_wait failed: {err}");
                }
            }
        }

        pub fn try_wait(&self) -> bool {
            loop {
                let rc = unsafe { libc::sem_trywait(self.sem_ptr()) };
                if rc == 0 {
                    return true;
                }
                let err = io::Error::last_os_error();
                match err.kind() {
                    io::ErrorKind::Interrupted => continue,
                    io::ErrorKind::WouldBlock => return false,
                    _ => return false,
                }
            }
        }

        pub fn timed_wait(&self, timeout: Duration) -> bool {
            let mut ts: libc::timespec = unsafe { std::mem::zeroed() };
            unsafe { libc::clock_gettime(libc::CLOCK_REALTIME, &mut ts) };
            let nsecs_in_1_sec: i64 = 1_000_000_000;
            ts.tv_sec += timeout.as_secs() as libc::time_t;
            ts.tv_nsec += timeout.subsec_nanos() as i64;
            if ts.tv_nsec >= nsecs_in_1_sec {
                ts.tv_nsec -= nsecs_in_1_sec;
                ts.tv_sec += 1;
            }
            loop {
                let rc = unsafe { libc::sem_timedwait(self.sem_ptr(), &ts) };
                if rc == 0 {
                    return true;
                }
                let err = io::Error::last_os_error();
                match err.kind() {
                    io::ErrorKind::Interrupted => continue,
                    _ => return false,
                }
            }
        }

        pub fn signal(&self) {
            loop {
                let rc = unsafe { libc::sem_post(self.sem_ptr()) };
                if rc == 0 {
                    return;
                }
                // sem_post only fails on EINVAL/EOVERFLOW, both logic bugs.
                panic!("sem_post failed: {}", io::Error::last_os_error());
            }
        }

        pub fn signal_count(&self, count: usize) {
            for _ in 0..count {
                self.signal();
            }
        }

        fn sem_ptr(&self) -> *mut libc::sem_t {
            &self.sem as *const libc::sem_t as *mut libc::sem_t
        }
    }

    impl Drop for UsemImpl {
        fn drop(&mut self) {
            unsafe {
                libc::sem_destroy(self.sem_ptr());
            }
        }
    }
}

#[cfg(target_vendor = "apple")]
mod imp {
    use super::Duration;
    use std::io;
    use std::sync::{Condvar, Mutex};

    /// Apple platforms: no usable unnamed POSIX semaphore, and no Mach binding
    /// in `libc`. A mutex + condvar counting semaphore covers the same contract.
    pub struct UsemImpl {
        count: Mutex<u32>,
        notify: Condvar,
    }

    impl UsemImpl {
        pub fn new(initial_count: u32) -> io::Result<Self> {
            Ok(UsemImpl {
                count: Mutex::new(initial_count),
                notify: Condvar::new(),
            })
        }

        pub fn wait(&self) {
            let mut count = self.count.lock().unwrap();
            while *count == 0 {
                count = self.notify.wait(count).unwrap();
            }
            *count -= 1;
        }

        pub fn try_wait(&self) -> bool {
            let mut count = self.count.lock().unwrap();
            if *count > 0 {
                *count -= 1;
                true
            } else {
                false
            }
        }

        pub fn timed_wait(&self, timeout: Duration) -> bool {
            let mut count = self.count.lock().unwrap();
            loop {
                if *count > 0 {
                    *count -= 1;
                    return true;
                }
                let (guard, result) = self.notify.wait_timeout(count, timeout).unwrap();
                count = guard;
                if result.timed_out() {
                    return *count > 0 && {
                        *count -= 1;
                        true
                    };
                }
            }
        }

        pub fn signal(&self) {
            let mut count = self.count.lock().unwrap();
            *count += 1;
            self.notify.notify_one();
        }

        pub fn signal_count(&self, n: usize) {
            let mut count = self.count.lock().unwrap();
            *count += n as u32;
            for _ in 0..n {
                self.notify.notify_one();
            }
        }
    }
}

/// Unnamed OS semaphore. Equivalent to `usem_t` plus its `usem_*` free
/// functions, bundled into a value type with RAII teardown in place of
/// `usem_init`/`usem_destroy` pairs.
pub struct USem {
    inner: imp::UsemImpl,
}

impl USem {
    /// Equivalent to `usem_init`.
    pub fn new(initial_count: u32) -> std::io::Result<Self> {
        Ok(USem {
            inner: imp::UsemImpl::new(initial_count)?,
        })
    }

    /// Equivalent to `usem_wait`. Blocks until the semaphore is signaled.
    pub fn wait(&self) {
        self.inner.wait();
    }

    /// Equivalent to `usem_try_wait`.
    pub fn try_wait(&self) -> bool {
        self.inner.try_wait()
    }

    /// Equivalent to `usem_timed_wait`. Returns `true` if signaled before
    /// `timeout` elapsed.
    pub fn timed_wait(&self, timeout: Duration) -> bool {
        self.inner.timed_wait(timeout)
    }

    /// Equivalent to `usem_signal`.
    pub fn signal(&self) {
        self.inner.signal();
    }

    /// Equivalent to `usem_signal_count`.
    pub fn signal_count(&self, count: usize) {
        self.inner.signal_count(count);
    }
}
