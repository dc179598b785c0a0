//! Semaphore primitives the pools are built from, from heaviest to lightest.
//! These are standalone public building blocks — `LockedPool` inlines its
//! own `Mutex`+`Condvar` pair rather than routing through [`psem::PSem`], the
//! same way `thpool.c` manipulates its `pthread_mutex_t`/`pthread_cond_t`
//! directly instead of going through `psem.h` — but the same primitives are
//! exposed here for callers who want the pool's building blocks on their own.
//!
//! - [`psem::PSem`] — a pthreads-style mutex/condvar semaphore with
//!   `signal`/`broadcast`/`wait`.
//! - [`usem::USem`] — an unnamed OS semaphore (POSIX `sem_t`, or a condvar
//!   fallback on Apple platforms), the slow path beneath the lightweight
//!   semaphore.
//! - [`lsem::LightweightSemaphore`] — an atomic fast path with a bounded
//!   spin phase over [`usem::USem`], for callers who want to park and wake
//!   threads without a syscall on the common, uncontended case.

pub mod lsem;
pub mod psem;
pub mod usem;

pub use lsem::LightweightSemaphore;
pub use psem::PSem;
pub use usem::USem;
