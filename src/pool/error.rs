//! Pool error type.
//!
//! Migrated from the `errno`-based failure reporting in `thpool_create`/
//! `lfthpool_create_sched` (`NULL` return, error code in `errno`) and the
//! `0`/`-1`/`QERR_*` return codes of `*_add_task`/`*_add_task_try`. Grounded
//! in this teacher's own `Lz4FError`: a plain enum with hand-written
//! `Display`/`std::error::Error` impls rather than a `thiserror` derive,
//! since this crate otherwise has no use for that dependency.

use std::fmt;

/// Errors a pool operation can report.
#[derive(Debug)]
pub enum PoolError {
    /// `workers == 0` after defaulting, or `queue_size` below the pool's
    /// minimum. Corresponds to `thpool_create`/`lfthpool_create_sched`
    /// returning `NULL` with `errno == EINVAL`.
    InvalidArgument(&'static str),
    /// Allocating the task queue or worker thread handles failed.
    /// Corresponds to `errno == ENOMEM`.
    OutOfMemory,
    /// The task queue was full and the caller's retry budget was exhausted.
    /// Corresponds to `thpool_add_task_try`/`lfthpool_add_task_try`
    /// returning `QERR_FULL` after `max_try` attempts.
    Again,
    /// Spawning a worker thread, or another OS-level primitive, failed.
    /// Corresponds to a nonzero `pthread_create` return.
    HostPrimitive(std::io::Error),
    /// The operation was attempted after `shutdown` had already been called.
    AlreadyShutdown,
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            PoolError::OutOfMemory => write!(f, "allocation failed"),
            PoolError::Again => write!(f, "task queue full, retry budget exhausted"),
            PoolError::HostPrimitive(e) => write!(f, "host primitive failed: {e}"),
            PoolError::AlreadyShutdown => write!(f, "pool already shut down"),
        }
    }
}

impl std::error::Error for PoolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PoolError::HostPrimitive(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PoolError {
    fn from(e: std::io::Error) -> Self {
        PoolError::HostPrimitive(e)
    }
}
