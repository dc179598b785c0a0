//! Worker pools.
//!
//! Two independent implementations, matching the two pools in the original
//! C library:
//!
//! - [`lp::LockedPool`] — mutex + condvar backed, migrated from `thpool.c`.
//! - [`lfp::LockFreePool`] — lock-free ring queue backed, migrated from
//!   `lfthpool.c`.
//!
//! Both share the same [`task::Task`] type, [`error::PoolError`], and
//! [`stats::PoolStats`] snapshot shape.

pub mod backoff;
pub mod error;
pub mod lfp;
pub mod lp;
pub mod stats;
pub mod task;

pub use backoff::SleepFn;
pub use error::PoolError;
pub use lfp::LockFreePool;
pub use lp::LockedPool;
pub use stats::PoolStats;
pub use task::Task;
