//! Task representation.
//!
//! Migrated from the `void (*function)(void *), void *arg` function-pointer
//! plus opaque-argument pair used by `thpool_add_task`/`lfthpool_add_task`.
//! A boxed `FnOnce` closure captures its own arguments and carries no unsafe
//! `void*` cast, directly grounded in this teacher's own `threadpool.rs`
//! (`type JobFn = Box<dyn FnOnce() + Send + 'static>;`).

/// A unit of work submitted to a pool.
pub type Task = Box<dyn FnOnce() + Send + 'static>;
