//! The lock-free pool's task queue.

pub mod mpmc;

pub use mpmc::MpmcRingQueue;
