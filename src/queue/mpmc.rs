//! Bounded multi-producer/multi-consumer lock-free ring queue.
//!
//! Migrated from the `mpmc_ring_queue` used by `lfthpool.c` (the C header
//! itself is vendor/private to that project and not part of its public
//! `include/`, so this module follows the sequence-number slot protocol
//! described by the pool's call sites: `mpmc_ring_queue_new`,
//! `mpmc_ring_queue_enqueue`, `mpmc_ring_queue_dequeue`,
//! `mpmc_ring_queue_len_relaxed`, `mpmc_ring_queue_delete`) together with the
//! classic bounded MPMC ring-buffer algorithm (Vyukov-style per-slot sequence
//! numbers, the same scheme the LMAX Disruptor and `crossbeam-channel`'s
//! bounded channel use).
//!
//! Each slot carries a sequence number that, compared against the ticket a
//! producer or consumer is holding, tells that thread whether the slot is
//! free to write, full and ready to read, or owned by some other in-flight
//! operation it must retry past.

use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicUsize, Ordering};

struct Slot<T> {
    sequence: AtomicUsize,
    value: UnsafeCell<MaybeUninit<T>>,
}

/// A bounded MPMC ring queue. Capacity is always a power of two.
///
/// Equivalent to `mpmc_ring_queue_t` / `mpmc_ring_queue_new`.
pub struct MpmcRingQueue<T> {
    buffer: Box<[Slot<T>]>,
    mask: usize,
    head: AtomicUsize,
    tail: AtomicUsize,
}

unsafe impl<T: Send> Send for MpmcRingQueue<T> {}
unsafe impl<T: Send> Sync for MpmcRingQueue<T> {}

impl<T> MpmcRingQueue<T> {
    /// Creates a queue whose capacity is `requested.next_power_of_two()`
    /// (minimum 2). Equivalent to `mpmc_ring_queue_new`.
    pub fn new(requested: usize) -> Self {
        let capacity = requested.max(2).next_power_of_two();
        let mut buffer = Vec::with_capacity(capacity);
        for i in 0..capacity {
            buffer.push(Slot {
                sequence: AtomicUsize::new(i),
                value: UnsafeCell::new(MaybeUninit::uninit()),
            });
        }
        MpmcRingQueue {
            buffer: buffer.into_boxed_slice(),
            mask: capacity - 1,
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        }
    }

    /// Same as [`Self::new`] but reports allocation failure instead of
    /// aborting, mirroring the `ENOMEM` path in `lfthpool_create_sched`.
    pub fn try_new(requested: usize) -> Result<Self, crate::pool::error::PoolError> {
        let capacity = requested.max(2).next_power_of_two();
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(capacity)
            .map_err(|_| crate::pool::error::PoolError::OutOfMemory)?;
        for i in 0..capacity {
            buffer.push(Slot {
                sequence: AtomicUsize::new(i),
                value: UnsafeCell::new(MaybeUninit::uninit()),
            });
        }
        Ok(MpmcRingQueue {
            buffer: buffer.into_boxed_slice(),
            mask: capacity - 1,
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        })
    }

    /// Queue capacity (always a power of two).
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Attempts to enqueue `value`. On success returns `Ok(())`; if the queue
    /// is full, returns `Err(value)` so the caller can retry or drop it
    /// without an allocation round-trip. Equivalent to
    /// `mpmc_ring_queue_enqueue` returning `QERR_FULL`.
    pub fn try_enqueue(&self, value: T) -> Result<(), T> {
        let mut ticket = self.head.load(Ordering::Relaxed);
        loop {
            let slot = &self.buffer[ticket & self.mask];
            let seq = slot.sequence.load(Ordering::Acquire);
            let diff = seq as isize - ticket as isize;

            if diff == 0 {
                match self.head.compare_exchange_weak(
                    ticket,
                    ticket.wrapping_add(1),
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => {
                        unsafe { (*slot.value.get()).write(value) };
                        slot.sequence.store(ticket.wrapping_add(1), Ordering::Release);
                        return Ok(());
                    }
                    Err(observed) => ticket = observed,
                }
            } else if diff < 0 {
                // seq < ticket: the slot has not been freed by a consumer yet — full.
                return Err(value);
            } else {
                // seq > ticket: another producer has already claimed and advanced; retry.
                ticket = self.head.load(Ordering::Relaxed);
            }
        }
    }

    /// Attempts to dequeue a value. Returns `None` if the queue is empty.
    /// Equivalent to `mpmc_ring_queue_dequeue` returning `NULL`.
    pub fn try_dequeue(&self) -> Option<T> {
        let mut ticket = self.tail.load(Ordering::Relaxed);
        loop {
            let slot = &self.buffer[ticket & self.mask];
            let seq = slot.sequence.load(Ordering::Acquire);
            let expected = ticket.wrapping_add(1);
            let diff = seq as isize - expected as isize;

            if diff == 0 {
                match self.tail.compare_exchange_weak(
                    ticket,
                    ticket.wrapping_add(1),
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => {
                        let value = unsafe { (*slot.value.get()).assume_init_read() };
                        slot.sequence
                            .store(ticket.wrapping_add(self.buffer.len()), Ordering::Release);
                        return Some(value);
                    }
                    Err(observed) => ticket = observed,
                }
            } else if diff < 0 {
                // seq < ticket+1: nothing has been published into this slot yet — empty.
                return None;
            } else {
                ticket = self.tail.load(Ordering::Relaxed);
            }
        }
    }

    /// Informational length: `head - tail`, clamped to `[0, capacity]`.
    /// May transiently disagree with the true count under concurrent
    /// mutation. Equivalent to `mpmc_ring_queue_len_relaxed`.
    pub fn len_relaxed(&self) -> usize {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Relaxed);
        let len = head.wrapping_sub(tail) as isize;
        len.clamp(0, self.buffer.len() as isize) as usize
    }
}

impl<T> Drop for MpmcRingQueue<T> {
    /// Drains and drops any values still queued. Equivalent to
    /// `mpmc_ring_queue_delete(queue, disposer)`, with `Drop::drop` on `T`
    /// standing in for the caller-supplied disposer.
    fn drop(&mut self) {
        while self.try_dequeue().is_some() {}
    }
}
