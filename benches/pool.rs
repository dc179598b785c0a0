//! Criterion benchmarks for both pool implementations and the lightweight
//! semaphore, mirroring the teacher's `benches/block.rs` structure (one
//! `criterion_group`/`criterion_main` per logical subsystem, `BenchmarkId`
//! parameterized over the dimension that matters — here, submitter count —
//! rather than a single undifferentiated timing loop).
//!
//! Run with:
//!   cargo bench --bench pool

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use thpool::{LightweightSemaphore, LockFreePool, LockedPool, Task};

const TASKS_PER_RUN: usize = 20_000;

fn bench_lp_submit_and_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("lp_submit_and_drain");
    for &workers in &[1usize, 4, 8] {
        group.throughput(Throughput::Elements(TASKS_PER_RUN as u64));
        group.bench_with_input(BenchmarkId::new("workers", workers), &workers, |b, &workers| {
            b.iter(|| {
                let pool = LockedPool::new(workers, TASKS_PER_RUN).unwrap();
                let counter = Arc::new(AtomicUsize::new(0));
                for _ in 0..TASKS_PER_RUN {
                    let counter = counter.clone();
                    let task: Task = Box::new(move || {
                        counter.fetch_add(1, Ordering::Relaxed);
                    });
                    pool.add_task_try(task, 10, 4_000).unwrap();
                }
                pool.wait();
                assert_eq!(counter.load(Ordering::Relaxed), TASKS_PER_RUN);
            });
        });
    }
    group.finish();
}

fn bench_lfp_submit_and_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("lfp_submit_and_drain");
    for &workers in &[1usize, 4, 8] {
        group.throughput(Throughput::Elements(TASKS_PER_RUN as u64));
        group.bench_with_input(BenchmarkId::new("workers", workers), &workers, |b, &workers| {
            b.iter(|| {
                let pool = LockFreePool::new(workers, TASKS_PER_RUN).unwrap();
                let counter = Arc::new(AtomicUsize::new(0));
                for _ in 0..TASKS_PER_RUN {
                    let counter = counter.clone();
                    let task: Task = Box::new(move || {
                        counter.fetch_add(1, Ordering::Relaxed);
                    });
                    pool.add_task_try(task, 10, 4_000).unwrap();
                }
                pool.wait();
                assert_eq!(counter.load(Ordering::Relaxed), TASKS_PER_RUN);
            });
        });
    }
    group.finish();
}

fn bench_lsem_uncontended_signal_wait(c: &mut Criterion) {
    let mut group = c.benchmark_group("lsem_uncontended_signal_wait");
    group.throughput(Throughput::Elements(1));
    group.bench_function("signal_then_wait", |b| {
        let sem = LightweightSemaphore::new(0, 100).unwrap();
        b.iter(|| {
            sem.signal();
            sem.wait();
        });
    });
    group.finish();
}

criterion_group!(
    pool_benches,
    bench_lp_submit_and_drain,
    bench_lfp_submit_and_drain,
    bench_lsem_uncontended_signal_wait
);
criterion_main!(pool_benches);
