//! Demo/benchmark driver binary — the direct counterpart of the original C
//! project's `*_bench.c` test drivers (`lfthpool_bench.c`, `lusem_test.c`'s
//! `bench()`), rebuilt around `clap` in place of hand-rolled `argv` parsing.
//!
//! Each scenario spins up a pool (or a lightweight semaphore), drives it
//! with a fixed number of writer/worker threads, and prints one line of
//! throughput stats plus an `[OK]`/`[ERR]` verdict — matching the original
//! drivers' console output shape without reproducing their `ret`
//! accumulator global (see DESIGN.md's resolution of that Design Note).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, ValueEnum};

use thpool::{diag, diaglevel, LockFreePool, LockedPool};

/// Environment variable honored the same way `lfthpool_bench.c`/
/// `lusem_test.c` honor `LOOP_COUNT`: overrides the default per-writer task
/// count when `--loop-count` is not passed explicitly.
const LOOP_COUNT_ENV: &str = "LOOP_COUNT";
const DEFAULT_LOOP_COUNT: u64 = 1_000_000;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum PoolKind {
    /// Mutex/condvar-backed pool (`thpool.c` equivalent).
    Lp,
    /// Lock-free MPMC-ring-backed pool (`lfthpool.c` equivalent).
    Lfp,
    /// Run both, one after another.
    Both,
}

/// Worker-pool and lightweight-semaphore throughput driver.
#[derive(Parser, Debug)]
#[command(name = "thpoolbench", version, about)]
struct Cli {
    /// Which pool implementation(s) to benchmark.
    #[arg(long, value_enum, default_value = "both")]
    pool: PoolKind,

    /// Worker-thread counts to sweep, one run per value (comma-separated).
    #[arg(long, value_delimiter = ',', default_value = "1,4")]
    workers: Vec<usize>,

    /// Producer-thread counts to sweep, one run per value (comma-separated).
    #[arg(long, value_delimiter = ',', default_value = "1,4")]
    writers: Vec<usize>,

    /// Tasks submitted per writer thread. Defaults to the `LOOP_COUNT`
    /// environment variable, or 1,000,000 if that is unset or zero.
    #[arg(long)]
    loop_count: Option<u64>,

    /// `add_task_try` back-off between retries, in microseconds.
    #[arg(long, default_value_t = thpool::config::ADD_TASK_TRY_USEC_DEFAULT)]
    usec: u64,

    /// `add_task_try` bounded retry budget.
    #[arg(long, default_value_t = thpool::config::ADD_TASK_TRY_MAX_DEFAULT)]
    max_try: i32,

    /// Increase diagnostic verbosity (repeatable).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all but error diagnostics.
    #[arg(short, long)]
    quiet: bool,

    /// Also run the lightweight-semaphore signal/wait microbenchmark.
    #[arg(long)]
    with_sem: bool,
}

fn resolve_loop_count(explicit: Option<u64>) -> u64 {
    if let Some(n) = explicit {
        return n;
    }
    match std::env::var(LOOP_COUNT_ENV) {
        Ok(s) => s.parse::<u64>().ok().filter(|&n| n > 0).unwrap_or(DEFAULT_LOOP_COUNT),
        Err(_) => DEFAULT_LOOP_COUNT,
    }
}

fn main() {
    let cli = Cli::parse();
    diag::set_diag_level(match (cli.quiet, cli.verbose) {
        (true, _) => 0,
        (false, 0) => 2,
        (false, n) => 2 + n as u32,
    });

    let loop_count = resolve_loop_count(cli.loop_count);
    diaglevel!(3, "thpoolbench: loop_count={loop_count}");

    let mut failures = 0usize;

    for &workers in &cli.workers {
        for &writers in &cli.writers {
            match cli.pool {
                PoolKind::Lp | PoolKind::Both => {
                    if !bench_lp(workers, writers, loop_count, cli.usec, cli.max_try) {
                        failures += 1;
                    }
                }
                PoolKind::Lfp => {}
            }
            match cli.pool {
                PoolKind::Lfp | PoolKind::Both => {
                    if !bench_lfp(workers, writers, loop_count, cli.usec, cli.max_try) {
                        failures += 1;
                    }
                }
                PoolKind::Lp => {}
            }
        }
    }

    if cli.with_sem {
        if !bench_lsem(4, 4, loop_count.min(1_000_000)) {
            failures += 1;
        }
    }

    std::process::exit(if failures == 0 { 0 } else { 1 });
}

/// Equivalent to `thpool_bench.c`'s (unwritten upstream, inferred from
/// `lfthpool_bench.c`'s shape) `bench(writers, readers, loop_count)`: submit
/// `writers * loop_count` increment tasks through `add_task_try`, wait, and
/// report throughput.
fn bench_lp(workers: usize, writers: usize, loop_count: u64, usec: u64, max_try: i32) -> bool {
    let queue_size = (loop_count as usize).min(1 << 16).max(1);
    let pool = match LockedPool::new(workers, queue_size) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("lp: failed to create pool: {e}");
            return false;
        }
    };
    run_bench("lp", &pool, workers, writers, loop_count, usec, max_try, |p, task| {
        p.add_task_try(task, usec, max_try)
    })
}

fn bench_lfp(workers: usize, writers: usize, loop_count: u64, usec: u64, max_try: i32) -> bool {
    let queue_size = (loop_count as usize).min(1 << 20).max(2);
    let pool = match LockFreePool::new(workers, queue_size) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("lfp: failed to create pool: {e}");
            return false;
        }
    };
    run_bench("lfp", &pool, workers, writers, loop_count, usec, max_try, |p, task| {
        p.add_task_try(task, usec, max_try)
    })
}

/// Shared driver body for both pool kinds: `writers` threads each submit
/// `loop_count` increment tasks, `wait()` is called once all writers have
/// joined, and the elapsed wall time is reported. Mirrors
/// `lfthpool_bench.c`'s `bench()` minus the pthread-barrier synchronized
/// start (`thread::scope` gives an equivalent "all writers launched before
/// timing starts" guarantee without a separate barrier primitive).
fn run_bench<P>(
    label: &str,
    pool: &P,
    workers: usize,
    writers: usize,
    loop_count: u64,
    usec: u64,
    max_try: i32,
    submit: impl Fn(&P, thpool::Task) -> Result<(), thpool::PoolError> + Sync,
) -> bool
where
    P: Sync + PoolWait,
{
    let counter = Arc::new(AtomicUsize::new(0));
    let start = Instant::now();

    std::thread::scope(|scope| {
        for _ in 0..writers {
            let counter = counter.clone();
            let submit = &submit;
            scope.spawn(move || {
                for _ in 0..loop_count {
                    let counter = counter.clone();
                    let task: thpool::Task = Box::new(move || {
                        counter.fetch_add(1, Ordering::Relaxed);
                    });
                    let _ = submit(pool, task);
                }
            });
        }
    });

    // `lfthpool_wait`/`thpool_wait` are documented as needing to be called
    // with quiesced producers; writers above have already joined via the
    // scope, so a single call suffices here (the C driver's double call is
    // defensive and not required by the documented contract).
    pool.wait();

    let elapsed = start.elapsed();
    let expected = writers as u64 * loop_count;
    let got = counter.load(Ordering::Relaxed) as u64;
    let ok = got == expected;
    let ns_per_op = if loop_count == 0 { 0 } else { elapsed.as_nanos() as u64 / loop_count.max(1) };
    println!(
        "{label}, {workers} worker(s), {writers} writer(s) ({:.3} ms, {loop_count} iterations/writer, {ns_per_op} ns/op) [{}]",
        elapsed.as_secs_f64() * 1000.0,
        if ok { "OK" } else { "ERR" }
    );
    if !ok {
        eprintln!("[ERR]: {got} != {expected} (usec={usec}, max_try={max_try})");
    }
    ok
}

/// Lets [`run_bench`] call `wait()` generically across both concrete pool
/// types without duplicating the function body per pool kind.
trait PoolWait {
    fn wait(&self);
}

impl PoolWait for LockedPool {
    fn wait(&self) {
        LockedPool::wait(self);
    }
}

impl PoolWait for LockFreePool {
    fn wait(&self) {
        LockFreePool::wait(self);
    }
}

/// Lightweight-semaphore signal/wait microbenchmark. Mirrors
/// `lusem_test.c`'s `bench()`: `writers` threads repeatedly `signal()` while
/// `readers` threads repeatedly `wait()`, until every reader has observed
/// `loop_count` signals.
fn bench_lsem(writers: usize, readers: usize, loop_count: u64) -> bool {
    use thpool::LightweightSemaphore;

    let sem = match LightweightSemaphore::new(0, thpool::config::LSEM_MAX_SPINS_DEFAULT) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            eprintln!("lsem: failed to create semaphore: {e}");
            return false;
        }
    };
    let remaining_signalers = Arc::new(AtomicUsize::new(readers));
    let waits_done = Arc::new(AtomicUsize::new(0));
    let start = Instant::now();

    std::thread::scope(|scope| {
        for _ in 0..writers {
            let sem = sem.clone();
            let remaining = remaining_signalers.clone();
            scope.spawn(move || {
                while remaining.load(Ordering::Relaxed) != 0 {
                    sem.signal();
                }
            });
        }
        for _ in 0..readers {
            let sem = sem.clone();
            let waits = waits_done.clone();
            let remaining = remaining_signalers.clone();
            scope.spawn(move || {
                while waits.fetch_add(1, Ordering::Relaxed) < loop_count as usize {
                    sem.wait();
                }
                remaining.fetch_sub(1, Ordering::Relaxed);
            });
        }
    });

    let elapsed = start.elapsed();
    let got = waits_done.load(Ordering::Relaxed) as u64;
    let ok = got >= loop_count && got <= loop_count + readers as u64;
    println!(
        "lsem, {writers} writer(s), {readers} reader(s) ({:.3} ms, {loop_count} iterations) [{}]",
        elapsed.as_secs_f64() * 1000.0,
        if ok { "OK" } else { "ERR" }
    );
    ok
}
