// Integration tests for the semaphore stack (USem, LightweightSemaphore,
// PSem), grounded in the original `usem_test.c`/`lusem_test.c`/`psem_test.c`
// CTEST suites: signal-then-wait round trips, timeout fidelity bounds, and
// multi-waiter wake-ups.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use thpool::{LightweightSemaphore, PSem, USem};

// ── USem ─────────────────────────────────────────────────────────────────────

#[test]
fn usem_signal_then_wait_round_trips() {
    let sem = USem::new(0).unwrap();
    sem.signal();
    assert!(sem.try_wait());
    assert!(!sem.try_wait());
}

#[test]
fn usem_blocking_wait_observes_a_signal_from_another_thread() {
    let sem = Arc::new(USem::new(0).unwrap());
    let sem2 = sem.clone();
    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(10));
        sem2.signal();
    });
    sem.wait();
    handle.join().unwrap();
}

#[test]
fn usem_timed_wait_reports_failure_on_timeout() {
    let sem = USem::new(0).unwrap();
    let start = Instant::now();
    assert!(!sem.timed_wait(Duration::from_millis(20)));
    assert!(start.elapsed() >= Duration::from_millis(15));
}

// ── LightweightSemaphore ─────────────────────────────────────────────────────
//
// Scenario 5 from the spec's testable-properties section: timed_wait(20ms)
// on an LSem with max_spins=2 should fail and report an elapsed duration
// bounded well below and above the requested timeout (spin overhead is
// negligible; scheduling jitter is the only slack).

#[test]
fn lsem_timed_wait_timeout_fidelity() {
    let sem = LightweightSemaphore::new(0, 2).unwrap();
    let start = Instant::now();
    let got = sem.timed_wait(Duration::from_micros(20_000));
    let elapsed = start.elapsed();
    assert!(!got);
    assert!(elapsed >= Duration::from_micros(13_333));
    assert!(elapsed <= Duration::from_micros(200_000));
}

// Scenario 6: a helper thread signals after a short sleep; the main thread
// signals once itself and then waits twice — both waits must succeed with
// no deadlock, and the count bookkeeping must not leak a phantom waiter.
#[test]
fn lsem_signal_then_wait_no_deadlock() {
    let sem = Arc::new(LightweightSemaphore::new(0, 10).unwrap());
    let sem2 = sem.clone();
    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(1));
        sem2.signal();
    });
    sem.signal();
    sem.wait();
    sem.wait();
    handle.join().unwrap();
}

#[test]
fn lsem_signal_count_matches_exactly_n_waiters() {
    let sem = Arc::new(LightweightSemaphore::new(0, 50).unwrap());
    const WAITERS: usize = 6;
    let woken = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..WAITERS)
        .map(|_| {
            let sem = sem.clone();
            let woken = woken.clone();
            thread::spawn(move || {
                sem.wait();
                woken.fetch_add(1, Ordering::SeqCst);
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(20));
    assert_eq!(woken.load(Ordering::SeqCst), 0, "no waiter should wake before signal_count");
    sem.signal_count(WAITERS as isize);

    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(woken.load(Ordering::SeqCst), WAITERS);
}

#[test]
fn lsem_no_signal_is_lost_across_many_timeout_races() {
    // Repeatedly race a timed_wait against a delayed signal; every wait must
    // either succeed or correctly restore the count so a follow-up
    // signal+wait pair never deadlocks or double-consumes.
    let sem = LightweightSemaphore::new(0, 4).unwrap();
    for _ in 0..200 {
        let got = sem.timed_wait(Duration::from_micros(100));
        if !got {
            sem.signal();
            assert!(sem.try_wait());
        }
    }
}

// ── PSem ─────────────────────────────────────────────────────────────────────

#[test]
fn psem_signal_wakes_one_waiter() {
    let sem = Arc::new(PSem::new());
    let sem2 = sem.clone();
    let handle = thread::spawn(move || sem2.wait());
    thread::sleep(Duration::from_millis(15));
    sem.signal();
    handle.join().unwrap();
}

#[test]
fn psem_broadcast_wakes_every_waiter() {
    let sem = Arc::new(PSem::new());
    let handles: Vec<_> = (0..5)
        .map(|_| {
            let sem = sem.clone();
            thread::spawn(move || sem.wait())
        })
        .collect();
    thread::sleep(Duration::from_millis(20));
    sem.broadcast();
    for h in handles {
        h.join().unwrap();
    }
}
