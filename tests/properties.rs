//! Multi-threaded property tests: mutual exclusion, deadlock freedom,
//! starvation freedom, and restart hygiene under real parallelism.
//!
//! Every run is bounded with a spin cap, so a protocol bug that spins
//! forever fails the suite instead of hanging it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use dekker_rs::harness::RunOptions;
use dekker_rs::protocol::Dekker;
use dekker_rs::trace::{TraceEvent, TraceSink};
use dekker_rs::types::PartyId;

use test_log::test;

/// Generous bound: orders of magnitude above what a healthy run needs,
/// still finite when the protocol is broken.
const SPIN_CAP: u64 = 20_000_000;

fn contended_run(iterations: u64) -> Dekker {
    let dekker = Dekker::silent().with_spin_cap(SPIN_CAP);
    dekker.run(&RunOptions::contended(iterations));
    dekker
}

#[test]
fn test_mutual_exclusion_across_scales() {
    for n in [1, 5, 50, 500] {
        let dekker = contended_run(n);
        let snap = dekker.snapshot();
        assert_eq!(snap.violations, 0, "violation at n = {}", n);
        assert_eq!(snap.resource, 2 * n, "lost update at n = {}", n);
    }
}

#[test]
fn test_no_deadlock_both_parties_finish() {
    let dekker = Dekker::silent().with_spin_cap(SPIN_CAP);
    let report = dekker.run(&RunOptions::contended(5));
    // The join returned and every iteration ran on both sides.
    assert_eq!(report.entries, [5, 5]);
    assert!(report.passed());
}

#[test]
fn test_no_deadlock_with_section_delays() {
    // Delays inside the section widen the contention window.
    let dekker = Dekker::silent().with_spin_cap(SPIN_CAP);
    let options = RunOptions {
        iterations: 5,
        cs_delay: std::time::Duration::from_millis(2),
        remainder_delay: std::time::Duration::from_millis(1),
    };
    let report = dekker.run(&options);
    assert!(report.passed());
}

#[test]
fn test_no_starvation_under_sustained_contention() {
    // Both parties are released from a barrier at the same instant, so
    // the entry attempts overlap from the very first cycle instead of
    // one party racing through its loop before the other is scheduled.
    // A starving party would never reach its full entry count; the spin
    // cap turns a perpetual denial into a failure instead of a hang.
    // (The deterministic single-step half of this property lives in the
    // protocol unit tests: a releasing party defers to a requester.)
    let iterations = 500;
    let dekker = Dekker::silent().with_spin_cap(SPIN_CAP);
    let options = RunOptions::contended(iterations);
    let barrier = Barrier::new(2);

    thread::scope(|s| {
        for me in PartyId::BOTH {
            let dekker = &dekker;
            let options = &options;
            let barrier = &barrier;
            s.spawn(move || {
                barrier.wait();
                dekker.run_party(me, options);
            });
        }
    });

    // Neither party was denied: both completed every cycle.
    assert_eq!(dekker.state().entries(PartyId::ZERO), iterations);
    assert_eq!(dekker.state().entries(PartyId::ONE), iterations);
    assert_eq!(dekker.state().resource(), 2 * iterations);
    assert_eq!(dekker.state().violations(), 0);
}

#[test]
fn test_idempotent_restart() {
    // Fresh shared state per run: repeated runs all hold the guarantee.
    for _ in 0..3 {
        let dekker = contended_run(50);
        assert_eq!(dekker.state().resource(), 100);
        assert_eq!(dekker.state().violations(), 0);
    }
}

/// Sink that records the peak occupancy it ever observed.
#[derive(Default)]
struct PeakSink {
    peak: AtomicU64,
}

impl TraceSink for PeakSink {
    fn emit(&self, _party: PartyId, event: &TraceEvent) {
        if let TraceEvent::MutualExclusionViolated { occupancy } = event {
            self.peak.fetch_max(*occupancy as u64, Ordering::Relaxed);
        }
    }
}

#[test]
fn test_occupancy_never_exceeds_one() {
    let sink = Arc::new(PeakSink::default());
    let dekker = Dekker::with_trace(sink.clone()).with_spin_cap(SPIN_CAP);
    dekker.run(&RunOptions::contended(200));
    assert_eq!(sink.peak.load(Ordering::Relaxed), 0);
}
