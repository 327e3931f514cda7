//! The mutual-exclusion protocol (entry and exit procedures).
//!
//! This is Dekker's algorithm for two parties: intent flags announce the
//! wish to enter, and a turn indicator breaks the tie when both want in at
//! once. Entry spins (cooperatively yielding) until exclusivity is
//! obtained; it never blocks on an OS primitive and never times out.
//!
//! All operations go through the [`Dekker`] manager, which owns the shared
//! state and the diagnostic sink for one run.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::debug;

use crate::state::{SharedState, StateSnapshot};
use crate::trace::{LogSink, NullSink, TraceEvent, TraceSink};
use crate::types::PartyId;

/// Manager for one run of the protocol.
///
/// Owns the [`SharedState`] both parties communicate through and the
/// [`TraceSink`] they report steps to. Create one per run; the shared
/// state never leaks across runs.
pub struct Dekker {
    state: SharedState,
    trace: Arc<dyn TraceSink>,
    /// Upper bound on spin-wait yields, cumulative across the run.
    /// For tests only; `None` in production: the algorithm must not
    /// time out.
    spin_cap: Option<u64>,
    spins: AtomicU64,
}

impl Dekker {
    /// Creates a manager that traces through the `log` facade.
    pub fn new() -> Self {
        Self::with_trace(Arc::new(LogSink::new()))
    }

    /// Creates a silent manager (no diagnostics).
    pub fn silent() -> Self {
        Self::with_trace(Arc::new(NullSink))
    }

    /// Creates a manager reporting to the given sink.
    pub fn with_trace(trace: Arc<dyn TraceSink>) -> Self {
        Self {
            state: SharedState::new(),
            trace,
            spin_cap: None,
            spins: AtomicU64::new(0),
        }
    }

    /// Bounds the total number of spin-wait yields across the run.
    ///
    /// Exceeding the cap panics. Intended for tests, so an accidental
    /// infinite spin fails the suite instead of hanging it.
    pub fn with_spin_cap(mut self, cap: u64) -> Self {
        self.spin_cap = Some(cap);
        self
    }

    /// The shared state of this run.
    pub fn state(&self) -> &SharedState {
        &self.state
    }

    /// Snapshot of the shared state (see [`SharedState::snapshot`]).
    pub fn snapshot(&self) -> StateSnapshot {
        self.state.snapshot()
    }

    pub(crate) fn emit(&self, party: PartyId, event: TraceEvent) {
        self.trace.emit(party, &event);
    }

    /// The single yield point of the protocol.
    ///
    /// Cooperative yielding, never a blocking wait: the algorithm's
    /// correctness assumes only fair scheduling, no scheduler assistance.
    fn spin_wait(&self) {
        if let Some(cap) = self.spin_cap {
            let spun = self.spins.fetch_add(1, Ordering::Relaxed) + 1;
            assert!(spun <= cap, "spin cap ({}) exhausted, entry is not making progress", cap);
        }
        std::hint::spin_loop();
        std::thread::yield_now();
    }
}

impl Default for Dekker {
    fn default() -> Self {
        Dekker::new()
    }
}

// Entry and exit procedures.
impl Dekker {
    /// Entry procedure for `me`. Returns once `me` holds exclusive access.
    ///
    /// Announces intent, then waits out the other party: when the turn is
    /// elsewhere, intent is withdrawn until the turn arrives (this breaks
    /// the deadlock where both parties raise their flag and wait forever);
    /// when the turn is already ours, the other party is finishing its own
    /// section and we only yield. The loop exits when the other intent
    /// flag reads false.
    pub fn lock(&self, me: PartyId) {
        let other = me.other();
        debug!("lock(me = {}, other = {})", me, other);

        self.state.set_intent(me, true);
        self.emit(me, TraceEvent::IntentRaised);

        // Informational only: did we race with the other party?
        if self.state.intent(other) {
            self.emit(me, TraceEvent::Contention { other });
        }

        while self.state.intent(other) {
            if self.state.turn() != me {
                self.emit(me, TraceEvent::BackingOff { turn: self.state.turn() });
                self.state.set_intent(me, false);
                while self.state.turn() != me {
                    self.spin_wait();
                }
                self.emit(me, TraceEvent::TurnAcquired);
                self.state.set_intent(me, true);
            } else {
                // Our turn, but the other party is still leaving.
                self.spin_wait();
            }
        }

        self.emit(me, TraceEvent::Entered);
    }

    /// Exit procedure for `me`.
    ///
    /// Hands the turn to the other party *before* lowering the intent
    /// flag. Under sequential consistency either order is observably
    /// consistent, but turn-then-intent is what the starvation-freedom
    /// argument is written against, so it is kept fixed.
    pub fn unlock(&self, me: PartyId) {
        let other = me.other();
        debug!("unlock(me = {}, other = {})", me, other);

        self.emit(me, TraceEvent::Leaving);
        self.emit(me, TraceEvent::TurnPassed { to: other });

        self.state.set_turn(other);
        self.state.set_intent(me, false);

        self.emit(me, TraceEvent::Released);
    }
}
