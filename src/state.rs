//! The shared state of the protocol.
//!
//! These atomics are the *entire* communication channel between the two
//! parties: two intent flags, the turn indicator, the protected resource,
//! and an occupancy counter used purely to detect violations. No other
//! shared data exists, and every access is sequentially consistent so
//! that both parties observe one global order of operations.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicU8, Ordering};

use crate::types::PartyId;

/// All operations on [`SharedState`] use this ordering.
///
/// Dekker's correctness proof assumes a single total order over the flag
/// and turn accesses; anything weaker than `SeqCst` (e.g. acquire/release
/// pairs) admits the classic store-buffering reordering where both parties
/// raise their flag and then each reads the other's flag as still down.
const ORDERING: Ordering = Ordering::SeqCst;

/// Shared state for one run of the protocol.
///
/// Intended to be created fresh per run and handed to both parties by
/// shared borrow (or `Arc`), never as process-wide globals.
///
/// # Invariants
///
/// - `intent[i]` is written only by party `i`.
/// - `turn` is written only by the party leaving the critical section.
/// - `resource` is written only while holding exclusive access.
/// - `occupancy` never exceeds 1 in a correct execution; `violations`
///   counts every observation to the contrary.
#[derive(Debug)]
pub struct SharedState {
    intent: [AtomicBool; 2],
    turn: AtomicU8,
    resource: AtomicU64,
    occupancy: AtomicU32,
    // Instrumentation, not part of the algorithm:
    violations: AtomicU64,
    entries: [AtomicU64; 2],
}

impl SharedState {
    /// Creates the defined starting state: both intents down, turn at
    /// party 0, resource and occupancy at zero.
    ///
    /// The turn starts at a fixed party (0), matching the standard
    /// formulation of the algorithm.
    pub fn new() -> Self {
        Self {
            intent: [AtomicBool::new(false), AtomicBool::new(false)],
            turn: AtomicU8::new(PartyId::ZERO.id()),
            resource: AtomicU64::new(0),
            occupancy: AtomicU32::new(0),
            violations: AtomicU64::new(0),
            entries: [AtomicU64::new(0), AtomicU64::new(0)],
        }
    }
}

impl Default for SharedState {
    fn default() -> Self {
        SharedState::new()
    }
}

// Intent flags.
impl SharedState {
    /// Reads the intent flag of `party`.
    pub fn intent(&self, party: PartyId) -> bool {
        self.intent[party.index()].load(ORDERING)
    }

    /// Sets the intent flag of `party`. Must only be called from the
    /// control of `party` itself.
    pub fn set_intent(&self, party: PartyId, value: bool) {
        self.intent[party.index()].store(value, ORDERING);
    }
}

// Turn indicator.
impl SharedState {
    /// Reads the turn indicator.
    pub fn turn(&self) -> PartyId {
        PartyId::new(self.turn.load(ORDERING))
    }

    /// Hands the turn to `party`. Must only be called by the party
    /// leaving the critical section.
    pub fn set_turn(&self, party: PartyId) {
        self.turn.store(party.id(), ORDERING);
    }
}

// Protected resource.
impl SharedState {
    /// Reads the protected resource.
    pub fn resource(&self) -> u64 {
        self.resource.load(ORDERING)
    }

    /// Writes the protected resource. Must only be called while holding
    /// exclusive access.
    pub fn set_resource(&self, value: u64) {
        self.resource.store(value, ORDERING);
    }
}

// Occupancy oracle.
impl SharedState {
    /// Atomically increments the occupancy counter and returns the new
    /// value. In a correct execution the result is always 1.
    pub fn enter_section(&self, party: PartyId) -> u32 {
        self.entries[party.index()].fetch_add(1, ORDERING);
        self.occupancy.fetch_add(1, ORDERING) + 1
    }

    /// Atomically decrements the occupancy counter.
    pub fn leave_section(&self) {
        self.occupancy.fetch_sub(1, ORDERING);
    }

    /// Current occupancy.
    pub fn occupancy(&self) -> u32 {
        self.occupancy.load(ORDERING)
    }

    /// Records one observed mutual-exclusion violation.
    pub fn record_violation(&self) {
        self.violations.fetch_add(1, ORDERING);
    }

    /// Total violations observed so far.
    pub fn violations(&self) -> u64 {
        self.violations.load(ORDERING)
    }

    /// How many times `party` has entered the critical section.
    pub fn entries(&self, party: PartyId) -> u64 {
        self.entries[party.index()].load(ORDERING)
    }
}

impl SharedState {
    /// Takes a consistent-enough snapshot for inspection and tests.
    ///
    /// Each field is loaded individually; the snapshot is only meaningful
    /// when no party is mid-protocol (e.g. before a run, after a join, or
    /// in single-threaded tests).
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            intent: [self.intent(PartyId::ZERO), self.intent(PartyId::ONE)],
            turn: self.turn(),
            resource: self.resource(),
            occupancy: self.occupancy(),
            violations: self.violations(),
        }
    }
}

/// A point-in-time view of [`SharedState`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct StateSnapshot {
    pub intent: [bool; 2],
    pub turn: PartyId,
    pub resource: u64,
    pub occupancy: u32,
    pub violations: u64,
}
