//! Diagnostic trace sink.
//!
//! The protocol reports every step it takes as a structured [`TraceEvent`].
//! A [`TraceSink`] is the single point that sequences those events into a
//! line-numbered stream; the numbering is incidental diagnostics and carries
//! no synchronization semantics for the protocol itself.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::types::PartyId;

/// One step taken by a party, as reported to the diagnostic sink.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum TraceEvent {
    /// Party loop started.
    Started,
    /// Beginning iteration `current` of `total`.
    Iteration { current: u64, total: u64 },
    /// Intent flag raised; the party wants the critical section.
    IntentRaised,
    /// The other party's intent flag was up at entry time.
    Contention { other: PartyId },
    /// Not this party's turn; intent withdrawn while waiting.
    BackingOff { turn: PartyId },
    /// The turn arrived; intent re-raised.
    TurnAcquired,
    /// Exclusive access obtained.
    Entered,
    /// Read of the protected resource inside the section.
    ResourceRead { value: u64 },
    /// Write of the protected resource inside the section.
    ResourceWritten { value: u64 },
    /// Leaving the critical section.
    Leaving,
    /// Turn handed to the other party.
    TurnPassed { to: PartyId },
    /// Intent flag lowered; the section is released.
    Released,
    /// Unguarded non-critical work between iterations.
    Remainder,
    /// Party loop finished all iterations.
    Finished,
    /// The occupancy oracle saw more than one party inside the section.
    MutualExclusionViolated { occupancy: u32 },
}

impl TraceEvent {
    /// Whether this event marks a broken invariant.
    pub fn is_violation(&self) -> bool {
        matches!(self, TraceEvent::MutualExclusionViolated { .. })
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::Started => write!(f, "started"),
            TraceEvent::Iteration { current, total } => {
                write!(f, "iteration {}/{}", current, total)
            }
            TraceEvent::IntentRaised => write!(f, "wants to enter (intent raised)"),
            TraceEvent::Contention { other } => {
                write!(f, "contention: party {} also wants in", other)
            }
            TraceEvent::BackingOff { turn } => {
                write!(f, "not my turn (turn = {}), backing off", turn)
            }
            TraceEvent::TurnAcquired => write!(f, "my turn now, re-raising intent"),
            TraceEvent::Entered => write!(f, ">>> entering critical section <<<"),
            TraceEvent::ResourceRead { value } => write!(f, "read resource = {}", value),
            TraceEvent::ResourceWritten { value } => write!(f, "wrote resource = {}", value),
            TraceEvent::Leaving => write!(f, "<<< leaving critical section >>>"),
            TraceEvent::TurnPassed { to } => write!(f, "passing turn to party {}", to),
            TraceEvent::Released => write!(f, "released (intent lowered)"),
            TraceEvent::Remainder => write!(f, "doing non-critical work"),
            TraceEvent::Finished => write!(f, "finished"),
            TraceEvent::MutualExclusionViolated { occupancy } => {
                write!(f, "!!! MUTUAL EXCLUSION VIOLATED !!! occupancy = {}", occupancy)
            }
        }
    }
}

/// A serialized sink for protocol diagnostics.
///
/// Implementations must be safe to call from both parties concurrently
/// and must keep whole events intact (no interleaved lines). They must
/// not block a party on the other party's progress.
pub trait TraceSink: Send + Sync {
    /// Records one event taken by `party`.
    fn emit(&self, party: PartyId, event: &TraceEvent);
}

/// Production sink: renders events through the `log` facade with a
/// monotonically increasing line number.
///
/// Violations go to `log::error!`, everything else to `log::info!`.
/// The line counter is owned by the sink, so distinct runs number their
/// streams independently.
#[derive(Debug, Default)]
pub struct LogSink {
    next_line: AtomicU64,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_line(&self) -> u64 {
        self.next_line.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl TraceSink for LogSink {
    fn emit(&self, party: PartyId, event: &TraceEvent) {
        let line = self.next_line();
        if event.is_violation() {
            log::error!("[{}] party {}: {}", line, party, event);
        } else {
            log::info!("[{}] party {}: {}", line, party, event);
        }
    }
}

/// Sink that discards everything. Useful for high-iteration stress runs.
#[derive(Debug, Default)]
pub struct NullSink;

impl TraceSink for NullSink {
    fn emit(&self, _party: PartyId, _event: &TraceEvent) {}
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Test sink that keeps every event with its assigned line number.
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        next_line: AtomicU64,
        records: Mutex<Vec<(u64, PartyId, TraceEvent)>>,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn records(&self) -> Vec<(u64, PartyId, TraceEvent)> {
            self.records.lock().unwrap().clone()
        }

        pub fn events_for(&self, party: PartyId) -> Vec<TraceEvent> {
            self.records
                .lock()
                .unwrap()
                .iter()
                .filter(|(_, p, _)| *p == party)
                .map(|(_, _, e)| e.clone())
                .collect()
        }
    }

    impl TraceSink for RecordingSink {
        fn emit(&self, party: PartyId, event: &TraceEvent) {
            let line = self.next_line.fetch_add(1, Ordering::Relaxed) + 1;
            let mut records = self.records.lock().unwrap();
            records.push((line, party, event.clone()));
        }
    }
}
