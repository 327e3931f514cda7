//! The party loop.
//!
//! Drives one participant through a fixed number of
//! {entry, workload, exit, remainder} cycles. No early exit and no error
//! paths: the loop terminates exactly after the configured iteration count.

use crate::harness::RunOptions;
use crate::protocol::Dekker;
use crate::trace::TraceEvent;
use crate::types::PartyId;

impl Dekker {
    /// Runs party `me` to completion under the given options.
    pub fn run_party(&self, me: PartyId, options: &RunOptions) {
        self.emit(me, TraceEvent::Started);

        for i in 1..=options.iterations {
            self.emit(me, TraceEvent::Iteration { current: i, total: options.iterations });

            self.lock(me);
            self.guarded_increment(me, options.cs_delay);
            self.unlock(me);

            // Remainder section: unguarded non-critical work.
            self.emit(me, TraceEvent::Remainder);
            if !options.remainder_delay.is_zero() {
                std::thread::sleep(options.remainder_delay);
            }
        }

        self.emit(me, TraceEvent::Finished);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::time::Duration;

    use crate::trace::testing::RecordingSink;

    use test_log::test;

    fn quick(iterations: u64) -> RunOptions {
        RunOptions {
            iterations,
            cs_delay: Duration::ZERO,
            remainder_delay: Duration::ZERO,
        }
    }

    #[test]
    fn test_single_party_completes() {
        let dekker = Dekker::silent().with_spin_cap(10_000);
        dekker.run_party(PartyId::ZERO, &quick(5));
        assert_eq!(dekker.state().resource(), 5);
        assert_eq!(dekker.state().entries(PartyId::ZERO), 5);
        assert_eq!(dekker.state().violations(), 0);
    }

    #[test]
    fn test_party_trace_brackets() {
        let sink = Arc::new(RecordingSink::new());
        let dekker = Dekker::with_trace(sink.clone());
        dekker.run_party(PartyId::ONE, &quick(2));
        let events = sink.events_for(PartyId::ONE);
        assert_eq!(events.first(), Some(&TraceEvent::Started));
        assert_eq!(events.last(), Some(&TraceEvent::Finished));
        let iterations = events
            .iter()
            .filter(|e| matches!(e, TraceEvent::Iteration { .. }))
            .count();
        assert_eq!(iterations, 2);
    }

    #[test]
    fn test_zero_iterations_is_a_noop() {
        let dekker = Dekker::silent();
        dekker.run_party(PartyId::ZERO, &quick(0));
        assert_eq!(dekker.state().resource(), 0);
        assert_eq!(dekker.state().entries(PartyId::ZERO), 0);
    }
}
