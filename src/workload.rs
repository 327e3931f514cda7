//! The critical-section workload.
//!
//! What the parties actually do while holding exclusive access: one read
//! of the protected resource, a simulated processing delay, one write of
//! read + 1. Bracketed by the occupancy oracle, which is how a broken
//! reimplementation of the protocol gets caught.

use std::time::Duration;

use crate::protocol::Dekker;
use crate::trace::TraceEvent;
use crate::types::PartyId;

impl Dekker {
    /// Runs one guarded increment of the protected resource.
    ///
    /// Caller must hold exclusive access via [`Dekker::lock`]. The
    /// occupancy counter is incremented on entry and checked against 1;
    /// an excess is recorded and reported but does not halt the run, so
    /// the aggregate mismatch stays observable at the end.
    pub fn guarded_increment(&self, me: PartyId, delay: Duration) {
        let occupancy = self.state().enter_section(me);
        if occupancy > 1 {
            self.state().record_violation();
            self.emit(me, TraceEvent::MutualExclusionViolated { occupancy });
        }

        // Exactly one read, a delay, exactly one write. A deliberately
        // non-atomic read-modify-write: only mutual exclusion makes it safe.
        let value = self.state().resource();
        self.emit(me, TraceEvent::ResourceRead { value });

        if !delay.is_zero() {
            std::thread::sleep(delay);
        }

        let value = value + 1;
        self.state().set_resource(value);
        self.emit(me, TraceEvent::ResourceWritten { value });

        self.state().leave_section();
    }
}
