//! The execution harness.
//!
//! Spawns the two party loops under real parallel scheduling, joins both,
//! and verdicts the run: the final resource value must equal
//! 2 × iterations if mutual exclusion held throughout.

use std::fmt;
use std::thread;
use std::time::Duration;

use crate::protocol::Dekker;
use crate::types::PartyId;

/// Run parameters. Protocol semantics do not depend on any of these.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RunOptions {
    /// Entry/exit cycles each party performs.
    pub iterations: u64,
    /// Simulated processing time inside the critical section.
    pub cs_delay: Duration,
    /// Simulated non-critical work between iterations.
    pub remainder_delay: Duration,
}

impl Default for RunOptions {
    /// The reference run: 5 iterations, 10 ms in-section, 5 ms remainder.
    fn default() -> Self {
        Self {
            iterations: 5,
            cs_delay: Duration::from_millis(10),
            remainder_delay: Duration::from_millis(5),
        }
    }
}

impl RunOptions {
    /// Options for stress runs: given iterations, no delays.
    ///
    /// Negligible remainder time maximizes contention on entry.
    pub fn contended(iterations: u64) -> Self {
        Self {
            iterations,
            cs_delay: Duration::ZERO,
            remainder_delay: Duration::ZERO,
        }
    }
}

/// Outcome of one harness run.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RunReport {
    /// Iterations each party performed.
    pub iterations: u64,
    /// Final value of the protected resource.
    pub final_value: u64,
    /// Expected value: 2 × iterations.
    pub expected: u64,
    /// Mutual-exclusion violations observed by the occupancy oracle.
    pub violations: u64,
    /// Critical-section entries per party.
    pub entries: [u64; 2],
}

impl RunReport {
    /// The overall verdict.
    pub fn passed(&self) -> bool {
        self.final_value == self.expected && self.violations == 0
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "final resource  = {}", self.final_value)?;
        writeln!(f, "expected value  = {}", self.expected)?;
        writeln!(f, "violations      = {}", self.violations)?;
        writeln!(f, "entries         = {} / {}", self.entries[0], self.entries[1])?;
        write!(
            f,
            "verdict         = {}",
            if self.passed() { "PASS (mutual exclusion verified)" } else { "FAIL (race detected)" }
        )
    }
}

impl Dekker {
    /// Runs both parties concurrently and reports the outcome.
    ///
    /// Blocks until both party loops have finished all iterations; this
    /// join is the only true blocking in the system, the protocol itself
    /// only ever spins.
    pub fn run(&self, options: &RunOptions) -> RunReport {
        thread::scope(|s| {
            for me in PartyId::BOTH {
                s.spawn(move || self.run_party(me, options));
            }
        });

        RunReport {
            iterations: options.iterations,
            final_value: self.state().resource(),
            expected: options.iterations * 2,
            violations: self.state().violations(),
            entries: [
                self.state().entries(PartyId::ZERO),
                self.state().entries(PartyId::ONE),
            ],
        }
    }
}
