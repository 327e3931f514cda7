//! Type-safe wrapper for party identities.
//!
//! Dekker's algorithm is defined for exactly two contending parties.
//! `PartyId` enforces that at the type level: the only inhabitants are
//! party 0 and party 1, and `other()` is a total involution between them.

use std::fmt;

/// A party identity (0 or 1).
///
/// # Invariants
///
/// - The wrapped value is always 0 or 1.
/// - `id.other().other() == id`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PartyId(u8);

impl PartyId {
    /// Party 0.
    pub const ZERO: PartyId = PartyId(0);
    /// Party 1.
    pub const ONE: PartyId = PartyId(1);

    /// Both parties, in identity order.
    pub const BOTH: [PartyId; 2] = [PartyId::ZERO, PartyId::ONE];

    /// Creates a party identity.
    ///
    /// # Panics
    ///
    /// Panics if `id > 1`. The algorithm is not sound for more than
    /// two parties.
    pub fn new(id: u8) -> Self {
        assert!(id <= 1, "Party identities must be 0 or 1");
        PartyId(id)
    }

    /// Returns the opposing party (1 − self).
    pub const fn other(self) -> Self {
        PartyId(1 - self.0)
    }

    /// Returns the raw identity as a `u8`.
    pub const fn id(self) -> u8 {
        self.0
    }

    /// Returns the identity as a `usize`, for indexing two-element arrays.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<PartyId> for usize {
    fn from(id: PartyId) -> Self {
        id.index()
    }
}
