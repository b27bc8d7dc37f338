//! Opaque array identities, protection tokens and representation classes.

use std::fmt;

/// Identity of one host-owned array.
///
/// The host issues a fresh `ArrayId` for every allocation and every resize;
/// an id is never reused for a different array while the host is alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArrayId(pub u64);

impl fmt::Display for ArrayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "array#{}", self.0)
    }
}

impl From<u64> for ArrayId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Receipt for one protection registration.
///
/// Returned by [`Registry::protect`](crate::Registry::protect) and consumed
/// by [`Registry::release`](crate::Registry::release). Upper 32 bits are the
/// registry slot, lower 32 bits the slot generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct ProtectToken(pub u64);

impl ProtectToken {
    /// Pack a slot index and generation into a token.
    pub const fn new(slot: u32, generation: u32) -> Self {
        Self(((slot as u64) << 32) | generation as u64)
    }

    /// Registry slot index.
    pub const fn slot(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Slot generation at the time of registration.
    pub const fn generation(self) -> u32 {
        self.0 as u32
    }
}

impl fmt::Display for ProtectToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token(slot={}, gen={})", self.slot(), self.generation())
    }
}

/// How an array's elements can be reached.
///
/// Decided once per [`ArrayId`]: a resized array is a new id and is
/// classified again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Representation {
    /// Backed by a contiguous buffer addressable through a raw pointer.
    Materialized,
    /// Reachable only through element and region calls into the host.
    Opaque,
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Materialized => f.write_str("materialized"),
            Self::Opaque => f.write_str("opaque"),
        }
    }
}
