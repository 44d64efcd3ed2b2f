//! Strongly-typed identifiers.

use std::fmt;

/// Identifies a chunk within a single arena.
///
/// Chunk ids are assigned from a per-arena monotonic counter and are
/// never reused, so a [`ChunkId`] uniquely names a chunk for the life
/// of its arena even after `shrink` releases it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkId(pub u64);

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ChunkId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Arena epoch, incremented by every `clear`.
///
/// Blocks remember the epoch they were allocated in; a block whose epoch
/// is older than the arena's current epoch refers to memory that has
/// already been reclaimed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Epoch(pub u64);

impl Epoch {
    /// The epoch following this one.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Epoch {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
