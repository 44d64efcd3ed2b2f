//! Error types for arena operations.
//!
//! Only resource exhaustion is a runtime error in the allocation path.
//! Contract violations (bad alignment, zero size) are caller bugs and
//! panic at the call site instead of appearing here.

use std::error::Error;
use std::fmt;

use crate::id::{ChunkId, Epoch};

/// Errors that can occur during arena operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The memory source could not supply a chunk of the required size.
    OutOfMemory {
        /// Number of bytes the chunk needed to hold.
        requested: usize,
    },
    /// A fixed-capacity arena has no room and is not allowed to grow.
    CapacityExceeded {
        /// Number of bytes requested.
        requested: usize,
        /// Total capacity of the arena in bytes.
        capacity: usize,
    },
    /// The arena configuration is invalid.
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },
    /// A block allocated before the most recent `clear`.
    StaleBlock {
        /// The epoch encoded in the block.
        block_epoch: Epoch,
        /// The arena's current epoch.
        arena_epoch: Epoch,
    },
    /// A block whose chunk is not owned by this arena.
    UnknownChunk {
        /// The unrecognised chunk.
        chunk: ChunkId,
    },
    /// A block that extends past the allocated region of its chunk.
    ///
    /// Only possible when a block from one arena is resolved against
    /// another arena that happens to own a chunk with the same id.
    OutOfBounds {
        /// The chunk the block points into.
        chunk: ChunkId,
        /// Byte offset of the block within the chunk.
        offset: usize,
        /// Length of the block in bytes.
        len: usize,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory { requested } => {
                write!(f, "out of memory: could not allocate a chunk of {requested} bytes")
            }
            Self::CapacityExceeded {
                requested,
                capacity,
            } => {
                write!(
                    f,
                    "arena capacity exceeded: requested {requested} bytes, capacity {capacity} bytes"
                )
            }
            Self::InvalidConfig { reason } => write!(f, "invalid arena config: {reason}"),
            Self::StaleBlock {
                block_epoch,
                arena_epoch,
            } => {
                write!(
                    f,
                    "stale block: epoch {block_epoch}, arena epoch {arena_epoch}"
                )
            }
            Self::UnknownChunk { chunk } => write!(f, "unknown chunk: {chunk}"),
            Self::OutOfBounds { chunk, offset, len } => {
                write!(
                    f,
                    "block out of bounds: chunk {chunk}, offset {offset}, len {len}"
                )
            }
        }
    }
}

impl Error for ArenaError {}

impl ArenaError {
    /// Whether this error is a resource-exhaustion failure.
    ///
    /// Exhaustion is the only error the allocation path can produce; the
    /// other variants come from configuration or block resolution.
    pub fn is_exhaustion(&self) -> bool {
        matches!(
            self,
            Self::OutOfMemory { .. } | Self::CapacityExceeded { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_request() {
        let err = ArenaError::CapacityExceeded {
            requested: 80,
            capacity: 64,
        };
        assert_eq!(
            err.to_string(),
            "arena capacity exceeded: requested 80 bytes, capacity 64 bytes"
        );
    }

    #[test]
    fn exhaustion_classification() {
        assert!(ArenaError::OutOfMemory { requested: 1 }.is_exhaustion());
        assert!(!ArenaError::UnknownChunk { chunk: ChunkId(3) }.is_exhaustion());
    }
}
