//! Block handles.
//!
//! A [`Block`] names an allocation by chunk and offset instead of by raw
//! pointer. It is epoch-scoped: the `epoch` field lets the arena reject a
//! block from before the last `clear` in O(1).

use std::fmt;

use strata_core::{ChunkId, Epoch};

/// Location of one allocation within an arena.
///
/// Blocks are plain `Copy` values; they do not borrow the arena. Resolve
/// them with [`Arena::get`](crate::Arena::get) or
/// [`Arena::get_mut`](crate::Arena::get_mut).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Block {
    pub(crate) epoch: Epoch,
    pub(crate) chunk: ChunkId,
    /// Byte offset within the chunk.
    pub(crate) offset: usize,
    /// Length in bytes.
    pub(crate) len: usize,
}

impl Block {
    pub(crate) fn new(epoch: Epoch, chunk: ChunkId, offset: usize, len: usize) -> Self {
        Self {
            epoch,
            chunk,
            offset,
            len,
        }
    }

    /// The arena epoch this block was allocated in.
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// The chunk holding this block.
    pub fn chunk(&self) -> ChunkId {
        self.chunk
    }

    /// Byte offset within the chunk.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether this is a zero-length block. Never true for arena blocks.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Block(epoch={}, chunk={}, off={}, len={})",
            self.epoch, self.chunk, self.offset, self.len
        )
    }
}
