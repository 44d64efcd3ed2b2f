//! Fixed-capacity memory chunks with alignment-aware bump allocation.
//!
//! A [`Chunk`] is one contiguous [`RawBuffer`] plus a high-water mark.
//! Allocation advances the mark past any alignment padding and the
//! requested bytes; nothing inside a chunk is ever freed individually.

use strata_core::{checked_round_up, padding_for, ArenaError, ChunkId, MAX_ALIGN};

use crate::raw::RawBuffer;
use crate::source::MemorySource;

/// Outcome of a successful bump inside a chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bump {
    /// Aligned offset of the allocation within the chunk.
    pub offset: usize,
    /// Bytes skipped to reach `offset`.
    pub padding: usize,
}

/// A single contiguous memory chunk with bump allocation.
///
/// Chunks are the storage unit of the arena. The backing buffer is
/// allocated once at full capacity and never moves; `used` only grows
/// until the arena clears it.
pub struct Chunk {
    id: ChunkId,
    /// Backing storage, `capacity` bytes at `MAX_ALIGN`.
    storage: RawBuffer,
    /// Bump pointer: bytes consumed so far, padding included.
    used: usize,
}

impl Chunk {
    /// Create a chunk holding at least `min_capacity` bytes.
    ///
    /// The capacity is rounded up to [`MAX_ALIGN`]. Returns
    /// [`ArenaError::OutOfMemory`] if the rounding overflows or `source`
    /// refuses the request; the chunk never aborts on its own.
    ///
    /// # Panics
    ///
    /// Panics if `source` returns a buffer of the wrong length.
    pub fn new<S: MemorySource + ?Sized>(
        id: ChunkId,
        min_capacity: usize,
        source: &mut S,
    ) -> Result<Self, ArenaError> {
        let capacity = checked_round_up(MAX_ALIGN, min_capacity.max(1)).ok_or(
            ArenaError::OutOfMemory {
                requested: min_capacity,
            },
        )?;
        let storage = source
            .acquire(capacity)
            .ok_or(ArenaError::OutOfMemory {
                requested: capacity,
            })?;
        assert_eq!(
            storage.len(),
            capacity,
            "memory source returned {} bytes for a {capacity}-byte chunk",
            storage.len(),
        );
        Ok(Self {
            id,
            storage,
            used: 0,
        })
    }

    /// Bump-allocate `size` bytes at `alignment`.
    ///
    /// Returns the aligned offset and the padding consumed, or `None` if
    /// the chunk lacks room for both. A failed bump leaves the chunk
    /// untouched.
    ///
    /// The storage base is `MAX_ALIGN`-aligned, so aligning the offset
    /// aligns the address for every `alignment <= MAX_ALIGN`.
    pub fn try_bump(&mut self, alignment: usize, size: usize) -> Option<Bump> {
        let padding = padding_for(alignment, self.used);
        let offset = self.used.checked_add(padding)?;
        let end = offset.checked_add(size)?;
        if end > self.capacity() {
            return None;
        }
        self.used = end;
        Some(Bump { offset, padding })
    }

    /// Zero the used region and reset the bump pointer.
    ///
    /// Everything allocated from this chunk becomes invalid.
    pub fn clear(&mut self) {
        let used = self.used;
        self.storage.as_mut_slice()[..used].fill(0);
        self.used = 0;
    }

    /// Shared view of `len` bytes at `offset`, if inside the used region.
    pub fn bytes(&self, offset: usize, len: usize) -> Option<&[u8]> {
        let end = self.checked_end(offset, len)?;
        Some(&self.storage.as_slice()[offset..end])
    }

    /// Mutable view of `len` bytes at `offset`, if inside the used region.
    pub fn bytes_mut(&mut self, offset: usize, len: usize) -> Option<&mut [u8]> {
        let end = self.checked_end(offset, len)?;
        Some(&mut self.storage.as_mut_slice()[offset..end])
    }

    fn checked_end(&self, offset: usize, len: usize) -> Option<usize> {
        offset.checked_add(len).filter(|&end| end <= self.used)
    }

    /// This chunk's id.
    pub fn id(&self) -> ChunkId {
        self.id
    }

    /// Bytes consumed, including alignment padding.
    pub fn used(&self) -> usize {
        self.used
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Bytes left above the high-water mark, ignoring alignment.
    pub fn remaining(&self) -> usize {
        self.capacity() - self.used
    }

    /// Whether nothing has been allocated since creation or the last clear.
    pub fn is_unused(&self) -> bool {
        self.used == 0
    }

    /// Address of the first storage byte.
    pub fn base_addr(&self) -> usize {
        self.storage.addr()
    }
}

impl std::fmt::Debug for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunk")
            .field("id", &self.id)
            .field("used", &self.used)
            .field("capacity", &self.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::System;

    fn chunk(capacity: usize) -> Chunk {
        Chunk::new(ChunkId(0), capacity, &mut System).unwrap()
    }

    #[test]
    fn capacity_is_rounded_to_max_align() {
        assert_eq!(chunk(100).capacity(), 112);
        assert_eq!(chunk(64).capacity(), 64);
    }

    #[test]
    fn sequential_bumps_are_contiguous() {
        let mut c = chunk(1024);
        assert_eq!(c.try_bump(8, 16), Some(Bump { offset: 0, padding: 0 }));
        assert_eq!(c.try_bump(8, 8), Some(Bump { offset: 16, padding: 0 }));
        assert_eq!(c.used(), 24);
    }

    #[test]
    fn misaligned_mark_is_padded() {
        let mut c = chunk(1024);
        c.try_bump(1, 3).unwrap();
        let bump = c.try_bump(8, 8).unwrap();
        assert_eq!(bump, Bump { offset: 8, padding: 5 });
        assert_eq!(c.used(), 16);
        assert_eq!((c.base_addr() + bump.offset) % 8, 0);
    }

    #[test]
    fn bump_fails_when_full_and_leaves_chunk_untouched() {
        let mut c = chunk(64);
        c.try_bump(16, 48).unwrap();
        assert!(c.try_bump(16, 32).is_none());
        assert_eq!(c.used(), 48);
        assert!(c.try_bump(16, 16).is_some());
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn padding_counts_against_capacity() {
        let mut c = chunk(64);
        c.try_bump(1, 57).unwrap();
        // 57 rounded to 8 is 64, leaving no room for even one byte.
        assert!(c.try_bump(8, 1).is_none());
        assert!(c.try_bump(1, 7).is_some());
    }

    #[test]
    fn clear_zeroes_and_resets() {
        let mut c = chunk(64);
        let bump = c.try_bump(1, 4).unwrap();
        c.bytes_mut(bump.offset, 4).unwrap().copy_from_slice(b"abcd");
        c.clear();
        assert!(c.is_unused());
        let again = c.try_bump(1, 4).unwrap();
        assert_eq!(c.bytes(again.offset, 4).unwrap(), &[0, 0, 0, 0]);
    }

    #[test]
    fn bytes_outside_used_region_are_refused() {
        let mut c = chunk(64);
        c.try_bump(1, 8).unwrap();
        assert!(c.bytes(0, 8).is_some());
        assert!(c.bytes(4, 8).is_none());
        assert!(c.bytes(usize::MAX, 2).is_none());
    }

    #[test]
    fn refused_source_is_out_of_memory() {
        struct Never;
        impl MemorySource for Never {
            fn acquire(&mut self, _capacity: usize) -> Option<RawBuffer> {
                None
            }
        }
        let err = Chunk::new(ChunkId(0), 64, &mut Never).unwrap_err();
        assert_eq!(err, ArenaError::OutOfMemory { requested: 64 });
    }

    #[test]
    fn overflowing_capacity_is_out_of_memory() {
        let err = Chunk::new(ChunkId(0), usize::MAX, &mut System).unwrap_err();
        assert!(matches!(err, ArenaError::OutOfMemory { .. }));
    }
}
