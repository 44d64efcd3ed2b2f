//! The chunked region allocator.
//!
//! [`Arena`] owns a list of [`Chunk`]s and bump-allocates from them
//! first-fit, newest chunk first. When no chunk has room it appends a new
//! chunk sized to the request (and at least `chunk_capacity`), unless the
//! arena is configured as a fixed buffer.
//!
//! Every allocating operation comes in two forms that share one
//! algorithm:
//!
//! - `try_*` returns `Result<_, ArenaError>` and leaves the arena
//!   untouched on failure.
//! - the plain form unwraps through the arena's [`Reporter`], which
//!   prints a diagnostic naming the caller and then aborts (or panics,
//!   per [`FailureStrategy`](crate::FailureStrategy)).
//!
//! ```text
//! chunks: [ c0 | c1 | c2 ]   oldest .. newest
//!                      ^ head: scanned first, never released by shrink
//! ```

use std::error::Error;
use std::fmt;
use std::panic::Location;

use smallvec::SmallVec;
use strata_core::{checked_round_up, is_power_of_two, ArenaError, ChunkId, Epoch, MAX_ALIGN};
use tracing::{debug, trace};

use crate::chunk::Chunk;
use crate::config::{ArenaConfig, Growth};
use crate::handle::Block;
use crate::report::{FailureHook, Fatal, Reporter};
use crate::source::{MemorySource, System};

/// Point-in-time statistics for an arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaStats {
    /// Bytes handed out to callers since the last clear.
    pub size: usize,
    /// Bytes lost to alignment padding since the last clear.
    pub slop: usize,
    /// Total capacity across all chunks.
    pub capacity: usize,
    /// Largest `capacity - used` of any chunk.
    pub best_available: usize,
    /// Smallest `capacity - used` of any chunk.
    pub worst_available: usize,
    /// Number of chunks.
    pub chunks: usize,
}

impl fmt::Display for ArenaStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Arena(size={}, slop={}, capacity={}, bestAvailable={}, worstAvailable={}, chunks={})",
            self.size,
            self.slop,
            self.capacity,
            self.best_available,
            self.worst_available,
            self.chunks
        )
    }
}

/// A region-based allocator over a growable list of chunks.
///
/// Not thread-safe by design: all mutation goes through `&mut self`.
/// Callers that need concurrency partition arenas per thread or wrap one
/// in a lock.
pub struct Arena<S: MemorySource = System> {
    /// Oldest first; the last element is the head. Never empty.
    chunks: SmallVec<[Chunk; 4]>,
    /// Sum of chunk capacities.
    capacity: usize,
    /// Live bytes handed out, excluding padding.
    size: usize,
    /// Padding bytes.
    slop: usize,
    /// Incremented by every clear; stamped into each block.
    epoch: Epoch,
    /// Id for the next chunk created.
    next_chunk: u64,
    config: ArenaConfig,
    source: S,
    reporter: Reporter,
}

impl Arena<System> {
    /// Create an arena with the default capacity.
    ///
    /// Aborts with a diagnostic if the first chunk cannot be allocated.
    #[track_caller]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an arena whose first chunk holds at least `capacity_hint`
    /// bytes. A hint of 0 (or below the minimum) selects the default.
    ///
    /// Aborts with a diagnostic if the first chunk cannot be allocated.
    #[track_caller]
    pub fn with_capacity(capacity_hint: usize) -> Self {
        Self::with_config(ArenaConfig::new(capacity_hint), System)
    }

    /// Fallible form of [`Arena::with_capacity`].
    pub fn try_with_capacity(capacity_hint: usize) -> Result<Self, ArenaError> {
        Self::from_config(ArenaConfig::new(capacity_hint), System)
    }
}

impl Default for Arena<System> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: MemorySource> Arena<S> {
    /// Create an arena from `config`, drawing chunks from `source`.
    ///
    /// Fails if the config is invalid or the first chunk cannot be
    /// allocated; nothing is leaked on failure.
    pub fn from_config(config: ArenaConfig, mut source: S) -> Result<Self, ArenaError> {
        let head = first_chunk(&config, &mut source)?;
        let reporter = Reporter::new(config.failure, config.backtrace);
        Ok(Self::assemble(head, config, source, reporter))
    }

    /// Like [`Arena::from_config`], but terminates through the configured
    /// failure strategy instead of returning an error.
    #[track_caller]
    pub fn with_config(config: ArenaConfig, source: S) -> Self {
        let reporter = Reporter::new(config.failure, config.backtrace);
        Self::with_reporter(config, source, reporter)
    }

    /// Like [`Arena::with_config`], with `hook` registered before the
    /// first chunk is requested.
    ///
    /// The hook runs if creation itself terminates, and stays registered
    /// for later allocations (see [`Arena::set_failure_hook`]).
    #[track_caller]
    pub fn with_config_and_hook(
        config: ArenaConfig,
        source: S,
        hook: impl FnMut() + Send + 'static,
    ) -> Self {
        let mut reporter = Reporter::new(config.failure, config.backtrace);
        reporter.set_hook(Box::new(hook));
        Self::with_reporter(config, source, reporter)
    }

    #[track_caller]
    fn with_reporter(config: ArenaConfig, mut source: S, mut reporter: Reporter) -> Self {
        let head =
            first_chunk(&config, &mut source).or_terminate(&mut reporter, "unable to create arena");
        Self::assemble(head, config, source, reporter)
    }

    fn assemble(head: Chunk, config: ArenaConfig, source: S, reporter: Reporter) -> Self {
        debug!(
            chunk = %head.id(),
            capacity = head.capacity(),
            growth = ?config.growth,
            "arena created"
        );
        let capacity = head.capacity();
        let mut chunks = SmallVec::new();
        chunks.push(head);
        Self {
            chunks,
            capacity,
            size: 0,
            slop: 0,
            epoch: Epoch::default(),
            next_chunk: 1,
            config,
            source,
            reporter,
        }
    }

    /// Allocate `size` bytes at `alignment`.
    ///
    /// The returned block's address is a multiple of `alignment`. On
    /// failure no counter is touched and no chunk is added.
    ///
    /// # Panics
    ///
    /// Panics if `alignment` is not a power of two, exceeds
    /// [`MAX_ALIGN`], or `size` is zero.
    pub fn try_alloc_aligned(&mut self, alignment: usize, size: usize) -> Result<Block, ArenaError> {
        check_request(alignment, size);
        self.bump(alignment, size)
    }

    /// Allocate `size` bytes at `alignment`, where `size` is an exact
    /// multiple of `alignment`.
    ///
    /// Used when blocks must pack back to back without trailing slack.
    ///
    /// # Panics
    ///
    /// As [`Arena::try_alloc_aligned`], and additionally if `size` is not
    /// an integral multiple of `alignment`.
    pub fn try_alloc_packed(&mut self, alignment: usize, size: usize) -> Result<Block, ArenaError> {
        check_request(alignment, size);
        assert!(
            size % alignment == 0,
            "size must be an integral multiple of alignment (size {size}, alignment {alignment})"
        );
        self.bump(alignment, size)
    }

    /// Allocate `size` bytes at the strictest alignment.
    ///
    /// `size` is rounded up to [`MAX_ALIGN`] first, and the rounded size
    /// is what [`Arena::size`] accounts for.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn try_alloc(&mut self, size: usize) -> Result<Block, ArenaError> {
        assert!(size > 0, "allocation size must be greater than zero");
        let rounded =
            checked_round_up(MAX_ALIGN, size).ok_or(ArenaError::OutOfMemory { requested: size })?;
        self.try_alloc_packed(MAX_ALIGN, rounded)
    }

    /// Allocate a block at `alignment` and copy `bytes` into it.
    ///
    /// # Panics
    ///
    /// As [`Arena::try_alloc_aligned`]; `bytes` must not be empty.
    pub fn try_alloc_copy(&mut self, alignment: usize, bytes: &[u8]) -> Result<Block, ArenaError> {
        let block = self.try_alloc_aligned(alignment, bytes.len())?;
        self.get_mut(block)?.copy_from_slice(bytes);
        Ok(block)
    }

    /// Convenience form of [`Arena::try_alloc_aligned`].
    #[track_caller]
    pub fn alloc_aligned(&mut self, alignment: usize, size: usize) -> Block {
        let result = self.try_alloc_aligned(alignment, size);
        self.unwrap_or_terminate(result, size)
    }

    /// Convenience form of [`Arena::try_alloc_packed`].
    #[track_caller]
    pub fn alloc_packed(&mut self, alignment: usize, size: usize) -> Block {
        let result = self.try_alloc_packed(alignment, size);
        self.unwrap_or_terminate(result, size)
    }

    /// Convenience form of [`Arena::try_alloc`].
    #[track_caller]
    pub fn alloc(&mut self, size: usize) -> Block {
        let result = self.try_alloc(size);
        self.unwrap_or_terminate(result, size)
    }

    /// Convenience form of [`Arena::try_alloc_copy`].
    #[track_caller]
    pub fn alloc_copy(&mut self, alignment: usize, bytes: &[u8]) -> Block {
        let result = self.try_alloc_copy(alignment, bytes);
        self.unwrap_or_terminate(result, bytes.len())
    }

    /// Copy a string into the arena at byte alignment.
    #[track_caller]
    pub fn alloc_str(&mut self, s: &str) -> Block {
        self.alloc_copy(1, s.as_bytes())
    }

    #[track_caller]
    fn unwrap_or_terminate(&mut self, result: Result<Block, ArenaError>, size: usize) -> Block {
        match result {
            Ok(block) => block,
            Err(err) => {
                let err: &dyn Error = &err;
                self.reporter.terminate(
                    Location::caller(),
                    Some(err),
                    format_args!("unable to allocate {size} bytes"),
                )
            }
        }
    }

    fn bump(&mut self, alignment: usize, size: usize) -> Result<Block, ArenaError> {
        for chunk in self.chunks.iter_mut().rev() {
            if let Some(bump) = chunk.try_bump(alignment, size) {
                self.size += size;
                self.slop += bump.padding;
                trace!(
                    chunk = %chunk.id(),
                    offset = bump.offset,
                    padding = bump.padding,
                    size,
                    "bump"
                );
                return Ok(Block::new(self.epoch, chunk.id(), bump.offset, size));
            }
        }

        if self.config.growth == Growth::Fixed {
            return Err(ArenaError::CapacityExceeded {
                requested: size,
                capacity: self.capacity,
            });
        }

        let id = ChunkId(self.next_chunk);
        let next_chunk = self
            .next_chunk
            .checked_add(1)
            .ok_or(ArenaError::OutOfMemory { requested: size })?;
        let mut chunk = Chunk::new(id, size.max(self.config.chunk_capacity), &mut self.source)?;
        // Offset 0 of fresh storage is MAX_ALIGN-aligned and capacity >= size.
        let bump = chunk
            .try_bump(alignment, size)
            .expect("size <= capacity, so a fresh chunk always fits");
        debug!(chunk = %id, capacity = chunk.capacity(), requested = size, "chunk added");

        self.next_chunk = next_chunk;
        self.capacity += chunk.capacity();
        self.size += size;
        self.slop += bump.padding;
        self.chunks.push(chunk);
        Ok(Block::new(self.epoch, id, bump.offset, size))
    }

    /// Resolve a block to its bytes.
    pub fn get(&self, block: Block) -> Result<&[u8], ArenaError> {
        let chunk = self.chunk_for(block)?;
        chunk
            .bytes(block.offset, block.len)
            .ok_or(ArenaError::OutOfBounds {
                chunk: block.chunk,
                offset: block.offset,
                len: block.len,
            })
    }

    /// Resolve a block to its bytes, mutably.
    pub fn get_mut(&mut self, block: Block) -> Result<&mut [u8], ArenaError> {
        self.check_epoch(block)?;
        let index = self.chunk_index(block.chunk)?;
        self.chunks[index]
            .bytes_mut(block.offset, block.len)
            .ok_or(ArenaError::OutOfBounds {
                chunk: block.chunk,
                offset: block.offset,
                len: block.len,
            })
    }

    /// Absolute address of the block's first byte.
    ///
    /// Stable until the next clear or the arena is dropped.
    pub fn addr(&self, block: Block) -> Result<usize, ArenaError> {
        self.get(block).map(|bytes| bytes.as_ptr() as usize)
    }

    fn chunk_for(&self, block: Block) -> Result<&Chunk, ArenaError> {
        self.check_epoch(block)?;
        let index = self.chunk_index(block.chunk)?;
        Ok(&self.chunks[index])
    }

    fn check_epoch(&self, block: Block) -> Result<(), ArenaError> {
        if block.epoch != self.epoch {
            return Err(ArenaError::StaleBlock {
                block_epoch: block.epoch,
                arena_epoch: self.epoch,
            });
        }
        Ok(())
    }

    /// Chunk ids increase with creation order and `chunks` is oldest
    /// first, so the list is sorted by id.
    fn chunk_index(&self, id: ChunkId) -> Result<usize, ArenaError> {
        self.chunks
            .binary_search_by_key(&id, Chunk::id)
            .map_err(|_| ArenaError::UnknownChunk { chunk: id })
    }

    /// Bytes handed out since the last clear, excluding padding.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Bytes lost to alignment padding since the last clear.
    pub fn slop(&self) -> usize {
        self.slop
    }

    /// Total capacity across all chunks.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Largest free tail of any chunk.
    ///
    /// This is raw `capacity - used` and ignores the padding a real
    /// request would need, so a request of this size at a strict
    /// alignment may still not fit.
    pub fn best_available(&self) -> usize {
        self.chunks.iter().map(Chunk::remaining).max().unwrap_or(0)
    }

    /// Smallest free tail of any chunk. Approximate in the same way as
    /// [`Arena::best_available`].
    pub fn worst_available(&self) -> usize {
        self.chunks.iter().map(Chunk::remaining).min().unwrap_or(0)
    }

    /// Current epoch.
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// The arena's configuration.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Chunks from head (newest) to tail (oldest).
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> + '_ {
        self.chunks.iter().rev()
    }

    /// The head chunk.
    pub fn head(&self) -> &Chunk {
        &self.chunks[self.chunks.len() - 1]
    }

    /// Snapshot of all statistics.
    pub fn stats(&self) -> ArenaStats {
        ArenaStats {
            size: self.size,
            slop: self.slop,
            capacity: self.capacity,
            best_available: self.best_available(),
            worst_available: self.worst_available(),
            chunks: self.chunks.len(),
        }
    }

    /// Register a hook run immediately before a convenience entry point
    /// terminates. Returns the previously registered hook.
    pub fn set_failure_hook(
        &mut self,
        hook: impl FnMut() + Send + 'static,
    ) -> Option<FailureHook> {
        self.reporter.set_hook(Box::new(hook))
    }

    /// Remove the failure hook, returning it.
    pub fn take_failure_hook(&mut self) -> Option<FailureHook> {
        self.reporter.take_hook()
    }

    /// Release every allocation without releasing any chunk.
    ///
    /// Used regions are zeroed, counters reset, and the epoch advanced,
    /// so every block handed out before this call resolves to
    /// [`ArenaError::StaleBlock`].
    pub fn clear(&mut self) {
        for chunk in &mut self.chunks {
            chunk.clear();
        }
        self.size = 0;
        self.slop = 0;
        self.epoch = self.epoch.next();
        debug!(epoch = %self.epoch, chunks = self.chunks.len(), "arena cleared");
    }

    /// Release every empty chunk except the head.
    ///
    /// Never invalidates a live block: a chunk holding one is not empty.
    pub fn shrink(&mut self) {
        let head = self.chunks.len() - 1;
        let mut index = 0;
        let mut released = 0usize;
        let mut bytes = 0usize;
        self.chunks.retain(|chunk| {
            let keep = index == head || !chunk.is_unused();
            index += 1;
            if !keep {
                released += 1;
                bytes += chunk.capacity();
            }
            keep
        });
        self.capacity -= bytes;
        if released > 0 {
            debug!(released, bytes, remaining = self.chunks.len(), "arena shrunk");
        }
    }

    /// Release all chunks and the arena itself, returning final stats.
    pub fn destroy(self) -> ArenaStats {
        let stats = self.stats();
        debug!(%stats, "arena destroyed");
        stats
    }

    /// The memory source backing this arena.
    pub fn source(&self) -> &S {
        &self.source
    }
}

fn first_chunk<S: MemorySource>(config: &ArenaConfig, source: &mut S) -> Result<Chunk, ArenaError> {
    config.validate()?;
    Chunk::new(ChunkId(0), config.first_chunk_capacity(), source)
}

fn check_request(alignment: usize, size: usize) {
    assert!(
        is_power_of_two(alignment) && alignment <= MAX_ALIGN,
        "alignment must be a power of two no greater than {MAX_ALIGN} (got {alignment})"
    );
    assert!(size > 0, "allocation size must be greater than zero");
}

impl<S: MemorySource> fmt::Debug for Arena<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("stats", &self.stats())
            .field("epoch", &self.epoch)
            .field("growth", &self.config.growth)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena(hint: usize) -> Arena {
        Arena::try_with_capacity(hint).unwrap()
    }

    #[test]
    fn new_arena_has_one_empty_chunk() {
        let a = Arena::new();
        assert_eq!(a.chunk_count(), 1);
        assert_eq!(a.capacity(), ArenaConfig::DEFAULT_CHUNK_CAPACITY);
        assert_eq!(a.size(), 0);
        assert_eq!(a.slop(), 0);
        assert_eq!(a.best_available(), a.capacity());
    }

    #[test]
    fn second_request_that_does_not_fit_adds_a_chunk() {
        let mut a = arena(64);
        a.try_alloc_aligned(8, 40).unwrap();
        assert_eq!(a.size(), 40);
        assert_eq!(a.chunk_count(), 1);

        a.try_alloc_aligned(8, 40).unwrap();
        assert_eq!(a.chunk_count(), 2);
        assert_eq!(a.size(), 80);
        assert_eq!(a.capacity(), 64 + ArenaConfig::DEFAULT_CHUNK_CAPACITY);
    }

    #[test]
    fn head_is_scanned_first() {
        let mut a = arena(64);
        a.try_alloc_aligned(8, 40).unwrap();
        let b = a.try_alloc_aligned(8, 40).unwrap();
        // The small first chunk still has 24 bytes, but the new head is
        // tried first and has room.
        let c = a.try_alloc_aligned(8, 16).unwrap();
        assert_eq!(c.chunk(), b.chunk());
        assert_eq!(c.offset(), 40);
    }

    #[test]
    fn older_chunk_is_used_when_head_is_full() {
        let mut a = Arena::from_config(ArenaConfig::new(64).with_chunk_capacity(64), System).unwrap();
        let first = a.try_alloc_aligned(8, 40).unwrap();
        a.try_alloc_aligned(8, 64).unwrap();
        let c = a.try_alloc_aligned(8, 16).unwrap();
        assert_eq!(c.chunk(), first.chunk());
        assert_eq!(a.chunk_count(), 2);
    }

    #[test]
    fn oversized_request_gets_its_own_chunk() {
        let mut a = arena(64);
        let b = a.try_alloc_aligned(16, 10_000).unwrap();
        assert_eq!(b.offset(), 0);
        assert_eq!(a.head().capacity(), 10_000);
        assert_eq!(a.chunk_count(), 2);
    }

    #[test]
    fn padding_is_tracked_as_slop() {
        let mut a = arena(64);
        a.try_alloc_aligned(1, 3).unwrap();
        let b = a.try_alloc_aligned(8, 8).unwrap();
        assert_eq!(b.offset(), 8);
        assert_eq!(a.size(), 11);
        assert_eq!(a.slop(), 5);
        assert_eq!(a.head().used(), 16);
    }

    #[test]
    fn addresses_honour_alignment() {
        let mut a = arena(256);
        for &(alignment, size) in &[(1, 3), (2, 2), (4, 5), (8, 1), (16, 7), (4, 4)] {
            let b = a.try_alloc_aligned(alignment, size).unwrap();
            assert_eq!(a.addr(b).unwrap() % alignment, 0);
        }
    }

    #[test]
    fn try_alloc_rounds_to_max_align() {
        let mut a = arena(64);
        let b = a.try_alloc(5).unwrap();
        assert_eq!(b.len(), MAX_ALIGN);
        assert_eq!(a.size(), MAX_ALIGN);
        assert_eq!(a.addr(b).unwrap() % MAX_ALIGN, 0);
    }

    #[test]
    fn blocks_do_not_overlap() {
        let mut a = arena(64);
        let x = a.alloc_copy(1, b"hello");
        let y = a.alloc_copy(1, b"world");
        assert_eq!(a.get(x).unwrap(), b"hello");
        assert_eq!(a.get(y).unwrap(), b"world");
    }

    #[test]
    fn get_mut_writes_through() {
        let mut a = arena(64);
        let b = a.alloc_aligned(4, 4);
        a.get_mut(b).unwrap().copy_from_slice(&7u32.to_le_bytes());
        assert_eq!(a.get(b).unwrap(), &7u32.to_le_bytes());
    }

    #[test]
    fn clear_resets_counters_but_keeps_chunks() {
        let mut a = arena(64);
        a.try_alloc_aligned(8, 40).unwrap();
        a.try_alloc_aligned(8, 40).unwrap();
        let capacity = a.capacity();
        a.clear();
        assert_eq!(a.size(), 0);
        assert_eq!(a.slop(), 0);
        assert_eq!(a.chunk_count(), 2);
        assert_eq!(a.capacity(), capacity);
    }

    #[test]
    fn best_available_after_clear_is_full_capacity() {
        let mut a = arena(64);
        a.try_alloc(16).unwrap();
        a.clear();
        assert_eq!(a.best_available(), 64);
    }

    #[test]
    fn clear_makes_old_blocks_stale() {
        let mut a = arena(64);
        let b = a.alloc_str("gone");
        a.clear();
        assert!(matches!(a.get(b), Err(ArenaError::StaleBlock { .. })));
        assert!(matches!(a.get_mut(b), Err(ArenaError::StaleBlock { .. })));
    }

    #[test]
    fn memory_is_zeroed_after_clear() {
        let mut a = arena(64);
        a.alloc_copy(1, &[0xFF; 32]);
        a.clear();
        let b = a.alloc_aligned(1, 32);
        assert!(a.get(b).unwrap().iter().all(|&x| x == 0));
    }

    #[test]
    fn shrink_after_clear_leaves_only_head() {
        let mut a = Arena::from_config(ArenaConfig::new(64).with_chunk_capacity(64), System).unwrap();
        for _ in 0..4 {
            a.try_alloc_aligned(16, 64).unwrap();
        }
        assert_eq!(a.chunk_count(), 4);
        let head = a.head().id();
        a.clear();
        a.shrink();
        assert_eq!(a.chunk_count(), 1);
        assert_eq!(a.head().id(), head);
        assert_eq!(a.capacity(), 64);
    }

    #[test]
    fn shrink_keeps_chunks_in_use() {
        let mut a = Arena::from_config(ArenaConfig::new(64).with_chunk_capacity(64), System).unwrap();
        let live = a.try_alloc_aligned(16, 64).unwrap();
        a.try_alloc_aligned(16, 64).unwrap();
        a.shrink();
        assert_eq!(a.chunk_count(), 2);
        assert_eq!(a.get(live).unwrap().len(), 64);
    }

    #[test]
    fn shrink_releases_empty_chunks_between_used_ones() {
        let mut a = Arena::from_config(ArenaConfig::new(256).with_chunk_capacity(64), System).unwrap();
        let oldest = a.try_alloc_aligned(16, 256).unwrap().chunk();
        let middle = a.try_alloc_aligned(16, 64).unwrap().chunk();
        let head = a.try_alloc_aligned(16, 64).unwrap().chunk();
        a.clear();

        assert_eq!(a.try_alloc_aligned(16, 64).unwrap().chunk(), head);
        // Too big for the middle chunk, lands in the oldest one.
        assert_eq!(a.try_alloc_aligned(16, 128).unwrap().chunk(), oldest);

        a.shrink();
        let ids: Vec<_> = a.chunks().map(Chunk::id).collect();
        assert_eq!(ids, vec![head, oldest]);
        assert!(!ids.contains(&middle));
        assert_eq!(a.capacity(), 256 + 64);

        a.shrink();
        assert_eq!(a.chunk_count(), 2);
    }

    #[test]
    fn fixed_arena_never_grows() {
        let mut a = Arena::from_config(ArenaConfig::fixed(64), System).unwrap();
        a.try_alloc_aligned(8, 48).unwrap();
        let err = a.try_alloc_aligned(8, 32).unwrap_err();
        assert_eq!(
            err,
            ArenaError::CapacityExceeded {
                requested: 32,
                capacity: 64
            }
        );
        assert_eq!(a.chunk_count(), 1);
        assert_eq!(a.size(), 48);
    }

    #[test]
    fn worst_available_tracks_fullest_chunk() {
        let mut a = arena(64);
        a.try_alloc_aligned(16, 64).unwrap();
        a.try_alloc_aligned(16, 16).unwrap();
        assert_eq!(a.worst_available(), 0);
        assert_eq!(a.best_available(), ArenaConfig::DEFAULT_CHUNK_CAPACITY - 16);
    }

    #[test]
    fn foreign_block_is_rejected() {
        let mut a = arena(64);
        let mut b = arena(64);
        let block = a.try_alloc_aligned(16, 64).unwrap();
        b.try_alloc_aligned(16, 64).unwrap();
        let other = b.try_alloc_aligned(16, 16).unwrap();
        assert!(matches!(a.get(other), Err(ArenaError::UnknownChunk { .. })));
        assert_eq!(b.get(block).unwrap().len(), 64);
    }

    #[test]
    fn chunk_ids_never_wrap() {
        let mut a = arena(64);
        a.try_alloc_aligned(16, 64).unwrap();
        a.next_chunk = u64::MAX;
        assert_eq!(
            a.try_alloc_aligned(16, 16).unwrap_err(),
            ArenaError::OutOfMemory { requested: 16 }
        );
        assert_eq!(a.chunk_count(), 1);
        assert_eq!(a.capacity(), 64);
        assert_eq!(a.size(), 64);

        a.next_chunk = u64::MAX - 1;
        let block = a.try_alloc_aligned(16, 16).unwrap();
        assert_eq!(block.chunk(), ChunkId(u64::MAX - 1));
        assert_eq!(a.get(block).unwrap().len(), 16);
    }

    #[test]
    fn stats_display_matches_accessors() {
        let mut a = arena(64);
        a.try_alloc_aligned(8, 40).unwrap();
        let stats = a.stats();
        assert_eq!(stats.size, 40);
        assert_eq!(
            stats.to_string(),
            "Arena(size=40, slop=0, capacity=64, bestAvailable=24, worstAvailable=24, chunks=1)"
        );
    }

    #[test]
    fn destroy_returns_final_stats() {
        let mut a = arena(64);
        a.alloc(16);
        let stats = a.destroy();
        assert_eq!(stats.size, 16);
        assert_eq!(stats.chunks, 1);
    }

    #[test]
    fn destroying_nothing_is_a_no_op() {
        let mut slot: Option<Arena> = None;
        if let Some(a) = slot.take() {
            a.destroy();
        }
        assert!(slot.is_none());
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn non_power_of_two_alignment_panics() {
        let _ = arena(64).try_alloc_aligned(3, 9);
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn over_limit_alignment_panics() {
        let _ = arena(64).try_alloc_aligned(32, 32);
    }

    #[test]
    #[should_panic(expected = "greater than zero")]
    fn zero_size_panics() {
        let _ = arena(64).try_alloc_aligned(8, 0);
    }

    #[test]
    #[should_panic(expected = "integral multiple")]
    fn packed_rejects_ragged_size() {
        let _ = arena(64).try_alloc_packed(8, 12);
    }

    #[test]
    fn packed_accepts_exact_multiple() {
        let mut a = arena(64);
        let b = a.try_alloc_packed(8, 24).unwrap();
        assert_eq!(b.len(), 24);
    }

    #[test]
    fn invalid_config_is_reported() {
        let config = ArenaConfig::new(64).with_chunk_capacity(1);
        assert!(matches!(
            Arena::from_config(config, System),
            Err(ArenaError::InvalidConfig { .. })
        ));
    }
}
