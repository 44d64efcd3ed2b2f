//! The fallible-allocation primitive behind every chunk.
//!
//! A [`MemorySource`] hands out zeroed [`RawBuffer`]s or reports that it
//! cannot. It never panics on exhaustion: the arena decides whether a
//! refusal becomes an error value or a process termination.

use crate::raw::RawBuffer;

/// Supplies chunk storage to an arena.
///
/// Implementations must return a buffer of exactly `capacity` bytes, or
/// `None`. [`System`] is the production source; tests substitute sources
/// that refuse on demand.
pub trait MemorySource {
    /// Obtain a zeroed buffer of `capacity` bytes.
    fn acquire(&mut self, capacity: usize) -> Option<RawBuffer>;
}

/// The global allocator.
#[derive(Clone, Copy, Debug, Default)]
pub struct System;

impl MemorySource for System {
    fn acquire(&mut self, capacity: usize) -> Option<RawBuffer> {
        RawBuffer::zeroed(capacity)
    }
}

impl<S: MemorySource + ?Sized> MemorySource for &mut S {
    fn acquire(&mut self, capacity: usize) -> Option<RawBuffer> {
        (**self).acquire(capacity)
    }
}

impl<S: MemorySource + ?Sized> MemorySource for Box<S> {
    fn acquire(&mut self, capacity: usize) -> Option<RawBuffer> {
        (**self).acquire(capacity)
    }
}
