//! Chunked region allocation for Strata.
//!
//! An [`Arena`] hands out aligned byte blocks from a growable list of
//! fixed-capacity chunks and releases them all at once, never one by
//! one. This crate is the only one in the workspace that contains
//! `unsafe` code, and all of it lives in `raw.rs`.
//!
//! # Architecture
//!
//! ```text
//! Arena<S: MemorySource>
//! ├── Chunk × n (bump-allocated RawBuffer, MAX_ALIGN-aligned)
//! ├── counters: size / slop / capacity / epoch
//! ├── S: MemorySource (System, or a test double that refuses)
//! └── Reporter (diagnostic + failure hook for the non-try entry points)
//! ```
//!
//! # Growth policies
//!
//! - **Chunked:** a request that fits no chunk gets a new head chunk of
//!   at least `chunk_capacity` bytes.
//! - **Fixed:** the arena is a single buffer; such a request fails with
//!   [`ArenaError::CapacityExceeded`].
//!
//! # Addressing
//!
//! Allocations are returned as [`Block`] handles (chunk id + offset +
//! epoch) and resolved through the arena, so a block used after `clear`
//! is reported as stale instead of reading recycled memory.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod arena;
pub mod chunk;
pub mod config;
pub mod handle;
mod raw;
pub mod report;
pub mod source;

// Public re-exports for the primary API surface.
pub use arena::{Arena, ArenaStats};
pub use chunk::Chunk;
pub use config::{ArenaConfig, FailureStrategy, Growth};
pub use handle::Block;
pub use raw::RawBuffer;
pub use report::{FailureHook, Fatal, Reporter};
pub use source::{MemorySource, System};
pub use strata_core::ArenaError;

/// Version of this crate.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
