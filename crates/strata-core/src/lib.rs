//! Core types and utilities for the Strata region allocator.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the pieces every other Strata crate agrees on: alignment arithmetic,
//! strongly-typed identifiers, and the arena error taxonomy.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod align;
pub mod error;
pub mod id;

pub use align::{checked_round_up, is_power_of_two, padding_for, round_up, MAX_ALIGN};
pub use error::ArenaError;
pub use id::{ChunkId, Epoch};
