//! Strata: region-based memory arenas.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Strata sub-crates. For most users, adding `strata` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use strata::prelude::*;
//!
//! let mut arena = Arena::with_capacity(64);
//! let name = arena.alloc_str("Camillo");
//! let record = arena.alloc_aligned(8, 40);
//! assert_eq!(arena.get(name).unwrap(), b"Camillo");
//! assert_eq!(arena.addr(record).unwrap() % 8, 0);
//!
//! // Everything goes at once.
//! arena.clear();
//! assert_eq!(arena.size(), 0);
//! assert!(arena.get(name).is_err());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `strata-arena` | `Arena`, chunks, blocks, config, failure reporting |
//! | [`types`] | `strata-core` | Alignment utilities, ids, `ArenaError` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Arena allocation, configuration and failure reporting (`strata-arena`).
pub use strata_arena as arena;

/// Alignment utilities, identifiers and errors (`strata-core`).
pub use strata_core as types;

/// Common imports for typical Strata usage.
///
/// ```rust
/// use strata::prelude::*;
/// ```
pub mod prelude {
    pub use strata_arena::{
        Arena, ArenaConfig, ArenaStats, Block, FailureStrategy, Fatal, Growth, MemorySource,
        System,
    };
    pub use strata_core::{is_power_of_two, round_up, ArenaError, MAX_ALIGN};
}
