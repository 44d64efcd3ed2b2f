//! Arena configuration parameters.

use strata_core::{checked_round_up, ArenaError, MAX_ALIGN};

/// Whether an arena may add chunks once its existing chunks are full.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Growth {
    /// Append a new chunk whenever no existing chunk has room.
    #[default]
    Chunked,
    /// Never add a chunk. The arena is a single fixed buffer and requests
    /// that do not fit fail with [`ArenaError::CapacityExceeded`].
    Fixed,
}

/// What the convenience (non-`try_`) entry points do on exhaustion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FailureStrategy {
    /// Print the diagnostic, run the failure hook, then `abort()`.
    #[default]
    Abort,
    /// Print the diagnostic, run the failure hook, then panic.
    ///
    /// Lets an embedder (or a test) catch the failure at an unwind
    /// boundary instead of losing the whole process.
    Panic,
}

/// Configuration for an arena.
///
/// Validated at construction; all values are immutable after creation.
#[derive(Clone, Debug)]
pub struct ArenaConfig {
    /// Capacity hint for the first chunk, in bytes.
    ///
    /// `0`, or any hint below [`ArenaConfig::MIN_CHUNK_CAPACITY`], selects
    /// `chunk_capacity` instead.
    pub initial_capacity: usize,

    /// Minimum size of every chunk created on growth, in bytes.
    ///
    /// Default: 4096. Must be at least [`ArenaConfig::MIN_CHUNK_CAPACITY`].
    /// A request larger than this gets a chunk sized to the request.
    pub chunk_capacity: usize,

    /// Growth policy.
    pub growth: Growth,

    /// Failure behaviour of the convenience entry points.
    pub failure: FailureStrategy,

    /// Include a captured backtrace in the termination diagnostic.
    pub backtrace: bool,
}

impl ArenaConfig {
    /// Default chunk capacity: 4KB.
    pub const DEFAULT_CHUNK_CAPACITY: usize = 4096;

    /// Smallest capacity hint honoured as given.
    pub const MIN_CHUNK_CAPACITY: usize = 64;

    /// Create a growable config whose first chunk holds `initial_capacity`.
    ///
    /// Uses default values for all other parameters.
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            chunk_capacity: Self::DEFAULT_CHUNK_CAPACITY,
            growth: Growth::Chunked,
            failure: FailureStrategy::Abort,
            backtrace: false,
        }
    }

    /// Create a config for a single fixed buffer of `capacity` bytes.
    pub fn fixed(capacity: usize) -> Self {
        Self::new(capacity).with_growth(Growth::Fixed)
    }

    /// Set the growth policy.
    pub fn with_growth(mut self, growth: Growth) -> Self {
        self.growth = growth;
        self
    }

    /// Set the minimum growth chunk size.
    pub fn with_chunk_capacity(mut self, chunk_capacity: usize) -> Self {
        self.chunk_capacity = chunk_capacity;
        self
    }

    /// Set the failure strategy.
    pub fn with_failure(mut self, failure: FailureStrategy) -> Self {
        self.failure = failure;
        self
    }

    /// Enable or disable backtraces in termination diagnostics.
    pub fn with_backtrace(mut self, backtrace: bool) -> Self {
        self.backtrace = backtrace;
        self
    }

    /// Requested size of the first chunk, before alignment rounding.
    pub fn first_chunk_capacity(&self) -> usize {
        if self.initial_capacity < Self::MIN_CHUNK_CAPACITY {
            self.chunk_capacity
        } else {
            self.initial_capacity
        }
    }

    /// Check the configuration for values the arena cannot honour.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.chunk_capacity < Self::MIN_CHUNK_CAPACITY {
            return Err(ArenaError::InvalidConfig {
                reason: format!(
                    "chunk_capacity must be >= {} (got {})",
                    Self::MIN_CHUNK_CAPACITY,
                    self.chunk_capacity,
                ),
            });
        }
        if checked_round_up(MAX_ALIGN, self.chunk_capacity).is_none()
            || checked_round_up(MAX_ALIGN, self.first_chunk_capacity()).is_none()
        {
            return Err(ArenaError::InvalidConfig {
                reason: "chunk capacity overflows when rounded to MAX_ALIGN".into(),
            });
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(0)
    }
}
