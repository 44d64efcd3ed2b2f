//! Test utilities and mock memory sources for Strata development.
//!
//! Provides [`MemorySource`] doubles that refuse on demand
//! ([`FailingSource`], [`BudgetSource`]) and a [`counting_hook`] for
//! observing how often a failure hook runs.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use strata_arena::{MemorySource, RawBuffer};

/// A memory source that refuses every request.
///
/// Counts the refusals so tests can assert an allocation path actually
/// reached the source.
#[derive(Debug, Default)]
pub struct FailingSource {
    refused: usize,
}

impl FailingSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requests refused so far.
    pub fn refused(&self) -> usize {
        self.refused
    }
}

impl MemorySource for FailingSource {
    fn acquire(&mut self, _capacity: usize) -> Option<RawBuffer> {
        self.refused += 1;
        None
    }
}

/// A memory source backed by the global allocator, with a byte budget.
///
/// Requests are served while the running total stays within `budget`
/// and refused afterwards. Useful for driving an arena into exhaustion
/// at a chosen point.
#[derive(Debug)]
pub struct BudgetSource {
    budget: usize,
    spent: usize,
    grants: usize,
}

impl BudgetSource {
    /// Allow at most `budget` bytes in total.
    pub fn new(budget: usize) -> Self {
        Self {
            budget,
            spent: 0,
            grants: 0,
        }
    }

    /// Bytes handed out so far.
    pub fn spent(&self) -> usize {
        self.spent
    }

    /// Bytes still available.
    pub fn remaining(&self) -> usize {
        self.budget - self.spent
    }

    /// Number of buffers handed out.
    pub fn grants(&self) -> usize {
        self.grants
    }
}

impl MemorySource for BudgetSource {
    fn acquire(&mut self, capacity: usize) -> Option<RawBuffer> {
        if capacity > self.remaining() {
            return None;
        }
        let buf = RawBuffer::zeroed(capacity)?;
        self.spent += capacity;
        self.grants += 1;
        Some(buf)
    }
}

/// A failure hook that counts its invocations.
///
/// Returns the shared counter and a hook suitable for
/// [`Arena::set_failure_hook`](strata_arena::Arena::set_failure_hook).
pub fn counting_hook() -> (Arc<AtomicUsize>, impl FnMut() + Send + 'static) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let hook = move || {
        counter.fetch_add(1, Ordering::SeqCst);
    };
    (calls, hook)
}
