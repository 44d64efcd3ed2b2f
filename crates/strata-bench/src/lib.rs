//! Workload profiles for benchmarking and examples.
//!
//! - [`mixed_requests`]: deterministic `(alignment, size)` stream mixing
//!   byte strings, words and max-aligned records
//! - [`replay`]: run a request stream against an arena

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use strata_arena::{Arena, MemorySource};

/// Generate `count` requests from a seeded ChaCha8 stream.
///
/// Roughly half are small byte-aligned strings, a quarter word-aligned
/// scalars, and the rest max-aligned records up to 256 bytes.
pub fn mixed_requests(seed: u64, count: usize) -> Vec<(usize, usize)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let roll = rng.next_u32();
            match roll % 4 {
                0 | 1 => (1, 1 + (roll as usize >> 8) % 32),
                2 => (8, 8),
                _ => (16, 16 * (1 + (roll as usize >> 8) % 16)),
            }
        })
        .collect()
}

/// Allocate every request in `requests`, returning the bytes handed out.
pub fn replay<S: MemorySource>(arena: &mut Arena<S>, requests: &[(usize, usize)]) -> usize {
    let mut total = 0;
    for &(alignment, size) in requests {
        arena.alloc_aligned(alignment, size);
        total += size;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_are_deterministic() {
        assert_eq!(mixed_requests(7, 100), mixed_requests(7, 100));
        assert_ne!(mixed_requests(7, 100), mixed_requests(8, 100));
    }

    #[test]
    fn requests_are_valid() {
        for (alignment, size) in mixed_requests(42, 1000) {
            assert!(alignment.is_power_of_two() && alignment <= 16);
            assert!(size > 0);
        }
    }

    #[test]
    fn replay_accounts_every_byte() {
        let requests = mixed_requests(1, 500);
        let mut arena = Arena::with_capacity(1024);
        let total = replay(&mut arena, &requests);
        assert_eq!(arena.size(), total);
    }
}
