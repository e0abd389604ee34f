//! Direct-mapped replacement.
//!
//! With a single way there is no choice to make: every miss evicts way 0,
//! and accesses carry no recency state.

use super::ReplacementPolicy;

/// Stateless policy for single-way caches.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectMapped;

impl ReplacementPolicy for DirectMapped {
    fn update(&mut self, _set: usize, way: usize) {
        debug_assert_eq!(way, 0, "direct-mapped cache has a single way");
    }

    fn get_victim(&self, _set: usize) -> usize {
        0
    }

    fn reset(&mut self) {}
}
