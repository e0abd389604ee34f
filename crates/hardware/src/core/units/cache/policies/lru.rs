//! Two-Way Least Recently Used (LRU) Replacement Policy.
//!
//! Each set keeps a single sticky bit naming its older way. An access to one
//! way points the bit at the other, so for two ways the bit is exactly the
//! least-recently-used way.
//!
//! # Performance
//!
//! - **Time Complexity:** `update()` and `get_victim()` are O(1)
//! - **Space Complexity:** one bit per set
//! - **Hardware Cost:** Minimal - a single flip-flop per set

use super::ReplacementPolicy;

/// Two-way LRU state.
#[derive(Debug, Clone)]
pub struct TwoWayLru {
    /// Older way per set; starts at way 0 after reset.
    older_way: Vec<u8>,
}

impl TwoWayLru {
    /// Creates a policy for `sets` sets, all pointing at way 0.
    pub fn new(sets: usize) -> Self {
        Self {
            older_way: vec![0; sets],
        }
    }

    /// Returns the way currently marked older in `set`.
    pub fn older_way(&self, set: usize) -> usize {
        self.older_way[set] as usize
    }
}

impl ReplacementPolicy for TwoWayLru {
    /// Marks `way` as newest by pointing the set's bit at the other way.
    fn update(&mut self, set: usize, way: usize) {
        debug_assert!(way < 2, "way {way} out of range for a two-way cache");
        self.older_way[set] = u8::from(way == 0);
    }

    fn get_victim(&self, set: usize) -> usize {
        self.older_way(set)
    }

    fn reset(&mut self) {
        self.older_way.fill(0);
    }
}
