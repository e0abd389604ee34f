//! Cache Replacement Policies.
//!
//! Victim selection for the two supported associativities.
//!
//! # Policies
//!
//! - `DirectMapped`: one way, the victim is always way 0.
//! - `TwoWayLru`: one recency bit per set; exact LRU for two ways.

/// Direct-mapped (single way) policy.
pub mod direct;

/// Two-way least-recently-used policy.
pub mod lru;

pub use direct::DirectMapped;
pub use lru::TwoWayLru;

use std::fmt;

use crate::common::ConfigError;

/// Trait for cache replacement policies.
///
/// Defines the interface for updating recency state and selecting victim lines.
pub trait ReplacementPolicy: Send + Sync + fmt::Debug {
    /// Updates the policy state when a way is accessed.
    ///
    /// Called on a confirmed hit and once after a refill commits, so the
    /// freshly filled way is treated as newest.
    ///
    /// # Arguments
    ///
    /// * `set` - The cache set index.
    /// * `way` - The way index within the set that was accessed.
    fn update(&mut self, set: usize, way: usize);

    /// Selects the way to evict from a specific set.
    ///
    /// Selection does not change recency state.
    ///
    /// # Arguments
    ///
    /// * `set` - The cache set index.
    ///
    /// # Returns
    ///
    /// The index of the way to evict.
    fn get_victim(&self, set: usize) -> usize;

    /// Returns every set to its post-reset state.
    fn reset(&mut self);
}

/// Builds the policy matching an associativity.
///
/// # Errors
///
/// Returns [`ConfigError::UnsupportedWays`] for any way count other than 1 or 2.
pub fn for_ways(
    sets: usize,
    ways: usize,
) -> Result<Box<dyn ReplacementPolicy + Send + Sync>, ConfigError> {
    match ways {
        1 => Ok(Box::new(DirectMapped)),
        2 => Ok(Box::new(TwoWayLru::new(sets))),
        n => Err(ConfigError::UnsupportedWays(n)),
    }
}
