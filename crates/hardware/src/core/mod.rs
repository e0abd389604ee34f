//! Cache controller core.
//!
//! This module contains the controller state machine and the storage and
//! replacement units it orchestrates.

/// Controller state machine, signals, and tick loop.
pub mod controller;

/// Controller units (line storage, replacement policies).
pub mod units;

pub use self::controller::CacheController;
