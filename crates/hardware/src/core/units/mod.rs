//! Controller units.
//!
//! The storage and victim-selection components driven by the controller.

/// Line storage and replacement policies.
pub mod cache;
