//! Cache controller simulator library.
//!
//! This crate implements a cycle-accurate functional model of a configurable
//! cache controller sitting between a processor and main memory:
//! 1. **Core:** The controller state machine, line storage, and replacement policies.
//! 2. **Memory:** The request/ready memory port and a reference main memory with latency models.
//! 3. **Simulation:** Configuration, statistics, and a trace-driven simulator.
//!
//! The controller serves exactly one request at a time and advances one
//! state per [`CacheController::tick`].

/// Common types (address decoding, access types, errors).
pub mod common;
/// Simulator configuration (defaults, validation, derived geometry).
pub mod config;
/// Cache controller and its units (storage, replacement policy).
pub mod core;
/// Trace-driven simulator.
pub mod sim;
/// Memory side (memory port contract, main memory, latency models).
pub mod soc;
/// Controller statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// The cache controller.
pub use crate::core::CacheController;
/// Top-level simulator pairing a controller with main memory.
pub use crate::sim::Simulator;
