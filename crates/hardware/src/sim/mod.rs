//! Trace-driven simulation.
//!
//! Provides the top-level simulator pairing a cache controller with main
//! memory, and the JSON trace format used to drive it.

/// Simulator owning the controller and memory.
pub mod simulator;

/// Trace file loading and execution.
pub mod trace;

pub use simulator::{AccessOutcome, Simulator};
pub use trace::{Trace, TraceError, TraceOp, TraceReport};
