//! Memory-side components.
//!
//! This module organizes what sits behind the cache controller: the memory
//! port contract and the reference main memory with its latency models.

/// Main memory model and latency controllers.
pub mod memory;

/// Memory port trait definition.
pub mod traits;

pub use memory::MainMemory;
pub use traits::MemoryPort;
