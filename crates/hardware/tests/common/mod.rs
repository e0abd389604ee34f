//! Shared test infrastructure.

pub mod harness;
pub mod mocks;
