//! Simulator and trace tests.

pub mod simulator;
