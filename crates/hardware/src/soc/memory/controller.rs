//! Memory controller implementations for latency modeling.
//!
//! This module provides:
//! 1. **SimpleController:** Fixed latency per access (no row-buffer modeling).
//! 2. **DramController:** Row-buffer-aware latency (CAS, RAS, precharge) for DRAM-style timing.
//!
//! Latencies are the number of cycles a transfer waits before `ready`.

use crate::config::{MemoryConfig, MemoryController as ControllerType};

/// Trait for memory controller implementations that report access latency in cycles.
pub trait MemoryController: Send + Sync + std::fmt::Debug {
    /// Returns the number of wait cycles for an access to the given word address.
    ///
    /// # Arguments
    ///
    /// * `addr` - Word address being accessed (may be used for row-buffer modeling).
    ///
    /// # Returns
    ///
    /// Latency in simulation cycles.
    fn access_latency(&mut self, addr: u64) -> u64;
}

/// Builds the latency model selected by a memory configuration.
pub fn from_config(config: &MemoryConfig) -> Box<dyn MemoryController> {
    match config.controller {
        ControllerType::Simple => Box::new(SimpleController::new(config.latency)),
        ControllerType::Dram => Box::new(DramController::new(
            config.t_cas,
            config.t_ras,
            config.t_pre,
            config.row_words,
        )),
    }
}

/// Fixed-latency memory controller; every access takes the same number of cycles.
#[derive(Debug, Clone, Copy)]
pub struct SimpleController {
    latency: u64,
}

impl SimpleController {
    /// Creates a simple controller with the given fixed latency in cycles.
    ///
    /// # Arguments
    ///
    /// * `latency` - Cycles per access.
    pub const fn new(latency: u64) -> Self {
        Self { latency }
    }
}

impl MemoryController for SimpleController {
    fn access_latency(&mut self, _addr: u64) -> u64 {
        self.latency
    }
}

/// DRAM-style controller with row buffer; models CAS, RAS, and precharge latencies.
#[derive(Debug, Clone, Copy)]
pub struct DramController {
    last_row: Option<u64>,
    t_cas: u64,
    t_ras: u64,
    t_pre: u64,
    row_mask: u64,
}

impl DramController {
    /// Creates a DRAM controller with the given timing parameters (in cycles).
    ///
    /// # Arguments
    ///
    /// * `t_cas` - Column access strobe latency.
    /// * `t_ras` - Row access strobe latency.
    /// * `t_pre` - Precharge latency.
    /// * `row_words` - Words per row, rounded up to a power of two.
    ///
    /// # Returns
    ///
    /// A new `DramController` with no row currently open.
    pub fn new(t_cas: u64, t_ras: u64, t_pre: u64, row_words: u64) -> Self {
        let row_words = row_words.max(1).checked_next_power_of_two().unwrap_or(1 << 63);
        Self {
            last_row: None,
            t_cas,
            t_ras,
            t_pre,
            row_mask: !(row_words - 1),
        }
    }
}

impl MemoryController for DramController {
    fn access_latency(&mut self, addr: u64) -> u64 {
        let row = addr & self.row_mask;
        match self.last_row {
            Some(open_row) if open_row == row => self.t_cas,
            Some(_) => {
                self.last_row = Some(row);
                self.t_pre + self.t_ras + self.t_cas
            }
            None => {
                self.last_row = Some(row);
                self.t_ras + self.t_cas
            }
        }
    }
}
