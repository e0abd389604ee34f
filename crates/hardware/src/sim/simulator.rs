//! Simulator: owns the cache controller and the memory behind it.
//!
//! The simulator plays the CPU side of the handshake: it presents a request
//! for one cycle, then clocks the controller until `ready` pulses.

use tracing::debug;

use crate::common::{ConfigError, SimError};
use crate::config::Config;
use crate::core::controller::CacheController;
use crate::core::controller::fsm::State;
use crate::core::controller::signals::{CpuRequest, CpuResponse};
use crate::soc::MainMemory;

/// Result of one completed CPU access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessOutcome {
    /// Load data; zero for stores.
    pub data: u64,
    /// Cycles from presenting the request to `ready`, inclusive.
    pub cycles: u64,
}

/// Top-level simulator: cache controller plus main memory.
#[derive(Debug)]
pub struct Simulator {
    /// Cache controller.
    pub controller: CacheController,
    /// Main memory.
    pub memory: MainMemory,
}

impl Simulator {
    /// Creates a simulator with a cold cache and zeroed memory.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] for the cache parameters.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            controller: CacheController::new(&config.cache)?,
            memory: MainMemory::from_config(&config.memory),
        })
    }

    /// Advances the simulator by one clock cycle.
    ///
    /// # Errors
    ///
    /// Any [`SimError`] raised by the controller.
    pub fn tick(&mut self, cpu: Option<CpuRequest>) -> Result<CpuResponse, SimError> {
        self.controller.tick(cpu, &mut self.memory)
    }

    /// Runs one request to completion.
    ///
    /// A request still in flight from manual [`tick`](Self::tick) calls is
    /// finished first and not counted.
    ///
    /// # Errors
    ///
    /// Any [`SimError`] raised by the controller.
    pub fn access(&mut self, req: CpuRequest) -> Result<AccessOutcome, SimError> {
        while self.controller.state() != State::Idle {
            let _ = self.tick(None)?;
        }

        let mut present = Some(req);
        let mut cycles = 0;
        loop {
            let resp = self.tick(present.take())?;
            cycles += 1;
            if resp.ready {
                debug!(addr = req.addr, data = resp.read_data, cycles, "access complete");
                return Ok(AccessOutcome {
                    data: resp.read_data,
                    cycles,
                });
            }
        }
    }

    /// Loads the word at `addr`.
    ///
    /// # Errors
    ///
    /// Any [`SimError`] raised by the controller.
    pub fn read(&mut self, addr: u64) -> Result<u64, SimError> {
        Ok(self.access(CpuRequest::read(addr))?.data)
    }

    /// Stores `data` at `addr`.
    ///
    /// # Errors
    ///
    /// Any [`SimError`] raised by the controller.
    pub fn write(&mut self, addr: u64, data: u64) -> Result<(), SimError> {
        let _ = self.access(CpuRequest::write(addr, data))?;
        Ok(())
    }

    /// Clocks `cycles` cycles with no request present.
    ///
    /// # Errors
    ///
    /// Any [`SimError`] raised by the controller.
    pub fn idle(&mut self, cycles: u64) -> Result<(), SimError> {
        for _ in 0..cycles {
            let _ = self.tick(None)?;
        }
        Ok(())
    }

    /// Resets the controller. Memory contents are kept.
    pub fn reset(&mut self) {
        self.controller.reset();
    }
}
