//! Reference Main Memory.
//!
//! This module implements the memory behind the cache controller. It provides:
//! 1. **Buffer:** Sparse word storage (`WordBuffer`) where unwritten words read as zero.
//! 2. **Memory:** A [`MemoryPort`] responder serving one outstanding single-word transfer.
//! 3. **Controller:** Latency modeling (simple or DRAM row-buffer) for timing simulation.

/// Sparse word buffer for memory contents.
pub mod buffer;

/// Memory controller implementations for access latency modeling.
pub mod controller;

use tracing::{trace, warn};

use self::buffer::WordBuffer;
use self::controller::{MemoryController, SimpleController};
use crate::common::AccessType;
use crate::config::MemoryConfig;
use crate::core::controller::signals::{MemRequest, MemResponse};
use crate::soc::traits::MemoryPort;

/// Transfer accepted but not yet acknowledged.
#[derive(Clone, Copy, Debug)]
struct Outstanding {
    request: MemRequest,
    remaining: u64,
}

/// Word-addressed main memory with a pluggable latency model.
#[derive(Debug)]
pub struct MainMemory {
    buffer: WordBuffer,
    controller: Box<dyn MemoryController>,
    pending: Option<Outstanding>,
}

impl MainMemory {
    /// Creates an all-zero memory using `controller` for timing.
    pub fn new(controller: Box<dyn MemoryController>) -> Self {
        Self {
            buffer: WordBuffer::new(),
            controller,
            pending: None,
        }
    }

    /// Creates an all-zero memory with a fixed latency.
    pub fn with_latency(latency: u64) -> Self {
        Self::new(Box::new(SimpleController::new(latency)))
    }

    /// Creates an all-zero memory from configuration.
    pub fn from_config(config: &MemoryConfig) -> Self {
        Self::new(controller::from_config(config))
    }

    /// Reads a word directly, bypassing timing.
    pub fn peek(&self, addr: u64) -> u64 {
        self.buffer.read(addr)
    }

    /// Writes a word directly, bypassing timing.
    pub fn poke(&mut self, addr: u64, val: u64) {
        self.buffer.write(addr, val);
    }

    /// Returns `true` while a transfer is waiting out its latency.
    pub const fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Drops any outstanding transfer and zeroes the contents.
    pub fn clear(&mut self) {
        self.pending = None;
        self.buffer.clear();
    }
}

impl MemoryPort for MainMemory {
    fn cycle(&mut self, request: Option<&MemRequest>) -> MemResponse {
        let Some(req) = request else {
            if let Some(out) = self.pending.take() {
                trace!(addr = out.request.addr, "transfer abandoned");
            }
            return MemResponse::WAIT;
        };

        let controller = &mut self.controller;
        let out = self.pending.get_or_insert_with(|| Outstanding {
            request: *req,
            remaining: controller.access_latency(req.addr),
        });
        if out.request != *req {
            warn!(
                held = out.request.addr,
                new = req.addr,
                "request changed before ready; restarting transfer"
            );
            *out = Outstanding {
                request: *req,
                remaining: controller.access_latency(req.addr),
            };
        }
        if out.remaining > 0 {
            out.remaining -= 1;
            return MemResponse::WAIT;
        }

        self.pending = None;
        match req.access {
            AccessType::Read => MemResponse::ready(self.buffer.read(req.addr)),
            AccessType::Write => {
                self.buffer.write(req.addr, req.data);
                MemResponse::ready(0)
            }
        }
    }
}
