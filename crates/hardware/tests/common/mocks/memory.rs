use cachectl_core::common::AccessType;
use cachectl_core::core::controller::signals::{MemRequest, MemResponse};
use cachectl_core::soc::MemoryPort;
use std::collections::HashMap;

/// Fixed-latency responder that records every completed transfer.
///
/// With `zero_reads` set, reads always return zero regardless of what was
/// written, like a testbench memory that only checks traffic.
#[derive(Debug, Default)]
pub struct ScriptedMemory {
    latency: u64,
    zero_reads: bool,
    countdown: Option<u64>,
    words: HashMap<u64, u64>,
    /// Completed transfers, in order.
    pub log: Vec<MemRequest>,
    /// Cycles with a request present.
    pub busy_cycles: u64,
}

impl ScriptedMemory {
    pub fn new(latency: u64) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    pub fn zero_fill(latency: u64) -> Self {
        Self {
            latency,
            zero_reads: true,
            ..Self::default()
        }
    }

    pub fn preload(&mut self, addr: u64, val: u64) {
        let _ = self.words.insert(addr, val);
    }

    pub fn word(&self, addr: u64) -> u64 {
        self.words.get(&addr).copied().unwrap_or(0)
    }

    /// Completed writes as `(addr, data)` pairs.
    pub fn writes(&self) -> Vec<(u64, u64)> {
        self.log
            .iter()
            .filter(|r| r.access == AccessType::Write)
            .map(|r| (r.addr, r.data))
            .collect()
    }

    /// Completed read addresses.
    pub fn reads(&self) -> Vec<u64> {
        self.log
            .iter()
            .filter(|r| r.access == AccessType::Read)
            .map(|r| r.addr)
            .collect()
    }
}

impl MemoryPort for ScriptedMemory {
    fn cycle(&mut self, request: Option<&MemRequest>) -> MemResponse {
        let Some(req) = request else {
            self.countdown = None;
            return MemResponse::WAIT;
        };
        self.busy_cycles += 1;
        let remaining = self.countdown.get_or_insert(self.latency);
        if *remaining > 0 {
            *remaining -= 1;
            return MemResponse::WAIT;
        }
        self.countdown = None;
        self.log.push(*req);
        match req.access {
            AccessType::Read => {
                let data = if self.zero_reads { 0 } else { self.word(req.addr) };
                MemResponse::ready(data)
            }
            AccessType::Write => {
                let _ = self.words.insert(req.addr, req.data);
                MemResponse::ready(0)
            }
        }
    }
}

/// Responder that asserts `ready` every cycle, requested or not.
#[derive(Debug, Default)]
pub struct AlwaysReady;

impl MemoryPort for AlwaysReady {
    fn cycle(&mut self, _request: Option<&MemRequest>) -> MemResponse {
        MemResponse::ready(0xDEAD)
    }
}
