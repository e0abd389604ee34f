//! Per-cycle interface signals.
//!
//! This module defines the values exchanged on each clock tick:
//! 1. **CPU side:** An optional request in, a `ready`/`read_data` pair out.
//! 2. **Memory side:** An optional single-word request out, a `ready`/`read_data` pair in.
//! 3. **Latch:** The snapshot of the CPU request held while it is serviced.

use crate::common::AccessType;

/// A CPU load or store presented to the controller.
///
/// Passing `None` instead of a request models `request_present = false`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CpuRequest {
    /// Load or store.
    pub access: AccessType,
    /// Word address.
    pub addr: u64,
    /// Store data; ignored for loads.
    pub data: u64,
}

impl CpuRequest {
    /// A load from `addr`.
    pub const fn read(addr: u64) -> Self {
        Self {
            access: AccessType::Read,
            addr,
            data: 0,
        }
    }

    /// A store of `data` to `addr`.
    pub const fn write(addr: u64, data: u64) -> Self {
        Self {
            access: AccessType::Write,
            addr,
            data,
        }
    }
}

/// Controller output to the CPU for one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CpuResponse {
    /// Pulses on the cycle the latched request completes.
    pub ready: bool,
    /// Load result; meaningful only when `ready` is set for a load.
    pub read_data: u64,
}

impl CpuResponse {
    /// No completion this cycle.
    pub const IDLE: Self = Self {
        ready: false,
        read_data: 0,
    };

    /// Completion carrying `read_data`.
    pub const fn done(read_data: u64) -> Self {
        Self {
            ready: true,
            read_data,
        }
    }
}

/// Single-word transfer driven towards memory.
///
/// Held unchanged by the controller until the responder asserts `ready`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MemRequest {
    /// Read (refill) or write (writeback, write-through).
    pub access: AccessType,
    /// Word address.
    pub addr: u64,
    /// Write data; zero for reads.
    pub data: u64,
}

/// Memory responder output for one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemResponse {
    /// Transfer completed this cycle.
    pub ready: bool,
    /// Read result; meaningful only when `ready` is set for a read.
    pub read_data: u64,
}

impl MemResponse {
    /// Responder still busy (or idle).
    pub const WAIT: Self = Self {
        ready: false,
        read_data: 0,
    };

    /// Completion carrying `read_data`.
    pub const fn ready(read_data: u64) -> Self {
        Self {
            ready: true,
            read_data,
        }
    }
}

/// CPU request captured when leaving `Idle`.
///
/// Address and data are already truncated to the configured widths.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingRequest {
    /// Load or store.
    pub access: AccessType,
    /// Masked word address.
    pub addr: u64,
    /// Masked store data; zero for loads.
    pub data: u64,
}

impl PendingRequest {
    /// Returns `true` for a store.
    #[inline(always)]
    pub const fn is_write(&self) -> bool {
        self.access.is_write()
    }
}

impl Default for PendingRequest {
    fn default() -> Self {
        Self {
            access: AccessType::Read,
            addr: 0,
            data: 0,
        }
    }
}
