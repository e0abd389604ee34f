//! Memory port trait.
//!
//! This module defines the contract between the cache controller and the
//! memory behind it. It provides:
//! 1. **Handshake:** One call per clock cycle carrying the request the controller drives.
//! 2. **Completion:** A `ready` pulse per transferred word, with read data for loads.
//!
//! The controller holds a request unchanged until `ready` is observed. A
//! responder may take any finite number of cycles; there is no cancellation
//! other than the controller dropping the request after a reset.

use crate::core::controller::signals::{MemRequest, MemResponse};

/// Single-word request/ready memory protocol.
pub trait MemoryPort {
    /// Clocks the responder for one cycle.
    ///
    /// # Arguments
    ///
    /// * `request` - Transfer the controller drives this cycle, or `None`.
    ///
    /// # Returns
    ///
    /// `ready` set on the cycle the transfer completes; `read_data` valid
    /// for completed reads. Asserting `ready` with `request == None` is a
    /// protocol violation the controller reports.
    fn cycle(&mut self, request: Option<&MemRequest>) -> MemResponse;
}

impl<T: MemoryPort + ?Sized> MemoryPort for &mut T {
    fn cycle(&mut self, request: Option<&MemRequest>) -> MemResponse {
        (**self).cycle(request)
    }
}
