//! Common types shared by every component of the cache simulator.
//!
//! This module provides the following:
//! 1. **Address Decoding:** Tag/index/offset split of word addresses.
//! 2. **Access Types:** Read/write classification of transfers.
//! 3. **Error Handling:** Configuration, protocol, and invariant errors.

/// Address decoding (tag, index, offset).
pub mod addr;

/// Memory access type definitions.
pub mod data;

/// Error types.
pub mod error;

pub use addr::{AddressDecoder, DecodedAddr, low_mask};
pub use data::AccessType;
pub use error::{ConfigError, InvariantViolation, ProtocolViolation, SimError};
