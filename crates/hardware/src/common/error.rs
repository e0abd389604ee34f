//! Error definitions for the cache simulator.
//!
//! Errors fall into three classes:
//! 1. **Configuration:** Invalid parameters, rejected when the controller is built.
//! 2. **Protocol:** The memory responder broke the request/ready handshake.
//! 3. **Invariant:** Tag or refill storage reached a state the controller never produces.
//!
//! Protocol and invariant errors are unrecoverable; the simulation stops at the first one.

use thiserror::Error;

/// Invalid cache parameters, detected at construction.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Way count outside the supported set.
    #[error("unsupported way count {0}: only 1 (direct-mapped) or 2 ways are supported")]
    UnsupportedWays(usize),

    /// A sizing parameter is zero or not a power of two.
    #[error("{field} must be a non-zero power of two, got {value}")]
    NotPowerOfTwo {
        /// Name of the offending parameter.
        field: &'static str,
        /// The rejected value.
        value: usize,
    },

    /// Address width outside `1..=64`.
    #[error("address width {0} is out of range (1..=64)")]
    AddrWidth(u32),

    /// Data width outside `1..=64`.
    #[error("data width {0} is out of range (1..=64)")]
    DataWidth(u32),

    /// Index and offset fields do not fit in the address.
    #[error(
        "index ({index_bits} bits) and offset ({offset_bits} bits) exceed the {addr_width}-bit address"
    )]
    FieldsExceedAddress {
        /// Configured address width.
        addr_width: u32,
        /// Derived index width.
        index_bits: u32,
        /// Derived offset width.
        offset_bits: u32,
    },

    /// Total storage (`lines * ways * words_per_block` words) exceeds the
    /// simulator's limit.
    #[error(
        "{lines} lines x {ways} ways x {words_per_block} words exceeds the {limit}-word storage limit"
    )]
    StorageTooLarge {
        /// Configured lines per way.
        lines: usize,
        /// Configured associativity.
        ways: usize,
        /// Configured block size.
        words_per_block: usize,
        /// Largest accepted word count.
        limit: usize,
    },
}

/// Memory responder broke the handshake.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ProtocolViolation {
    /// `ready` was asserted while the controller had no request outstanding.
    ///
    /// This also covers a responder acknowledging more words than a block
    /// transfer contains: the extra pulse arrives after the controller has
    /// left the transfer state.
    #[error("memory asserted ready with no outstanding request (controller state {state})")]
    UnsolicitedReady {
        /// Controller state in which the pulse was observed.
        state: &'static str,
    },
}

/// Storage reached a state the controller never produces.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// More than one valid way holds the same tag.
    #[error("set {index} holds tag {tag:#x} in more than one way")]
    MultipleHits {
        /// Set index.
        index: usize,
        /// Duplicated tag.
        tag: u64,
    },

    /// A refill word arrived for a line that is not being refilled.
    #[error("refill word for way {way} set {index} with no refill in progress")]
    NoRefillInProgress {
        /// Way addressed.
        way: usize,
        /// Set index addressed.
        index: usize,
    },

    /// Refill words must arrive in increasing slot order.
    #[error("refill slot {got} supplied, expected slot {expected}")]
    RefillOutOfOrder {
        /// Next slot the refill buffer expects.
        expected: usize,
        /// Slot actually supplied.
        got: usize,
    },

    /// Commit requested before every slot of the block was supplied.
    #[error("refill committed after {filled} of {words} words")]
    IncompleteRefill {
        /// Words received.
        filled: usize,
        /// Words per block.
        words: usize,
    },
}

/// Any error the simulator can report.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SimError {
    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Memory handshake violation.
    #[error("protocol violation: {0}")]
    Protocol(#[from] ProtocolViolation),

    /// Storage corruption.
    #[error("invariant violation: {0}")]
    Invariant(#[from] InvariantViolation),
}
