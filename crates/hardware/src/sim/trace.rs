//! Trace Loading and Execution.
//!
//! A trace is a JSON document listing CPU operations, optionally with the
//! configuration to run them under:
//!
//! ```json
//! {
//!   "config": { "cache": { "addr_width": 8, "lines": 4, "words_per_block": 2 } },
//!   "ops": [
//!     { "op": "write", "addr": 0, "data": 170 },
//!     { "op": "read", "addr": 0, "expect": 170 },
//!     { "op": "idle", "cycles": 4 },
//!     { "op": "reset" }
//!   ]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use super::Simulator;
use crate::common::{ConfigError, SimError};
use crate::config::Config;
use crate::core::controller::signals::CpuRequest;

/// One trace operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum TraceOp {
    /// Load, optionally checked against an expected value.
    Read {
        /// Word address.
        addr: u64,
        /// Value the load must return.
        #[serde(default)]
        expect: Option<u64>,
    },
    /// Store.
    Write {
        /// Word address.
        addr: u64,
        /// Value stored.
        data: u64,
    },
    /// Cycles with no request present.
    Idle {
        /// Number of cycles.
        cycles: u64,
    },
    /// Controller reset.
    Reset,
}

/// A parsed trace file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Trace {
    /// Configuration embedded in the trace, if any.
    #[serde(default)]
    pub config: Option<Config>,
    /// Operations, executed in order.
    pub ops: Vec<TraceOp>,
}

/// Errors loading or running a trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid trace JSON.
    #[error("malformed trace: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The simulation aborted.
    #[error(transparent)]
    Sim(#[from] SimError),
}

impl Trace {
    /// Parses a trace from a JSON string.
    ///
    /// # Errors
    ///
    /// [`TraceError::Json`] on malformed input.
    pub fn from_json(text: &str) -> Result<Self, TraceError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and parses a trace file.
    ///
    /// # Errors
    ///
    /// [`TraceError::Io`] if the file cannot be read, [`TraceError::Json`] on
    /// malformed input.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| TraceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}

/// A completed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadRecord {
    /// Position of the op in the trace.
    pub op_index: usize,
    /// Word address.
    pub addr: u64,
    /// Value returned.
    pub data: u64,
    /// Cycles the load took.
    pub cycles: u64,
}

/// A load whose value differed from its `expect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    /// Position of the op in the trace.
    pub op_index: usize,
    /// Word address.
    pub addr: u64,
    /// Expected value, truncated to the data width.
    pub expected: u64,
    /// Value returned.
    pub actual: u64,
}

/// Outcome of running a trace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceReport {
    /// Every load in trace order.
    pub reads: Vec<ReadRecord>,
    /// Loads that failed their check.
    pub mismatches: Vec<Mismatch>,
    /// Cycles spent on the whole trace.
    pub cycles: u64,
}

impl TraceReport {
    /// Returns `true` when every checked load matched.
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }
}

impl Simulator {
    /// Executes `ops` in order.
    ///
    /// The report's cycle count covers the whole trace, including ops
    /// before a `reset`.
    ///
    /// # Errors
    ///
    /// The first [`SimError`] raised; the remaining ops are not run.
    pub fn run_trace(&mut self, ops: &[TraceOp]) -> Result<TraceReport, SimError> {
        let mut report = TraceReport::default();
        for (op_index, op) in ops.iter().enumerate() {
            match *op {
                TraceOp::Read { addr, expect } => {
                    let outcome = self.access(CpuRequest::read(addr))?;
                    report.cycles += outcome.cycles;
                    report.reads.push(ReadRecord {
                        op_index,
                        addr,
                        data: outcome.data,
                        cycles: outcome.cycles,
                    });
                    if let Some(expected) = expect {
                        let expected = self.controller.geometry().mask_data(expected);
                        if expected != outcome.data {
                            warn!(op_index, addr, expected, actual = outcome.data, "read mismatch");
                            report.mismatches.push(Mismatch {
                                op_index,
                                addr,
                                expected,
                                actual: outcome.data,
                            });
                        }
                    }
                }
                TraceOp::Write { addr, data } => {
                    let outcome = self.access(CpuRequest::write(addr, data))?;
                    report.cycles += outcome.cycles;
                }
                TraceOp::Idle { cycles } => {
                    self.idle(cycles)?;
                    report.cycles += cycles;
                }
                TraceOp::Reset => self.reset(),
            }
        }
        info!(
            ops = ops.len(),
            cycles = report.cycles,
            mismatches = report.mismatches.len(),
            "trace complete"
        );
        Ok(report)
    }
}

/// Loads a trace file and runs it.
///
/// `config_override` wins over the trace's embedded configuration; with
/// neither, the default configuration is used.
///
/// # Errors
///
/// Any [`TraceError`].
pub fn run_file(
    path: impl AsRef<Path>,
    config_override: Option<&Config>,
) -> Result<(Simulator, TraceReport), TraceError> {
    let trace = Trace::load(path)?;
    let config = config_override
        .or(trace.config.as_ref())
        .cloned()
        .unwrap_or_default();
    let mut sim = Simulator::new(&config)?;
    let report = sim.run_trace(&trace.ops)?;
    Ok((sim, report))
}
