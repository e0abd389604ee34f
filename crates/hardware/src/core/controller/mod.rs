//! Cache Controller.
//!
//! The controller sits between a CPU and main memory and advances exactly one
//! state per [`CacheController::tick`]. It owns:
//! 1. **Storage:** Tag, valid, dirty, and data arrays for every line.
//! 2. **Policy:** Replacement state used to pick victims on a miss.
//! 3. **Latch:** The single in-flight CPU request.
//!
//! Waiting for memory is expressed by staying in the same state across
//! ticks; there is no blocking inside a tick and no timeout.

/// State machine (states, effects, pure transition function).
pub mod fsm;

/// CPU and memory interface signals.
pub mod signals;

use tracing::{debug, trace};

use self::fsm::{Effect, State, View};
use self::signals::{CpuRequest, CpuResponse, PendingRequest};
use crate::common::{AccessType, ConfigError, InvariantViolation, SimError};
use crate::config::{CacheConfig, Geometry};
use crate::core::units::cache::policies::{self, ReplacementPolicy};
use crate::core::units::cache::{LineView, SetStorage};
use crate::soc::MemoryPort;
use crate::stats::CacheStats;

/// Cycle-stepped cache controller.
#[derive(Debug)]
pub struct CacheController {
    geometry: Geometry,
    storage: SetStorage,
    policy: Box<dyn ReplacementPolicy + Send + Sync>,
    state: State,
    pending: PendingRequest,
    stats: CacheStats,
}

impl CacheController {
    /// Builds a controller with every line invalid and the FSM in `Idle`.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] reported by [`CacheConfig::validate`].
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        let geometry = config.validate()?;
        let policy = policies::for_ways(geometry.lines, geometry.ways)?;
        debug!(
            lines = geometry.lines,
            ways = geometry.ways,
            words_per_block = geometry.words_per_block,
            write_back = geometry.write_back,
            write_allocate = geometry.write_allocate,
            "cache controller configured"
        );
        Ok(Self {
            storage: SetStorage::new(&geometry),
            geometry,
            policy,
            state: State::Idle,
            pending: PendingRequest::default(),
            stats: CacheStats::default(),
        })
    }

    /// Advances one clock cycle.
    ///
    /// The memory port is clocked exactly once per tick, with the request
    /// the current state drives (or `None`).
    ///
    /// # Arguments
    ///
    /// * `cpu` - Request presented this cycle; only sampled in `Idle`.
    /// * `mem` - Memory responder.
    ///
    /// # Returns
    ///
    /// The CPU-facing outputs for this cycle.
    ///
    /// # Errors
    ///
    /// A [`SimError`] on a protocol or invariant violation. The simulation
    /// should be abandoned; the controller is left in an unspecified state
    /// until [`reset`](Self::reset).
    pub fn tick<M: MemoryPort + ?Sized>(
        &mut self,
        cpu: Option<CpuRequest>,
        mem: &mut M,
    ) -> Result<CpuResponse, SimError> {
        let view = View {
            geometry: &self.geometry,
            storage: &self.storage,
            policy: &*self.policy,
            pending: &self.pending,
        };
        let request = fsm::memory_request(&self.state, &view);
        let mem_resp = mem.cycle(request.as_ref());
        let step = fsm::transition(&self.state, cpu.as_ref(), &mem_resp, &view)?;

        self.stats.cycles += 1;
        if let Some(req) = request {
            if mem_resp.ready {
                match req.access {
                    AccessType::Read => self.stats.mem_words_read += 1,
                    AccessType::Write => self.stats.mem_words_written += 1,
                }
            } else {
                self.stats.mem_stall_cycles += 1;
            }
        }

        for effect in &step.effects {
            self.apply(effect)?;
        }
        self.record(step.next);

        if step.next != self.state {
            trace!(from = self.state.name(), to = step.next.name(), "transition");
        }
        self.state = step.next;
        Ok(step.response)
    }

    /// Applies one transition effect to owned state.
    fn apply(&mut self, effect: &Effect) -> Result<(), InvariantViolation> {
        match *effect {
            Effect::Latch(req) => self.pending = req,
            Effect::WriteWord {
                way,
                index,
                offset,
                data,
            } => self.storage.write_word(way, index, offset, data),
            Effect::BeginRefill { way, index } => self.storage.begin_refill(way, index),
            Effect::SupplyRefillWord {
                way,
                index,
                slot,
                data,
            } => self.storage.supply_refill_word(way, index, slot, data)?,
            Effect::CommitRefill { way, index, tag } => {
                self.storage.commit_refill(way, index, tag)?;
                debug!(way, index, tag, "refill committed");
            }
            Effect::MarkClean { way, index } => {
                self.storage.mark_clean(way, index);
                debug!(way, index, "writeback complete");
            }
            Effect::Touch { index, way } => self.policy.update(index, way),
        }
        Ok(())
    }

    /// Updates per-transition counters.
    fn record(&mut self, next: State) {
        match (self.state, next) {
            (State::Idle, State::Lookup) => {
                self.stats.requests += 1;
                if self.pending.is_write() {
                    self.stats.writes += 1;
                } else {
                    self.stats.reads += 1;
                }
            }
            (State::Lookup, State::Hit { way }) => {
                self.stats.hits += 1;
                debug!(addr = self.pending.addr, way, "hit");
            }
            (State::Lookup, State::MissSelect) => {
                self.stats.misses += 1;
                debug!(addr = self.pending.addr, "miss");
            }
            (State::Writeback { .. }, State::Refill { .. }) => self.stats.writebacks += 1,
            (State::Refill { .. }, State::Respond { .. }) => self.stats.refills += 1,
            (State::WriteThrough, State::Idle) => self.stats.write_throughs += 1,
            _ => {}
        }
    }

    /// Returns to `Idle`, invalidating every line and clearing replacement
    /// state and statistics. Any in-progress transaction is abandoned.
    pub fn reset(&mut self) {
        debug!(state = self.state.name(), "reset");
        self.storage.invalidate_all();
        self.policy.reset();
        self.state = State::Idle;
        self.pending = PendingRequest::default();
        self.stats = CacheStats::default();
    }

    /// Current FSM state.
    pub const fn state(&self) -> State {
        self.state
    }

    /// The in-flight request, or `None` while idle.
    pub fn pending(&self) -> Option<&PendingRequest> {
        (self.state != State::Idle).then_some(&self.pending)
    }

    /// Accumulated statistics.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Validated geometry.
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Snapshot of line `(way, index)`.
    ///
    /// # Panics
    ///
    /// Panics if `way` or `index` is out of range.
    pub fn line(&self, way: usize, index: usize) -> LineView {
        self.storage.line(way, index)
    }

    /// Way the replacement policy would evict from set `index` now.
    pub fn victim(&self, index: usize) -> usize {
        self.policy.get_victim(index)
    }
}
