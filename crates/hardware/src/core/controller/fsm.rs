//! Controller state machine.
//!
//! The controller is a Moore machine towards memory and a Mealy machine
//! towards the CPU:
//! 1. **Memory request:** [`memory_request`] depends on the state (and storage) only,
//!    so the responder can answer within the same cycle.
//! 2. **Transition:** [`transition`] maps `(state, inputs, storage view)` to the next
//!    state, the CPU response, and a list of storage [`Effect`]s.
//!
//! Neither function mutates anything; the controller applies the effects.
//!
//! ```text
//!   Idle ──req──> Lookup ──hit──> Hit ──────────────────────────> Idle
//!                   │              └─(write-through store)─> WriteThrough ─> Idle
//!                   └─miss─> MissSelect ──dirty victim──> Writeback ─┐
//!                              │  │                                  v
//!                              │  └──────────clean victim────────> Refill ─> Respond ─> Idle
//!                              └─(no-allocate store)─> WriteThrough     (write-through store ─> WriteThrough)
//! ```

use super::signals::{CpuRequest, CpuResponse, MemRequest, MemResponse, PendingRequest};
use crate::common::{AccessType, ProtocolViolation, SimError};
use crate::config::Geometry;
use crate::core::units::cache::SetStorage;
use crate::core::units::cache::policies::ReplacementPolicy;

/// Controller state.
///
/// Transfer states carry the way being filled or drained and the next word slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum State {
    /// Waiting for a CPU request.
    #[default]
    Idle,
    /// Probing the set selected by the latched address.
    Lookup,
    /// Servicing a hit in `way`.
    Hit {
        /// Way that hit.
        way: usize,
    },
    /// Choosing a victim after a miss.
    MissSelect,
    /// Draining a dirty victim, one word per memory `ready`.
    Writeback {
        /// Victim way.
        way: usize,
        /// Slot being written.
        word: usize,
    },
    /// Filling the victim way, one word per memory `ready`.
    Refill {
        /// Victim way.
        way: usize,
        /// Slot being read.
        word: usize,
    },
    /// Completing the latched request against the refilled line.
    Respond {
        /// Refilled way.
        way: usize,
    },
    /// Forwarding the latched store to memory (write-through, or
    /// write-no-allocate miss).
    WriteThrough,
}

impl State {
    /// Short state name, used in logs and error reports.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Lookup => "Lookup",
            Self::Hit { .. } => "Hit",
            Self::MissSelect => "MissSelect",
            Self::Writeback { .. } => "Writeback",
            Self::Refill { .. } => "Refill",
            Self::Respond { .. } => "Respond",
            Self::WriteThrough => "WriteThrough",
        }
    }
}

/// Side effect of a transition on controller-owned state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Capture a new CPU request.
    Latch(PendingRequest),
    /// Store a word into a valid line (dirty under write-back).
    WriteWord {
        /// Target way.
        way: usize,
        /// Target set.
        index: usize,
        /// Target slot.
        offset: usize,
        /// Value stored.
        data: u64,
    },
    /// Open the refill staging buffer for a line.
    BeginRefill {
        /// Victim way.
        way: usize,
        /// Target set.
        index: usize,
    },
    /// Stage one refilled word.
    SupplyRefillWord {
        /// Victim way.
        way: usize,
        /// Target set.
        index: usize,
        /// Slot filled.
        slot: usize,
        /// Word read from memory.
        data: u64,
    },
    /// Publish the staged block as valid and clean.
    CommitRefill {
        /// Victim way.
        way: usize,
        /// Target set.
        index: usize,
        /// Tag of the new block.
        tag: u64,
    },
    /// Clear a dirty bit after writeback.
    MarkClean {
        /// Drained way.
        way: usize,
        /// Target set.
        index: usize,
    },
    /// Record an access for the replacement policy.
    Touch {
        /// Accessed set.
        index: usize,
        /// Accessed way.
        way: usize,
    },
}

/// Result of one transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    /// State for the next cycle.
    pub next: State,
    /// CPU-facing outputs for this cycle.
    pub response: CpuResponse,
    /// Effects to apply, in order.
    pub effects: Vec<Effect>,
}

impl Step {
    fn stay(state: State) -> Self {
        Self::to(state)
    }

    fn to(next: State) -> Self {
        Self {
            next,
            response: CpuResponse::IDLE,
            effects: Vec::new(),
        }
    }

    fn with(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    const fn respond(mut self, read_data: u64) -> Self {
        self.response = CpuResponse::done(read_data);
        self
    }
}

/// Read-only view of everything a transition may consult.
#[derive(Clone, Copy, Debug)]
pub struct View<'a> {
    /// Cache shape and policies.
    pub geometry: &'a Geometry,
    /// Line storage.
    pub storage: &'a SetStorage,
    /// Replacement policy.
    pub policy: &'a dyn ReplacementPolicy,
    /// Latched request; stale while `Idle`.
    pub pending: &'a PendingRequest,
}

/// Memory request driven in `state`.
///
/// Depends only on the state and storage contents, so it stays unchanged
/// across every cycle spent waiting for `ready`.
pub fn memory_request(state: &State, view: &View<'_>) -> Option<MemRequest> {
    let geo = view.geometry;
    let d = geo.decoder().decode(view.pending.addr);
    match *state {
        State::Writeback { way, word } => {
            let tag = view.storage.tag(way, d.index);
            Some(MemRequest {
                access: AccessType::Write,
                addr: geo.block_word_addr(tag, d.index, word),
                data: view.storage.read_word(way, d.index, word),
            })
        }
        State::Refill { word, .. } => Some(MemRequest {
            access: AccessType::Read,
            addr: geo.block_word_addr(d.tag, d.index, word),
            data: 0,
        }),
        State::WriteThrough => Some(MemRequest {
            access: AccessType::Write,
            addr: view.pending.addr,
            data: view.pending.data,
        }),
        State::Idle
        | State::Lookup
        | State::Hit { .. }
        | State::MissSelect
        | State::Respond { .. } => None,
    }
}

/// Computes one cycle of the controller.
///
/// # Arguments
///
/// * `state` - Current state.
/// * `cpu` - CPU request presented this cycle, if any. Only sampled in `Idle`.
/// * `mem` - Memory responder output this cycle.
/// * `view` - Storage, policy, and latched request.
///
/// # Errors
///
/// * [`ProtocolViolation::UnsolicitedReady`] if memory asserts `ready` while
///   no request is outstanding.
/// * [`crate::common::InvariantViolation::MultipleHits`] if the probe finds
///   duplicate tags.
pub fn transition(
    state: &State,
    cpu: Option<&CpuRequest>,
    mem: &MemResponse,
    view: &View<'_>,
) -> Result<Step, SimError> {
    if mem.ready && memory_request(state, view).is_none() {
        return Err(ProtocolViolation::UnsolicitedReady {
            state: state.name(),
        }
        .into());
    }

    let geo = view.geometry;
    let pending = view.pending;
    let d = geo.decoder().decode(pending.addr);
    let last_word = geo.words_per_block - 1;

    let step = match *state {
        State::Idle => match cpu {
            Some(req) => {
                let data = if req.access.is_write() {
                    geo.mask_data(req.data)
                } else {
                    0
                };
                Step::to(State::Lookup).with(Effect::Latch(PendingRequest {
                    access: req.access,
                    addr: geo.decoder().mask(req.addr),
                    data,
                }))
            }
            None => Step::stay(State::Idle),
        },

        State::Lookup => match view.storage.probe(d.index, d.tag)? {
            Some(way) => Step::to(State::Hit { way }),
            None => Step::to(State::MissSelect),
        },

        State::Hit { way } => {
            let touch = Effect::Touch {
                index: d.index,
                way,
            };
            if pending.is_write() {
                let step = Step::to(State::Idle)
                    .with(Effect::WriteWord {
                        way,
                        index: d.index,
                        offset: d.offset,
                        data: pending.data,
                    })
                    .with(touch);
                if geo.write_back {
                    step.respond(0)
                } else {
                    Step {
                        next: State::WriteThrough,
                        ..step
                    }
                }
            } else {
                let data = view.storage.read_word(way, d.index, d.offset);
                Step::to(State::Idle).with(touch).respond(data)
            }
        }

        State::MissSelect => {
            if pending.is_write() && !geo.write_allocate {
                Step::to(State::WriteThrough)
            } else {
                let way = view.policy.get_victim(d.index);
                let dirty =
                    view.storage.is_valid(way, d.index) && view.storage.is_dirty(way, d.index);
                if geo.write_back && dirty {
                    Step::to(State::Writeback { way, word: 0 })
                } else {
                    Step::to(State::Refill { way, word: 0 }).with(Effect::BeginRefill {
                        way,
                        index: d.index,
                    })
                }
            }
        }

        State::Writeback { way, word } => {
            if !mem.ready {
                Step::stay(*state)
            } else if word == last_word {
                Step::to(State::Refill { way, word: 0 })
                    .with(Effect::MarkClean {
                        way,
                        index: d.index,
                    })
                    .with(Effect::BeginRefill {
                        way,
                        index: d.index,
                    })
            } else {
                Step::to(State::Writeback {
                    way,
                    word: word + 1,
                })
            }
        }

        State::Refill { way, word } => {
            if mem.ready {
                let supply = Effect::SupplyRefillWord {
                    way,
                    index: d.index,
                    slot: word,
                    data: geo.mask_data(mem.read_data),
                };
                if word == last_word {
                    Step::to(State::Respond { way })
                        .with(supply)
                        .with(Effect::CommitRefill {
                            way,
                            index: d.index,
                            tag: d.tag,
                        })
                        .with(Effect::Touch {
                            index: d.index,
                            way,
                        })
                } else {
                    Step::to(State::Refill {
                        way,
                        word: word + 1,
                    })
                    .with(supply)
                }
            } else {
                Step::stay(*state)
            }
        }

        State::Respond { way } => {
            if pending.is_write() {
                let step = Step::to(State::Idle).with(Effect::WriteWord {
                    way,
                    index: d.index,
                    offset: d.offset,
                    data: pending.data,
                });
                if geo.write_back {
                    step.respond(0)
                } else {
                    Step {
                        next: State::WriteThrough,
                        ..step
                    }
                }
            } else {
                Step::to(State::Idle).respond(view.storage.read_word(way, d.index, d.offset))
            }
        }

        State::WriteThrough => {
            if mem.ready {
                Step::to(State::Idle).respond(0)
            } else {
                Step::stay(State::WriteThrough)
            }
        }
    };

    Ok(step)
}
