//! Trace entries recorded by the engine.
//!
//! The `Display` output of every entry is the externally observable
//! contract of a run and must stay byte-for-byte stable.

use paxos_sim_messages::Message;
use paxos_sim_types::{NodeId, Tick};
use serde::Serialize;
use std::fmt;

/// Whether a node went down or came back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FaultKind {
    Fail,
    Recover,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultKind::Fail => f.write_str("FAILS"),
            FaultKind::Recover => f.write_str("RECOVERS"),
        }
    }
}

/// One node changing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FaultChange {
    pub node: NodeId,
    pub kind: FaultKind,
}

/// What happened at one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TraceEntry {
    /// No event and nothing deliverable.
    Idle { tick: Tick },

    /// Failures then recoveries applied at the start of a tick.
    Faults {
        tick: Tick,
        changes: Vec<FaultChange>,
    },

    /// The single message delivered this tick.
    Delivery { tick: Tick, message: Message },
}

impl TraceEntry {
    pub fn tick(&self) -> Tick {
        match self {
            TraceEntry::Idle { tick }
            | TraceEntry::Faults { tick, .. }
            | TraceEntry::Delivery { tick, .. } => *tick,
        }
    }

    /// The delivered message, if this entry is a delivery.
    pub fn delivered(&self) -> Option<&Message> {
        match self {
            TraceEntry::Delivery { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Renders the entry as trace text. Fault entries span one line per
/// change, with no trailing newline.
impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEntry::Idle { tick } => write!(f, "{tick}: "),
            TraceEntry::Faults { tick, changes } => {
                for (i, change) in changes.iter().enumerate() {
                    if i > 0 {
                        f.write_str("\n")?;
                    }
                    write!(f, "{tick}: ** {} {} **", change.node, change.kind)?;
                }
                Ok(())
            }
            TraceEntry::Delivery { tick, message } => write!(f, "{tick}: {message}"),
        }
    }
}
