//! Message payloads.

use paxos_sim_types::{AcceptedPair, Round, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The six Paxos message kinds.
///
/// Each kind carries only the fields it renders and that its handler reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    // ═══════════════════════════════════════════════════════════════════════
    // Proposer → Acceptor
    // ═══════════════════════════════════════════════════════════════════════
    /// Phase 1a: ask acceptors to promise `round`.
    Prepare { round: Round },

    /// Phase 2a: ask acceptors to accept `value` under `round`.
    Accept { round: Round, value: Value },

    // ═══════════════════════════════════════════════════════════════════════
    // Acceptor → Proposer
    // ═══════════════════════════════════════════════════════════════════════
    /// Phase 1b: promise for `round`, echoing the acceptor's accepted pair.
    Promise {
        round: Round,
        prior: Option<AcceptedPair>,
    },

    /// Phase 2b: `value` was accepted under `round`.
    Accepted { round: Round, value: Value },

    /// An ACCEPT for `round` arrived after a higher PREPARE.
    Rejected { round: Round },

    // ═══════════════════════════════════════════════════════════════════════
    // Script → Proposer
    // ═══════════════════════════════════════════════════════════════════════
    /// Start a new round with `value` as the intended value.
    Propose { round: Round, value: Value },
}

impl Payload {
    /// Get a human-readable name for this message type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Payload::Prepare { .. } => "PREPARE",
            Payload::Accept { .. } => "ACCEPT",
            Payload::Promise { .. } => "PROMISE",
            Payload::Accepted { .. } => "ACCEPTED",
            Payload::Rejected { .. } => "REJECTED",
            Payload::Propose { .. } => "PROPOSE",
        }
    }

    /// The round this payload belongs to.
    pub fn round(&self) -> Round {
        match *self {
            Payload::Prepare { round }
            | Payload::Accept { round, .. }
            | Payload::Promise { round, .. }
            | Payload::Accepted { round, .. }
            | Payload::Rejected { round }
            | Payload::Propose { round, .. } => round,
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Prepare { round } => write!(f, "PREPARE n={round}"),
            Payload::Propose { value, .. } => write!(f, "PROPOSE v={value}"),
            Payload::Promise { round, prior } => {
                write!(f, "PROMISE n={round}")?;
                match prior {
                    Some(pair) => write!(f, " (Prior: n={}, v={})", pair.round, pair.value),
                    None => write!(f, " (Prior: None)"),
                }
            }
            Payload::Accept { round, value } => write!(f, "ACCEPT n={round} v={value}"),
            Payload::Accepted { round, value } => write!(f, "ACCEPTED n={round} v={value}"),
            Payload::Rejected { round } => write!(f, "REJECTED n={round}"),
        }
    }
}
