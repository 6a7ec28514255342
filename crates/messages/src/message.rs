//! Addressed protocol messages.

use crate::Payload;
use paxos_sim_types::{AcceptedPair, AcceptorId, NodeId, ProposerId, Round, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A message in flight between two nodes.
///
/// Immutable once built: the constructors below are the only way the
/// protocol creates messages, and each one fixes the direction its kind
/// travels in. `from` is `None` only for scripted PROPOSE messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    from: Option<NodeId>,
    to: NodeId,
    payload: Payload,
}

impl Message {
    /// Scripted proposal delivered to `to`. Has no source.
    pub fn propose(to: ProposerId, round: Round, value: Value) -> Self {
        Self {
            from: None,
            to: to.into(),
            payload: Payload::Propose { round, value },
        }
    }

    pub fn prepare(from: ProposerId, to: AcceptorId, round: Round) -> Self {
        Self::between(from, to, Payload::Prepare { round })
    }

    pub fn accept(from: ProposerId, to: AcceptorId, round: Round, value: Value) -> Self {
        Self::between(from, to, Payload::Accept { round, value })
    }

    pub fn promise(
        from: AcceptorId,
        to: ProposerId,
        round: Round,
        prior: Option<AcceptedPair>,
    ) -> Self {
        Self::between(from, to, Payload::Promise { round, prior })
    }

    pub fn accepted(from: AcceptorId, to: ProposerId, round: Round, value: Value) -> Self {
        Self::between(from, to, Payload::Accepted { round, value })
    }

    pub fn rejected(from: AcceptorId, to: ProposerId, round: Round) -> Self {
        Self::between(from, to, Payload::Rejected { round })
    }

    fn between(from: impl Into<NodeId>, to: impl Into<NodeId>, payload: Payload) -> Self {
        Self {
            from: Some(from.into()),
            to: to.into(),
            payload,
        }
    }

    /// Sending node, absent for scripted proposals.
    pub fn source(&self) -> Option<NodeId> {
        self.from
    }

    /// Receiving node.
    pub fn destination(&self) -> NodeId {
        self.to
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }
}

/// Renders `<SRC> -> <DST>  <PAYLOAD>`, with two spaces standing in for
/// an absent source.
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.from {
            Some(from) => write!(f, "{from}")?,
            None => f.write_str("  ")?,
        }
        write!(f, " -> {}  {}", self.to, self.payload)
    }
}
