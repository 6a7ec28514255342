//! Domain-specific identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Proposer identifier (1-based, as written in scripts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProposerId(pub u32);

impl ProposerId {
    /// All proposer ids for a cluster of `count` proposers, in configured order.
    pub fn all(count: u32) -> impl Iterator<Item = ProposerId> {
        (1..=count).map(ProposerId)
    }

    /// Zero-based slot in an arena of proposers.
    pub fn index(self) -> usize {
        (self.0 as usize).wrapping_sub(1)
    }
}

impl fmt::Display for ProposerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Acceptor identifier (1-based, as written in scripts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AcceptorId(pub u32);

impl AcceptorId {
    /// All acceptor ids for a cluster of `count` acceptors, in configured order.
    pub fn all(count: u32) -> impl Iterator<Item = AcceptorId> {
        (1..=count).map(AcceptorId)
    }

    /// Zero-based slot in an arena of acceptors.
    pub fn index(self) -> usize {
        (self.0 as usize).wrapping_sub(1)
    }
}

impl fmt::Display for AcceptorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A{}", self.0)
    }
}

/// Any node in the simulated cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeId {
    Proposer(ProposerId),
    Acceptor(AcceptorId),
}

impl NodeId {
    /// The proposer id, if this node is a proposer.
    pub fn as_proposer(self) -> Option<ProposerId> {
        match self {
            NodeId::Proposer(id) => Some(id),
            NodeId::Acceptor(_) => None,
        }
    }

    /// The acceptor id, if this node is an acceptor.
    pub fn as_acceptor(self) -> Option<AcceptorId> {
        match self {
            NodeId::Acceptor(id) => Some(id),
            NodeId::Proposer(_) => None,
        }
    }
}

impl From<ProposerId> for NodeId {
    fn from(id: ProposerId) -> Self {
        NodeId::Proposer(id)
    }
}

impl From<AcceptorId> for NodeId {
    fn from(id: AcceptorId) -> Self {
        NodeId::Acceptor(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Proposer(id) => fmt::Display::fmt(id, f),
            NodeId::Acceptor(id) => fmt::Display::fmt(id, f),
        }
    }
}

/// A proposed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Value(pub i64);

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Discrete simulation time.
///
/// Renders zero-padded to three digits, the way trace lines are keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tick(pub u64);

impl Tick {
    /// The first tick of every run.
    pub const ZERO: Self = Tick(0);

    /// Get the next tick.
    pub fn next(self) -> Self {
        Tick(self.0 + 1)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}
