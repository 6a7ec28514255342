//! Configuration types for a simulation run.

use paxos_sim_types::{AcceptorId, NodeId, ProposerId, Tick};
use serde::{Deserialize, Serialize};

/// Cluster shape and tick budget for a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of proposers, addressed `P1..=Pn`.
    pub proposers: u32,

    /// Number of acceptors, addressed `A1..=An`.
    pub acceptors: u32,

    /// Last tick that is processed. The run stops after it regardless of
    /// undelivered messages.
    pub max_tick: Tick,
}

impl SimulationConfig {
    /// Create a new simulation configuration.
    pub fn new(proposers: u32, acceptors: u32, max_tick: u64) -> Self {
        Self {
            proposers,
            acceptors,
            max_tick: Tick(max_tick),
        }
    }

    /// Set the tick budget.
    pub fn with_max_tick(mut self, max_tick: u64) -> Self {
        self.max_tick = Tick(max_tick);
        self
    }

    /// Check if `node` exists in a cluster of this shape.
    pub fn contains(&self, node: NodeId) -> bool {
        match node {
            NodeId::Proposer(ProposerId(n)) => (1..=self.proposers).contains(&n),
            NodeId::Acceptor(AcceptorId(n)) => (1..=self.acceptors).contains(&n),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new(1, 3, 20)
    }
}
