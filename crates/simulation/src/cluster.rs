//! Arena of simulated nodes, indexed by 1-based id.

use crate::SimulationConfig;
use paxos_sim_node::{Acceptor, ProtocolNode, Proposer};
use paxos_sim_types::{AcceptorId, NodeId, ProposerId};

/// All proposers and acceptors of a run.
#[derive(Debug, Clone)]
pub struct Cluster {
    proposers: Vec<Proposer>,
    acceptors: Vec<Acceptor>,
}

impl Cluster {
    /// Create a fresh cluster of the configured shape.
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            proposers: ProposerId::all(config.proposers)
                .map(|id| Proposer::new(id, config.acceptors))
                .collect(),
            acceptors: AcceptorId::all(config.acceptors).map(Acceptor::new).collect(),
        }
    }

    pub fn proposer(&self, id: ProposerId) -> Option<&Proposer> {
        self.proposers.get(id.index())
    }

    pub fn proposer_mut(&mut self, id: ProposerId) -> Option<&mut Proposer> {
        self.proposers.get_mut(id.index())
    }

    pub fn acceptor(&self, id: AcceptorId) -> Option<&Acceptor> {
        self.acceptors.get(id.index())
    }

    pub fn acceptor_mut(&mut self, id: AcceptorId) -> Option<&mut Acceptor> {
        self.acceptors.get_mut(id.index())
    }

    /// Proposers in configured order.
    pub fn proposers(&self) -> impl Iterator<Item = &Proposer> {
        self.proposers.iter()
    }

    /// Look up any node through its role-independent interface.
    pub fn node(&self, id: NodeId) -> Option<&dyn ProtocolNode> {
        match id {
            NodeId::Proposer(p) => self.proposer(p).map(|n| n as &dyn ProtocolNode),
            NodeId::Acceptor(a) => self.acceptor(a).map(|n| n as &dyn ProtocolNode),
        }
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut dyn ProtocolNode> {
        match id {
            NodeId::Proposer(p) => self.proposer_mut(p).map(|n| n as &mut dyn ProtocolNode),
            NodeId::Acceptor(a) => self.acceptor_mut(a).map(|n| n as &mut dyn ProtocolNode),
        }
    }

    /// Whether `id` is crashed. Unknown nodes count as crashed so nothing
    /// is ever delivered to them.
    pub fn is_failed(&self, id: NodeId) -> bool {
        self.node(id).map_or(true, |n| n.is_failed())
    }
}
