//! Behaviour shared by both node roles.

use paxos_sim_types::NodeId;

/// A simulated node that can crash and recover.
///
/// Failure is not an error path: a failed node keeps all of its protocol
/// state, it just stops being a valid sender or receiver until recovered.
/// The engine consults [`is_failed`](ProtocolNode::is_failed) when picking
/// the next deliverable message.
pub trait ProtocolNode {
    /// The node's identity as it appears in trace lines.
    fn node_id(&self) -> NodeId;

    /// Whether the node is currently crashed.
    fn is_failed(&self) -> bool;

    /// Set the crash flag.
    fn set_failed(&mut self, failed: bool);

    /// Crash the node. Idempotent.
    fn fail(&mut self) {
        self.set_failed(true);
    }

    /// Bring the node back. Idempotent.
    fn recover(&mut self) {
        self.set_failed(false);
    }
}
