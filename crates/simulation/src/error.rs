//! Error types for building a simulation.

use paxos_sim_types::{NodeId, Tick};
use thiserror::Error;

/// Errors while assembling a timeline or a simulation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimulationError {
    /// The timeline names a node the cluster does not have.
    #[error("Unknown node {node} at tick {}", .tick.0)]
    UnknownNode { node: NodeId, tick: Tick },

    /// Timeline entries must be in non-decreasing tick order.
    #[error("Tick {} comes after tick {}", .tick.0, .previous.0)]
    TickOutOfOrder { tick: Tick, previous: Tick },
}
