//! Core types for the single-decree Paxos simulator.
//!
//! Everything here is plain data: identifiers for the two node roles,
//! round numbers and values, the strict-majority quorum rule, and the
//! monotonic round allocator shared by every proposer in a run.

mod identifiers;
mod quorum;
mod round;

pub use identifiers::{AcceptorId, NodeId, ProposerId, Tick, Value};
pub use quorum::Quorum;
pub use round::{AcceptedPair, Round, RoundCounter};
