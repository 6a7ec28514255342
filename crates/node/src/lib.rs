//! Proposer and acceptor state machines.
//!
//! Both roles are synchronous and deterministic: a handler mutates the
//! node and returns the messages it wants sent. The engine owns delivery,
//! so nothing here knows about queues, ticks or failures of other nodes.
//!
//! - `Proposer::on_propose` → broadcast PREPARE for a scripted round
//! - `Proposer::on_promise` → count promises, broadcast ACCEPT on quorum
//! - `Proposer::on_accepted` → record the accepted value for the verdict
//! - `Proposer::on_rejected` → count rejections, retry with a fresh round
//! - `Acceptor::on_prepare` → promise rounds newer than anything seen
//! - `Acceptor::on_accept` → accept or reject

mod acceptor;
mod proposer;
mod traits;

pub use acceptor::Acceptor;
pub use proposer::{Proposal, Proposer, RoundTally};
pub use traits::ProtocolNode;
