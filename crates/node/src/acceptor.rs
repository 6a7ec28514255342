//! Acceptor state machine.

use crate::ProtocolNode;
use paxos_sim_messages::Message;
use paxos_sim_types::{AcceptedPair, AcceptorId, NodeId, ProposerId, Round, Value};
use tracing::{debug, trace};

/// Acceptor state for a single-decree Paxos instance.
///
/// Invariants:
/// - a PROMISE is only sent for a round strictly above every round this
///   acceptor has promised or accepted
/// - an ACCEPT is only honoured for a round at or above the highest
///   promised round
#[derive(Debug, Clone)]
pub struct Acceptor {
    id: AcceptorId,

    /// Highest round this acceptor has promised. `None` until the first PREPARE.
    highest_seen_round: Option<Round>,

    /// Most recently accepted pair.
    accepted: Option<AcceptedPair>,

    failed: bool,
}

impl Acceptor {
    pub fn new(id: AcceptorId) -> Self {
        Self {
            id,
            highest_seen_round: None,
            accepted: None,
            failed: false,
        }
    }

    pub fn id(&self) -> AcceptorId {
        self.id
    }

    pub fn highest_seen_round(&self) -> Option<Round> {
        self.highest_seen_round
    }

    pub fn accepted_pair(&self) -> Option<AcceptedPair> {
        self.accepted
    }

    /// Handle a PREPARE.
    ///
    /// Replies with a PROMISE carrying a copy of the accepted pair, or
    /// drops the request silently when the round is not new.
    pub fn on_prepare(&mut self, from: ProposerId, round: Round) -> Option<Message> {
        let already_promised = self.highest_seen_round.is_some_and(|seen| round <= seen);
        let already_accepted = self.accepted.is_some_and(|pair| round <= pair.round);

        if already_promised || already_accepted {
            trace!(
                acceptor = %self.id,
                round = round.0,
                highest_seen = ?self.highest_seen_round.map(|r| r.0),
                "Dropping prepare for old round"
            );
            return None;
        }

        debug!(acceptor = %self.id, proposer = %from, round = round.0, "Promising");
        self.highest_seen_round = Some(round);
        Some(Message::promise(self.id, from, round, self.accepted))
    }

    /// Handle an ACCEPT, replying ACCEPTED or REJECTED.
    pub fn on_accept(&mut self, from: ProposerId, round: Round, value: Value) -> Message {
        let honoured = self.highest_seen_round.map_or(true, |seen| round >= seen);

        if honoured {
            debug!(acceptor = %self.id, round = round.0, value = value.0, "Accepting");
            self.accepted = Some(AcceptedPair::new(round, value));
            Message::accepted(self.id, from, round, value)
        } else {
            debug!(
                acceptor = %self.id,
                round = round.0,
                highest_seen = ?self.highest_seen_round.map(|r| r.0),
                "Rejecting accept"
            );
            Message::rejected(self.id, from, round)
        }
    }
}

impl ProtocolNode for Acceptor {
    fn node_id(&self) -> NodeId {
        self.id.into()
    }

    fn is_failed(&self) -> bool {
        self.failed
    }

    fn set_failed(&mut self, failed: bool) {
        self.failed = failed;
    }
}
