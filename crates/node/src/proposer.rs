//! Proposer state machine.

use crate::ProtocolNode;
use paxos_sim_messages::Message;
use paxos_sim_types::{
    AcceptedPair, AcceptorId, NodeId, ProposerId, Quorum, Round, RoundCounter, Value,
};
use serde::Serialize;
use tracing::{debug, trace, warn};

/// Responses counted for the round currently in progress.
///
/// Cleared every time the proposer starts a round, whether scripted or a
/// rejection retry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoundTally {
    pub promised: u32,
    pub accepted: u32,
    pub rejected: u32,
}

/// The value a proposer was scripted to get chosen, and its round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Proposal {
    pub round: Round,
    pub value: Value,
}

/// Proposer state for a single-decree Paxos instance.
#[derive(Debug, Clone)]
pub struct Proposer {
    id: ProposerId,

    /// Size of the acceptor population; every broadcast goes to all of them.
    acceptors: u32,

    quorum: Quorum,

    tally: RoundTally,

    /// Highest round any PROMISE has come back for.
    highest_promised_round: Option<Round>,

    /// Most advanced prior-accepted pair reported inside any PROMISE.
    highest_prior: Option<AcceptedPair>,

    /// Set by the last scripted PROPOSE. Retries leave it alone.
    proposal: Option<Proposal>,

    /// Value carried by the most recent ACCEPTED reply.
    last_accepted_value: Option<Value>,

    /// Round the rejection tally is counting for.
    rejected_round: Option<Round>,

    /// Round whose promise quorum has already broadcast ACCEPT.
    accept_broadcast_round: Option<Round>,

    failed: bool,
}

impl Proposer {
    /// Create a proposer talking to `acceptors` acceptors.
    pub fn new(id: ProposerId, acceptors: u32) -> Self {
        Self {
            id,
            acceptors,
            quorum: Quorum::new(acceptors),
            tally: RoundTally::default(),
            highest_promised_round: None,
            highest_prior: None,
            proposal: None,
            last_accepted_value: None,
            rejected_round: None,
            accept_broadcast_round: None,
            failed: false,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Accessors
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn id(&self) -> ProposerId {
        self.id
    }

    pub fn tally(&self) -> RoundTally {
        self.tally
    }

    pub fn promised_count(&self) -> u32 {
        self.tally.promised
    }

    pub fn accepted_count(&self) -> u32 {
        self.tally.accepted
    }

    pub fn rejected_count(&self) -> u32 {
        self.tally.rejected
    }

    pub fn highest_promised_round(&self) -> Option<Round> {
        self.highest_promised_round
    }

    pub fn highest_prior(&self) -> Option<AcceptedPair> {
        self.highest_prior
    }

    pub fn proposal(&self) -> Option<Proposal> {
        self.proposal
    }

    pub fn last_accepted_value(&self) -> Option<Value> {
        self.last_accepted_value
    }

    pub fn accept_broadcast_round(&self) -> Option<Round> {
        self.accept_broadcast_round
    }

    /// Whether ACCEPTED replies from a strict majority have been counted.
    pub fn reached_consensus(&self) -> bool {
        self.quorum.is_reached(self.tally.accepted)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Handlers
    // ═══════════════════════════════════════════════════════════════════════════

    /// Handle a scripted PROPOSE: record the proposal and open its round.
    pub fn on_propose(&mut self, round: Round, value: Value) -> Vec<Message> {
        debug!(proposer = %self.id, round = round.0, value = value.0, "Starting proposal");
        self.proposal = Some(Proposal { round, value });
        self.start_round(round)
    }

    /// Handle a PROMISE from an acceptor.
    ///
    /// Returns the ACCEPT broadcast when this promise completes a quorum.
    pub fn on_promise(&mut self, round: Round, prior: Option<AcceptedPair>) -> Vec<Message> {
        if let Some(highest) = self.highest_promised_round {
            if round < highest {
                trace!(
                    proposer = %self.id,
                    round = round.0,
                    highest = highest.0,
                    "Ignoring stale promise"
                );
                return Vec::new();
            }
            if round > highest {
                // Promises for an older round no longer count toward this one
                self.tally.promised = 0;
            }
        }

        if self.accept_broadcast_round == Some(round) {
            trace!(proposer = %self.id, round = round.0, "Accept already broadcast, ignoring promise");
            return Vec::new();
        }

        if let Some(pair) = prior {
            let more_advanced = self
                .highest_prior
                .map_or(true, |current| pair.round >= current.round);
            if more_advanced {
                self.highest_prior = Some(pair);
            }
        }

        self.highest_promised_round = Some(round);
        self.tally.promised += 1;

        if !self.quorum.is_reached(self.tally.promised) {
            return Vec::new();
        }

        // A previously accepted value takes precedence over our own
        let value = match (self.highest_prior, self.proposal) {
            (Some(prior), _) => prior.value,
            (None, Some(proposal)) => proposal.value,
            (None, None) => {
                warn!(proposer = %self.id, round = round.0, "Promise quorum without a proposal");
                return Vec::new();
            }
        };

        debug!(
            proposer = %self.id,
            round = round.0,
            value = value.0,
            promises = self.tally.promised,
            "Promise quorum reached, broadcasting accept"
        );

        self.accept_broadcast_round = Some(round);
        self.tally.promised = 0;

        AcceptorId::all(self.acceptors)
            .map(|acceptor| Message::accept(self.id, acceptor, round, value))
            .collect()
    }

    /// Handle an ACCEPTED reply.
    pub fn on_accepted(&mut self, round: Round, value: Value) {
        self.last_accepted_value = Some(value);
        self.tally.accepted += 1;
        trace!(
            proposer = %self.id,
            round = round.0,
            value = value.0,
            accepted = self.tally.accepted,
            "Counted accepted"
        );
    }

    /// Handle a REJECTED reply.
    ///
    /// A rejection quorum for one round starts a retry under the next round
    /// from `rounds`. The retry PREPARE carries no value; the recorded
    /// proposal stays as the fallback for the next promise quorum.
    pub fn on_rejected(&mut self, round: Round, rounds: &mut RoundCounter) -> Vec<Message> {
        if self.rejected_round != Some(round) {
            self.rejected_round = Some(round);
            self.tally.rejected = 1;
        } else {
            self.tally.rejected += 1;
        }

        if !self.quorum.is_reached(self.tally.rejected) {
            return Vec::new();
        }

        let retry = rounds.next_round();
        debug!(
            proposer = %self.id,
            rejected_round = round.0,
            retry_round = retry.0,
            "Rejection quorum, retrying with new round"
        );
        self.start_round(retry)
    }

    /// Reset per-round state and broadcast PREPARE for `round`.
    fn start_round(&mut self, round: Round) -> Vec<Message> {
        self.tally = RoundTally::default();
        self.accept_broadcast_round = None;

        AcceptorId::all(self.acceptors)
            .map(|acceptor| Message::prepare(self.id, acceptor, round))
            .collect()
    }
}

impl ProtocolNode for Proposer {
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
