//! Round numbers and the round allocator.

use crate::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Proposal number used to totally order competing proposals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Round(pub u64);

impl Round {
    /// The first round handed out by a fresh [`RoundCounter`].
    pub const FIRST: Self = Round(1);
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A `(round, value)` pair an acceptor has accepted.
///
/// Copied by value into every PROMISE, so later acceptor state changes
/// never show through an in-flight message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AcceptedPair {
    pub round: Round,
    pub value: Value,
}

impl AcceptedPair {
    pub fn new(round: Round, value: Value) -> Self {
        Self { round, value }
    }
}

/// Monotonic allocator for round numbers.
///
/// One counter is shared by every proposer in a run: scripted proposals
/// draw from it when the timeline is built, and rejection retries draw
/// from it during the run. The engine owns it and lends it to whichever
/// handler starts a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundCounter {
    next: Round,
}

impl RoundCounter {
    /// Create a counter whose first allocation is [`Round::FIRST`].
    pub fn new() -> Self {
        Self { next: Round::FIRST }
    }

    /// Allocate the next round number.
    pub fn next_round(&mut self) -> Round {
        let round = self.next;
        self.next = Round(round.0 + 1);
        round
    }

    /// The round the next allocation will return.
    pub fn peek(&self) -> Round {
        self.next
    }
}

impl Default for RoundCounter {
    fn default() -> Self {
        Self::new()
    }
}
