//! Scripted timeline of failures, recoveries and proposals.

use crate::SimulationError;
use paxos_sim_messages::Message;
use paxos_sim_types::{NodeId, ProposerId, RoundCounter, Tick, Value};
use std::collections::VecDeque;
use tracing::debug;

/// Everything the script says happens at one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEvent {
    pub tick: Tick,
    /// Nodes to crash, applied before recoveries.
    pub fail: Vec<NodeId>,
    /// Nodes to bring back.
    pub recover: Vec<NodeId>,
    /// Scripted PROPOSE, delivered this tick without going through the queue.
    pub proposal: Option<Message>,
}

impl TimelineEvent {
    /// Every node this event refers to.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.fail
            .iter()
            .chain(self.recover.iter())
            .copied()
            .chain(self.proposal.map(|m| m.destination()))
    }
}

/// Scripted events in tick order, at most one per tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    events: VecDeque<TimelineEvent>,
}

impl Timeline {
    /// Start building a timeline.
    pub fn builder() -> TimelineBuilder {
        TimelineBuilder::default()
    }

    /// Take the next event if it is scheduled for `tick`.
    pub fn pop_at(&mut self, tick: Tick) -> Option<TimelineEvent> {
        if self.events.front().is_some_and(|e| e.tick == tick) {
            self.events.pop_front()
        } else {
            None
        }
    }

    /// Remaining events in order.
    pub fn iter(&self) -> impl Iterator<Item = &TimelineEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[derive(Debug, Clone)]
struct PendingEvent {
    tick: Tick,
    fail: Vec<NodeId>,
    recover: Vec<NodeId>,
    proposal: Option<(ProposerId, Value)>,
}

impl PendingEvent {
    fn new(tick: Tick) -> Self {
        Self {
            tick,
            fail: Vec::new(),
            recover: Vec::new(),
            proposal: None,
        }
    }
}

/// Builds a [`Timeline`] entry by entry.
///
/// Consecutive `at` calls with the same tick extend one event. Operations
/// before the first `at` land on tick 0. Round numbers for proposals are
/// only allocated in [`build`](TimelineBuilder::build), in script order.
///
/// ```ignore
/// let mut rounds = RoundCounter::new();
/// let timeline = Timeline::builder()
///     .at(0)
///     .fail(AcceptorId(2))
///     .propose(ProposerId(1), Value(7))
///     .at(12)
///     .recover(AcceptorId(2))
///     .build(&mut rounds)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct TimelineBuilder {
    events: Vec<PendingEvent>,
}

impl TimelineBuilder {
    /// Open (or continue) the event for `tick`.
    pub fn at(mut self, tick: u64) -> Self {
        let tick = Tick(tick);
        if self.events.last().map(|e| e.tick) != Some(tick) {
            self.events.push(PendingEvent::new(tick));
        }
        self
    }

    /// Crash `node` at the current tick.
    pub fn fail(mut self, node: impl Into<NodeId>) -> Self {
        self.current().fail.push(node.into());
        self
    }

    /// Recover `node` at the current tick.
    pub fn recover(mut self, node: impl Into<NodeId>) -> Self {
        self.current().recover.push(node.into());
        self
    }

    /// Have `proposer` propose `value` at the current tick.
    ///
    /// A second proposal on the same tick replaces the first.
    pub fn propose(mut self, proposer: ProposerId, value: Value) -> Self {
        let event = self.current();
        if let Some((previous, _)) = event.proposal {
            debug!(
                tick = event.tick.0,
                replaced = %previous,
                by = %proposer,
                "Replacing proposal on same tick"
            );
        }
        event.proposal = Some((proposer, value));
        self
    }

    /// Finish the timeline, drawing proposal rounds from `rounds`.
    pub fn build(self, rounds: &mut RoundCounter) -> Result<Timeline, SimulationError> {
        let mut events = VecDeque::with_capacity(self.events.len());
        let mut previous: Option<Tick> = None;

        for pending in self.events {
            if let Some(previous) = previous.filter(|p| pending.tick < *p) {
                return Err(SimulationError::TickOutOfOrder {
                    tick: pending.tick,
                    previous,
                });
            }
            previous = Some(pending.tick);

            let proposal = pending
                .proposal
                .map(|(proposer, value)| Message::propose(proposer, rounds.next_round(), value));

            events.push_back(TimelineEvent {
                tick: pending.tick,
                fail: pending.fail,
                recover: pending.recover,
                proposal,
            });
        }

        Ok(Timeline { events })
    }

    fn current(&mut self) -> &mut PendingEvent {
        if self.events.is_empty() {
            self.events.push(PendingEvent::new(Tick::ZERO));
        }
        let last = self.events.len() - 1;
        &mut self.events[last]
    }
}
