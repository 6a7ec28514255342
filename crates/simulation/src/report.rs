//! Final verdicts and run statistics.

use crate::{SimulationConfig, TraceEntry};
use paxos_sim_messages::Message;
use paxos_sim_node::Proposer;
use paxos_sim_types::{ProposerId, Value};
use serde::Serialize;
use std::fmt;

/// Whether a proposer saw a majority of ACCEPTED replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Reached { proposed: Value, accepted: Value },
    NotReached,
}

/// Consensus verdict for one proposer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub proposer: ProposerId,
    pub outcome: Outcome,
}

impl Verdict {
    /// Judge a proposer's final state.
    ///
    /// Consensus means strictly more than half the acceptors' ACCEPTED
    /// replies were counted. The verdict reports the proposer's scripted
    /// value next to the last value it saw accepted.
    pub fn for_proposer(proposer: &Proposer) -> Self {
        let outcome = match (
            proposer.reached_consensus(),
            proposer.proposal(),
            proposer.last_accepted_value(),
        ) {
            (true, Some(proposal), Some(accepted)) => Outcome::Reached {
                proposed: proposal.value,
                accepted,
            },
            _ => Outcome::NotReached,
        };

        Self {
            proposer: proposer.id(),
            outcome,
        }
    }

    /// The accepted value, if consensus was reached.
    pub fn accepted_value(&self) -> Option<Value> {
        match self.outcome {
            Outcome::Reached { accepted, .. } => Some(accepted),
            Outcome::NotReached => None,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            Outcome::Reached { proposed, accepted } => write!(
                f,
                "{} has reached consensus (proposed {proposed}, accepted {accepted})",
                self.proposer
            ),
            Outcome::NotReached => write!(f, "{} did not reach consensus", self.proposer),
        }
    }
}

/// Counters collected over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimulationStats {
    /// Ticks processed before the run stopped.
    pub ticks_run: u64,
    /// Messages delivered, one per tick at most.
    pub messages_delivered: u64,
    /// Ticks that produced only an idle marker.
    pub idle_ticks: u64,
    /// Individual failures and recoveries applied.
    pub faults_applied: u64,
    /// Rounds opened, scripted and retries.
    pub rounds_started: u64,
    /// Messages still in flight when the run stopped.
    pub pending_at_end: u64,
}

/// Everything a finished run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    pub config: SimulationConfig,
    pub trace: Vec<TraceEntry>,
    pub verdicts: Vec<Verdict>,
    pub stats: SimulationStats,
}

impl SimulationReport {
    /// Delivered messages in delivery order.
    pub fn deliveries(&self) -> impl Iterator<Item = &Message> {
        self.trace.iter().filter_map(TraceEntry::delivered)
    }

    /// Values of every proposer that reached consensus, in proposer order.
    pub fn consensus_values(&self) -> Vec<Value> {
        self.verdicts
            .iter()
            .filter_map(Verdict::accepted_value)
            .collect()
    }

    /// Trace lines without the verdicts, one string per output line.
    pub fn trace_lines(&self) -> Vec<String> {
        self.trace
            .iter()
            .flat_map(|entry| {
                entry
                    .to_string()
                    .lines()
                    .map(str::to_owned)
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

/// The full textual report: every trace line, then each verdict preceded
/// by a blank line.
impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.trace {
            writeln!(f, "{entry}")?;
        }
        for verdict in &self.verdicts {
            writeln!(f)?;
            writeln!(f, "{verdict}")?;
        }
        Ok(())
    }
}
