//! Tick-driven simulation engine.

use crate::{
    Cluster, Extracted, FaultChange, FaultKind, PendingQueue, SimulationConfig, SimulationError,
    SimulationReport, SimulationStats, Timeline, TraceEntry, Verdict,
};
use paxos_sim_messages::{Message, Payload};
use paxos_sim_types::{AcceptorId, NodeId, ProposerId, RoundCounter, Tick};
use tracing::{debug, info, warn};

/// Deterministic Paxos simulation.
///
/// Each tick:
/// 1. apply the scripted failures, then recoveries, for this tick
/// 2. deliver the scripted proposal if there is one, otherwise the earliest
///    eligible queued message
/// 3. hand the message to its destination, queueing whatever it sends back
///
/// Messages produced by a delivery are never delivered in the same tick.
/// The run ends after `max_tick`, or earlier once both the timeline and
/// the queue are empty.
pub struct Simulation {
    config: SimulationConfig,
    cluster: Cluster,
    queue: PendingQueue,
    timeline: Timeline,

    /// Shared round allocator; proposals were already drawn from it.
    rounds: RoundCounter,

    next_tick: Tick,
    finished: bool,
    trace: Vec<TraceEntry>,
    stats: SimulationStats,
}

impl Simulation {
    /// Create a simulation.
    ///
    /// `rounds` must be the counter the timeline was built with, so that
    /// retry rounds continue after the scripted ones.
    pub fn new(
        config: SimulationConfig,
        timeline: Timeline,
        rounds: RoundCounter,
    ) -> Result<Self, SimulationError> {
        for event in timeline.iter() {
            if let Some(node) = event.nodes().find(|n| !config.contains(*n)) {
                return Err(SimulationError::UnknownNode {
                    node,
                    tick: event.tick,
                });
            }
        }

        Ok(Self {
            cluster: Cluster::new(&config),
            queue: PendingQueue::new(),
            timeline,
            rounds,
            next_tick: Tick::ZERO,
            finished: false,
            trace: Vec::new(),
            stats: SimulationStats::default(),
            config,
        })
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Accessors
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn cluster(&self) -> &Cluster {
        &self.cluster
    }

    pub fn queue(&self) -> &PendingQueue {
        &self.queue
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn rounds(&self) -> &RoundCounter {
        &self.rounds
    }

    /// The tick the next call to [`step`](Self::step) will process.
    pub fn next_tick(&self) -> Tick {
        self.next_tick
    }

    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }

    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Execution
    // ═══════════════════════════════════════════════════════════════════════════

    /// Process one tick.
    ///
    /// Returns the trace entries this tick produced, or `None` once the
    /// run has ended.
    pub fn step(&mut self) -> Option<&[TraceEntry]> {
        if self.finished {
            return None;
        }

        let tick = self.next_tick;
        if tick > self.config.max_tick {
            debug!(tick = tick.0, "Tick budget exhausted");
            self.finish();
            return None;
        }
        if self.timeline.is_empty() && self.queue.is_empty() {
            debug!(tick = tick.0, "Timeline and queue drained");
            self.finish();
            return None;
        }

        let start = self.trace.len();

        match self.timeline.pop_at(tick) {
            Some(event) => {
                self.apply_faults(tick, &event.fail, &event.recover);
                match event.proposal {
                    Some(proposal) => self.deliver(tick, proposal),
                    None => {
                        if let Extracted::Message(message) = self.extract() {
                            self.deliver(tick, message);
                        }
                    }
                }
            }
            None => match self.extract() {
                Extracted::Message(message) => self.deliver(tick, message),
                Extracted::NoneEligible | Extracted::Empty => {
                    self.trace.push(TraceEntry::Idle { tick });
                    self.stats.idle_ticks += 1;
                }
            },
        }

        self.stats.ticks_run += 1;
        self.next_tick = tick.next();
        Some(&self.trace[start..])
    }

    /// Run to completion and report.
    pub fn run(mut self) -> SimulationReport {
        info!(
            proposers = self.config.proposers,
            acceptors = self.config.acceptors,
            max_tick = self.config.max_tick.0,
            events = self.timeline.len(),
            "Starting simulation"
        );

        while self.step().is_some() {}

        self.into_report()
    }

    /// Build the report from the current state, judging every proposer.
    pub fn into_report(mut self) -> SimulationReport {
        self.stats.pending_at_end = self.queue.len() as u64;
        let verdicts: Vec<Verdict> = self.cluster.proposers().map(Verdict::for_proposer).collect();

        info!(
            ticks = self.stats.ticks_run,
            delivered = self.stats.messages_delivered,
            pending = self.stats.pending_at_end,
            reached = verdicts.iter().filter(|v| v.accepted_value().is_some()).count(),
            "Simulation complete"
        );

        SimulationReport {
            config: self.config,
            trace: self.trace,
            verdicts,
            stats: self.stats,
        }
    }

    fn finish(&mut self) {
        self.finished = true;
    }

    fn extract(&mut self) -> Extracted {
        let cluster = &self.cluster;
        self.queue.extract(|node| cluster.is_failed(node))
    }

    fn apply_faults(&mut self, tick: Tick, fail: &[NodeId], recover: &[NodeId]) {
        let changes: Vec<FaultChange> = fail
            .iter()
            .map(|&node| FaultChange {
                node,
                kind: FaultKind::Fail,
            })
            .chain(recover.iter().map(|&node| FaultChange {
                node,
                kind: FaultKind::Recover,
            }))
            .collect();

        if changes.is_empty() {
            return;
        }

        for change in &changes {
            // Nodes were validated against the config in `new`
            if let Some(node) = self.cluster.node_mut(change.node) {
                match change.kind {
                    FaultKind::Fail => node.fail(),
                    FaultKind::Recover => node.recover(),
                }
            }
            debug!(tick = tick.0, node = %change.node, kind = %change.kind, "Fault applied");
        }

        self.stats.faults_applied += changes.len() as u64;
        self.trace.push(TraceEntry::Faults { tick, changes });
    }

    fn deliver(&mut self, tick: Tick, message: Message) {
        self.trace.push(TraceEntry::Delivery { tick, message });
        self.stats.messages_delivered += 1;

        let outbound = match message.destination() {
            NodeId::Proposer(id) => self.dispatch_to_proposer(id, message.payload()),
            NodeId::Acceptor(id) => self.dispatch_to_acceptor(id, &message),
        };

        self.queue.extend(outbound);
    }

    fn dispatch_to_proposer(&mut self, id: ProposerId, payload: &Payload) -> Vec<Message> {
        let Some(proposer) = self.cluster.proposer_mut(id) else {
            warn!(proposer = %id, "Message for unknown proposer dropped");
            return Vec::new();
        };

        match *payload {
            Payload::Propose { round, value } => {
                self.stats.rounds_started += 1;
                proposer.on_propose(round, value)
            }
            Payload::Promise { round, prior } => proposer.on_promise(round, prior),
            Payload::Accepted { round, value } => {
                proposer.on_accepted(round, value);
                Vec::new()
            }
            Payload::Rejected { round } => {
                let before = self.rounds.peek();
                let retry = proposer.on_rejected(round, &mut self.rounds);
                if self.rounds.peek() != before {
                    self.stats.rounds_started += 1;
                }
                retry
            }
            Payload::Prepare { .. } | Payload::Accept { .. } => {
                warn!(proposer = %id, kind = payload.type_name(), "Misrouted message dropped");
                Vec::new()
            }
        }
    }

    fn dispatch_to_acceptor(&mut self, id: AcceptorId, message: &Message) -> Vec<Message> {
        let payload = message.payload();
        let (Some(acceptor), Some(from)) = (
            self.cluster.acceptor_mut(id),
            message.source().and_then(NodeId::as_proposer),
        ) else {
            warn!(acceptor = %id, kind = payload.type_name(), "Message without proposer source dropped");
            return Vec::new();
        };

        match *payload {
            Payload::Prepare { round } => acceptor.on_prepare(from, round).into_iter().collect(),
            Payload::Accept { round, value } => vec![acceptor.on_accept(from, round, value)],
            Payload::Promise { .. }
            | Payload::Accepted { .. }
            | Payload::Rejected { .. }
            | Payload::Propose { .. } => {
                warn!(acceptor = %id, kind = payload.type_name(), "Misrouted message dropped");
                Vec::new()
            }
        }
    }
}
