//! Seeded random scenario generation.

use crate::script::{Script, ScriptAction, ScriptEvent};
use paxos_sim_simulation::SimulationConfig;
use paxos_sim_types::{AcceptorId, NodeId, ProposerId, Tick, Value};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Shape of generated scenarios.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScenarioConfig {
    /// Number of proposers.
    pub proposers: u32,

    /// Number of acceptors.
    pub acceptors: u32,

    /// Tick budget of the generated script.
    pub max_tick: u64,

    /// Number of event lines to generate.
    pub events: usize,
}

impl ScenarioConfig {
    /// Create a new scenario configuration.
    pub fn new(proposers: u32, acceptors: u32) -> Self {
        Self {
            proposers,
            acceptors,
            max_tick: 60,
            events: 6,
        }
    }

    /// Set the tick budget.
    pub fn with_max_tick(mut self, max_tick: u64) -> Self {
        self.max_tick = max_tick;
        self
    }

    /// Set the number of event lines.
    pub fn with_events(mut self, events: usize) -> Self {
        self.events = events;
        self
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::new(2, 3)
    }
}

/// Produces random but reproducible scripts.
///
/// Events are spread over the first half of the tick budget so the
/// protocol has room to finish. The first event is always a proposal,
/// and recoveries only name nodes the script failed earlier.
pub struct ScenarioGenerator {
    config: ScenarioConfig,
    rng: ChaCha8Rng,
}

impl ScenarioGenerator {
    pub fn new(config: ScenarioConfig, seed: u64) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Generate the next script. Successive calls yield different scripts.
    pub fn generate(&mut self) -> Script {
        let mut script = Script::new(SimulationConfig::new(
            self.config.proposers,
            self.config.acceptors,
            self.config.max_tick,
        ));

        let horizon = self.config.max_tick / 2;
        let mut ticks: Vec<u64> = (0..self.config.events)
            .map(|_| self.rng.gen_range(0..=horizon))
            .collect();
        ticks.sort_unstable();

        let mut failed: Vec<NodeId> = Vec::new();
        for (i, tick) in ticks.into_iter().enumerate() {
            let action = if i == 0 {
                self.propose()
            } else {
                self.random_action(&mut failed)
            };
            if let Some(action) = action {
                script.push(ScriptEvent {
                    tick: Tick(tick),
                    action,
                });
            }
        }

        debug!(
            proposers = self.config.proposers,
            acceptors = self.config.acceptors,
            events = script.events().len(),
            "Generated scenario"
        );
        script
    }

    fn random_action(&mut self, failed: &mut Vec<NodeId>) -> Option<ScriptAction> {
        match self.rng.gen_range(0..3) {
            0 => self.propose(),
            1 => {
                let node = self.random_node()?;
                if !failed.contains(&node) {
                    failed.push(node);
                }
                Some(ScriptAction::Fail(node))
            }
            _ if failed.is_empty() => self.propose(),
            _ => {
                let index = self.rng.gen_range(0..failed.len());
                Some(ScriptAction::Recover(failed.swap_remove(index)))
            }
        }
    }

    fn propose(&mut self) -> Option<ScriptAction> {
        if self.config.proposers == 0 {
            return None;
        }
        Some(ScriptAction::Propose {
            proposer: ProposerId(self.rng.gen_range(1..=self.config.proposers)),
            value: Value(self.rng.gen_range(1..=100)),
        })
    }

    fn random_node(&mut self) -> Option<NodeId> {
        let total = self.config.proposers + self.config.acceptors;
        if total == 0 {
            return None;
        }
        let n = self.rng.gen_range(0..total);
        Some(if n < self.config.proposers {
            ProposerId(n + 1).into()
        } else {
            AcceptorId(n - self.config.proposers + 1).into()
        })
    }
}
