//! Line-oriented scenario scripts.
//!
//! ```text
//! 2 3 40              proposers, acceptors, max tick
//! 0 FAIL ACCEPTOR 2
//! 0 PROPOSE 1 10
//! 8 RECOVER ACCEPTOR 2
//! 9 PROPOSE 2 20
//! 0 END
//! ```
//!
//! Event lines must not go back in time. Lines sharing a tick form one
//! timeline event. Blank lines are skipped and anything after `END` is
//! ignored.

use paxos_sim_simulation::{
    Simulation, SimulationConfig, SimulationError, SimulationReport, Timeline, TimelineBuilder,
};
use paxos_sim_types::{AcceptorId, NodeId, ProposerId, RoundCounter, Tick, Value};
use std::fmt;
use std::str::{FromStr, SplitWhitespace};
use thiserror::Error;
use tracing::debug;

/// Errors from parsing a script. Line numbers are 1-based.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("Script is empty")]
    Empty,

    #[error("Line {line}: expected {expected}")]
    MissingField { line: usize, expected: &'static str },

    #[error("Line {line}: invalid integer {token:?}")]
    InvalidInteger { line: usize, token: String },

    #[error("Line {line}: unknown event {keyword:?}")]
    UnknownKeyword { line: usize, keyword: String },

    #[error("Line {line}: unknown role {role:?}, expected PROPOSER or ACCEPTOR")]
    UnknownRole { line: usize, role: String },

    #[error("Line {line}: {node} does not exist")]
    UnknownNode { line: usize, node: NodeId },

    #[error("Line {line}: tick {tick} comes after tick {previous}")]
    TickOutOfOrder { line: usize, tick: u64, previous: u64 },

    #[error("Line {line}: unexpected {token:?}")]
    TrailingInput { line: usize, token: String },

    #[error("Script ends without a 0 END line")]
    MissingEnd,
}

/// What one event line does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptAction {
    Propose { proposer: ProposerId, value: Value },
    Fail(NodeId),
    Recover(NodeId),
}

/// One event line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptEvent {
    pub tick: Tick,
    pub action: ScriptAction,
}

impl fmt::Display for ScriptEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tick = self.tick.0;
        match self.action {
            ScriptAction::Propose { proposer, value } => {
                write!(f, "{tick} PROPOSE {} {value}", proposer.0)
            }
            ScriptAction::Fail(node) => write!(f, "{tick} FAIL {}", RoleIndex(node)),
            ScriptAction::Recover(node) => write!(f, "{tick} RECOVER {}", RoleIndex(node)),
        }
    }
}

/// Renders a node the way scripts name it: `ACCEPTOR 2`.
struct RoleIndex(NodeId);

impl fmt::Display for RoleIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            NodeId::Proposer(id) => write!(f, "PROPOSER {}", id.0),
            NodeId::Acceptor(id) => write!(f, "ACCEPTOR {}", id.0),
        }
    }
}

/// A parsed scenario: cluster shape, tick budget and event lines in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    config: SimulationConfig,
    events: Vec<ScriptEvent>,
}

impl Script {
    /// An empty script for `config`.
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            events: Vec::new(),
        }
    }

    /// Append an event line.
    pub fn push(&mut self, event: ScriptEvent) {
        self.events.push(event);
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn events(&self) -> &[ScriptEvent] {
        &self.events
    }

    /// Parse script text.
    pub fn parse(text: &str) -> Result<Self, ScriptError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line))
            .filter(|(_, line)| !line.trim().is_empty());

        let (line, header) = lines.next().ok_or(ScriptError::Empty)?;
        let mut fields = Fields::new(line, header);
        let config = SimulationConfig::new(
            fields.integer("proposer count")?,
            fields.integer("acceptor count")?,
            fields.integer("max tick")?,
        );
        fields.finish()?;

        let mut script = Script::new(config);
        for (line, content) in lines {
            let mut fields = Fields::new(line, content);
            let tick: u64 = fields.integer("tick")?;
            let keyword = fields.word("event keyword")?;

            let action = match keyword {
                "END" => {
                    fields.finish()?;
                    debug!(
                        events = script.events.len(),
                        end_line = line,
                        "Parsed script"
                    );
                    return Ok(script);
                }
                "PROPOSE" => {
                    let proposer = ProposerId(fields.integer("proposer index")?);
                    let value = Value(fields.integer("value")?);
                    script.check_node(line, proposer.into())?;
                    ScriptAction::Propose { proposer, value }
                }
                "FAIL" => ScriptAction::Fail(script.parse_node(&mut fields)?),
                "RECOVER" => ScriptAction::Recover(script.parse_node(&mut fields)?),
                other => {
                    return Err(ScriptError::UnknownKeyword {
                        line,
                        keyword: other.to_string(),
                    })
                }
            };
            fields.finish()?;

            if let Some(previous) = script.events.last().map(|e| e.tick.0) {
                if tick < previous {
                    return Err(ScriptError::TickOutOfOrder {
                        line,
                        tick,
                        previous,
                    });
                }
            }

            script.push(ScriptEvent {
                tick: Tick(tick),
                action,
            });
        }

        Err(ScriptError::MissingEnd)
    }

    /// Render back to script text, `0 END` included.
    pub fn to_text(&self) -> String {
        let mut text = format!(
            "{} {} {}\n",
            self.config.proposers, self.config.acceptors, self.config.max_tick.0
        );
        for event in &self.events {
            text.push_str(&event.to_string());
            text.push('\n');
        }
        text.push_str("0 END\n");
        text
    }

    /// The events as a timeline builder, one `at` per line.
    pub fn timeline(&self) -> TimelineBuilder {
        self.events
            .iter()
            .fold(Timeline::builder(), |builder, event| {
                let builder = builder.at(event.tick.0);
                match event.action {
                    ScriptAction::Propose { proposer, value } => builder.propose(proposer, value),
                    ScriptAction::Fail(node) => builder.fail(node),
                    ScriptAction::Recover(node) => builder.recover(node),
                }
            })
    }

    /// Set up a simulation of this script with a fresh round counter.
    pub fn to_simulation(&self) -> Result<Simulation, SimulationError> {
        let mut rounds = RoundCounter::new();
        let timeline = self.timeline().build(&mut rounds)?;
        Simulation::new(self.config.clone(), timeline, rounds)
    }

    /// Run the script to completion.
    pub fn run(&self) -> Result<SimulationReport, SimulationError> {
        Ok(self.to_simulation()?.run())
    }

    fn parse_node(&self, fields: &mut Fields<'_>) -> Result<NodeId, ScriptError> {
        let role = fields.word("PROPOSER or ACCEPTOR")?;
        let index = fields.integer("node index")?;
        let node = match role {
            "PROPOSER" => NodeId::Proposer(ProposerId(index)),
            "ACCEPTOR" => NodeId::Acceptor(AcceptorId(index)),
            other => {
                return Err(ScriptError::UnknownRole {
                    line: fields.line,
                    role: other.to_string(),
                })
            }
        };
        self.check_node(fields.line, node)?;
        Ok(node)
    }

    fn check_node(&self, line: usize, node: NodeId) -> Result<(), ScriptError> {
        if self.config.contains(node) {
            Ok(())
        } else {
            Err(ScriptError::UnknownNode { line, node })
        }
    }
}

/// Whitespace-separated fields of one line.
struct Fields<'a> {
    line: usize,
    tokens: SplitWhitespace<'a>,
}

impl<'a> Fields<'a> {
    fn new(line: usize, text: &'a str) -> Self {
        Self {
            line,
            tokens: text.split_whitespace(),
        }
    }

    fn word(&mut self, expected: &'static str) -> Result<&'a str, ScriptError> {
        self.tokens.next().ok_or(ScriptError::MissingField {
            line: self.line,
            expected,
        })
    }

    fn integer<T: FromStr>(&mut self, expected: &'static str) -> Result<T, ScriptError> {
        let token = self.word(expected)?;
        token.parse().map_err(|_| ScriptError::InvalidInteger {
            line: self.line,
            token: token.to_string(),
        })
    }

    fn finish(mut self) -> Result<(), ScriptError> {
        match self.tokens.next() {
            Some(token) => Err(ScriptError::TrailingInput {
                line: self.line,
                token: token.to_string(),
            }),
            None => Ok(()),
        }
    }
}
