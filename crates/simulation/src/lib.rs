//! Deterministic simulation runner.
//!
//! Replays a scripted timeline against a cluster of proposers and
//! acceptors, one tick at a time. Given the same config and timeline it
//! produces an identical trace every run.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      Simulation                         │
//! │                                                         │
//! │  ┌──────────────────────┐   ┌────────────────────────┐  │
//! │  │ Timeline             │   │ PendingQueue           │  │
//! │  │ (tick, fail, recover,│   │ FIFO, first eligible   │  │
//! │  │  proposal)           │   │ message wins           │  │
//! │  └──────────┬───────────┘   └───────────┬────────────┘  │
//! │             │  at most one delivery     │               │
//! │             └─────────────┬─────────────┘               │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │ Cluster: proposers[], acceptors[]                  │ │
//! │  │ handler returns follow-up messages → PendingQueue  │ │
//! │  └────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────┘
//! ```

mod cluster;
mod config;
mod error;
mod queue;
mod report;
mod runner;
mod timeline;
mod trace;

pub use cluster::Cluster;
pub use config::SimulationConfig;
pub use error::SimulationError;
pub use queue::{Extracted, PendingQueue};
pub use report::{Outcome, SimulationReport, SimulationStats, Verdict};
pub use runner::Simulation;
pub use timeline::{Timeline, TimelineBuilder, TimelineEvent};
pub use trace::{FaultChange, FaultKind, TraceEntry};
