//! Paxos Simulator
//!
//! Front end for the `paxos-sim-simulation` engine: scenario scripts in
//! and reports out.
//!
//! - **Scripts**: parse and render the line-oriented scenario format
//! - **Scenario generation**: seeded random scripts for exploration and
//!   determinism checks
//!
//! # Example
//!
//! ```ignore
//! use paxos_sim_simulator::Script;
//!
//! let script = Script::parse("1 3 20\n0 PROPOSE 1 7\n0 END\n")?;
//! let report = script.run()?;
//! print!("{report}");
//! ```

pub mod random;
pub mod script;

pub use random::{ScenarioConfig, ScenarioGenerator};
pub use script::{Script, ScriptAction, ScriptError, ScriptEvent};
