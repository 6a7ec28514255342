//! Paxos simulator CLI
//!
//! Runs a scenario script (or a generated one) and prints the trace and
//! verdicts on stdout. Logs go to stderr, filtered by `RUST_LOG`.

use anyhow::Context;
use clap::Parser;
use paxos_sim_simulator::{ScenarioConfig, ScenarioGenerator, Script};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "paxos-sim")]
#[command(about = "Deterministic single-decree Paxos simulator")]
#[command(version)]
struct Args {
    /// Scenario script; read from stdin when omitted
    script: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Generate a random scenario from this seed instead of reading a script
    #[arg(long, conflicts_with = "script")]
    random: Option<u64>,

    /// Proposers in a generated scenario
    #[arg(long, default_value_t = 2, requires = "random")]
    proposers: u32,

    /// Acceptors in a generated scenario
    #[arg(long, default_value_t = 3, requires = "random")]
    acceptors: u32,

    /// Tick budget of a generated scenario
    #[arg(long, default_value_t = 60, requires = "random")]
    max_tick: u64,

    /// Event lines in a generated scenario
    #[arg(long, default_value_t = 6, requires = "random")]
    events: usize,

    /// Print the generated script before the report
    #[arg(long, requires = "random")]
    emit_script: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let script = match (args.random, &args.script) {
        (Some(seed), _) => {
            let config = ScenarioConfig::new(args.proposers, args.acceptors)
                .with_max_tick(args.max_tick)
                .with_events(args.events);
            let script = ScenarioGenerator::new(config, seed).generate();
            if args.emit_script {
                print!("{}", script.to_text());
                println!();
            }
            script
        }
        (None, Some(path)) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Script::parse(&text).with_context(|| format!("Invalid script {}", path.display()))?
        }
        (None, None) => {
            let text = io::read_to_string(io::stdin()).context("Failed to read stdin")?;
            Script::parse(&text).context("Invalid script on stdin")?
        }
    };

    let report = script.run()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }

    Ok(())
}
