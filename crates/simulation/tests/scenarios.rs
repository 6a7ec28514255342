//! End-to-end traces for small scripted scenarios.
//!
//! Expected output is the exact text the report renders, including idle
//! markers and the blank line before each verdict.

use paxos_sim_simulation::{Outcome, Simulation, SimulationConfig, Timeline, TimelineBuilder};
use paxos_sim_types::{AcceptorId, ProposerId, RoundCounter, Value};
use tracing_test::traced_test;

fn run(config: SimulationConfig, builder: TimelineBuilder) -> String {
    let mut rounds = RoundCounter::new();
    let timeline = builder.build(&mut rounds).expect("timeline");
    Simulation::new(config, timeline, rounds)
        .expect("simulation")
        .run()
        .to_string()
}

fn idle_lines(from: u64, to: u64) -> String {
    (from..=to).map(|t| format!("{t:03}: \n")).collect()
}

#[traced_test]
#[test]
fn test_single_proposer_no_failures() {
    let output = run(
        SimulationConfig::new(1, 3, 20),
        Timeline::builder().at(0).propose(ProposerId(1), Value(7)),
    );

    let expected = "\
000:    -> P1  PROPOSE v=7
001: P1 -> A1  PREPARE n=1
002: P1 -> A2  PREPARE n=1
003: P1 -> A3  PREPARE n=1
004: A1 -> P1  PROMISE n=1 (Prior: None)
005: A2 -> P1  PROMISE n=1 (Prior: None)
006: A3 -> P1  PROMISE n=1 (Prior: None)
007: P1 -> A1  ACCEPT n=1 v=7
008: P1 -> A2  ACCEPT n=1 v=7
009: P1 -> A3  ACCEPT n=1 v=7
010: A1 -> P1  ACCEPTED n=1 v=7
011: A2 -> P1  ACCEPTED n=1 v=7
012: A3 -> P1  ACCEPTED n=1 v=7

P1 has reached consensus (proposed 7, accepted 7)
";
    assert_eq!(output, expected);
}

#[traced_test]
#[test]
fn test_one_acceptor_down_still_reaches_quorum() {
    let output = run(
        SimulationConfig::new(1, 3, 20),
        Timeline::builder()
            .at(0)
            .fail(AcceptorId(2))
            .propose(ProposerId(1), Value(7)),
    );

    let expected = format!(
        "\
000: ** A2 FAILS **
000:    -> P1  PROPOSE v=7
001: P1 -> A1  PREPARE n=1
002: P1 -> A3  PREPARE n=1
003: A1 -> P1  PROMISE n=1 (Prior: None)
004: A3 -> P1  PROMISE n=1 (Prior: None)
005: P1 -> A1  ACCEPT n=1 v=7
006: P1 -> A3  ACCEPT n=1 v=7
007: A1 -> P1  ACCEPTED n=1 v=7
008: A3 -> P1  ACCEPTED n=1 v=7
{}
P1 has reached consensus (proposed 7, accepted 7)
",
        idle_lines(9, 20)
    );
    assert_eq!(output, expected);
}

#[traced_test]
#[test]
fn test_majority_down_never_completes() {
    let output = run(
        SimulationConfig::new(1, 3, 20),
        Timeline::builder()
            .at(0)
            .fail(AcceptorId(1))
            .fail(AcceptorId(2))
            .propose(ProposerId(1), Value(7)),
    );

    let expected = format!(
        "\
000: ** A1 FAILS **
000: ** A2 FAILS **
000:    -> P1  PROPOSE v=7
001: P1 -> A3  PREPARE n=1
002: A3 -> P1  PROMISE n=1 (Prior: None)
{}
P1 did not reach consensus
",
        idle_lines(3, 20)
    );
    assert_eq!(output, expected);
}

#[traced_test]
#[test]
fn test_recovered_acceptor_drains_held_messages() {
    let output = run(
        SimulationConfig::new(1, 3, 30),
        Timeline::builder()
            .at(0)
            .fail(AcceptorId(2))
            .propose(ProposerId(1), Value(7))
            .at(10)
            .recover(AcceptorId(2)),
    );

    let expected = format!(
        "\
000: ** A2 FAILS **
000:    -> P1  PROPOSE v=7
001: P1 -> A1  PREPARE n=1
002: P1 -> A3  PREPARE n=1
003: A1 -> P1  PROMISE n=1 (Prior: None)
004: A3 -> P1  PROMISE n=1 (Prior: None)
005: P1 -> A1  ACCEPT n=1 v=7
006: P1 -> A3  ACCEPT n=1 v=7
007: A1 -> P1  ACCEPTED n=1 v=7
008: A3 -> P1  ACCEPTED n=1 v=7
{}010: ** A2 RECOVERS **
010: P1 -> A2  PREPARE n=1
011: P1 -> A2  ACCEPT n=1 v=7
012: A2 -> P1  PROMISE n=1 (Prior: None)
013: A2 -> P1  ACCEPTED n=1 v=7

P1 has reached consensus (proposed 7, accepted 7)
",
        idle_lines(9, 9)
    );
    assert_eq!(output, expected);
}

#[traced_test]
#[test]
fn test_competing_proposers_retry_adopts_prior_value() {
    let output = run(
        SimulationConfig::new(2, 3, 40),
        Timeline::builder()
            .at(0)
            .propose(ProposerId(1), Value(10))
            .at(1)
            .propose(ProposerId(2), Value(20)),
    );

    let expected = "\
000:    -> P1  PROPOSE v=10
001:    -> P2  PROPOSE v=20
002: P1 -> A1  PREPARE n=1
003: P1 -> A2  PREPARE n=1
004: P1 -> A3  PREPARE n=1
005: P2 -> A1  PREPARE n=2
006: P2 -> A2  PREPARE n=2
007: P2 -> A3  PREPARE n=2
008: A1 -> P1  PROMISE n=1 (Prior: None)
009: A2 -> P1  PROMISE n=1 (Prior: None)
010: A3 -> P1  PROMISE n=1 (Prior: None)
011: A1 -> P2  PROMISE n=2 (Prior: None)
012: A2 -> P2  PROMISE n=2 (Prior: None)
013: A3 -> P2  PROMISE n=2 (Prior: None)
014: P1 -> A1  ACCEPT n=1 v=10
015: P1 -> A2  ACCEPT n=1 v=10
016: P1 -> A3  ACCEPT n=1 v=10
017: P2 -> A1  ACCEPT n=2 v=20
018: P2 -> A2  ACCEPT n=2 v=20
019: P2 -> A3  ACCEPT n=2 v=20
020: A1 -> P1  REJECTED n=1
021: A2 -> P1  REJECTED n=1
022: A3 -> P1  REJECTED n=1
023: A1 -> P2  ACCEPTED n=2 v=20
024: A2 -> P2  ACCEPTED n=2 v=20
025: A3 -> P2  ACCEPTED n=2 v=20
026: P1 -> A1  PREPARE n=3
027: P1 -> A2  PREPARE n=3
028: P1 -> A3  PREPARE n=3
029: A1 -> P1  PROMISE n=3 (Prior: n=2, v=20)
030: A2 -> P1  PROMISE n=3 (Prior: n=2, v=20)
031: A3 -> P1  PROMISE n=3 (Prior: n=2, v=20)
032: P1 -> A1  ACCEPT n=3 v=20
033: P1 -> A2  ACCEPT n=3 v=20
034: P1 -> A3  ACCEPT n=3 v=20
035: A1 -> P1  ACCEPTED n=3 v=20
036: A2 -> P1  ACCEPTED n=3 v=20
037: A3 -> P1  ACCEPTED n=3 v=20

P1 has reached consensus (proposed 10, accepted 20)

P2 has reached consensus (proposed 20, accepted 20)
";
    assert_eq!(output, expected);
}

#[traced_test]
#[test]
fn test_second_proposal_from_same_proposer_broadcasts_its_round() {
    let output = run(
        SimulationConfig::new(1, 3, 40),
        Timeline::builder()
            .at(0)
            .propose(ProposerId(1), Value(10))
            .at(1)
            .propose(ProposerId(1), Value(20)),
    );

    let expected = "\
000:    -> P1  PROPOSE v=10
001:    -> P1  PROPOSE v=20
002: P1 -> A1  PREPARE n=1
003: P1 -> A2  PREPARE n=1
004: P1 -> A3  PREPARE n=1
005: P1 -> A1  PREPARE n=2
006: P1 -> A2  PREPARE n=2
007: P1 -> A3  PREPARE n=2
008: A1 -> P1  PROMISE n=1 (Prior: None)
009: A2 -> P1  PROMISE n=1 (Prior: None)
010: A3 -> P1  PROMISE n=1 (Prior: None)
011: A1 -> P1  PROMISE n=2 (Prior: None)
012: A2 -> P1  PROMISE n=2 (Prior: None)
013: A3 -> P1  PROMISE n=2 (Prior: None)
014: P1 -> A1  ACCEPT n=1 v=20
015: P1 -> A2  ACCEPT n=1 v=20
016: P1 -> A3  ACCEPT n=1 v=20
017: P1 -> A1  ACCEPT n=2 v=20
018: P1 -> A2  ACCEPT n=2 v=20
019: P1 -> A3  ACCEPT n=2 v=20
020: A1 -> P1  REJECTED n=1
021: A2 -> P1  REJECTED n=1
022: A3 -> P1  REJECTED n=1
023: A1 -> P1  ACCEPTED n=2 v=20
024: A2 -> P1  ACCEPTED n=2 v=20
025: A3 -> P1  ACCEPTED n=2 v=20
026: P1 -> A1  PREPARE n=3
027: P1 -> A2  PREPARE n=3
028: P1 -> A3  PREPARE n=3
029: A1 -> P1  PROMISE n=3 (Prior: n=2, v=20)
030: A2 -> P1  PROMISE n=3 (Prior: n=2, v=20)
031: A3 -> P1  PROMISE n=3 (Prior: n=2, v=20)
032: P1 -> A1  ACCEPT n=3 v=20
033: P1 -> A2  ACCEPT n=3 v=20
034: P1 -> A3  ACCEPT n=3 v=20
035: A1 -> P1  ACCEPTED n=3 v=20
036: A2 -> P1  ACCEPTED n=3 v=20
037: A3 -> P1  ACCEPTED n=3 v=20

P1 has reached consensus (proposed 20, accepted 20)
";
    assert_eq!(output, expected);
}

#[traced_test]
#[test]
fn test_competing_proposers_agree_on_value() {
    let mut rounds = RoundCounter::new();
    let timeline = Timeline::builder()
        .at(0)
        .propose(ProposerId(1), Value(10))
        .at(1)
        .propose(ProposerId(2), Value(20))
        .build(&mut rounds)
        .unwrap();
    let report = Simulation::new(SimulationConfig::new(2, 3, 40), timeline, rounds)
        .unwrap()
        .run();

    assert_eq!(report.consensus_values(), vec![Value(20), Value(20)]);
    assert_eq!(
        report.verdicts[0].outcome,
        Outcome::Reached {
            proposed: Value(10),
            accepted: Value(20)
        }
    );
    assert_eq!(report.stats.rounds_started, 3);
    assert_eq!(report.stats.pending_at_end, 0);
}

#[traced_test]
#[test]
fn test_failed_proposer_still_receives_scripted_proposal() {
    let output = run(
        SimulationConfig::new(1, 3, 4),
        Timeline::builder()
            .at(0)
            .fail(ProposerId(1))
            .propose(ProposerId(1), Value(3)),
    );

    let expected = format!(
        "\
000: ** P1 FAILS **
000:    -> P1  PROPOSE v=3
{}
P1 did not reach consensus
",
        idle_lines(1, 4)
    );
    assert_eq!(output, expected);
}

#[traced_test]
#[test]
fn test_empty_timeline_reports_immediately() {
    let output = run(SimulationConfig::new(2, 3, 10), Timeline::builder());
    assert_eq!(
        output,
        "\nP1 did not reach consensus\n\nP2 did not reach consensus\n"
    );
}
