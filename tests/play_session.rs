//! Interactive play driven through in-memory input

use std::io::Cursor;

use qttt::{
    Action, BoardState, ExplorationSchedule, GameOutcome, Player, Policy, ValueTable,
    cli::commands::play::play_session,
};

fn session(policy: &mut Policy, input: &str) -> (Option<GameOutcome>, String) {
    let mut output = Vec::new();
    let outcome = play_session(policy, Cursor::new(input.as_bytes()), &mut output).unwrap();
    (outcome, String::from_utf8(output).unwrap())
}

/// Table that steers the agent along the top row: (0,0), (0,1), (0,2)
fn top_row_table() -> ValueTable {
    let mut table = ValueTable::new();
    let start = BoardState::new();
    table.update(&start.state_key(), Action::new(0, 0), 1.0);
    let after_first = BoardState::from_string("X..O.....").unwrap();
    table.update(&after_first.state_key(), Action::new(0, 1), 1.0);
    let after_second = BoardState::from_string("XX.OO....").unwrap();
    table.update(&after_second.state_key(), Action::new(0, 2), 1.0);
    table
}

#[test]
fn test_agent_wins_scripted_game() {
    let mut policy = Policy::new(top_row_table(), ExplorationSchedule::default()).with_seed(1);
    let (outcome, output) = session(&mut policy, "1 0\n1,1\n");
    assert_eq!(outcome, Some(GameOutcome::Win(Player::X)));
    assert!(output.contains("Agent plays 0,0"));
    assert!(output.contains("Agent plays 0,1"));
    assert!(output.contains("Agent plays 0,2"));
    assert!(output.contains("The agent wins!"));
}

#[test]
fn test_invalid_inputs_are_reprompted_not_fatal() {
    let mut policy = Policy::new(top_row_table(), ExplorationSchedule::default()).with_seed(1);
    let input = "\n0\nfoo bar\n0 0\n7,7\n1 0\n1 1\n";
    let (outcome, output) = session(&mut policy, input);

    assert_eq!(outcome, Some(GameOutcome::Win(Player::X)));
    assert_eq!(output.matches("could not parse").count(), 3);
    assert!(output.contains("cell is already occupied"));
    assert!(output.contains("coordinates must be within 0..=2"));
}

#[test]
fn test_session_ends_when_input_runs_out() {
    let mut policy = Policy::new(top_row_table(), ExplorationSchedule::default()).with_seed(1);
    let (outcome, output) = session(&mut policy, "1 0\n");
    assert_eq!(outcome, None);
    assert!(output.contains("Input closed"));
}
