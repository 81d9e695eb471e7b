//! Play command - a human (O) against the trained agent (X)

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    Error,
    adapters::repository_for,
    cli::DEFAULT_TABLE_PATH,
    pipeline::FrozenPolicy,
    ports::Agent,
    q_learning::{ExplorationSchedule, Policy, ValueTable},
    tictactoe::{BoardState, Cell, GameOutcome, Player},
    types::Action,
};

#[derive(Parser, Debug)]
#[command(about = "Play against the trained agent")]
pub struct PlayArgs {
    /// Value table to load (.msgpack/.mp for MessagePack)
    #[arg(long, short = 't', default_value = DEFAULT_TABLE_PATH)]
    pub table: PathBuf,

    /// Seed for the agent's tie-breaking
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let table = ValueTable::load_or_default(repository_for(&args.table).as_ref(), &args.table);
    let mut policy = Policy::new(table, ExplorationSchedule::default());
    if let Some(seed) = args.seed {
        policy = policy.with_seed(seed);
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    play_session(&mut policy, stdin.lock(), stdout.lock())?;
    Ok(())
}

fn write_board(writer: &mut impl Write, board: &BoardState) -> io::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "    0   1   2")?;
    for row in 0..3u8 {
        let cells: Vec<String> = (0..3u8)
            .map(|col| {
                match board.cell(Action::new(row, col)) {
                    Some(Cell::Empty) | None => " ".to_string(),
                    Some(cell) => cell.to_char().to_string(),
                }
            })
            .collect();
        writeln!(writer, "{row}   {}", cells.join(" | "))?;
        if row < 2 {
            writeln!(writer, "   ---+---+---")?;
        }
    }
    writeln!(writer)
}

/// Run one interactive game.
///
/// The agent plays X, moves first and always exploits. The human plays O and
/// enters `row col` or `row,col` on `reader`. Unparsable, out-of-range or
/// occupied input is reported on `writer` and re-prompted; `q`/`quit` or the
/// end of input leaves the game. Returns the outcome if the game was finished.
pub fn play_session<R: BufRead, W: Write>(
    policy: &mut Policy,
    reader: R,
    mut writer: W,
) -> Result<Option<GameOutcome>> {
    let mut agent = FrozenPolicy::new(policy);
    let mut board = BoardState::new();
    let mut lines = reader.lines();

    writeln!(writer, "Welcome to Tic-Tac-Toe! The agent plays X and moves first; you play O.")?;
    write_board(&mut writer, &board)?;

    loop {
        if let Some(outcome) = board.outcome() {
            let message = match outcome {
                GameOutcome::Win(Player::X) => "The agent wins!",
                GameOutcome::Win(Player::O) => "You win!",
                GameOutcome::Draw => "It's a draw!",
            };
            writeln!(writer, "{message}")?;
            return Ok(Some(outcome));
        }

        match board.to_move() {
            Player::X => {
                let action = agent
                    .choose_action(&board)
                    .ok_or_else(|| Error::NoMoveAvailable {
                        agent: agent.name().to_string(),
                    })?;
                board = board.apply_action(action, Player::X)?;
                writeln!(writer, "Agent plays {action}")?;
                write_board(&mut writer, &board)?;
            }
            Player::O => {
                write!(writer, "Your move (row col): ")?;
                writer.flush()?;

                let Some(line) = lines.next() else {
                    writeln!(writer)?;
                    writeln!(writer, "Input closed; leaving the game.")?;
                    return Ok(None);
                };
                let line = line.context("failed to read move")?;
                let input = line.trim();
                if input.eq_ignore_ascii_case("q") || input.eq_ignore_ascii_case("quit") {
                    writeln!(writer, "Leaving the game.")?;
                    return Ok(None);
                }

                match input
                    .parse::<Action>()
                    .and_then(|action| board.apply_action(action, Player::O))
                {
                    Ok(next) => {
                        board = next;
                        write_board(&mut writer, &board)?;
                    }
                    Err(err @ (Error::InputFormat { .. } | Error::IllegalMove { .. })) => {
                        writeln!(writer, "{err}. Try again.")?;
                    }
                    Err(err) => return Err(err.into()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn run(policy: &mut Policy, input: &str) -> (Option<GameOutcome>, String) {
        let mut output = Vec::new();
        let outcome = play_session(policy, Cursor::new(input.to_string()), &mut output).unwrap();
        (outcome, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_end_of_input_ends_cleanly() {
        let mut policy = Policy::new(ValueTable::new(), ExplorationSchedule::default()).with_seed(1);
        let (outcome, output) = run(&mut policy, "");
        assert_eq!(outcome, None);
        assert!(output.contains("Agent plays"));
        assert!(output.contains("Input closed"));
    }

    #[test]
    fn test_bad_input_reprompts() {
        let mut policy = Policy::new(ValueTable::new(), ExplorationSchedule::default()).with_seed(1);
        let (outcome, output) = run(&mut policy, "hello\n3 1\nquit\n");
        assert_eq!(outcome, None);
        assert!(output.contains("could not parse 'hello'"));
        assert!(output.contains("illegal move 3,1"));
        assert_eq!(output.matches("Your move").count(), 3);
    }

    #[test]
    fn test_occupied_cell_reprompts() {
        let position = BoardState::new();
        let mut table = ValueTable::new();
        table.update(&position.state_key(), Action::new(1, 1), 1.0);
        let mut policy = Policy::new(table, ExplorationSchedule::default()).with_seed(1);

        let (_, output) = run(&mut policy, "1 1\nq\n");
        assert!(output.contains("Agent plays 1,1"));
        assert!(output.contains("cell is already occupied"));
    }

    #[test]
    fn test_exploration_rate_is_untouched() {
        let mut policy = Policy::new(ValueTable::new(), ExplorationSchedule::default()).with_seed(4);
        run(&mut policy, "");
        assert_eq!(policy.exploration_rate(), 1.0);
    }
}
