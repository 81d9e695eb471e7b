//! Game rules: legal moves, win and draw detection

use qttt::{
    Action, Error, IllegalMoveReason,
    tictactoe::{BoardState, GameOutcome, Player, WINNING_LINES},
};
use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};

fn board(s: &str) -> BoardState {
    BoardState::from_string(s).unwrap()
}

/// Board with `owner` on `line` and the opponent on `others`
fn with_line(line: [usize; 3], owner: char, others: &[usize]) -> BoardState {
    let other = if owner == 'X' { 'O' } else { 'X' };
    let mut cells = ['.'; 9];
    for &index in others {
        cells[index] = other;
    }
    for index in line {
        cells[index] = owner;
    }
    board(&cells.iter().collect::<String>())
}

#[test]
fn test_every_line_wins_for_x() {
    for line in WINNING_LINES {
        // Two O pieces can never form a line
        let others: Vec<usize> = (0..9).filter(|i| !line.contains(i)).take(2).collect();
        let position = with_line(line, 'X', &others);
        assert_eq!(position.winner(), Some(Player::X), "{line:?}");
        assert_eq!(position.outcome(), Some(GameOutcome::Win(Player::X)));
        assert!(!position.is_draw());
    }
}

#[test]
fn test_every_line_wins_for_o() {
    for line in WINNING_LINES {
        let free: Vec<usize> = (0..9).filter(|i| !line.contains(i)).collect();
        let mut checked = false;
        'search: for a in 0..free.len() {
            for b in a + 1..free.len() {
                for c in b + 1..free.len() {
                    let others = [free[a], free[b], free[c]];
                    if WINNING_LINES.iter().any(|l| l.iter().all(|i| others.contains(i))) {
                        continue;
                    }
                    let position = with_line(line, 'O', &others);
                    assert_eq!(position.winner(), Some(Player::O), "{line:?}");
                    assert!(position.is_terminal());
                    checked = true;
                    break 'search;
                }
            }
        }
        assert!(checked, "no X placement found for {line:?}");
    }
}

#[test]
fn test_full_boards_without_line_are_draws() {
    for s in ["XOXXOOOXX", "XXOOOXXOX", "OXOXXOXOX", "OXXXOOXOX"] {
        let position = board(s);
        assert_eq!(position.winner(), None, "board {s}");
        assert!(position.is_draw(), "board {s}");
        assert_eq!(position.outcome(), Some(GameOutcome::Draw));
        assert!(position.legal_actions().is_empty());
    }
}

#[test]
fn test_random_games_always_end_consistently() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..500 {
        let mut position = BoardState::new();
        let mut plies = 0;
        while !position.is_terminal() {
            let legal = position.legal_actions();
            assert_eq!(legal.len(), 9 - plies);
            let action = *legal.choose(&mut rng).unwrap();
            position = position.play(action).unwrap();
            plies += 1;
        }
        assert!(plies >= 5 && plies <= 9);
        match position.outcome() {
            Some(GameOutcome::Win(player)) => {
                assert!(position.has_won(player));
                assert!(!position.has_won(player.opponent()));
            }
            Some(GameOutcome::Draw) => assert_eq!(plies, 9),
            None => panic!("terminal board without outcome"),
        }
    }
}

#[test]
fn test_illegal_moves_are_typed() {
    let position = board("X........");

    let err = position.apply_action(Action::new(3, 1), Player::O).unwrap_err();
    assert!(matches!(
        err,
        Error::IllegalMove {
            reason: IllegalMoveReason::OutOfRange,
            ..
        }
    ));

    let err = position.apply_action(Action::new(0, 0), Player::O).unwrap_err();
    assert!(matches!(
        err,
        Error::IllegalMove {
            reason: IllegalMoveReason::Occupied,
            ..
        }
    ));
}

#[test]
fn test_apply_action_does_not_mutate() {
    let position = BoardState::new();
    let next = position.play(Action::new(1, 1)).unwrap();
    assert_eq!(position, BoardState::new());
    assert_eq!(next.state_key().as_str(), "....X....");
    assert_eq!(next.to_move(), Player::O);
}
