//! The eight lines of the 3x3 board and who owns them

use super::{Cell, Player};

/// Row-major cell indices of every line, in scan order: rows, then columns,
/// then the two diagonals.
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Line queries over a raw cell array
pub struct LineAnalyzer;

impl LineAnalyzer {
    /// True if `player` holds all three cells of any line
    pub fn has_won(cells: &[Cell; 9], player: Player) -> bool {
        WINNING_LINES
            .iter()
            .any(|&line| Self::line_owner(cells, line) == Some(player))
    }

    /// Owner of the first completed line in scan order
    pub fn winner(cells: &[Cell; 9]) -> Option<Player> {
        WINNING_LINES.iter().find_map(|&line| Self::line_owner(cells, line))
    }

    fn line_owner(cells: &[Cell; 9], [a, b, c]: [usize; 3]) -> Option<Player> {
        if cells[a] == cells[b] && cells[b] == cells[c] {
            cells[a].to_player()
        } else {
            None
        }
    }
}
