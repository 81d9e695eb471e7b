//! Board state representation and basic operations

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{game::GameOutcome, lines::LineAnalyzer};
use crate::{
    error::{Error, IllegalMoveReason},
    types::{Action, StateKey},
};

/// A cell on the Tic-Tac-Toe board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | ' ' | '_' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' | '0' => Some(Cell::O),
            _ => None,
        }
    }

    pub fn to_player(self) -> Option<Player> {
        match self {
            Cell::X => Some(Player::X),
            Cell::O => Some(Player::O),
            Cell::Empty => None,
        }
    }
}

/// A player in the game
///
/// X always opens. During training X is the learning agent and O the opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_cell().to_char())
    }
}

/// A 3x3 grid of cells.
///
/// Snapshots are cheap copies; the live board in a game loop is replaced by the
/// value returned from [`BoardState::apply_action`]. Serializes as its
/// [`StateKey`] string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "StateKey", try_from = "StateKey")]
pub struct BoardState {
    pub cells: [Cell; 9],
}

/// Count of each piece type on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PieceCount {
    x: usize,
    o: usize,
}

impl BoardState {
    /// Create a new empty board
    pub fn new() -> Self {
        BoardState {
            cells: [Cell::Empty; 9],
        }
    }

    fn count_pieces(cells: &[Cell; 9]) -> PieceCount {
        let mut count = PieceCount { x: 0, o: 0 };
        for cell in cells {
            match cell {
                Cell::X => count.x += 1,
                Cell::O => count.o += 1,
                Cell::Empty => {}
            }
        }
        count
    }

    /// Create a board from a string representation.
    ///
    /// The string should contain 9 cell characters in row-major order;
    /// whitespace and `|` separators are ignored, so both `"X.O......"` and
    /// `"X . O\n. . .\n. . ."` are accepted.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The board has fewer than 9 cell characters
    /// - Any character is not a valid cell representation
    /// - The piece counts break turn alternation (X must equal O or lead by one)
    pub fn from_string(s: &str) -> Result<Self, Error> {
        let chars: Vec<char> = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '|')
            .collect();
        if chars.len() < 9 {
            return Err(Error::InvalidBoardLength {
                expected: 9,
                got: chars.len(),
                context: s.to_string(),
            });
        }

        let mut cells = [Cell::Empty; 9];
        for (i, &c) in chars.iter().take(9).enumerate() {
            cells[i] = Cell::from_char(c).ok_or_else(|| Error::InvalidCellCharacter {
                character: c,
                position: i,
                context: s.to_string(),
            })?;
        }

        let count = Self::count_pieces(&cells);
        if count.x != count.o && count.x != count.o + 1 {
            return Err(Error::InvalidPieceCounts {
                x_count: count.x,
                o_count: count.o,
            });
        }

        Ok(BoardState { cells })
    }

    /// Rebuild the board a state key was taken from.
    pub fn from_state_key(key: &StateKey) -> Result<Self, Error> {
        Self::from_string(key.as_str())
    }

    /// The player whose turn it is, derived from the piece counts.
    pub fn to_move(&self) -> Player {
        let count = Self::count_pieces(&self.cells);
        if count.x > count.o {
            Player::O
        } else {
            Player::X
        }
    }

    /// Count the number of occupied cells on the board.
    pub fn occupied_count(&self) -> usize {
        let count = Self::count_pieces(&self.cells);
        count.x + count.o
    }

    /// Cell at the given coordinates, or `None` off the board
    pub fn cell(&self, action: Action) -> Option<Cell> {
        action.index().map(|index| self.cells[index])
    }

    /// All coordinates that are currently empty, in row-major order.
    ///
    /// Empty on a full board. Coordinates are listed regardless of whether the
    /// game has already been won; callers stop asking once [`Self::is_terminal`].
    pub fn legal_actions(&self) -> Vec<Action> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| Action::from_index(i))
            .collect()
    }

    /// Place `player`'s mark at `action` and return the new board.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalMove`] if the coordinates are outside `0..=2`
    /// or the target cell is not empty. The original board is never modified.
    #[must_use = "apply_action returns a new board state; the original is unchanged"]
    pub fn apply_action(&self, action: Action, player: Player) -> Result<BoardState, Error> {
        let index = action.index().ok_or(Error::IllegalMove {
            action,
            reason: IllegalMoveReason::OutOfRange,
        })?;

        if self.cells[index] != Cell::Empty {
            return Err(Error::IllegalMove {
                action,
                reason: IllegalMoveReason::Occupied,
            });
        }

        let mut next = *self;
        next.cells[index] = player.to_cell();
        Ok(next)
    }

    /// Apply an action for the player whose turn it is
    #[must_use = "play returns a new board state; the original is unchanged"]
    pub fn play(&self, action: Action) -> Result<BoardState, Error> {
        self.apply_action(action, self.to_move())
    }

    /// First completed line in scan order (rows, columns, diagonals)
    pub fn winner(&self) -> Option<Player> {
        LineAnalyzer::winner(&self.cells)
    }

    /// Check if a player has won
    pub fn has_won(&self, player: Player) -> bool {
        LineAnalyzer::has_won(&self.cells, player)
    }

    /// Check if the position is a draw (all cells filled, no winner)
    pub fn is_draw(&self) -> bool {
        !self.cells.contains(&Cell::Empty) && self.winner().is_none()
    }

    /// Check if the game is over (win or draw)
    pub fn is_terminal(&self) -> bool {
        self.winner().is_some() || !self.cells.contains(&Cell::Empty)
    }

    /// Final outcome, if the game is over
    pub fn outcome(&self) -> Option<GameOutcome> {
        if let Some(winner) = self.winner() {
            Some(GameOutcome::Win(winner))
        } else if self.is_draw() {
            Some(GameOutcome::Draw)
        } else {
            None
        }
    }

    /// Row-major encoding used as the value-table key
    pub fn state_key(&self) -> StateKey {
        StateKey::from_encoded(self.cells.iter().map(|&c| c.to_char()).collect())
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl From<BoardState> for StateKey {
    fn from(board: BoardState) -> Self {
        board.state_key()
    }
}

impl TryFrom<StateKey> for BoardState {
    type Error = Error;

    fn try_from(key: StateKey) -> Result<Self, Self::Error> {
        BoardState::from_state_key(&key)
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &cell) in self.cells.iter().enumerate() {
            write!(f, "{}", cell.to_char())?;
            if (i + 1) % 3 == 0 && i < 8 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
