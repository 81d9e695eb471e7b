//! Value types shared by the board, the value table and the persistence layer.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A (row, col) coordinate pair, 0-indexed.
///
/// Construction does not range-check: an out-of-range action is representable
/// so that it can be rejected by [`crate::tictactoe::BoardState::apply_action`]
/// with a typed error instead of being silently clamped. Serializes as `"r,c"`,
/// which keeps it usable as a map key in every persistence format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Action {
    pub row: u8,
    pub col: u8,
}

impl Action {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Build the action for a row-major cell index (0-8).
    pub fn from_index(index: usize) -> Self {
        Self::new((index / 3) as u8, (index % 3) as u8)
    }

    /// Row-major cell index, or `None` when the coordinates leave the board.
    pub fn index(&self) -> Option<usize> {
        if self.in_range() {
            Some(self.row as usize * 3 + self.col as usize)
        } else {
            None
        }
    }

    pub fn in_range(&self) -> bool {
        self.row < 3 && self.col < 3
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

impl FromStr for Action {
    type Err = Error;

    /// Parse `"r,c"` or `"r c"`. Range is not checked here.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format_error = || Error::InputFormat {
            input: s.to_string(),
            expected: "two numbers such as '0 1' or '0,1'".to_string(),
        };

        let mut parts = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty());
        let row = parts.next().ok_or_else(format_error)?;
        let col = parts.next().ok_or_else(format_error)?;
        if parts.next().is_some() {
            return Err(format_error());
        }

        let row = row.parse::<u8>().map_err(|_| format_error())?;
        let col = col.parse::<u8>().map_err(|_| format_error())?;
        Ok(Action::new(row, col))
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        action.to_string()
    }
}

impl TryFrom<String> for Action {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Canonical identifier of a board configuration.
///
/// Nine characters in row-major order, one per cell: `.` for empty, `X` and
/// `O` for the players. Two boards share a key iff all nine cells match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct StateKey(String);

impl StateKey {
    pub const LEN: usize = 9;

    /// Parse and validate a state key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBoardLength`] when the key is not nine characters
    /// long and [`Error::InvalidCellCharacter`] for anything other than `.`, `X`, `O`.
    pub fn parse(s: &str) -> Result<Self, Error> {
        let count = s.chars().count();
        if count != Self::LEN {
            return Err(Error::InvalidBoardLength {
                expected: Self::LEN,
                got: count,
                context: s.to_string(),
            });
        }
        if let Some((position, character)) = s
            .chars()
            .enumerate()
            .find(|&(_, c)| !matches!(c, '.' | 'X' | 'O'))
        {
            return Err(Error::InvalidCellCharacter {
                character,
                position,
                context: s.to_string(),
            });
        }
        Ok(StateKey(s.to_string()))
    }

    /// Wrap an encoding produced by the board itself.
    pub(crate) fn from_encoded(encoding: String) -> Self {
        debug_assert_eq!(encoding.len(), Self::LEN);
        StateKey(encoding)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<StateKey> for String {
    fn from(key: StateKey) -> Self {
        key.0
    }
}

impl TryFrom<String> for StateKey {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        StateKey::parse(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_index() {
        assert_eq!(Action::new(0, 0).index(), Some(0));
        assert_eq!(Action::new(1, 2).index(), Some(5));
        assert_eq!(Action::new(2, 2).index(), Some(8));
        assert_eq!(Action::new(3, 1).index(), None);
        assert_eq!(Action::from_index(7), Action::new(2, 1));
    }

    #[test]
    fn test_action_parse() {
        assert_eq!("0 1".parse::<Action>().unwrap(), Action::new(0, 1));
        assert_eq!("2,0".parse::<Action>().unwrap(), Action::new(2, 0));
        assert_eq!(" 1 ,  1 ".parse::<Action>().unwrap(), Action::new(1, 1));
        // Out of range still parses; the board rejects it.
        assert_eq!("3 1".parse::<Action>().unwrap(), Action::new(3, 1));
    }

    #[test]
    fn test_action_parse_rejects_garbage() {
        for input in ["", "1", "a b", "1 2 3", "-1 0", "1;2"] {
            let err = input.parse::<Action>().unwrap_err();
            assert!(
                matches!(err, Error::InputFormat { .. }),
                "expected input format error for {input:?}, got {err}"
            );
        }
    }

    #[test]
    fn test_state_key_validation() {
        assert!(StateKey::parse("X...O....").is_ok());
        assert!(matches!(
            StateKey::parse("X..O"),
            Err(Error::InvalidBoardLength { got: 4, .. })
        ));
        assert!(matches!(
            StateKey::parse("X..Z....."),
            Err(Error::InvalidCellCharacter { character: 'Z', position: 3, .. })
        ));
    }

    #[test]
    fn test_action_serializes_as_string() {
        let json = serde_json::to_string(&Action::new(1, 2)).unwrap();
        assert_eq!(json, "\"1,2\"");
        let back: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Action::new(1, 2));
    }
}
