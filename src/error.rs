//! Error types for the qttt crate

use std::path::PathBuf;

use thiserror::Error;

use crate::types::Action;

/// Main error type for the qttt crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("illegal move {action}: {reason}")]
    IllegalMove { action: Action, reason: IllegalMoveReason },

    #[error("persisted state at {path:?} is corrupt: {message}")]
    PersistenceCorruption { path: PathBuf, message: String },

    #[error("could not parse '{input}' (expected {expected})")]
    InputFormat { input: String, expected: String },

    #[error("trajectory step {step} does not match replay: {message}")]
    TrajectoryMismatch { step: usize, message: String },

    #[error("wrong board length: expected {expected} cells, got {got} in '{context}'")]
    InvalidBoardLength {
        expected: usize,
        got: usize,
        context: String,
    },

    #[error("invalid character '{character}' at position {position} in '{context}'")]
    InvalidCellCharacter {
        character: char,
        position: usize,
        context: String,
    },

    #[error("invalid piece counts: X={x_count}, O={o_count} (must be equal or X ahead by 1)")]
    InvalidPieceCounts { x_count: usize, o_count: usize },

    #[error("{agent} produced no move on a board that is still in play")]
    NoMoveAvailable { agent: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Why an action was rejected by the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMoveReason {
    OutOfRange,
    Occupied,
}

impl std::fmt::Display for IllegalMoveReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IllegalMoveReason::OutOfRange => write!(f, "coordinates must be within 0..=2"),
            IllegalMoveReason::Occupied => write!(f, "cell is already occupied"),
        }
    }
}

impl Error {
    /// True for errors caused by a missing file rather than bad content.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
