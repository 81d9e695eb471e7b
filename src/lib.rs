//! Tabular Q-learning for tic-tac-toe
//!
//! This crate provides:
//! - Tic-Tac-Toe rules with validated moves
//! - A tabular Q-learning agent with epsilon-greedy exploration
//! - Self-play training against a random opponent, with trajectory replay
//! - JSON and MessagePack persistence of the learned value table
//! - Evaluation and interactive play against the trained agent

pub mod adapters;
pub mod cli;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod tictactoe;
pub mod types;

pub use error::{Error, IllegalMoveReason, Result};
pub use q_learning::{ExplorationSchedule, Policy, TdUpdate, Trajectory, TrajectoryLog, ValueTable};
pub use tictactoe::{BoardState, GameOutcome, Player};
pub use types::{Action, StateKey};
