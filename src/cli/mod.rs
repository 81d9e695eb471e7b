//! CLI infrastructure for qttt
//!
//! This module provides the command-line interface for training, evaluating
//! and playing against the Q-learning agent.

pub mod commands;
pub mod output;

/// Value table location used when `--table` is not given
pub const DEFAULT_TABLE_PATH: &str = "q_table.json";
