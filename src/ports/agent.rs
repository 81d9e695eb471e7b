//! Agent port - anything that can pick a move on a board
//!
//! Implemented by:
//! - the epsilon-greedy Q-learning [`crate::q_learning::Policy`]
//! - [`crate::pipeline::RandomOpponent`]
//! - [`crate::pipeline::FrozenPolicy`] (exploitation-only view of a policy)

use crate::{tictactoe::BoardState, types::Action};

/// A player in a game of tic-tac-toe
///
/// Training, evaluation and interactive play drive both sides through this
/// trait, so the learner can face any opponent implementation.
///
/// # Examples
///
/// ```no_run
/// use qttt::{ports::Agent, tictactoe::BoardState, types::Action};
///
/// struct FirstEmpty;
///
/// impl Agent for FirstEmpty {
///     fn choose_action(&mut self, board: &BoardState) -> Option<Action> {
///         board.legal_actions().first().copied()
///     }
///
///     fn name(&self) -> &str {
///         "first-empty"
///     }
/// }
/// ```
pub trait Agent: Send {
    /// Pick an action for the player to move on `board`.
    ///
    /// Returns `None` only when the board has no empty cell. The returned
    /// action is validated by the caller before it is applied.
    fn choose_action(&mut self, board: &BoardState) -> Option<Action>;

    /// Name used in logs and reports
    fn name(&self) -> &str;

    /// Reseed the agent's random number generator.
    ///
    /// Pipelines call this when given a seed so runs are reproducible.
    /// Deterministic agents can keep the default no-op.
    fn set_rng_seed(&mut self, _seed: u64) {}
}
