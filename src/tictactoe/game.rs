//! Game outcomes and the fixed reward convention

use serde::{Deserialize, Serialize};

use super::board::Player;

/// Terminal reward when the learner completes a line
pub const WIN_REWARD: f64 = 1.0;
/// Terminal reward when the opponent completes a line
pub const LOSS_REWARD: f64 = -1.0;
/// Terminal reward for a full board without a line
pub const DRAW_REWARD: f64 = 0.5;

/// Outcome of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    Win(Player),
    Draw,
}

impl GameOutcome {
    /// Terminal reward from `learner`'s perspective
    pub fn reward_for(self, learner: Player) -> f64 {
        match self {
            GameOutcome::Win(winner) if winner == learner => WIN_REWARD,
            GameOutcome::Win(_) => LOSS_REWARD,
            GameOutcome::Draw => DRAW_REWARD,
        }
    }

    /// True unless `player` lost
    pub fn is_non_loss_for(self, player: Player) -> bool {
        !matches!(self, GameOutcome::Win(winner) if winner != player)
    }
}
