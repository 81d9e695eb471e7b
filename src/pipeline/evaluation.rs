//! Frozen-policy evaluation

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use super::{
    opponents::FrozenPolicy,
    training::{LEARNER, play_game},
};
use crate::{
    Error, Result,
    ports::Agent,
    q_learning::Policy,
    tictactoe::GameOutcome,
};

/// Outcome counts from the learner's point of view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub games: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
}

impl EvaluationResult {
    fn rate(&self, count: usize) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            count as f64 / self.games as f64
        }
    }

    pub fn win_rate(&self) -> f64 {
        self.rate(self.wins)
    }

    pub fn draw_rate(&self) -> f64 {
        self.rate(self.draws)
    }

    pub fn loss_rate(&self) -> f64 {
        self.rate(self.losses)
    }

    /// Fraction of games won or drawn
    pub fn non_loss_rate(&self) -> f64 {
        self.rate(self.wins + self.draws)
    }

    fn record(&mut self, outcome: GameOutcome) {
        self.games += 1;
        match outcome {
            GameOutcome::Win(winner) if winner == LEARNER => self.wins += 1,
            GameOutcome::Win(_) => self.losses += 1,
            GameOutcome::Draw => self.draws += 1,
        }
    }

    /// Export as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

/// Play `games` games of the frozen policy (X, moving first) against
/// `opponent` (O).
///
/// Nothing is learned and the exploration rate is left as it was.
pub fn evaluate(
    policy: &mut Policy,
    opponent: &mut dyn Agent,
    games: usize,
    seed: Option<u64>,
) -> Result<EvaluationResult> {
    let mut frozen = FrozenPolicy::new(policy);
    if let Some(seed) = seed {
        frozen.set_rng_seed(seed);
        opponent.set_rng_seed(seed.wrapping_add(1));
    }

    let mut result = EvaluationResult::default();
    for _ in 0..games {
        let outcome = play_game(&mut frozen, opponent, |_, _, _, _| {})?;
        result.record(outcome);
    }

    info!(
        "evaluation against {}: {} wins, {} draws, {} losses over {games} games",
        opponent.name(),
        result.wins,
        result.draws,
        result.losses
    );
    Ok(result)
}
