//! Epsilon-greedy action selection over a [`ValueTable`]

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    ports::Agent,
    q_learning::value_table::ValueTable,
    tictactoe::BoardState,
    types::Action,
};

/// Exploration-rate schedule: start at `rate`, multiply by `decay` after every
/// training episode, never drop below `min_rate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExplorationSchedule {
    pub rate: f64,
    pub decay: f64,
    pub min_rate: f64,
}

impl ExplorationSchedule {
    pub fn new(rate: f64, decay: f64, min_rate: f64) -> Self {
        Self {
            rate,
            decay,
            min_rate,
        }
    }

    /// Rate after one decay step from `current`
    pub fn next_rate(&self, current: f64) -> f64 {
        (current * self.decay).max(self.min_rate)
    }

    pub fn validate(&self) -> Result<()> {
        let in_unit = |value: f64| (0.0..=1.0).contains(&value);
        if !in_unit(self.rate) || !in_unit(self.min_rate) {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "exploration rates must lie in [0, 1] (rate={}, min_rate={})",
                    self.rate, self.min_rate
                ),
            });
        }
        if self.min_rate > self.rate {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "min exploration rate {} exceeds starting rate {}",
                    self.min_rate, self.rate
                ),
            });
        }
        if !(self.decay > 0.0 && self.decay <= 1.0) {
            return Err(Error::InvalidConfiguration {
                message: format!("exploration decay {} must lie in (0, 1]", self.decay),
            });
        }
        Ok(())
    }
}

impl Default for ExplorationSchedule {
    fn default() -> Self {
        Self::new(1.0, 0.995, 0.1)
    }
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Epsilon-greedy agent
///
/// Owns the value table it reads from. With probability equal to the current
/// exploration rate it plays a uniformly random legal action; otherwise it
/// plays the best-valued legal action, breaking ties at random. Every random
/// draw goes through the policy's own generator, so a seeded policy is fully
/// reproducible.
#[derive(Debug, Clone)]
pub struct Policy {
    table: ValueTable,
    exploration_rate: f64,
    schedule: ExplorationSchedule,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl Policy {
    pub fn new(table: ValueTable, schedule: ExplorationSchedule) -> Self {
        Self {
            table,
            exploration_rate: schedule.rate,
            schedule,
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.reseed(seed);
        self
    }

    fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
    }

    /// Pick an action for `board`; `None` only when no cell is empty.
    pub fn choose_action(&mut self, board: &BoardState) -> Option<Action> {
        let legal = board.legal_actions();
        if legal.is_empty() {
            return None;
        }

        if self.rng.random::<f64>() < self.exploration_rate {
            legal.choose(&mut self.rng).copied()
        } else {
            self.table
                .best_action(&board.state_key(), &legal, &mut self.rng)
        }
    }

    /// Best-valued legal action, ignoring the exploration rate
    pub fn greedy_action(&mut self, board: &BoardState) -> Option<Action> {
        let legal = board.legal_actions();
        self.table
            .best_action(&board.state_key(), &legal, &mut self.rng)
    }

    /// Apply one step of the exploration schedule.
    ///
    /// Called once per completed training episode, never during play.
    pub fn decay_exploration(&mut self) {
        self.exploration_rate = self.schedule.next_rate(self.exploration_rate);
    }

    pub fn exploration_rate(&self) -> f64 {
        self.exploration_rate
    }

    /// Override the current rate, clamped to [0, 1]
    pub fn set_exploration_rate(&mut self, rate: f64) {
        self.exploration_rate = rate.clamp(0.0, 1.0);
    }

    pub fn schedule(&self) -> ExplorationSchedule {
        self.schedule
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut ValueTable {
        &mut self.table
    }

    pub fn into_table(self) -> ValueTable {
        self.table
    }
}

impl Agent for Policy {
    fn choose_action(&mut self, board: &BoardState) -> Option<Action> {
        Policy::choose_action(self, board)
    }

    fn name(&self) -> &str {
        "Q-learning"
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.reseed(seed);
    }
}
