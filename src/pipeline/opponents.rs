//! Agents the learner trains and evaluates against

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    ports::Agent,
    q_learning::Policy,
    tictactoe::BoardState,
    types::Action,
};

/// Plays a uniformly random legal action
pub struct RandomOpponent {
    name: String,
    rng: StdRng,
}

impl RandomOpponent {
    /// Create a random opponent seeded from the OS
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Create a random opponent with a deterministic seed
    pub fn with_seed(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomOpponent {
    fn default() -> Self {
        Self::new("Random")
    }
}

impl Agent for RandomOpponent {
    fn choose_action(&mut self, board: &BoardState) -> Option<Action> {
        board.legal_actions().choose(&mut self.rng).copied()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

/// Exploitation-only view of a [`Policy`]
///
/// Always plays the greedy action. The wrapped policy's exploration rate and
/// schedule are left untouched, so the same policy can go back to training
/// afterwards.
pub struct FrozenPolicy<'a> {
    inner: &'a mut Policy,
}

impl<'a> FrozenPolicy<'a> {
    pub fn new(inner: &'a mut Policy) -> Self {
        Self { inner }
    }
}

impl Agent for FrozenPolicy<'_> {
    fn choose_action(&mut self, board: &BoardState) -> Option<Action> {
        self.inner.greedy_action(board)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.inner.set_rng_seed(seed);
    }
}
