//! Training pipeline for the Q-learning policy

use std::{mem, path::Path};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::{Agent, Observer},
    q_learning::{ExplorationSchedule, Policy, TdUpdate, Trajectory, TrajectoryLog, ValueTable},
    tictactoe::{BoardState, GameOutcome, Player},
    types::Action,
};

/// The learner always plays X and always opens the game.
pub const LEARNER: Player = Player::X;

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of training episodes
    pub episodes: usize,

    /// Step size α
    pub learning_rate: f64,

    /// Discount factor γ
    pub discount_factor: f64,

    /// Epsilon-greedy schedule
    pub exploration: ExplorationSchedule,

    /// Random seed; the opponent is seeded with `seed + 1`
    pub seed: Option<u64>,

    /// Keep every episode for [`Trainer::take_trajectories`]
    pub record_trajectories: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 1000,
            learning_rate: 0.1,
            discount_factor: 0.9,
            exploration: ExplorationSchedule::default(),
            seed: None,
            record_trajectories: false,
        }
    }
}

impl TrainingConfig {
    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    pub fn with_exploration(mut self, exploration: ExplorationSchedule) -> Self {
        self.exploration = exploration;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_record_trajectories(mut self, record: bool) -> Self {
        self.record_trajectories = record;
        self
    }

    /// Reject hyper-parameters outside their valid ranges.
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(Error::InvalidConfiguration {
                message: format!("learning rate {} must lie in (0, 1]", self.learning_rate),
            });
        }
        if !(0.0..=1.0).contains(&self.discount_factor) {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "discount factor {} must lie in [0, 1]",
                    self.discount_factor
                ),
            });
        }
        self.exploration.validate()
    }

    pub fn update_rule(&self) -> TdUpdate {
        TdUpdate::new(self.learning_rate, self.discount_factor)
    }

    /// Policy over `table` following this configuration's exploration schedule
    pub fn build_policy(&self, table: ValueTable) -> Policy {
        let policy = Policy::new(table, self.exploration);
        match self.seed {
            Some(seed) => policy.with_seed(seed),
            None => policy,
        }
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    pub episodes: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub draw_rate: f64,
    pub loss_rate: f64,
    /// Exploration rate after the last decay step
    pub final_exploration: f64,
}

impl TrainingResult {
    pub fn new(
        episodes: usize,
        wins: usize,
        draws: usize,
        losses: usize,
        final_exploration: f64,
    ) -> Self {
        let rate = |count: usize| {
            if episodes > 0 {
                count as f64 / episodes as f64
            } else {
                0.0
            }
        };

        Self {
            episodes,
            wins,
            draws,
            losses,
            win_rate: rate(wins),
            draw_rate: rate(draws),
            loss_rate: rate(losses),
            final_exploration,
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Play one game between `x` and `o`, validating every move.
///
/// `on_ply` sees the board before the move, the mover, the action and the
/// board after it.
pub(crate) fn play_game(
    x: &mut dyn Agent,
    o: &mut dyn Agent,
    mut on_ply: impl FnMut(&BoardState, Player, Action, &BoardState),
) -> Result<GameOutcome> {
    let mut board = BoardState::new();

    loop {
        if let Some(outcome) = board.outcome() {
            return Ok(outcome);
        }

        let player = board.to_move();
        let agent: &mut dyn Agent = match player {
            Player::X => &mut *x,
            Player::O => &mut *o,
        };
        let action = agent
            .choose_action(&board)
            .ok_or_else(|| Error::NoMoveAvailable {
                agent: agent.name().to_string(),
            })?;

        let next = board.apply_action(action, player)?;
        on_ply(&board, player, action, &next);
        board = next;
    }
}

/// Trains a [`Policy`] (playing X) against an opponent (playing O)
pub struct Trainer {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
    trajectories: TrajectoryLog,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
            trajectories: TrajectoryLog::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Play one episode and record it, without learning from it.
    pub fn play_episode(
        &self,
        policy: &mut Policy,
        opponent: &mut dyn Agent,
    ) -> Result<Trajectory> {
        let mut trajectory = Trajectory::new(LEARNER);
        let outcome = play_game(policy, opponent, |board, player, action, next| {
            let reward = next
                .outcome()
                .map_or(0.0, |outcome| outcome.reward_for(LEARNER));
            trajectory.record(*board, player, action, reward);
        })?;
        trajectory.finish(outcome);
        Ok(trajectory)
    }

    /// Run `config.episodes` episodes of play, update and decay.
    ///
    /// The exploration rate decays once per episode, after that episode's
    /// value update.
    pub fn run(&mut self, policy: &mut Policy, opponent: &mut dyn Agent) -> Result<TrainingResult> {
        self.config.validate()?;
        if let Some(seed) = self.config.seed {
            policy.set_rng_seed(seed);
            opponent.set_rng_seed(seed.wrapping_add(1));
        }

        let rule = self.config.update_rule();
        let episodes = self.config.episodes;
        info!(
            "training for {episodes} episodes against {} (α={}, γ={}, ε={:.3})",
            opponent.name(),
            rule.learning_rate,
            rule.discount_factor,
            policy.exploration_rate()
        );

        for observer in &mut self.observers {
            observer.on_training_start(episodes)?;
        }

        let (mut wins, mut draws, mut losses) = (0, 0, 0);
        for episode in 0..episodes {
            let trajectory = self.play_episode(policy, opponent)?;
            rule.apply(policy.table_mut(), &trajectory)?;
            policy.decay_exploration();

            let outcome = trajectory
                .outcome
                .ok_or_else(|| Error::TrajectoryMismatch {
                    step: trajectory.len(),
                    message: "episode finished without an outcome".to_string(),
                })?;
            match outcome {
                GameOutcome::Win(winner) if winner == LEARNER => wins += 1,
                GameOutcome::Win(_) => losses += 1,
                GameOutcome::Draw => draws += 1,
            }
            debug!(
                "episode {episode}: {outcome:?} in {} plies, ε={:.4}",
                trajectory.len(),
                policy.exploration_rate()
            );

            for observer in &mut self.observers {
                observer.on_episode_end(episode, outcome, policy.exploration_rate())?;
            }

            if self.config.record_trajectories {
                self.trajectories.push(trajectory);
            }
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let result = TrainingResult::new(episodes, wins, draws, losses, policy.exploration_rate());
        info!(
            "training finished: {wins} wins, {draws} draws, {losses} losses; {} table entries",
            policy.table().len()
        );
        Ok(result)
    }

    /// Fold stored episodes into the policy's table.
    ///
    /// Invalid episodes are skipped with a warning; the rest are applied in
    /// order. Exploration does not decay. Returns the number of episodes
    /// applied.
    pub fn replay(&self, policy: &mut Policy, log: &TrajectoryLog) -> Result<usize> {
        self.config.validate()?;
        let rule = self.config.update_rule();

        let mut applied = 0;
        for (index, trajectory) in log.episodes.iter().enumerate() {
            match rule.apply(policy.table_mut(), trajectory) {
                Ok(_) => applied += 1,
                Err(err) => warn!("skipping recorded episode {index}: {err}"),
            }
        }
        info!("replayed {applied} of {} recorded episodes", log.len());
        Ok(applied)
    }

    /// Episodes recorded since the last call
    pub fn take_trajectories(&mut self) -> TrajectoryLog {
        mem::take(&mut self.trajectories)
    }
}
