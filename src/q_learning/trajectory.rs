//! Episode records and the learner transitions derived from them

use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    ports::Repository,
    tictactoe::{BoardState, GameOutcome, Player},
    types::{Action, StateKey},
};

/// One ply: the board before the move, who moved, where, and the immediate
/// reward from the learner's perspective (0 for every non-terminal ply).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub board: BoardState,
    pub player: Player,
    pub action: Action,
    pub reward: f64,
}

/// Ordered plies of one episode, ending in a win, loss or draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub learner: Player,
    pub steps: Vec<Step>,
    pub outcome: Option<GameOutcome>,
}

/// Successor of a learner transition: the board at the learner's next turn
#[derive(Debug, Clone, PartialEq)]
pub struct NextState {
    pub state: StateKey,
    pub actions: Vec<Action>,
}

/// (s, a, r, s') for one learner move
///
/// `next` is `None` when the episode ended on the learner's move or on the
/// opponent's reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: StateKey,
    pub action: Action,
    pub reward: f64,
    pub next: Option<NextState>,
}

impl Trajectory {
    pub fn new(learner: Player) -> Self {
        Self {
            learner,
            steps: Vec::new(),
            outcome: None,
        }
    }

    pub fn record(&mut self, board: BoardState, player: Player, action: Action, reward: f64) {
        self.steps.push(Step {
            board,
            player,
            action,
            reward,
        });
    }

    pub fn finish(&mut self, outcome: GameOutcome) {
        self.outcome = Some(outcome);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Replay the episode and derive the learner's transitions.
    ///
    /// Every step is checked before anything is returned: the recorded board
    /// must match the replayed one, the mover must be the player whose turn it
    /// is, the action must be legal and the reward must agree with the
    /// outcome. A trajectory that fails any check yields no transitions.
    ///
    /// # Errors
    ///
    /// [`Error::IllegalMove`] for an out-of-range or occupied action,
    /// [`Error::TrajectoryMismatch`] for any other inconsistency.
    pub fn transitions(&self) -> Result<Vec<Transition>> {
        let mut board = BoardState::new();
        let mut transitions = Vec::new();
        // Learner move still waiting for its successor state, with the reward
        // accumulated since it was played.
        let mut pending: Option<(StateKey, Action, f64)> = None;

        for (i, step) in self.steps.iter().enumerate() {
            if board.is_terminal() {
                return Err(mismatch(i, "move recorded after the game ended"));
            }
            if step.board != board {
                return Err(mismatch(
                    i,
                    format!(
                        "recorded board {} but replay reached {}",
                        step.board.state_key(),
                        board.state_key()
                    ),
                ));
            }
            if step.player != board.to_move() {
                return Err(mismatch(
                    i,
                    format!("{} recorded but {} is to move", step.player, board.to_move()),
                ));
            }

            let next = board.apply_action(step.action, step.player)?;
            let expected_reward = next
                .outcome()
                .map_or(0.0, |outcome| outcome.reward_for(self.learner));
            if step.reward != expected_reward {
                return Err(mismatch(
                    i,
                    format!(
                        "recorded reward {} but the position is worth {expected_reward}",
                        step.reward
                    ),
                ));
            }

            if step.player == self.learner {
                if let Some((state, action, reward)) = pending.take() {
                    transitions.push(Transition {
                        state,
                        action,
                        reward,
                        next: Some(NextState {
                            state: board.state_key(),
                            actions: board.legal_actions(),
                        }),
                    });
                }
                pending = Some((board.state_key(), step.action, step.reward));
            } else if let Some((_, _, reward)) = pending.as_mut() {
                *reward += step.reward;
            }

            board = next;
        }

        let Some(final_outcome) = board.outcome() else {
            return Err(mismatch(
                self.steps.len(),
                "trajectory ends before the game is over",
            ));
        };
        if let Some(recorded) = self.outcome
            && recorded != final_outcome
        {
            return Err(mismatch(
                self.steps.len(),
                format!("recorded outcome {recorded:?} but replay ended in {final_outcome:?}"),
            ));
        }

        if let Some((state, action, reward)) = pending {
            transitions.push(Transition {
                state,
                action,
                reward,
                next: None,
            });
        }

        Ok(transitions)
    }
}

fn mismatch(step: usize, message: impl Into<String>) -> Error {
    Error::TrajectoryMismatch {
        step,
        message: message.into(),
    }
}

/// Ordered collection of recorded episodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryLog {
    pub episodes: Vec<Trajectory>,
}

impl TrajectoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, trajectory: Trajectory) {
        self.episodes.push(trajectory);
    }

    pub fn extend(&mut self, other: TrajectoryLog) {
        self.episodes.extend(other.episodes);
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    /// Load a log, falling back to an empty one with a warning
    pub fn load_or_default(repository: &dyn Repository, path: &Path) -> TrajectoryLog {
        match repository.load_trajectories(path) {
            Ok(log) => {
                info!(
                    "loaded {} recorded episodes from {}",
                    log.len(),
                    path.display()
                );
                log
            }
            Err(err) if err.is_not_found() => {
                warn!(
                    "trajectory log {} not found; starting with an empty log",
                    path.display()
                );
                TrajectoryLog::new()
            }
            Err(err) => {
                warn!("{err}; starting with an empty trajectory log");
                TrajectoryLog::new()
            }
        }
    }

    pub fn save(&self, repository: &dyn Repository, path: &Path) -> Result<()> {
        repository.save_trajectories(self, path)?;
        info!("saved {} episodes to {}", self.len(), path.display());
        Ok(())
    }
}
