//! Observer port - hooks into the training loop
//!
//! Observers collect progress and metrics without the trainer knowing about
//! any output format.

use crate::{Result, tictactoe::GameOutcome};

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - once
/// 2. `on_episode_end(episode, outcome, exploration_rate)` - after every
///    episode, once the value update and exploration decay are done
/// 3. `on_training_end()` - once
///
/// # Examples
///
/// ```no_run
/// use qttt::{ports::Observer, tictactoe::GameOutcome};
///
/// struct DrawCounter {
///     draws: usize,
/// }
///
/// impl Observer for DrawCounter {
///     fn on_episode_end(
///         &mut self,
///         _episode: usize,
///         outcome: GameOutcome,
///         _exploration_rate: f64,
///     ) -> qttt::Result<()> {
///         if outcome == GameOutcome::Draw {
///             self.draws += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called once before the first episode.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each episode.
    ///
    /// `episode` is 0-based; `exploration_rate` is the rate that will be used
    /// for the next episode.
    fn on_episode_end(
        &mut self,
        _episode: usize,
        _outcome: GameOutcome,
        _exploration_rate: f64,
    ) -> Result<()> {
        Ok(())
    }

    /// Called once after the last episode.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
