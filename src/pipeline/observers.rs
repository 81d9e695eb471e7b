//! Observer implementations for training

use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use serde::{Deserialize, Serialize};

use super::training::LEARNER;
use crate::{Result, ports::Observer, tictactoe::GameOutcome};

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    wins: usize,
    draws: usize,
    losses: usize,
}

impl Tally {
    fn record(&mut self, outcome: GameOutcome) {
        match outcome {
            GameOutcome::Win(winner) if winner == LEARNER => self.wins += 1,
            GameOutcome::Win(_) => self.losses += 1,
            GameOutcome::Draw => self.draws += 1,
        }
    }

    fn total(&self) -> usize {
        self.wins + self.draws + self.losses
    }

    fn rate(&self, count: usize) -> f64 {
        match self.total() {
            0 => 0.0,
            total => count as f64 / total as f64,
        }
    }
}

/// Progress bar observer
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    tally: Tally,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            tally: Tally::default(),
        }
    }

    fn message(&self) -> String {
        format!(
            "{} D:{} L:{}",
            self.tally.wins, self.tally.draws, self.tally.losses
        )
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes (W:{msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(
        &mut self,
        episode: usize,
        outcome: GameOutcome,
        _exploration_rate: f64,
    ) -> Result<()> {
        self.tally.record(outcome);
        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer that tracks outcome rates
#[derive(Debug, Default)]
pub struct MetricsObserver {
    tally: Tally,
    last_exploration: Option<f64>,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn episodes(&self) -> usize {
        self.tally.total()
    }

    pub fn win_rate(&self) -> f64 {
        self.tally.rate(self.tally.wins)
    }

    pub fn draw_rate(&self) -> f64 {
        self.tally.rate(self.tally.draws)
    }

    pub fn loss_rate(&self) -> f64 {
        self.tally.rate(self.tally.losses)
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            episodes: self.episodes(),
            wins: self.tally.wins,
            draws: self.tally.draws,
            losses: self.tally.losses,
            win_rate: self.win_rate(),
            draw_rate: self.draw_rate(),
            loss_rate: self.loss_rate(),
            last_exploration: self.last_exploration,
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub episodes: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub draw_rate: f64,
    pub loss_rate: f64,
    pub last_exploration: Option<f64>,
}

impl Observer for MetricsObserver {
    fn on_episode_end(
        &mut self,
        _episode: usize,
        outcome: GameOutcome,
        exploration_rate: f64,
    ) -> Result<()> {
        self.tally.record(outcome);
        self.last_exploration = Some(exploration_rate);
        Ok(())
    }
}

/// Logs a windowed summary every `interval` episodes
pub struct LoggingObserver {
    interval: usize,
    window: Tally,
}

impl LoggingObserver {
    pub fn new(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
            window: Tally::default(),
        }
    }
}

impl Observer for LoggingObserver {
    fn on_episode_end(
        &mut self,
        episode: usize,
        outcome: GameOutcome,
        exploration_rate: f64,
    ) -> Result<()> {
        self.window.record(outcome);
        if (episode + 1).is_multiple_of(self.interval) {
            info!(
                "episodes {}-{}: {} wins, {} draws, {} losses (ε={exploration_rate:.3})",
                episode + 1 - self.window.total(),
                episode,
                self.window.wins,
                self.window.draws,
                self.window.losses
            );
            self.window = Tally::default();
        }
        Ok(())
    }
}
