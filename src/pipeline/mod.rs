//! Training and evaluation pipelines
//!
//! This module provides:
//! - The training loop (play, TD update, exploration decay)
//! - Frozen-policy evaluation
//! - Opponents and observers that plug into both

pub mod evaluation;
pub mod observers;
pub mod opponents;
pub mod training;

pub use evaluation::{EvaluationResult, evaluate};
pub use observers::{LoggingObserver, MetricsObserver, MetricsSummary, ProgressObserver};
pub use opponents::{FrozenPolicy, RandomOpponent};
pub use training::{LEARNER, Trainer, TrainingConfig, TrainingResult};

pub use crate::ports::{Agent, Observer};
