//! Tabular Q-learning
//!
//! The learner keeps one estimate per (state, action) pair and improves it
//! with one-step temporal-difference updates after every finished episode.
//!
//! ## Pieces
//!
//! | Type | Role |
//! |------|------|
//! | [`ValueTable`] | Q(s,a) store, unseen pairs read as 0.0 |
//! | [`Policy`] | Epsilon-greedy selection over the table |
//! | [`Trajectory`] | Ordered record of one episode |
//! | [`TdUpdate`] | `Q ← (1-α)Q + α(r + γ max Q(s'))` over a trajectory |
//!
//! ## Usage Example
//!
//! ```no_run
//! use qttt::q_learning::{ExplorationSchedule, Policy, TdUpdate, ValueTable};
//!
//! let policy = Policy::new(ValueTable::new(), ExplorationSchedule::default()).with_seed(7);
//! let rule = TdUpdate::new(
//!     0.1, // learning_rate
//!     0.9, // discount_factor
//! );
//! # let _ = (policy, rule);
//! ```

pub mod policy;
pub mod trajectory;
pub mod update;
pub mod value_table;

pub use policy::{ExplorationSchedule, Policy};
pub use trajectory::{NextState, Step, Trajectory, TrajectoryLog, Transition};
pub use update::TdUpdate;
pub use value_table::ValueTable;
