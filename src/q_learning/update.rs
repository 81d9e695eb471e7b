//! One-step temporal-difference (Q-learning) update

use log::trace;
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    q_learning::{trajectory::Trajectory, value_table::ValueTable},
};

/// TD(0) update rule
///
/// For every learner transition `(s, a, r, s')` of an episode:
///
/// ```text
/// Q(s,a) ← (1-α)·Q(s,a) + α·(r + γ·max_a' Q(s',a'))
/// ```
///
/// with the lookahead term taken as 0 when `s'` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TdUpdate {
    pub learning_rate: f64,
    pub discount_factor: f64,
}

impl TdUpdate {
    pub fn new(learning_rate: f64, discount_factor: f64) -> Self {
        Self {
            learning_rate,
            discount_factor,
        }
    }

    /// Fold one finished episode into `table`.
    ///
    /// The whole trajectory is validated first; on error the table is left
    /// untouched. Returns the number of updated (state, action) pairs.
    pub fn apply(&self, table: &mut ValueTable, trajectory: &Trajectory) -> Result<usize> {
        let transitions = trajectory.transitions()?;

        // States never repeat within an episode, so a chronological pass reads
        // the same lookahead values as a pre-update snapshot would.
        for transition in &transitions {
            let lookahead = transition.next.as_ref().map_or(0.0, |next| {
                table.max_value(&next.state, &next.actions)
            });
            let target = transition.reward + self.discount_factor * lookahead;
            let updated = table.blend(
                &transition.state,
                transition.action,
                target,
                self.learning_rate,
            );
            trace!(
                "Q({}, {}) -> {updated:.4} (target {target:.4})",
                transition.state, transition.action
            );
        }

        Ok(transitions.len())
    }
}
