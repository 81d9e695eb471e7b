//! Tabular action-value store

use std::{collections::HashMap, path::Path};

use log::{info, warn};
use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    ports::Repository,
    types::{Action, StateKey},
};

/// Mapping from (state, action) to an estimate of expected discounted return
/// for the learning player.
///
/// Unseen pairs read as 0.0. Serializes as a nested map
/// `{ "X...O....": { "1,1": 0.42, ... }, ... }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueTable {
    entries: HashMap<StateKey, HashMap<Action, f64>>,
}

impl ValueTable {
    /// Value used for any pair that has never been written
    pub const DEFAULT_VALUE: f64 = 0.0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Stored estimate, or 0.0 when the pair is unseen
    pub fn get(&self, state: &StateKey, action: Action) -> f64 {
        self.entries
            .get(state)
            .and_then(|actions| actions.get(&action))
            .copied()
            .unwrap_or(Self::DEFAULT_VALUE)
    }

    /// Overwrite the stored estimate
    pub fn update(&mut self, state: &StateKey, action: Action, value: f64) {
        match self.entries.get_mut(state) {
            Some(actions) => {
                actions.insert(action, value);
            }
            None => {
                self.entries
                    .insert(state.clone(), HashMap::from([(action, value)]));
            }
        }
    }

    /// Move the estimate a fraction `learning_rate` of the way toward `target`:
    ///
    /// Q(s,a) ← (1-α)·Q(s,a) + α·target
    ///
    /// Returns the new estimate.
    pub fn blend(
        &mut self,
        state: &StateKey,
        action: Action,
        target: f64,
        learning_rate: f64,
    ) -> f64 {
        let current = self.get(state, action);
        let updated = (1.0 - learning_rate) * current + learning_rate * target;
        self.update(state, action, updated);
        updated
    }

    /// Maximum estimate over `candidates`; 0.0 when there are none
    pub fn max_value(&self, state: &StateKey, candidates: &[Action]) -> f64 {
        candidates
            .iter()
            .map(|&action| self.get(state, action))
            .reduce(f64::max)
            .unwrap_or(Self::DEFAULT_VALUE)
    }

    /// Candidate with the highest estimate.
    ///
    /// Ties are broken uniformly at random through `rng`, never by candidate
    /// order. Returns `None` for an empty candidate list.
    pub fn best_action<R: Rng + ?Sized>(
        &self,
        state: &StateKey,
        candidates: &[Action],
        rng: &mut R,
    ) -> Option<Action> {
        if candidates.is_empty() {
            return None;
        }
        let best = self.max_value(state, candidates);
        let ties: Vec<Action> = candidates
            .iter()
            .copied()
            .filter(|&action| self.get(state, action) == best)
            .collect();
        ties.choose(rng).copied()
    }

    /// Number of stored (state, action) pairs
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of distinct states with at least one stored pair
    pub fn state_count(&self) -> usize {
        self.entries.len()
    }

    /// Iterate over every stored `(state, action, value)` triple
    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, Action, f64)> + '_ {
        self.entries.iter().flat_map(|(state, actions)| {
            actions
                .iter()
                .map(move |(&action, &value)| (state, action, value))
        })
    }

    /// Fold another table into this one; entries from `other` win.
    ///
    /// This is the merge step for independently trained shards.
    pub fn merge(&mut self, other: ValueTable) {
        for (state, actions) in other.entries {
            self.entries.entry(state).or_default().extend(actions);
        }
    }

    /// Remove every stored estimate
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Load a table, falling back to an empty one.
    ///
    /// A missing or malformed source is not fatal: the problem is logged as a
    /// warning and a fresh table is returned.
    pub fn load_or_default(repository: &dyn Repository, path: &Path) -> ValueTable {
        match repository.load_table(path) {
            Ok(table) => {
                info!(
                    "loaded value table from {} ({} entries across {} states)",
                    path.display(),
                    table.len(),
                    table.state_count()
                );
                table
            }
            Err(err) if err.is_not_found() => {
                warn!(
                    "value table {} not found; starting with an empty table",
                    path.display()
                );
                ValueTable::new()
            }
            Err(err) => {
                warn!("{err}; starting with an empty value table");
                ValueTable::new()
            }
        }
    }

    /// Persist the table through `repository`
    pub fn save(&self, repository: &dyn Repository, path: &Path) -> Result<()> {
        repository.save_table(self, path)?;
        info!(
            "saved value table to {} ({} entries)",
            path.display(),
            self.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn key(s: &str) -> StateKey {
        StateKey::parse(s).unwrap()
    }

    #[test]
    fn test_unseen_pair_defaults_to_zero() {
        let table = ValueTable::new();
        assert_eq!(table.get(&key("........."), Action::new(1, 1)), 0.0);
        assert!(table.is_empty());
    }

    #[test]
    fn test_update_overwrites() {
        let mut table = ValueTable::new();
        let state = key(".........");
        table.update(&state, Action::new(1, 1), 1.5);
        table.update(&state, Action::new(1, 1), -0.25);
        assert_eq!(table.get(&state, Action::new(1, 1)), -0.25);
        assert_eq!(table.len(), 1);
        assert_eq!(table.state_count(), 1);
    }

    #[test]
    fn test_max_value() {
        let mut table = ValueTable::new();
        let state = key(".........");
        table.update(&state, Action::new(0, 0), -0.5);
        table.update(&state, Action::new(0, 1), -1.5);

        let stored = [Action::new(0, 0), Action::new(0, 1)];
        assert_eq!(table.max_value(&state, &stored), -0.5);
        // An unseen candidate contributes its default of 0.0
        let with_unseen = [Action::new(0, 0), Action::new(2, 2)];
        assert_eq!(table.max_value(&state, &with_unseen), 0.0);
        assert_eq!(table.max_value(&state, &[]), 0.0);
    }

    #[test]
    fn test_best_action() {
        let mut table = ValueTable::new();
        let state = key(".........");
        table.update(&state, Action::new(0, 0), 0.5);
        table.update(&state, Action::new(1, 1), 1.5);
        table.update(&state, Action::new(2, 2), 0.8);

        let mut rng = StdRng::seed_from_u64(3);
        let candidates = [Action::new(0, 0), Action::new(1, 1), Action::new(2, 2)];
        for _ in 0..20 {
            assert_eq!(
                table.best_action(&state, &candidates, &mut rng),
                Some(Action::new(1, 1))
            );
        }
    }

    #[test]
    fn test_best_action_empty_candidates() {
        let table = ValueTable::new();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(table.best_action(&key("........."), &[], &mut rng), None);
    }

    #[test]
    fn test_best_action_breaks_ties_randomly() {
        let mut table = ValueTable::new();
        let state = key(".........");
        table.update(&state, Action::new(0, 0), 1.0);
        table.update(&state, Action::new(0, 2), 1.0);
        table.update(&state, Action::new(2, 0), 1.0);
        table.update(&state, Action::new(1, 1), 0.2);
        let candidates = [
            Action::new(0, 0),
            Action::new(0, 2),
            Action::new(1, 1),
            Action::new(2, 0),
        ];

        let mut rng = StdRng::seed_from_u64(17);
        let picks: HashSet<Action> = (0..200)
            .filter_map(|_| table.best_action(&state, &candidates, &mut rng))
            .collect();
        let expected: HashSet<Action> = [Action::new(0, 0), Action::new(0, 2), Action::new(2, 0)]
            .into_iter()
            .collect();
        assert_eq!(picks, expected);
    }

    #[test]
    fn test_best_action_reproducible_with_seed() {
        let table = ValueTable::new();
        let state = key(".........");
        let candidates: Vec<Action> = (0..9).map(Action::from_index).collect();

        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..10)
                .map(|_| table.best_action(&state, &candidates, &mut rng))
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(99), draw(99));
    }

    #[test]
    fn test_blend_converges_monotonically() {
        let mut table = ValueTable::new();
        let state = key(".........");
        let action = Action::new(1, 1);
        let (reward, discount, next_max) = (0.5, 0.9, 0.8);
        let fixed_point = reward + discount * next_max;

        let mut previous_gap = (fixed_point - table.get(&state, action)).abs();
        for _ in 0..200 {
            table.blend(&state, action, fixed_point, 0.1);
            let gap = (fixed_point - table.get(&state, action)).abs();
            assert!(gap < previous_gap, "gap must shrink every step");
            previous_gap = gap;
        }
        assert!(previous_gap < 1e-6);
    }

    #[test]
    fn test_merge_last_writer_wins() {
        let mut left = ValueTable::new();
        let mut right = ValueTable::new();
        let state = key(".........");
        left.update(&state, Action::new(0, 0), 1.0);
        left.update(&state, Action::new(0, 1), 2.0);
        right.update(&state, Action::new(0, 1), 5.0);
        right.update(&key("X........"), Action::new(1, 1), 3.0);

        left.merge(right);
        assert_eq!(left.get(&state, Action::new(0, 0)), 1.0);
        assert_eq!(left.get(&state, Action::new(0, 1)), 5.0);
        assert_eq!(left.get(&key("X........"), Action::new(1, 1)), 3.0);
        assert_eq!(left.len(), 3);
    }

    #[test]
    fn test_iter_visits_every_entry() {
        let mut table = ValueTable::new();
        table.update(&key("........."), Action::new(0, 0), 1.0);
        table.update(&key("X...O...."), Action::new(2, 2), -1.0);
        let total: f64 = table.iter().map(|(_, _, value)| value).sum();
        assert_eq!(table.iter().count(), 2);
        assert_eq!(total, 0.0);
    }
}
