//! State-action value table with an optimistic default.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::game::StateKey;

/// Value assumed for any (state, column) pair not yet in the table. Starting
/// above any reachable reward nudges greedy play toward untried moves.
pub const OPTIMISTIC_DEFAULT: f64 = 1.0;

/// Values for every column tried from one state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableEntry {
    pub state: StateKey,
    pub values: BTreeMap<usize, f64>,
}

/// Maps (state, column) to a value estimate. Reading an unseen pair inserts
/// the default, so the table grows with every state the agent looks at.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionValueTable {
    values: HashMap<StateKey, BTreeMap<usize, f64>>,
    default: f64,
}

impl ActionValueTable {
    pub fn new() -> Self {
        Self::with_default(OPTIMISTIC_DEFAULT)
    }

    pub fn with_default(default: f64) -> Self {
        ActionValueTable {
            values: HashMap::new(),
            default,
        }
    }

    /// Value of `(state, action)`, inserting the default if unseen.
    pub fn get(&mut self, state: &StateKey, action: usize) -> f64 {
        let default = self.default;
        match self.values.get_mut(state) {
            Some(row) => *row.entry(action).or_insert(default),
            None => {
                self.values
                    .insert(state.clone(), BTreeMap::from([(action, default)]));
                default
            }
        }
    }

    /// Stored value without inserting anything.
    pub fn peek(&self, state: &StateKey, action: usize) -> Option<f64> {
        self.values
            .get(state)
            .and_then(|row| row.get(&action))
            .copied()
    }

    pub fn set(&mut self, state: &StateKey, action: usize, value: f64) {
        match self.values.get_mut(state) {
            Some(row) => {
                row.insert(action, value);
            }
            None => {
                self.values
                    .insert(state.clone(), BTreeMap::from([(action, value)]));
            }
        }
    }

    /// Highest value over `actions` in `state`, inserting defaults for unseen
    /// pairs. `None` when `actions` is empty.
    pub fn max_value(&mut self, state: &StateKey, actions: &[usize]) -> Option<f64> {
        actions
            .iter()
            .map(|&action| self.get(state, action))
            .reduce(f64::max)
    }

    /// Value read for a pair that has never been written.
    pub fn default_value(&self) -> f64 {
        self.default
    }

    /// Number of (state, action) pairs stored.
    pub fn len(&self) -> usize {
        self.values.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of distinct states seen.
    pub fn state_count(&self) -> usize {
        self.values.len()
    }

    /// Entries sorted by state, for deterministic serialization.
    pub fn entries(&self) -> Vec<TableEntry> {
        let mut entries: Vec<TableEntry> = self
            .values
            .iter()
            .map(|(state, values)| TableEntry {
                state: state.clone(),
                values: values.clone(),
            })
            .collect();
        entries.sort_by(|a, b| a.state.cmp(&b.state));
        entries
    }

    pub fn from_entries(entries: Vec<TableEntry>, default: f64) -> Self {
        let mut table = Self::with_default(default);
        for entry in entries {
            table
                .values
                .entry(entry.state)
                .or_default()
                .extend(entry.values);
        }
        table
    }
}

impl Default for ActionValueTable {
    fn default() -> Self {
        Self::new()
    }
}
