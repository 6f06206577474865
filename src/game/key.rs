use std::fmt;

use serde::{Deserialize, Serialize};

use super::board::Cell;

/// Canonical, immutable encoding of a full grid: one digit per cell in
/// row-major order (`0` empty, `1` red, `2` yellow).
///
/// Used as the value-table key and as the on-disk representation of a state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateKey(String);

impl StateKey {
    pub fn encode(cells: &[Cell]) -> Self {
        StateKey(cells.iter().map(|cell| cell.code()).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of cells encoded.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
