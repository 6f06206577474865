use serde::{Deserialize, Serialize};

use super::board::DEFAULT_WIN_LENGTH;
use super::graph::RunLengthGraph;
use super::player::Player;

/// Terminal result of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Winner(Player),
    Tie,
}

impl GameOutcome {
    pub fn winner(self) -> Option<Player> {
        match self {
            GameOutcome::Winner(player) => Some(player),
            GameOutcome::Tie => None,
        }
    }
}

/// Decides win / tie / ongoing from the cells the last graph update touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinDetector {
    win_length: usize,
}

impl WinDetector {
    pub fn new(win_length: usize) -> Self {
        WinDetector { win_length }
    }

    /// First touched cell carrying a run of at least `win_length`.
    pub fn winning_cell(&self, graph: &RunLengthGraph) -> Option<usize> {
        graph
            .touched()
            .iter()
            .copied()
            .find(|&idx| graph.node_at(idx).longest_run() >= self.win_length)
    }

    /// Outcome after `mover` placed the coin that produced the graph's current
    /// touched set. `None` means the game goes on.
    pub fn detect(
        &self,
        graph: &RunLengthGraph,
        mover: Player,
        board_full: bool,
    ) -> Option<GameOutcome> {
        if self.winning_cell(graph).is_some() {
            Some(GameOutcome::Winner(mover))
        } else if board_full {
            Some(GameOutcome::Tie)
        } else {
            None
        }
    }
}

impl Default for WinDetector {
    fn default() -> Self {
        Self::new(DEFAULT_WIN_LENGTH)
    }
}
