use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BoardError, MoveError};

use super::graph::RunLengthGraph;
use super::key::StateKey;
use super::player::Player;

pub const DEFAULT_ROWS: usize = 6;
pub const DEFAULT_COLS: usize = 7;
pub const DEFAULT_WIN_LENGTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Red,
    Yellow,
}

impl Cell {
    /// Digit used by [`StateKey`].
    pub fn code(self) -> char {
        match self {
            Cell::Empty => '0',
            Cell::Red => '1',
            Cell::Yellow => '2',
        }
    }

    fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Red => 'R',
            Cell::Yellow => 'Y',
        }
    }
}

/// Board shape and win rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub rows: usize,
    pub cols: usize,
    pub win_length: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            win_length: DEFAULT_WIN_LENGTH,
        }
    }
}

/// A successfully applied drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub row: usize,
    pub col: usize,
    pub cell: Cell,
}

/// Grid of cells plus the run-length graph that mirrors it.
///
/// Row 0 is the top; coins settle at the highest free row index of a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    heights: Vec<usize>,
    filled: usize,
    previous: Option<Vec<Cell>>,
    last_move: Option<Move>,
    graph: RunLengthGraph,
}

impl Board {
    /// Create an empty `rows x cols` board. Zero-sized boards are rejected.
    pub fn new(rows: usize, cols: usize) -> Result<Self, BoardError> {
        if rows == 0 || cols == 0 {
            return Err(BoardError::InvalidDimensions { rows, cols });
        }
        Ok(Self::build(rows, cols))
    }

    pub fn from_config(config: &BoardConfig) -> Result<Self, BoardError> {
        Self::new(config.rows, config.cols)
    }

    fn build(rows: usize, cols: usize) -> Self {
        Board {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
            heights: vec![0; cols],
            filled: 0,
            previous: None,
            last_move: None,
            graph: RunLengthGraph::new(rows, cols),
        }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.cols + col]
    }

    /// Number of coins in `col`.
    pub fn column_count(&self, col: usize) -> usize {
        self.heights[col]
    }

    /// Total number of coins on the board.
    pub fn filled(&self) -> usize {
        self.filled
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    pub fn graph(&self) -> &RunLengthGraph {
        &self.graph
    }

    /// Out-of-range columns count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        col >= self.cols || self.heights[col] == self.rows
    }

    pub fn is_full(&self) -> bool {
        self.filled == self.rows * self.cols
    }

    /// Columns that still have room, ascending.
    pub fn legal_columns(&self) -> Vec<usize> {
        (0..self.cols)
            .filter(|&col| !self.is_column_full(col))
            .collect()
    }

    /// Drop a coin for `player` into `col`, returning the row where it landed.
    ///
    /// A rejected drop leaves the board untouched.
    pub fn drop_piece(&mut self, col: usize, player: Player) -> Result<usize, MoveError> {
        if col >= self.cols {
            return Err(MoveError::InvalidColumn);
        }
        if self.is_column_full(col) {
            return Err(MoveError::ColumnFull);
        }

        let row = self.rows - 1 - self.heights[col];
        let cell = player.to_cell();

        // Roll the previous snapshot forward to the grid as it is right now.
        let pending = self
            .last_move
            .map(|m| (m.row * self.cols + m.col, m.cell));
        let len = self.cells.len();
        let previous = self
            .previous
            .get_or_insert_with(|| vec![Cell::Empty; len]);
        if let Some((idx, prior)) = pending {
            previous[idx] = prior;
        }

        self.cells[row * self.cols + col] = cell;
        self.heights[col] += 1;
        self.filled += 1;
        self.last_move = Some(Move { row, col, cell });
        self.graph.update(row, col, cell);

        Ok(row)
    }

    /// Canonical encoding of the current grid.
    pub fn snapshot(&self) -> StateKey {
        StateKey::encode(&self.cells)
    }

    /// The grid as it was immediately before the last successful drop, by
    /// either side. `None` until the first drop.
    pub fn previous_snapshot(&self) -> Option<StateKey> {
        self.previous.as_deref().map(StateKey::encode)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::build(DEFAULT_ROWS, DEFAULT_COLS)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header: Vec<String> = (0..self.cols).map(|c| (c % 10).to_string()).collect();
        writeln!(f, "{}", header.join(" "))?;
        for row in 0..self.rows {
            let line: Vec<String> = (0..self.cols)
                .map(|col| self.get(row, col).symbol().to_string())
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
