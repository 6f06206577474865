//! Core Connect Four game logic: board representation, the run-length graph
//! that tracks like-coloured runs incrementally, win detection, and the
//! turn-keeping game state.

mod board;
mod detector;
mod graph;
mod key;
mod player;
mod state;

pub use crate::error::{BoardError, MoveError};
pub use board::{
    Board, BoardConfig, Cell, Move, DEFAULT_COLS, DEFAULT_ROWS, DEFAULT_WIN_LENGTH,
};
pub use detector::{GameOutcome, WinDetector};
pub use graph::{Direction, Node, RunLengthGraph};
pub use key::StateKey;
pub use player::Player;
pub use state::GameState;
