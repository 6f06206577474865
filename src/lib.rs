//! # Q-learning Connect Four
//!
//! Connect Four on a configurable grid, with an incremental run-length graph
//! for win detection and a tabular Q-learning agent trained by self-play.
//!
//! ## Modules
//!
//! - [`game`]: Board, run-length graph, win detector, state encoding
//! - [`ai`]: Agent trait, random player, Q-learning agent and value table
//! - [`training`]: Episode runner, self-play trainer, metrics collection
//! - [`checkpoint`]: Value table persistence and pruning
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod ai;
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod game;
pub mod training;
