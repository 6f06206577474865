use std::path::PathBuf;

/// Errors raised when a move cannot be applied.
///
/// A rejected move never mutates the board; callers holding a human seat can
/// simply re-prompt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column is already filled")]
    ColumnFull,

    #[error("column is outside the board")]
    InvalidColumn,

    #[error("game is already over")]
    GameOver,
}

/// Errors raised when constructing a board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("invalid board dimensions {rows}x{cols}: both must be >= 1")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("win length must be >= 1")]
    InvalidWinLength,
}

/// Errors that can occur during checkpoint operations.
#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    #[error("checkpoint directory not found: {0}")]
    DirNotFound(PathBuf),

    #[error("no 'latest' checkpoint recorded in {0}")]
    NoLatest(PathBuf),

    #[error("failed to read {path}: {source}")]
    MetadataRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    MetadataParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("unsupported value table format version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur during play and training.
#[derive(Debug, thiserror::Error)]
pub enum TrainingError {
    #[error("agent selected illegal action {action} (legal: {legal:?})")]
    IllegalAction { action: usize, legal: Vec<usize> },

    #[error("both seats hold the same colour")]
    SeatColours,

    #[error("board error: {0}")]
    Board(#[from] BoardError),

    #[error("move error: {0}")]
    Move(#[from] MoveError),

    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
