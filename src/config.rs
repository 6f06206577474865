use std::path::Path;

use crate::ai::QLearningConfig;
use crate::checkpoint::CheckpointManagerConfig;
use crate::error::ConfigError;
use crate::game::BoardConfig;
use crate::training::trainer::TrainerConfig;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub board: BoardConfig,
    pub qlearning: QLearningConfig,
    pub training: TrainerConfig,
    pub checkpoint: CheckpointManagerConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board.rows == 0 || self.board.cols == 0 {
            return Err(ConfigError::Validation(
                "board.rows and board.cols must be >= 1".into(),
            ));
        }
        if self.board.win_length == 0 {
            return Err(ConfigError::Validation(
                "board.win_length must be >= 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.qlearning.epsilon) {
            return Err(ConfigError::Validation(
                "qlearning.epsilon must be in [0, 1]".into(),
            ));
        }
        if self.qlearning.alpha <= 0.0 || self.qlearning.alpha > 1.0 {
            return Err(ConfigError::Validation(
                "qlearning.alpha must be in (0, 1]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.qlearning.gamma) {
            return Err(ConfigError::Validation(
                "qlearning.gamma must be in [0, 1]".into(),
            ));
        }
        if self.training.num_episodes == 0 {
            return Err(ConfigError::Validation(
                "training.num_episodes must be > 0".into(),
            ));
        }
        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}
