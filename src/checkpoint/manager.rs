use std::cmp::Ordering;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::ai::{QLearningAgent, TableSnapshot};
use crate::checkpoint::metadata::{CheckpointMetadata, CheckpointMetrics};
use crate::error::CheckpointError;

const TABLE_FILE: &str = "q_table.json";
const METADATA_FILE: &str = "metadata.json";
const LATEST_FILE: &str = "latest";

/// Configuration for the checkpoint manager.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CheckpointManagerConfig {
    pub checkpoint_dir: PathBuf,
    pub keep_last_n: usize,
    pub keep_best_n: usize,
}

impl Default for CheckpointManagerConfig {
    fn default() -> Self {
        CheckpointManagerConfig {
            checkpoint_dir: PathBuf::from("checkpoints"),
            keep_last_n: 5,
            keep_best_n: 3,
        }
    }
}

/// A loaded checkpoint: where it lives, its metadata, and the saved table.
#[derive(Debug)]
pub struct CheckpointData {
    pub path: PathBuf,
    pub metadata: CheckpointMetadata,
    pub table: TableSnapshot,
}

/// Manages saving, loading, listing, and pruning checkpoints.
///
/// Each checkpoint is a `checkpoint_NNNNNNN/` directory holding `q_table.json`
/// and `metadata.json`. A plain-text `latest` file names the newest one.
pub struct CheckpointManager {
    config: CheckpointManagerConfig,
}

impl CheckpointManager {
    pub fn new(config: CheckpointManagerConfig) -> Self {
        fs::create_dir_all(&config.checkpoint_dir).ok();
        CheckpointManager { config }
    }

    /// Write the agent's table and metadata, point `latest` at it, then prune.
    pub fn save_checkpoint(
        &self,
        agent: &QLearningAgent,
        metrics: &CheckpointMetrics,
        episode: usize,
    ) -> Result<PathBuf, CheckpointError> {
        let dir_name = format!("checkpoint_{:07}", episode);
        let tmp_dir = self.config.checkpoint_dir.join(format!("{}.tmp", dir_name));
        let final_dir = self.config.checkpoint_dir.join(&dir_name);

        fs::create_dir_all(&tmp_dir)?;

        let table_json = serde_json::to_string(&agent.snapshot())?;
        fs::write(tmp_dir.join(TABLE_FILE), table_json)?;

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let metadata = CheckpointMetadata::for_agent(agent, metrics, episode, timestamp);
        fs::write(
            tmp_dir.join(METADATA_FILE),
            serde_json::to_string_pretty(&metadata)?,
        )?;

        if final_dir.exists() {
            fs::remove_dir_all(&final_dir)?;
        }
        fs::rename(&tmp_dir, &final_dir)?;

        self.update_latest(&dir_name)?;
        self.prune_old_checkpoints(&final_dir)?;

        Ok(final_dir)
    }

    /// Load the checkpoint stored in `dir`.
    pub fn load_checkpoint(&self, dir: &Path) -> Result<CheckpointData, CheckpointError> {
        let metadata = read_metadata(&dir.join(METADATA_FILE))?;

        let table_json = fs::read_to_string(dir.join(TABLE_FILE))?;
        let table: TableSnapshot = serde_json::from_str(&table_json)?;
        if table.version != TableSnapshot::VERSION {
            return Err(CheckpointError::Version {
                found: table.version,
                expected: TableSnapshot::VERSION,
            });
        }

        Ok(CheckpointData {
            path: dir.to_path_buf(),
            metadata,
            table,
        })
    }

    /// Load whichever checkpoint `latest` names.
    pub fn load_latest(&self) -> Result<CheckpointData, CheckpointError> {
        let pointer = self.config.checkpoint_dir.join(LATEST_FILE);
        if !pointer.is_file() {
            return Err(CheckpointError::NoLatest(self.config.checkpoint_dir.clone()));
        }
        let name = fs::read_to_string(&pointer)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(CheckpointError::NoLatest(self.config.checkpoint_dir.clone()));
        }
        self.load_checkpoint(&self.config.checkpoint_dir.join(name))
    }

    /// List all checkpoints sorted by episode (ascending).
    pub fn list_checkpoints(
        &self,
    ) -> Result<Vec<(PathBuf, CheckpointMetadata)>, CheckpointError> {
        if !self.config.checkpoint_dir.is_dir() {
            return Err(CheckpointError::DirNotFound(
                self.config.checkpoint_dir.clone(),
            ));
        }

        let mut results = Vec::new();
        for entry in fs::read_dir(&self.config.checkpoint_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if !name_str.starts_with("checkpoint_") || name_str.ends_with(".tmp") {
                continue;
            }
            let meta_path = path.join(METADATA_FILE);
            if meta_path.exists() {
                let metadata = read_metadata(&meta_path)?;
                results.push((path, metadata));
            }
        }
        results.sort_by_key(|(_, m)| m.episode);
        Ok(results)
    }

    /// Keep the union of the last N by episode and the best N by win rate.
    /// `current` survives regardless, so `latest` always resolves.
    fn prune_old_checkpoints(&self, current: &Path) -> Result<(), CheckpointError> {
        let checkpoints = self.list_checkpoints()?;
        if checkpoints.len() <= self.config.keep_last_n {
            return Ok(());
        }

        let total = checkpoints.len();
        let mut keep: HashSet<usize> =
            (total.saturating_sub(self.config.keep_last_n)..total).collect();

        let mut by_win_rate: Vec<(usize, f32)> = checkpoints
            .iter()
            .enumerate()
            .map(|(i, (_, m))| (i, m.metrics.win_rate))
            .collect();
        by_win_rate.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        keep.extend(
            by_win_rate
                .iter()
                .take(self.config.keep_best_n)
                .map(|(i, _)| *i),
        );
        keep.extend(
            checkpoints
                .iter()
                .position(|(path, _)| path.as_path() == current),
        );

        for (i, (path, meta)) in checkpoints.iter().enumerate() {
            if !keep.contains(&i) {
                log::debug!("pruning checkpoint at episode {}", meta.episode);
                fs::remove_dir_all(path)?;
            }
        }

        Ok(())
    }

    fn update_latest(&self, dir_name: &str) -> Result<(), CheckpointError> {
        let pointer = self.config.checkpoint_dir.join(LATEST_FILE);
        let tmp = self.config.checkpoint_dir.join(format!("{}.tmp", LATEST_FILE));
        fs::write(&tmp, dir_name)?;
        fs::rename(&tmp, &pointer)?;
        Ok(())
    }
}

fn read_metadata(path: &Path) -> Result<CheckpointMetadata, CheckpointError> {
    let json = fs::read_to_string(path).map_err(|e| CheckpointError::MetadataRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&json).map_err(|e| CheckpointError::MetadataParse {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{Agent, QLearningConfig};
    use crate::game::{GameState, Player};

    fn test_metrics() -> CheckpointMetrics {
        CheckpointMetrics {
            seat_wins: [12, 7],
            ties: 1,
            win_rate: 0.6,
            average_game_length: 21.5,
            table_entries: 3,
        }
    }

    fn manager(dir: &Path, keep_last_n: usize, keep_best_n: usize) -> CheckpointManager {
        CheckpointManager::new(CheckpointManagerConfig {
            checkpoint_dir: dir.to_path_buf(),
            keep_last_n,
            keep_best_n,
        })
    }

    fn trained_agent() -> QLearningAgent {
        let mut agent = QLearningAgent::new(Player::Yellow, &QLearningConfig::default());
        let state = GameState::initial().snapshot();
        agent.table_mut().set(&state, 3, 0.123456789);
        agent.table_mut().set(&state, 0, -1.75);
        agent
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path(), 5, 3);
        let agent = trained_agent();

        let path = manager
            .save_checkpoint(&agent, &test_metrics(), 1000)
            .unwrap();
        assert!(path.ends_with("checkpoint_0001000"));
        assert!(path.join("metadata.json").exists());
        assert!(path.join("q_table.json").exists());

        let data = manager.load_checkpoint(&path).unwrap();
        assert_eq!(data.metadata.episode, 1000);
        assert_eq!(data.metadata.algorithm, "Q-learning");
        assert_eq!(data.metadata.player, Some(Player::Yellow));
        assert_eq!(data.metadata.metrics.seat_wins, [12, 7]);
        assert!((data.metadata.hyperparameters.alpha - 0.3).abs() < 1e-12);

        let restored = QLearningAgent::from_snapshot(data.table);
        assert_eq!(restored.table(), agent.table());
        assert_eq!(restored.player(), Player::Yellow);
    }

    #[test]
    fn test_latest_points_at_newest() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path(), 5, 3);
        let agent = trained_agent();

        manager.save_checkpoint(&agent, &test_metrics(), 1000).unwrap();
        manager.save_checkpoint(&agent, &test_metrics(), 2000).unwrap();

        let latest = manager.load_latest().unwrap();
        assert_eq!(latest.metadata.episode, 2000);
        assert!(!dir.path().join("latest.tmp").exists());
    }

    #[test]
    fn test_load_latest_without_pointer() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path(), 5, 3);

        let err = manager.load_latest().unwrap_err();
        assert!(
            matches!(err, CheckpointError::NoLatest(_)),
            "expected NoLatest, got: {err}"
        );
    }

    #[test]
    fn test_list_checkpoints() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path(), 10, 10);
        let agent = trained_agent();

        for ep in [3000, 1000, 2000] {
            manager.save_checkpoint(&agent, &test_metrics(), ep).unwrap();
        }
        // stray entries are ignored
        fs::create_dir_all(dir.path().join("checkpoint_0009999.tmp")).unwrap();
        fs::create_dir_all(dir.path().join("other")).unwrap();

        let list = manager.list_checkpoints().unwrap();
        let episodes: Vec<usize> = list.iter().map(|(_, m)| m.episode).collect();
        assert_eq!(episodes, vec![1000, 2000, 3000]);
    }

    #[test]
    fn test_list_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");
        let manager = manager(&missing, 5, 3);
        fs::remove_dir_all(&missing).unwrap();

        let err = manager.list_checkpoints().unwrap_err();
        assert!(matches!(err, CheckpointError::DirNotFound(_)));
    }

    #[test]
    fn test_pruning() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path(), 2, 1);
        let agent = trained_agent();

        let win_rates = [0.5, 0.9, 0.3, 0.6, 0.7];
        for (i, &wr) in win_rates.iter().enumerate() {
            let mut metrics = test_metrics();
            metrics.win_rate = wr;
            manager
                .save_checkpoint(&agent, &metrics, (i + 1) * 1000)
                .unwrap();
        }

        let episodes: Vec<usize> = manager
            .list_checkpoints()
            .unwrap()
            .iter()
            .map(|(_, m)| m.episode)
            .collect();
        // last two plus the best win rate
        assert_eq!(episodes, vec![2000, 4000, 5000]);
    }

    #[test]
    fn test_zero_retention_keeps_current_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path(), 0, 0);
        let agent = trained_agent();

        let first = manager.save_checkpoint(&agent, &test_metrics(), 5).unwrap();
        assert!(first.exists());
        assert_eq!(manager.load_latest().unwrap().metadata.episode, 5);

        let second = manager.save_checkpoint(&agent, &test_metrics(), 10).unwrap();
        assert!(second.exists());
        assert!(!first.exists());
        let latest = manager.load_latest().unwrap();
        assert_eq!(latest.metadata.episode, 10);
        assert_eq!(QLearningAgent::from_snapshot(latest.table).table(), agent.table());
    }

    #[test]
    fn test_resaving_older_episode_survives_pruning() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path(), 1, 0);
        let agent = trained_agent();

        manager.save_checkpoint(&agent, &test_metrics(), 20).unwrap();
        let older = manager.save_checkpoint(&agent, &test_metrics(), 10).unwrap();
        assert!(older.exists());
        assert_eq!(manager.load_latest().unwrap().metadata.episode, 10);
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path(), 5, 3);
        let path = manager
            .save_checkpoint(&trained_agent(), &test_metrics(), 10)
            .unwrap();

        let mut snapshot = trained_agent().snapshot();
        snapshot.version = TableSnapshot::VERSION + 1;
        fs::write(
            path.join("q_table.json"),
            serde_json::to_string(&snapshot).unwrap(),
        )
        .unwrap();

        let err = manager.load_checkpoint(&path).unwrap_err();
        assert!(matches!(
            err,
            CheckpointError::Version { found, expected } if found == expected + 1
        ));
    }

    #[test]
    fn test_corrupt_metadata_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path(), 5, 3);
        let path = manager
            .save_checkpoint(&trained_agent(), &test_metrics(), 10)
            .unwrap();
        fs::write(path.join("metadata.json"), "{ not json").unwrap();

        let err = manager.load_checkpoint(&path).unwrap_err();
        assert!(matches!(err, CheckpointError::MetadataParse { .. }));
    }

    #[test]
    fn test_metadata_without_player_parses() {
        let json = r#"{
            "episode": 40,
            "timestamp": 1700000000,
            "algorithm": "Q-learning",
            "metrics": {
                "seat_wins": [20, 15],
                "ties": 5,
                "win_rate": 0.5,
                "average_game_length": 19.0,
                "table_entries": 812
            },
            "hyperparameters": { "epsilon": 0.2, "alpha": 0.3, "gamma": 0.9 }
        }"#;
        let meta: CheckpointMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.episode, 40);
        assert!(meta.player.is_none());
    }
}
