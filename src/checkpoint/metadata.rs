use serde::{Deserialize, Serialize};

use crate::ai::{Agent, QLearningAgent};
use crate::game::Player;
use crate::training::metrics::TrainingMetrics;

/// Metrics snapshot at checkpoint time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointMetrics {
    pub seat_wins: [usize; 2],
    pub ties: usize,
    /// Share of all episodes so far won by the seat being saved.
    pub win_rate: f32,
    pub average_game_length: f32,
    pub table_entries: usize,
}

impl CheckpointMetrics {
    /// Metrics for saving the current leader mid-run.
    pub fn from_training(metrics: &TrainingMetrics, agent: &QLearningAgent) -> Self {
        let tally = metrics.tally();
        CheckpointMetrics {
            seat_wins: tally.wins,
            ties: tally.ties,
            win_rate: tally.win_share(tally.leader()),
            average_game_length: metrics.mean_game_length(),
            table_entries: agent.table().len(),
        }
    }
}

/// Hyperparameters recorded in checkpoint metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointHyperparameters {
    pub epsilon: f64,
    pub alpha: f64,
    pub gamma: f64,
}

/// Top-level checkpoint metadata written to metadata.json.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointMetadata {
    pub episode: usize,
    pub timestamp: u64,
    pub algorithm: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<Player>,
    pub metrics: CheckpointMetrics,
    pub hyperparameters: CheckpointHyperparameters,
}

impl CheckpointMetadata {
    pub fn for_agent(
        agent: &QLearningAgent,
        metrics: &CheckpointMetrics,
        episode: usize,
        timestamp: u64,
    ) -> Self {
        CheckpointMetadata {
            episode,
            timestamp,
            algorithm: agent.name().to_string(),
            player: Some(agent.player()),
            metrics: metrics.clone(),
            hyperparameters: CheckpointHyperparameters {
                epsilon: agent.epsilon(),
                alpha: agent.alpha(),
                gamma: agent.gamma(),
            },
        }
    }
}
