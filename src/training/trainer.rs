use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::ai::{Agent, QLearningAgent};
use crate::checkpoint::{CheckpointManager, CheckpointMetrics};
use crate::error::TrainingError;
use crate::game::{BoardConfig, Player};
use crate::training::episode::{episode_seed, play_episode};
use crate::training::metrics::{SeatTally, TrainingMetrics};

/// Trainer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub num_episodes: usize,
    pub log_interval: usize,
    /// Save a checkpoint every N episodes; 0 saves only at the end.
    pub checkpoint_interval: usize,
    /// Games against a random opponent after training.
    pub eval_games: usize,
    /// Base seed for seat colours and first mover; random when absent.
    pub seed: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            num_episodes: 20,
            log_interval: 100,
            checkpoint_interval: 0,
            eval_games: 100,
            seed: None,
        }
    }
}

/// What a training run leaves behind.
pub struct TrainingSummary<A> {
    /// The agent from the seat that won more episodes.
    pub kept: A,
    pub kept_seat: usize,
    pub tally: SeatTally,
    pub average_game_length: f32,
}

/// Self-play trainer: two seats, random colours and first mover per episode.
pub struct Trainer {
    config: TrainerConfig,
    board: BoardConfig,
}

impl Trainer {
    pub fn new(config: TrainerConfig, board: BoardConfig) -> Self {
        Trainer { config, board }
    }

    /// Run `num_episodes` episodes and keep the seat with more wins.
    pub fn train<A: Agent>(&self, seats: [A; 2]) -> Result<TrainingSummary<A>, TrainingError> {
        self.train_with(seats, |_, _, _| Ok(()))
    }

    /// Like [`train`](Self::train), calling `on_checkpoint` with the episode
    /// number, the currently leading agent and the metrics every
    /// `checkpoint_interval` episodes.
    pub fn train_with<A, F>(
        &self,
        mut seats: [A; 2],
        mut on_checkpoint: F,
    ) -> Result<TrainingSummary<A>, TrainingError>
    where
        A: Agent,
        F: FnMut(usize, &A, &TrainingMetrics) -> Result<(), TrainingError>,
    {
        let mut metrics = TrainingMetrics::with_capacity(self.config.log_interval.max(1));
        let base_seed = self
            .config
            .seed
            .unwrap_or_else(|| rand::rng().random::<u64>());
        let total = self.config.num_episodes;

        log::info!(
            "starting training: {} episodes, {} vs {}",
            total,
            seats[0].name(),
            seats[1].name()
        );

        for episode in 1..=total {
            let mut rng = StdRng::seed_from_u64(episode_seed(base_seed, episode));
            let red_seat = rng.random_range(0..2);
            let first_seat = rng.random_range(0..2);
            seats[red_seat].set_player(Player::Red);
            seats[1 - red_seat].set_player(Player::Yellow);

            let [s0, s1] = &mut seats;
            let result = play_episode(&self.board, [s0, s1], first_seat)?;
            log::debug!(
                "episode {}: first seat {}, {:?} after {} moves",
                episode,
                first_seat,
                result.outcome,
                result.game_length
            );
            metrics.record_episode(result);

            if self.config.log_interval > 0 && episode % self.config.log_interval == 0 {
                let window = self.config.log_interval;
                let tally = metrics.tally();
                log::info!(
                    "episode {}/{} | seat0 {:.1}% | seat1 {:.1}% | ties {:.1}% | first-mover {:.1}% | avg_len {:.1} | totals {}-{}-{}",
                    episode,
                    total,
                    metrics.win_rate(0, window) * 100.0,
                    metrics.win_rate(1, window) * 100.0,
                    metrics.tie_rate(window) * 100.0,
                    metrics.first_mover_win_rate(window) * 100.0,
                    metrics.average_game_length(window),
                    tally.wins[0],
                    tally.wins[1],
                    tally.ties,
                );
            }

            if self.config.checkpoint_interval > 0 && episode % self.config.checkpoint_interval == 0 {
                let leader = metrics.tally().leader();
                on_checkpoint(episode, &seats[leader], &metrics)?;
            }
        }

        let tally = metrics.tally();
        let kept_seat = tally.leader();
        log::info!(
            "training complete: seat0 {} wins, seat1 {} wins, {} ties; keeping seat {}",
            tally.wins[0],
            tally.wins[1],
            tally.ties,
            kept_seat
        );

        let average_game_length = metrics.mean_game_length();
        let [s0, s1] = seats;
        let kept = if kept_seat == 0 { s0 } else { s1 };
        Ok(TrainingSummary {
            kept,
            kept_seat,
            tally,
            average_game_length,
        })
    }

    /// Train two Q-learning seats, checkpointing the leader periodically and
    /// the kept agent at the end.
    pub fn train_q_learning(
        &self,
        seats: [QLearningAgent; 2],
        manager: &CheckpointManager,
        start_episode: usize,
    ) -> Result<TrainingSummary<QLearningAgent>, TrainingError> {
        let summary = self.train_with(seats, |episode, agent, metrics| {
            let ckpt = CheckpointMetrics::from_training(metrics, agent);
            let path = manager.save_checkpoint(agent, &ckpt, start_episode + episode)?;
            log::info!("checkpoint saved: {}", path.display());
            Ok(())
        })?;

        let ckpt = CheckpointMetrics {
            seat_wins: summary.tally.wins,
            ties: summary.tally.ties,
            win_rate: summary.tally.win_share(summary.kept_seat),
            average_game_length: summary.average_game_length,
            table_entries: summary.kept.table().len(),
        };
        let episode = start_episode + self.config.num_episodes;
        let path = manager.save_checkpoint(&summary.kept, &ckpt, episode)?;
        log::info!("final checkpoint saved: {}", path.display());
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{QLearningConfig, RandomAgent};
    use crate::checkpoint::CheckpointManagerConfig;

    fn config(episodes: usize) -> TrainerConfig {
        TrainerConfig {
            num_episodes: episodes,
            log_interval: 10,
            checkpoint_interval: 0,
            eval_games: 0,
            seed: Some(7),
        }
    }

    fn learners() -> [QLearningAgent; 2] {
        let config = QLearningConfig::default();
        [
            QLearningAgent::new(Player::Red, &config).with_seed(1),
            QLearningAgent::new(Player::Yellow, &config).with_seed(2),
        ]
    }

    #[test]
    fn test_tally_covers_every_episode() {
        let trainer = Trainer::new(config(30), BoardConfig::default());
        let seats = [
            RandomAgent::new(Player::Red).with_seed(3),
            RandomAgent::new(Player::Yellow).with_seed(4),
        ];
        let summary = trainer.train(seats).unwrap();
        assert_eq!(summary.tally.total(), 30);
        assert_eq!(summary.kept_seat, summary.tally.leader());
        assert!(summary.average_game_length >= 7.0);
    }

    #[test]
    fn test_keeps_leading_learner() {
        let trainer = Trainer::new(config(40), BoardConfig::default());
        let summary = trainer.train(learners()).unwrap();
        let tally = summary.tally;
        assert!(tally.wins[summary.kept_seat] >= tally.wins[1 - summary.kept_seat]);
        assert!(!summary.kept.table().is_empty());
    }

    #[test]
    fn test_checkpoint_hook_runs_on_interval() {
        let mut cfg = config(25);
        cfg.checkpoint_interval = 10;
        let trainer = Trainer::new(cfg, BoardConfig::default());
        let mut calls = Vec::new();
        trainer
            .train_with(learners(), |episode, _, metrics| {
                calls.push((episode, metrics.total_episodes()));
                Ok(())
            })
            .unwrap();
        assert_eq!(calls, vec![(10, 10), (20, 20)]);
    }

    #[test]
    fn test_train_q_learning_writes_final_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let manager = CheckpointManager::new(CheckpointManagerConfig {
            checkpoint_dir: dir.path().to_path_buf(),
            keep_last_n: 5,
            keep_best_n: 1,
        });
        let mut cfg = config(12);
        cfg.checkpoint_interval = 5;
        let trainer = Trainer::new(cfg, BoardConfig::default());

        let summary = trainer.train_q_learning(learners(), &manager, 100).unwrap();

        let episodes: Vec<usize> = manager
            .list_checkpoints()
            .unwrap()
            .iter()
            .map(|(_, m)| m.episode)
            .collect();
        assert_eq!(episodes, vec![105, 110, 112]);

        let latest = manager.load_latest().unwrap();
        assert_eq!(latest.metadata.episode, 112);
        let restored = QLearningAgent::from_snapshot(latest.table);
        assert_eq!(restored.table(), summary.kept.table());
    }

    #[test]
    fn test_same_seed_same_tally() {
        let trainer = Trainer::new(config(15), BoardConfig::default());
        let a = trainer.train(learners()).unwrap();
        let b = trainer.train(learners()).unwrap();
        assert_eq!(a.tally, b.tally);
    }
}
