use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use ql_connect_four::ai::{Agent, QLearningAgent, QLearningConfig, RandomAgent};
use ql_connect_four::checkpoint::CheckpointManager;
use ql_connect_four::config::AppConfig;
use ql_connect_four::game::Player;
use ql_connect_four::training::episode::evaluate;
use ql_connect_four::training::trainer::Trainer;

/// Train a Connect Four Q-learning agent via self-play.
#[derive(Parser)]
#[command(name = "train", about = "Train a Connect Four Q-learning agent")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override number of training episodes
    #[arg(long)]
    episodes: Option<usize>,

    /// Seed for seat colours, first movers and exploration
    #[arg(long)]
    seed: Option<u64>,

    /// Resume training from the latest checkpoint
    #[arg(long)]
    resume: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut app_config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(episodes) = cli.episodes {
        app_config.training.num_episodes = episodes;
    }
    if let Some(seed) = cli.seed {
        app_config.training.seed = Some(seed);
        app_config.qlearning.seed = Some(seed);
    }
    app_config.validate().context("invalid configuration")?;

    let manager = CheckpointManager::new(app_config.checkpoint.clone());
    let (seats, start_episode) = if cli.resume {
        resume_seats(&manager, app_config.qlearning.seed)?
    } else {
        (fresh_seats(&app_config.qlearning), 0)
    };

    let trainer = Trainer::new(app_config.training.clone(), app_config.board.clone());
    let summary = trainer
        .train_q_learning(seats, &manager, start_episode)
        .context("training failed")?;

    println!(
        "Seat 0: {} wins, seat 1: {} wins, ties: {}, average length {:.1}",
        summary.tally.wins[0],
        summary.tally.wins[1],
        summary.tally.ties,
        summary.average_game_length
    );
    println!(
        "Kept seat {} with {} table entries",
        summary.kept_seat,
        summary.kept.table().len()
    );

    let games = app_config.training.eval_games;
    if games > 0 {
        let mut kept = summary.kept;
        kept.set_epsilon(0.0);
        let mut random = RandomAgent::new(Player::Yellow);
        let win_rate = evaluate(&app_config.board, &mut kept, &mut random, games)
            .context("evaluation against random opponent failed")?;
        println!(
            "Greedy win rate vs {} over {} games: {:.1}%",
            random.name(),
            games,
            win_rate * 100.0
        );
    }

    Ok(())
}

fn fresh_seats(config: &QLearningConfig) -> [QLearningAgent; 2] {
    let first = QLearningAgent::new(Player::Red, config);
    let second = QLearningAgent::new(Player::Yellow, config);
    match config.seed {
        Some(seed) => [first, second.with_seed(seed.wrapping_add(1))],
        None => [first, second],
    }
}

/// Both seats start from the latest saved table, seeded like fresh seats.
fn resume_seats(
    manager: &CheckpointManager,
    seed: Option<u64>,
) -> Result<([QLearningAgent; 2], usize)> {
    let data = manager
        .load_latest()
        .context("resuming from latest checkpoint")?;
    log::info!(
        "resuming from {} at episode {} ({} states)",
        data.path.display(),
        data.metadata.episode,
        data.table.entries.len()
    );
    let episode = data.metadata.episode;
    let mut first = QLearningAgent::from_snapshot(data.table.clone());
    let mut second = QLearningAgent::from_snapshot(data.table);
    second.set_player(second.player().other());
    if let Some(seed) = seed {
        first = first.with_seed(seed);
        second = second.with_seed(seed.wrapping_add(1));
    }
    Ok(([first, second], episode))
}
