use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};

use ql_connect_four::ai::{build_agent, Agent, AgentKind, QLearningAgent};
use ql_connect_four::checkpoint::CheckpointManager;
use ql_connect_four::config::AppConfig;
use ql_connect_four::game::{GameOutcome, GameState, MoveError, Player};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Two humans share the keyboard
    TwoPlayer,
    /// Human against the latest trained Q-learning table
    Single,
    /// Human against a uniformly random opponent
    Random,
}

/// Play Connect Four in the terminal.
#[derive(Parser)]
#[command(name = "connect_four", about = "Play Connect Four in the terminal")]
struct Cli {
    #[arg(long, value_enum, default_value = "single")]
    mode: Mode,

    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Play yellow and let the opponent open
    #[arg(long)]
    second: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    let human = if cli.second { Player::Yellow } else { Player::Red };
    let mut opponent: Option<Box<dyn Agent>> = match cli.mode {
        Mode::TwoPlayer => None,
        Mode::Random => Some(build_agent(
            AgentKind::Random,
            human.other(),
            &config.qlearning,
        )),
        Mode::Single => Some(Box::new(load_opponent(&config, human.other()))),
    };

    let mut game =
        GameState::new(&config.board, Player::Red).context("building the board")?;
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!("{}", game.board());
        let player = game.current_player();
        let column = match opponent.as_mut() {
            Some(agent) if agent.player() == player => {
                let column = agent.choose_action(&game.snapshot(), &game.legal_actions());
                println!("{} ({}) plays column {}", agent.name(), player, column);
                column
            }
            _ => match prompt(player, game.board().dimensions().1, &mut lines)? {
                Some(column) => column,
                None => return Ok(()),
            },
        };

        match game.apply_move(column) {
            Ok((_, None)) => {}
            Ok((_, Some(outcome))) => {
                println!("{}", game.board());
                match outcome {
                    GameOutcome::Winner(winner) => println!("{} wins!", winner),
                    GameOutcome::Tie => println!("The board is full: it's a tie."),
                }
                return Ok(());
            }
            Err(MoveError::GameOver) => bail!("move attempted after the game ended"),
            Err(err) => println!("Column {}: {}. Try again.", column, err),
        }
    }
}

/// Greedy Q-learning opponent restored from the latest checkpoint, or a fresh
/// table when none exists.
fn load_opponent(config: &AppConfig, player: Player) -> QLearningAgent {
    let manager = CheckpointManager::new(config.checkpoint.clone());
    let mut agent = match manager.load_latest() {
        Ok(data) => {
            log::info!(
                "loaded {} (episode {}, {} states)",
                data.path.display(),
                data.metadata.episode,
                data.table.entries.len()
            );
            QLearningAgent::from_snapshot(data.table)
        }
        Err(err) => {
            log::warn!("no trained table available ({}); opponent is untrained", err);
            QLearningAgent::new(player, &config.qlearning)
        }
    };
    agent.set_player(player);
    agent.set_epsilon(0.0);
    agent
}

/// Ask for a column until a number is entered. `None` on end of input.
fn prompt(
    player: Player,
    cols: usize,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<Option<usize>> {
    loop {
        print!("{} to move, column 0-{}: ", player, cols - 1);
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            println!();
            return Ok(None);
        };
        let line = line.context("reading stdin")?;
        match line.trim().parse::<usize>() {
            Ok(column) => return Ok(Some(column)),
            Err(_) => println!("'{}' is not a column number.", line.trim()),
        }
    }
}
