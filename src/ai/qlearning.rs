//! Tabular Q-learning with epsilon-greedy exploration and one-step TD updates.

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::game::{GameOutcome, Player, StateKey};

use super::agent::{Agent, Transition};
use super::q_table::{ActionValueTable, TableEntry};

pub const WIN_REWARD: f64 = 1.0;
pub const LOSS_REWARD: f64 = -2.0;
pub const TIE_REWARD: f64 = 0.5;

/// Q-learning hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QLearningConfig {
    /// Probability of a uniformly random move.
    pub epsilon: f64,
    /// Learning rate.
    pub alpha: f64,
    /// Discount applied to the next state's best value.
    pub gamma: f64,
    /// Optional RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        QLearningConfig {
            epsilon: 0.2,
            alpha: 0.3,
            gamma: 0.9,
            seed: None,
        }
    }
}

/// Serializable agent state: hyperparameters plus every table entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub version: u32,
    pub player: Player,
    pub epsilon: f64,
    pub alpha: f64,
    pub gamma: f64,
    pub default_value: f64,
    pub entries: Vec<TableEntry>,
}

impl TableSnapshot {
    pub const VERSION: u32 = 1;
}

pub struct QLearningAgent {
    player: Player,
    epsilon: f64,
    alpha: f64,
    gamma: f64,
    table: ActionValueTable,
    rng: StdRng,
}

impl QLearningAgent {
    pub fn new(player: Player, config: &QLearningConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        QLearningAgent {
            player,
            epsilon: config.epsilon,
            alpha: config.alpha,
            gamma: config.gamma,
            table: ActionValueTable::new(),
            rng,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Rebuild an agent from a saved snapshot. The caller is responsible for
    /// checking [`TableSnapshot::version`].
    pub fn from_snapshot(snapshot: TableSnapshot) -> Self {
        QLearningAgent {
            player: snapshot.player,
            epsilon: snapshot.epsilon,
            alpha: snapshot.alpha,
            gamma: snapshot.gamma,
            table: ActionValueTable::from_entries(snapshot.entries, snapshot.default_value),
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            version: TableSnapshot::VERSION,
            player: self.player,
            epsilon: self.epsilon,
            alpha: self.alpha,
            gamma: self.gamma,
            default_value: self.table.default_value(),
            entries: self.table.entries(),
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Set to 0.0 for purely greedy play.
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon;
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn table(&self) -> &ActionValueTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut ActionValueTable {
        &mut self.table
    }

    /// Reward for this agent given the outcome at the time of the update.
    pub fn reward(&self, outcome: Option<GameOutcome>) -> f64 {
        match outcome {
            None => 0.0,
            Some(GameOutcome::Tie) => TIE_REWARD,
            Some(GameOutcome::Winner(winner)) if winner == self.player => WIN_REWARD,
            Some(GameOutcome::Winner(_)) => LOSS_REWARD,
        }
    }

    /// Apply one TD step and return the updated value of
    /// `(prev_state, action)`.
    pub fn update(&mut self, transition: &Transition<'_>) -> f64 {
        let reward = self.reward(transition.outcome);
        let old = self.table.get(transition.prev_state, transition.action);
        let future = self
            .table
            .max_value(transition.next_state, transition.legal_after)
            .unwrap_or(0.0);
        let target = reward + self.gamma * future;
        let new = old + self.alpha * (target - old);
        self.table.set(transition.prev_state, transition.action, new);
        new
    }

    /// Greedy choice over `legal_actions`, ties broken uniformly at random.
    fn best_action(&mut self, state: &StateKey, legal_actions: &[usize]) -> usize {
        let values: Vec<f64> = legal_actions
            .iter()
            .map(|&action| self.table.get(state, action))
            .collect();
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let best: Vec<usize> = legal_actions
            .iter()
            .zip(&values)
            .filter(|(_, value)| **value == max)
            .map(|(&action, _)| action)
            .collect();

        if best.len() == 1 {
            best[0]
        } else {
            best[self.rng.random_range(0..best.len())]
        }
    }
}

impl Agent for QLearningAgent {
    fn choose_action(&mut self, state: &StateKey, legal_actions: &[usize]) -> usize {
        assert!(!legal_actions.is_empty(), "No legal actions available");
        if self.rng.random::<f64>() < self.epsilon {
            let idx = self.rng.random_range(0..legal_actions.len());
            return legal_actions[idx];
        }
        self.best_action(state, legal_actions)
    }

    fn learn(&mut self, transition: &Transition<'_>) {
        self.update(transition);
    }

    fn name(&self) -> &str {
        "Q-learning"
    }

    fn player(&self) -> Player {
        self.player
    }

    fn set_player(&mut self, player: Player) {
        self.player = player;
    }

    fn is_learning(&self) -> bool {
        true
    }
}
