use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use crate::game::{Player, StateKey};

use super::agent::Agent;

/// An agent that selects uniformly at random from legal actions.
pub struct RandomAgent {
    player: Player,
    rng: StdRng,
}

impl RandomAgent {
    pub fn new(player: Player) -> Self {
        RandomAgent {
            player,
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }
}

impl Agent for RandomAgent {
    fn choose_action(&mut self, _state: &StateKey, legal_actions: &[usize]) -> usize {
        assert!(!legal_actions.is_empty(), "No legal actions available");
        let idx = self.rng.random_range(0..legal_actions.len());
        legal_actions[idx]
    }

    fn name(&self) -> &str {
        "Random"
    }

    fn player(&self) -> Player {
        self.player
    }

    fn set_player(&mut self, player: Player) {
        self.player = player;
    }
}
