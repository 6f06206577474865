use serde::{Deserialize, Serialize};

use crate::game::{GameOutcome, Player, StateKey};

use super::qlearning::{QLearningAgent, QLearningConfig};
use super::random::RandomAgent;

/// What a mover observed across one of its own drops.
///
/// `prev_state` is the board-global previous snapshot, i.e. the grid right
/// before the most recent drop by either side. `legal_after` lists the columns
/// with room on the resulting board.
#[derive(Debug, Clone, Copy)]
pub struct Transition<'a> {
    pub prev_state: &'a StateKey,
    pub action: usize,
    pub next_state: &'a StateKey,
    pub legal_after: &'a [usize],
    pub outcome: Option<GameOutcome>,
}

/// Universal interface for all computer players.
pub trait Agent {
    /// Pick a column from `legal_actions`, which is never empty. Returning a
    /// column outside that set is a bug in the agent.
    fn choose_action(&mut self, state: &StateKey, legal_actions: &[usize]) -> usize;

    /// Observe the result of this agent's own move. No-op unless learning.
    fn learn(&mut self, _transition: &Transition<'_>) {}

    /// Return the agent's display name.
    fn name(&self) -> &str;

    /// The coin colour this agent currently plays.
    fn player(&self) -> Player;

    fn set_player(&mut self, player: Player);

    fn is_learning(&self) -> bool {
        false
    }
}

impl<A: Agent + ?Sized> Agent for Box<A> {
    fn choose_action(&mut self, state: &StateKey, legal_actions: &[usize]) -> usize {
        (**self).choose_action(state, legal_actions)
    }

    fn learn(&mut self, transition: &Transition<'_>) {
        (**self).learn(transition)
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn player(&self) -> Player {
        (**self).player()
    }

    fn set_player(&mut self, player: Player) {
        (**self).set_player(player)
    }

    fn is_learning(&self) -> bool {
        (**self).is_learning()
    }
}

/// Which agent variant occupies a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Random,
    QLearning,
}

/// Construct the agent variant named by `kind`.
pub fn build_agent(kind: AgentKind, player: Player, config: &QLearningConfig) -> Box<dyn Agent> {
    match kind {
        AgentKind::Random => Box::new(RandomAgent::new(player)),
        AgentKind::QLearning => Box::new(QLearningAgent::new(player, config)),
    }
}
