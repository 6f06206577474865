//! Move-selection agents: the [`Agent`] trait, a uniform random player, and a
//! tabular Q-learner backed by an [`ActionValueTable`].

mod agent;
pub mod q_table;
pub mod qlearning;
mod random;

pub use agent::{build_agent, Agent, AgentKind, Transition};
pub use q_table::{ActionValueTable, TableEntry, OPTIMISTIC_DEFAULT};
pub use qlearning::{QLearningAgent, QLearningConfig, TableSnapshot};
pub use random::RandomAgent;
