use crate::ai::{Agent, Transition};
use crate::error::TrainingError;
use crate::game::{BoardConfig, GameState, Player, StateKey};
use crate::training::metrics::EpisodeResult;

/// Play one episode between two seated agents, `first_seat` moving first.
///
/// Each agent keeps the colour it currently reports via [`Agent::player`]; the
/// two colours must differ. After every drop a learning mover's `learn` hook
/// sees the board-global previous snapshot, the new snapshot, and the outcome
/// so far.
pub fn play_episode(
    config: &BoardConfig,
    mut seats: [&mut dyn Agent; 2],
    first_seat: usize,
) -> Result<EpisodeResult, TrainingError> {
    if seats[0].player() == seats[1].player() {
        return Err(TrainingError::SeatColours);
    }

    let mut game = GameState::new(config, seats[first_seat].player())?;
    let mut active = first_seat;
    let mut game_length = 0;

    loop {
        let legal = game.legal_actions();
        let state = game.snapshot();
        let action = seats[active].choose_action(&state, &legal);
        if !legal.contains(&action) {
            return Err(TrainingError::IllegalAction { action, legal });
        }

        let (_, outcome) = game.apply_move(action)?;
        game_length += 1;

        if seats[active].is_learning() {
            let next_state = game.snapshot();
            let prev_state = game.board().previous_snapshot().unwrap_or(state);
            let legal_after = game.board().legal_columns();
            seats[active].learn(&Transition {
                prev_state: &prev_state,
                action,
                next_state: &next_state,
                legal_after: &legal_after,
                outcome,
            });
        }

        if let Some(outcome) = outcome {
            let winner_seat = outcome
                .winner()
                .map(|winner| if seats[0].player() == winner { 0 } else { 1 });
            log::trace!(
                "episode finished after {} moves: {:?}\n{}",
                game_length,
                outcome,
                game.board()
            );
            return Ok(EpisodeResult {
                outcome,
                winner_seat,
                first_seat,
                game_length,
            });
        }

        active = 1 - active;
    }
}

/// Forwards everything except `learn`, so evaluation games never touch a table.
struct Frozen<'a>(&'a mut dyn Agent);

impl Agent for Frozen<'_> {
    fn choose_action(&mut self, state: &StateKey, legal_actions: &[usize]) -> usize {
        self.0.choose_action(state, legal_actions)
    }

    fn name(&self) -> &str {
        self.0.name()
    }

    fn player(&self) -> Player {
        self.0.player()
    }

    fn set_player(&mut self, player: Player) {
        self.0.set_player(player)
    }
}

/// Win rate of `agent` against `opponent` over `games` games, alternating who
/// moves first. Neither side learns during evaluation; colours are restored
/// afterwards.
pub fn evaluate(
    config: &BoardConfig,
    agent: &mut dyn Agent,
    opponent: &mut dyn Agent,
    games: usize,
) -> Result<f32, TrainingError> {
    if games == 0 {
        return Ok(0.0);
    }

    let colours = (agent.player(), opponent.player());
    agent.set_player(Player::Red);
    opponent.set_player(Player::Yellow);

    let mut wins = 0;
    let mut result = Ok(());
    for game_idx in 0..games {
        let mut frozen_agent = Frozen(&mut *agent);
        let mut frozen_opponent = Frozen(&mut *opponent);
        match play_episode(config, [&mut frozen_agent, &mut frozen_opponent], game_idx % 2) {
            Ok(episode) if episode.winner_seat == Some(0) => wins += 1,
            Ok(_) => {}
            Err(e) => {
                result = Err(e);
                break;
            }
        }
    }

    agent.set_player(colours.0);
    opponent.set_player(colours.1);
    result.map(|_| wins as f32 / games as f32)
}

/// Derive a deterministic seed for a given episode index.
pub fn episode_seed(base_seed: u64, episode_index: usize) -> u64 {
    // FNV-1a-inspired mixing for deterministic, well-distributed seeds
    let mut hash = base_seed ^ 0x517cc1b727220a95;
    let index = episode_index as u64;
    hash = hash.wrapping_mul(0x100000001b3);
    hash ^= index;
    hash = hash.wrapping_mul(0x100000001b3);
    hash ^= index >> 32;
    hash
}
