use std::collections::VecDeque;

use crate::game::GameOutcome;

/// Result of a single episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeResult {
    pub outcome: GameOutcome,
    /// Seat (0 or 1) that won, `None` on a tie.
    pub winner_seat: Option<usize>,
    /// Seat that moved first.
    pub first_seat: usize,
    pub game_length: usize,
}

/// Lifetime tally of wins per seat plus ties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeatTally {
    pub wins: [usize; 2],
    pub ties: usize,
}

impl SeatTally {
    pub fn record(&mut self, result: &EpisodeResult) {
        match result.winner_seat {
            Some(seat) => self.wins[seat] += 1,
            None => self.ties += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.wins[0] + self.wins[1] + self.ties
    }

    /// Share of all recorded episodes won by `seat`.
    pub fn win_share(&self, seat: usize) -> f32 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.wins[seat] as f32 / total as f32
    }

    /// Seat with strictly more wins, seat 0 otherwise.
    pub fn leader(&self) -> usize {
        if self.wins[1] > self.wins[0] {
            1
        } else {
            0
        }
    }
}

/// Training metrics tracker with rolling window computations.
pub struct TrainingMetrics {
    episode_results: VecDeque<EpisodeResult>,
    capacity: usize,
    tally: SeatTally,
    total_length: usize,
}

impl TrainingMetrics {
    pub fn with_capacity(capacity: usize) -> Self {
        TrainingMetrics {
            episode_results: VecDeque::with_capacity(capacity),
            capacity,
            tally: SeatTally::default(),
            total_length: 0,
        }
    }

    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    pub fn record_episode(&mut self, result: EpisodeResult) {
        self.tally.record(&result);
        self.total_length += result.game_length;
        self.episode_results.push_back(result);
        if self.episode_results.len() > self.capacity {
            self.episode_results.pop_front();
        }
    }

    /// Share of the last N episodes won by `seat`.
    pub fn win_rate(&self, seat: usize, last_n: usize) -> f32 {
        self.rate(last_n, |r| r.winner_seat == Some(seat))
    }

    /// Tie rate in the last N episodes.
    pub fn tie_rate(&self, last_n: usize) -> f32 {
        self.rate(last_n, |r| r.winner_seat.is_none())
    }

    /// Share of the last N episodes won by whoever moved first.
    pub fn first_mover_win_rate(&self, last_n: usize) -> f32 {
        self.rate(last_n, |r| r.winner_seat == Some(r.first_seat))
    }

    /// Average game length over the last N episodes.
    pub fn average_game_length(&self, last_n: usize) -> f32 {
        let n = self.episode_results.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let total: usize = self
            .episode_results
            .iter()
            .rev()
            .take(n)
            .map(|r| r.game_length)
            .sum();
        total as f32 / n as f32
    }

    /// Average game length over every recorded episode, not just the window.
    pub fn mean_game_length(&self) -> f32 {
        let episodes = self.total_episodes();
        if episodes == 0 {
            return 0.0;
        }
        self.total_length as f32 / episodes as f32
    }

    pub fn tally(&self) -> SeatTally {
        self.tally
    }

    pub fn total_episodes(&self) -> usize {
        self.tally.total()
    }

    fn rate(&self, last_n: usize, hit: impl Fn(&EpisodeResult) -> bool) -> f32 {
        let n = self.episode_results.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let hits = self
            .episode_results
            .iter()
            .rev()
            .take(n)
            .filter(|r| hit(r))
            .count();
        hits as f32 / n as f32
    }
}

impl Default for TrainingMetrics {
    fn default() -> Self {
        Self::new()
    }
}
