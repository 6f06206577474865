use crate::error::{BoardError, MoveError};

use super::board::{Board, BoardConfig};
use super::detector::{GameOutcome, WinDetector};
use super::key::StateKey;
use super::player::Player;

/// A game in progress: the board, whose turn it is, and the outcome once
/// terminal. No move is accepted after a win or tie.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    board: Board,
    detector: WinDetector,
    current_player: Player,
    outcome: Option<GameOutcome>,
}

impl GameState {
    /// Standard 6x7 connect-four with Red to move.
    pub fn initial() -> Self {
        GameState {
            board: Board::default(),
            detector: WinDetector::default(),
            current_player: Player::Red,
            outcome: None,
        }
    }

    pub fn new(config: &BoardConfig, first: Player) -> Result<Self, BoardError> {
        if config.win_length == 0 {
            return Err(BoardError::InvalidWinLength);
        }
        Ok(GameState {
            board: Board::from_config(config)?,
            detector: WinDetector::new(config.win_length),
            current_player: first,
            outcome: None,
        })
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn winner(&self) -> Option<Player> {
        self.outcome.and_then(GameOutcome::winner)
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// Columns the current player may drop into; empty once terminal.
    pub fn legal_actions(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.board.legal_columns()
    }

    pub fn snapshot(&self) -> StateKey {
        self.board.snapshot()
    }

    /// Drop the current player's coin into `column`.
    ///
    /// Returns the landing row and the outcome (`None` while the game goes on).
    /// The turn passes to the other player only when the game continues.
    pub fn apply_move(&mut self, column: usize) -> Result<(usize, Option<GameOutcome>), MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameOver);
        }

        let mover = self.current_player;
        let row = self.board.drop_piece(column, mover)?;
        self.outcome = self
            .detector
            .detect(self.board.graph(), mover, self.board.is_full());
        if self.outcome.is_none() {
            self.current_player = mover.other();
        }

        Ok((row, self.outcome))
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Cell;

    fn play(state: &mut GameState, columns: &[usize]) -> Option<GameOutcome> {
        let mut outcome = None;
        for &col in columns {
            outcome = state.apply_move(col).unwrap().1;
        }
        outcome
    }

    #[test]
    fn test_initial_state() {
        let state = GameState::initial();
        assert_eq!(state.current_player(), Player::Red);
        assert!(!state.is_terminal());
        assert_eq!(state.legal_actions().len(), 7);
    }

    #[test]
    fn test_apply_move() {
        let mut state = GameState::initial();
        let (row, outcome) = state.apply_move(3).unwrap();

        assert_eq!(row, 5);
        assert_eq!(outcome, None);
        assert_eq!(state.current_player(), Player::Yellow);
        assert_eq!(state.board().get(5, 3), Cell::Red);
    }

    #[test]
    fn test_horizontal_win() {
        let mut state = GameState::initial();
        // Red 0..=3 on the bottom row, Yellow stacks on top of each.
        assert_eq!(play(&mut state, &[0, 0, 1, 1, 2, 2]), None);
        let (_, outcome) = state.apply_move(3).unwrap();
        assert_eq!(outcome, Some(GameOutcome::Winner(Player::Red)));
        assert_eq!(state.winner(), Some(Player::Red));
        assert!(state.is_terminal());
        assert!(state.legal_actions().is_empty());
    }

    #[test]
    fn test_vertical_win_on_fourth_drop_into_column_three() {
        let mut state = GameState::initial();
        // Red keeps dropping into column 3; Yellow scatters elsewhere.
        let yellow = [0, 6, 1];
        for (turn, &other) in yellow.iter().enumerate() {
            let (_, outcome) = state.apply_move(3).unwrap();
            assert_eq!(outcome, None, "no win after red drop {}", turn + 1);
            assert_eq!(state.apply_move(other).unwrap().1, None);
        }
        let (row, outcome) = state.apply_move(3).unwrap();
        assert_eq!(row, 2);
        assert_eq!(outcome, Some(GameOutcome::Winner(Player::Red)));
        for col in [0, 1, 6] {
            assert_eq!(state.board().get(5, col), Cell::Yellow);
        }
    }

    #[test]
    fn test_diagonal_up_win() {
        let mut state = GameState::initial();
        // Builds a / diagonal for Red ending at (2, 3).
        let outcome = play(&mut state, &[0, 1, 1, 2, 2, 3, 2, 3, 3, 6]);
        assert_eq!(outcome, None);
        let (row, outcome) = state.apply_move(3).unwrap();
        assert_eq!(row, 2);
        assert_eq!(outcome, Some(GameOutcome::Winner(Player::Red)));
    }

    #[test]
    fn test_diagonal_down_win() {
        let mut state = GameState::initial();
        // Mirror image: a \ diagonal for Red ending at (2, 3).
        let outcome = play(&mut state, &[6, 5, 5, 4, 4, 3, 4, 3, 3, 0]);
        assert_eq!(outcome, None);
        let (row, outcome) = state.apply_move(3).unwrap();
        assert_eq!(row, 2);
        assert_eq!(outcome, Some(GameOutcome::Winner(Player::Red)));
    }

    #[test]
    fn test_win_from_middle_of_run() {
        let mut state = GameState::initial();
        // Red holds 0, 1 and 3 on the bottom row, then fills the gap at 2.
        assert_eq!(play(&mut state, &[0, 0, 1, 1, 3, 3]), None);
        let (_, outcome) = state.apply_move(2).unwrap();
        assert_eq!(outcome, Some(GameOutcome::Winner(Player::Red)));
    }

    #[test]
    fn test_moves_rejected_after_game_over() {
        let mut state = GameState::initial();
        play(&mut state, &[0, 1, 0, 1, 0, 1, 0]);
        assert_eq!(state.winner(), Some(Player::Red));
        assert_eq!(state.apply_move(5), Err(MoveError::GameOver));
    }

    #[test]
    fn test_full_board_without_run_is_tie() {
        let config = BoardConfig {
            rows: 6,
            cols: 7,
            win_length: 4,
        };
        let mut state = GameState::new(&config, Player::Red).unwrap();
        // Columns filled in pairs so colours alternate in blocks of two
        // vertically and shift horizontally, leaving no four-in-a-row.
        let order = [
            0, 1, 0, 1, 1, 0, 1, 0, 0, 1, 0, 1, 2, 3, 2, 3, 3, 2, 3, 2, 2, 3, 2, 3, 4, 5, 4, 5,
            5, 4, 5, 4, 4, 5, 4, 5, 6, 6, 6, 6, 6, 6,
        ];
        let outcome = play(&mut state, &order);
        assert_eq!(outcome, Some(GameOutcome::Tie));
        assert_eq!(state.winner(), None);
        assert!(state.board().is_full());
    }

    #[test]
    fn test_column_full_keeps_turn() {
        let config = BoardConfig {
            rows: 2,
            cols: 3,
            win_length: 4,
        };
        let mut state = GameState::new(&config, Player::Yellow).unwrap();
        play(&mut state, &[0, 0]);
        let before = state.clone();
        assert_eq!(state.apply_move(0), Err(MoveError::ColumnFull));
        assert_eq!(state, before);
        assert_eq!(state.current_player(), Player::Yellow);
    }

    #[test]
    fn test_rejects_zero_win_length() {
        let config = BoardConfig {
            win_length: 0,
            ..Default::default()
        };
        assert_eq!(
            GameState::new(&config, Player::Red),
            Err(BoardError::InvalidWinLength)
        );
    }
}
