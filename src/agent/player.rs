use tracing::trace;

use super::options::AgentInfo;
use super::{Agent, RandomAgent};
use crate::action::Action;
use crate::engine::{Board, Move};
use crate::error::AgentError;
use crate::state::GameState;

/// Greedy player: takes the slide with the highest immediate reward.
///
/// Ties go to the lowest move code. That order carries no strategic meaning;
/// it is kept so that replays stay comparable. The random stream is inherited
/// for variants that break ties randomly; this policy never draws from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    inner: RandomAgent,
}

impl Player {
    pub const DEFAULTS: &'static str = "name=dummy role=player";

    pub fn new(options: &str) -> Result<Self, AgentError> {
        Ok(Self { inner: RandomAgent::new(&format!("{} {}", Self::DEFAULTS, options))? })
    }

    pub fn random(&self) -> &RandomAgent { &self.inner }

    pub fn random_mut(&mut self) -> &mut RandomAgent { &mut self.inner }

    /// Immediate reward of each move in code order, -1 where the slide is illegal.
    pub fn evaluate(board: Board) -> [i64; 4] {
        Move::ALL.map(|dir| board.slide(dir).map_or(-1, |(_, reward)| reward as i64))
    }
}

impl Agent for Player {
    fn info(&self) -> &AgentInfo { self.inner.info() }

    fn info_mut(&mut self) -> &mut AgentInfo { self.inner.info_mut() }

    fn take_action(&mut self, state: &GameState) -> Action {
        let scores = Self::evaluate(state.board());
        let max_value = scores.iter().copied().max().unwrap_or(-1);
        if max_value == -1 {
            trace!(?scores, "no legal slide");
            return Action::NoOp;
        }
        match scores.iter().position(|&s| s == max_value) {
            Some(idx) => {
                trace!(?scores, dir = idx, "greedy slide");
                Action::slide(Move::ALL[idx])
            }
            None => Action::NoOp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_identity() {
        let player = Player::new("seed=3").unwrap();
        assert_eq!(player.name(), Some("dummy"));
        assert_eq!(player.role(), Some("player"));
    }

    #[test]
    fn picks_the_highest_reward() {
        // a row of 2s merges for 8 horizontally; nothing vertical merges
        let board = Board::from_cells([1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        let scores = Player::evaluate(board);
        assert_eq!(scores, [-1, 0, 8, 8]);
        let mut player = Player::new("").unwrap();
        assert_eq!(
            player.take_action(&GameState::from_board(board)),
            Action::slide(Move::Right)
        );
    }

    #[test]
    fn tie_goes_to_lowest_code() {
        // lone tile in the middle: every slide is legal and scores 0
        let board = Board::from_cells([0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(Player::evaluate(board), [0, 0, 0, 0]);
        let mut player = Player::new("").unwrap();
        assert_eq!(player.take_action(&GameState::from_board(board)), Action::slide(Move::Up));
    }

    #[test]
    fn tie_between_codes_zero_and_two_goes_to_zero() {
        // a vertical pair in the right column and a horizontal pair in row 2:
        // every direction merges exactly one pair for 4
        let board = Board::from_cells([0, 0, 0, 1, 0, 0, 0, 1, 1, 1, 0, 0, 0, 0, 0, 0]);
        assert_eq!(Player::evaluate(board), [4, 4, 4, 4]);
        let mut player = Player::new("").unwrap();
        assert_eq!(player.take_action(&GameState::from_board(board)), Action::slide(Move::Up));
    }

    #[test]
    fn no_legal_move_is_noop() {
        let board = Board::from_raw(0x1212_2121_1212_2121);
        assert_eq!(Player::evaluate(board), [-1; 4]);
        let mut player = Player::new("").unwrap();
        assert_eq!(player.take_action(&GameState::from_board(board)), Action::NoOp);
        assert_eq!(player.take_action(&GameState::new()), Action::NoOp);
    }

    #[test]
    fn decision_does_not_touch_the_stream() {
        let mut player = Player::new("seed=8").unwrap();
        let before = player.random().stream().clone();
        let board = Board::from_cells([1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        player.take_action(&GameState::from_board(board));
        assert_eq!(player.random().stream(), &before);
    }

    #[test]
    fn random_mut_draws_from_the_inherited_stream() {
        let mut player = Player::new("seed=8").unwrap();
        let before = player.random().stream().clone();
        let items = [1, 2, 3];
        assert!(player.random_mut().choice(&items).is_ok());
        assert_ne!(player.random().stream(), &before);
    }
}
