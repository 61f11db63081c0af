//! Actions returned by agents and applied to the shared [`GameState`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::{Board, Move};
use crate::state::GameState;

/// What an agent decided to do this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Action {
    /// No placement or slide is possible for this agent.
    #[default]
    NoOp,
    /// Put tile code `tile` on the empty cell `position` (0..16, row-major).
    Place { position: u8, tile: u8 },
    /// Slide every tile in a direction.
    Slide(Move),
}

impl Action {
    #[inline]
    pub fn place(position: u8, tile: u8) -> Self { Action::Place { position, tile } }

    #[inline]
    pub fn slide(dir: Move) -> Self { Action::Slide(dir) }

    #[inline]
    pub fn is_noop(&self) -> bool { matches!(self, Action::NoOp) }

    /// Apply the action to `state`, returning the reward or -1 if it is illegal.
    ///
    /// Illegal actions leave `state` untouched. A legal slide also records
    /// itself as the state's last move.
    ///
    /// ```
    /// use ai_2048_agents::action::Action;
    /// use ai_2048_agents::state::GameState;
    /// let mut state = GameState::new();
    /// assert_eq!(Action::place(5, 1).apply(&mut state), 0);
    /// assert_eq!(Action::place(5, 2).apply(&mut state), -1);
    /// assert_eq!(state.board().cell(5), 1);
    /// ```
    pub fn apply(&self, state: &mut GameState) -> i64 {
        match *self {
            Action::NoOp => -1,
            Action::Place { position, tile } => {
                let idx = position as usize;
                if idx >= Board::CELLS || tile == 0 || tile > 15 || !state.board.is_empty_cell(idx) {
                    return -1;
                }
                state.board = state.board.with_cell(idx, tile);
                0
            }
            Action::Slide(dir) => match state.board.slide(dir) {
                Some((board, reward)) => {
                    state.board = board;
                    state.last_move = Some(dir);
                    reward as i64
                }
                None => -1,
            },
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::NoOp => write!(f, "??"),
            Action::Place { position, tile } => write!(f, "@{}[{}]", position, tile),
            Action::Slide(dir) => {
                let tag = match dir {
                    Move::Up => 'U',
                    Move::Down => 'D',
                    Move::Right => 'R',
                    Move::Left => 'L',
                };
                write!(f, "#{}", tag)
            }
        }
    }
}
