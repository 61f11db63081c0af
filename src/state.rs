use std::fmt;

use crate::engine::{Board, Move};

/// Shared game state handed to every agent: the board plus the last slide.
///
/// `last_move` is written when a slide is applied and read by the environment
/// to decide where the next tile may appear. It is `None` at episode start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameState {
    pub(crate) board: Board,
    pub(crate) last_move: Option<Move>,
}

impl GameState {
    pub fn new() -> Self { Self::default() }

    pub fn from_board(board: Board) -> Self { Self { board, last_move: None } }

    #[inline]
    pub fn board(&self) -> Board { self.board }

    #[inline]
    pub fn last_move(&self) -> Option<Move> { self.last_move }

    pub fn set_last_move(&mut self, last_move: Option<Move>) { self.last_move = last_move; }
}

impl From<Board> for GameState {
    fn from(board: Board) -> Self { GameState::from_board(board) }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)
    }
}
