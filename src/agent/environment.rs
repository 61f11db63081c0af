use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::options::AgentInfo;
use super::{Agent, RandomAgent};
use crate::action::Action;
use crate::engine::{Board, Move};
use crate::error::AgentError;
use crate::state::GameState;

/// Tiles a full bag holds, one of each.
const CANONICAL_TILES: [u8; 3] = [1, 2, 3];

/// Cells a slide leaves open on the far edge, indexed by move code.
const VACATED_EDGE: [[usize; 4]; 4] = [
    [12, 13, 14, 15], // up: bottom row
    [0, 1, 2, 3],     // down: top row
    [0, 4, 8, 12],    // right: left column
    [3, 7, 11, 15],   // left: right column
];

/// Without-replacement pool of tile codes for the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileBag {
    tiles: Vec<u8>,
}

impl TileBag {
    /// A bag holding the canonical composition.
    pub fn full() -> Self { Self { tiles: CANONICAL_TILES.to_vec() } }

    pub fn refill(&mut self) {
        self.tiles.clear();
        self.tiles.extend_from_slice(&CANONICAL_TILES);
    }

    pub fn is_empty(&self) -> bool { self.tiles.is_empty() }

    pub fn len(&self) -> usize { self.tiles.len() }

    pub fn tiles(&self) -> &[u8] { &self.tiles }

    /// Remove one instance of `tile`. Returns false if it was not in the bag.
    pub fn take(&mut self, tile: u8) -> bool {
        match self.tiles.iter().position(|&t| t == tile) {
            Some(idx) => {
                self.tiles.remove(idx);
                true
            }
            None => false,
        }
    }
}

impl Default for TileBag {
    fn default() -> Self { Self::full() }
}

/// Random environment: adds one tile to an empty cell after every player move.
///
/// The cell is drawn from the edge the last slide vacated (the whole board
/// before any slide). The tile is drawn from a [`TileBag`] that refills when
/// it runs dry and at every episode start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RndEnv {
    inner: RandomAgent,
    bag: TileBag,
}

impl RndEnv {
    pub const DEFAULTS: &'static str = "name=random role=environment";

    pub fn new(options: &str) -> Result<Self, AgentError> {
        let inner = RandomAgent::new(&format!("{} {}", Self::DEFAULTS, options))?;
        Ok(Self { inner, bag: TileBag::full() })
    }

    pub fn tile_bag(&self) -> &TileBag { &self.bag }

    pub fn random(&self) -> &RandomAgent { &self.inner }

    pub fn random_mut(&mut self) -> &mut RandomAgent { &mut self.inner }

    /// Empty cells eligible for the next tile, in index order.
    pub fn candidate_cells(state: &GameState) -> Vec<u8> {
        let board: Board = state.board();
        let empty = |&idx: &usize| board.is_empty_cell(idx);
        match state.last_move() {
            Some(dir) => VACATED_EDGE[dir.code() as usize]
                .iter()
                .copied()
                .filter(|idx| empty(idx))
                .map(|idx| idx as u8)
                .collect(),
            None => (0..Board::CELLS).filter(empty).map(|idx| idx as u8).collect(),
        }
    }

    fn place(&mut self, state: &GameState) -> Result<Action, AgentError> {
        let candidates = Self::candidate_cells(state);
        if candidates.is_empty() {
            return Ok(Action::NoOp);
        }
        let position = *self.inner.choice(&candidates)?;
        if self.bag.is_empty() {
            debug!("tile bag empty, refilling");
            self.bag.refill();
        }
        let tile = *self.inner.choice(self.bag.tiles())?;
        self.bag.take(tile);
        trace!(position, tile, last_move = ?state.last_move().map(Move::code), "placing tile");
        Ok(Action::place(position, tile))
    }
}

impl Agent for RndEnv {
    fn info(&self) -> &AgentInfo { self.inner.info() }

    fn info_mut(&mut self) -> &mut AgentInfo { self.inner.info_mut() }

    fn open_episode(&mut self, flag: &str) {
        debug!(flag, "environment episode opened");
        self.bag.refill();
    }

    fn take_action(&mut self, state: &GameState) -> Action {
        // both draws are guarded by emptiness checks in `place`
        self.place(state).unwrap_or(Action::NoOp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(cells: [u8; 16], last_move: Option<Move>) -> GameState {
        let mut state = GameState::from_board(Board::from_cells(cells));
        state.set_last_move(last_move);
        state
    }

    #[test]
    fn default_identity() {
        let env = RndEnv::new("").unwrap();
        assert_eq!(env.name(), Some("random"));
        assert_eq!(env.role(), Some("environment"));
        let named = RndEnv::new("name=spawner").unwrap();
        assert_eq!(named.name(), Some("spawner"));
    }

    #[test]
    fn no_last_move_considers_every_empty_cell() {
        let state = state_with([1, 0, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3], None);
        let cells = RndEnv::candidate_cells(&state);
        assert_eq!(cells.len(), 13);
        assert!(!cells.contains(&0) && !cells.contains(&5) && !cells.contains(&15));
    }

    #[test]
    fn each_move_restricts_to_its_vacated_edge() {
        let empty = [0u8; 16];
        let expected: [(Move, [u8; 4]); 4] = [
            (Move::Up, [12, 13, 14, 15]),
            (Move::Down, [0, 1, 2, 3]),
            (Move::Right, [0, 4, 8, 12]),
            (Move::Left, [3, 7, 11, 15]),
        ];
        for (dir, cells) in expected {
            assert_eq!(RndEnv::candidate_cells(&state_with(empty, Some(dir))), cells.to_vec());
        }
    }

    #[test]
    fn occupied_edge_cells_are_excluded() {
        let state = state_with([0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 2, 0], Some(Move::Up));
        assert_eq!(RndEnv::candidate_cells(&state), vec![13, 15]);
    }

    #[test]
    fn full_edge_yields_noop_even_with_space_elsewhere() {
        let mut env = RndEnv::new("seed=0").unwrap();
        let state = state_with([0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 3, 1], Some(Move::Up));
        assert_eq!(env.take_action(&state), Action::NoOp);
        assert_eq!(env.tile_bag().len(), 3);
    }

    #[test]
    fn full_board_yields_noop() {
        let mut env = RndEnv::new("seed=0").unwrap();
        let state = GameState::from_board(Board::from_raw(0x1212_2121_1212_2121));
        assert_eq!(env.take_action(&state), Action::NoOp);
    }

    #[test]
    fn bag_cycles_through_each_tile_once() {
        let mut env = RndEnv::new("seed=17").unwrap();
        let state = GameState::new();
        for _ in 0..4 {
            let mut seen = Vec::new();
            for remaining in (0..3).rev() {
                match env.take_action(&state) {
                    Action::Place { tile, .. } => seen.push(tile),
                    other => panic!("unexpected {other:?}"),
                }
                assert_eq!(env.tile_bag().len(), remaining);
            }
            seen.sort();
            assert_eq!(seen, vec![1, 2, 3]);
        }
    }

    #[test]
    fn open_episode_refills_partial_bag() {
        let mut env = RndEnv::new("seed=2").unwrap();
        let state = GameState::new();
        env.take_action(&state);
        assert_eq!(env.tile_bag().len(), 2);
        env.open_episode("");
        assert_eq!(env.tile_bag(), &TileBag::full());
    }

    #[test]
    fn random_accessors_share_one_stream() {
        let mut env = RndEnv::new("seed=6").unwrap();
        let mut twin = RndEnv::new("seed=6").unwrap();
        let items: Vec<u32> = (0..100).collect();
        let drawn = *env.random_mut().choice(&items).unwrap();
        assert_eq!(drawn, *twin.random_mut().choice(&items).unwrap());
        assert_eq!(env.random().stream(), twin.random().stream());
    }

    #[test]
    fn tile_bag_take() {
        let mut bag = TileBag::full();
        assert!(bag.take(2));
        assert!(!bag.take(2));
        assert_eq!(bag.tiles(), &[1, 3]);
        bag.refill();
        assert_eq!(bag.tiles(), &[1, 2, 3]);
    }
}
