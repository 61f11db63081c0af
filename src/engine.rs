use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// A direction to slide/merge tiles.
///
/// The discriminant is the move's wire code, which is also the value the
/// environment reads back as the last-move signal. Each code names the slide
/// that vacates one edge of the board:
///
/// | code | move    | vacated edge  |
/// |------|---------|---------------|
/// | 0    | `Up`    | bottom row    |
/// | 1    | `Down`  | top row       |
/// | 2    | `Right` | left column   |
/// | 3    | `Left`  | right column  |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Move {
    Up = 0,
    Down = 1,
    Right = 2,
    Left = 3,
}

impl Move {
    /// All directions in code order; evaluation order for the greedy player.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Right, Move::Left];

    #[inline]
    pub fn code(self) -> u8 { self as u8 }

    #[inline]
    pub fn from_code(code: u8) -> Option<Move> {
        match code {
            0 => Some(Move::Up),
            1 => Some(Move::Down),
            2 => Some(Move::Right),
            3 => Some(Move::Left),
            _ => None,
        }
    }
}

/// Largest code a 4-bit cell holds; two of these never merge.
const MAX_TILE_CODE: Tile = 15;

const LINE_TABLE_SIZE: usize = 0x1_0000; // 65,536 possible 16-bit lines

struct Stores {
    shift_left: Box<[u64]>,
    shift_right: Box<[u64]>,
    shift_up: Box<[u64]>,
    shift_down: Box<[u64]>,
    score: Box<[Score]>,
}

type BoardRaw = u64;
type Line = u64;
type Tile = u64;
type Score = u64;

/// Packed 4x4 board as 16 4-bit nibbles in a `u64`.
///
/// Cell 0 is the most significant nibble; cells run row-major to 15. A nibble
/// holds a tile code: 0 is an empty cell, `k` is the tile `2^k`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board(BoardRaw);

impl Board {
    /// A constant empty board (all zeros).
    pub const EMPTY: Board = Board(0);

    /// Number of cells on the board.
    pub const CELLS: usize = 16;

    /// Construct a `Board` from its raw packed representation.
    #[inline]
    pub fn from_raw(raw: BoardRaw) -> Self { Board(raw) }

    /// Borrow the raw packed `u64` for this `Board`.
    #[inline]
    pub fn raw(&self) -> BoardRaw { self.0 }

    /// Build a board from 16 row-major tile codes.
    ///
    /// ```
    /// use ai_2048_agents::engine::Board;
    /// let b = Board::from_cells([1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2]);
    /// assert_eq!(b.cell(0), 1);
    /// assert_eq!(b.cell(15), 2);
    /// assert_eq!(b.count_empty(), 13);
    /// ```
    pub fn from_cells(cells: [u8; 16]) -> Self {
        cells
            .iter()
            .enumerate()
            .fold(Board::EMPTY, |b, (idx, &code)| b.with_cell(idx, code))
    }

    /// Tile code at `idx` (0 when empty).
    #[inline]
    pub fn cell(self, idx: usize) -> u8 { extract_tile(self, idx) as u8 }

    #[inline]
    pub fn is_empty_cell(self, idx: usize) -> bool { self.cell(idx) == 0 }

    /// Copy of this board with cell `idx` set to `code` (low nibble only).
    #[inline]
    pub fn with_cell(self, idx: usize, code: u8) -> Self {
        debug_assert!(idx < Self::CELLS);
        let shift = (15 - idx) * 4;
        let cleared = self.0 & !(0xf_u64 << shift);
        Board(cleared | ((code as u64 & 0xf) << shift))
    }

    /// All 16 tile codes, row-major.
    pub fn cells(self) -> [u8; 16] {
        let mut out = [0u8; 16];
        for (idx, slot) in out.iter_mut().enumerate() {
            *slot = self.cell(idx);
        }
        out
    }

    /// Return the board resulting from sliding/merging tiles in `dir`.
    #[inline]
    pub fn shift(self, dir: Move) -> Self {
        match dir {
            Move::Left | Move::Right => shift_rows(self, dir),
            Move::Up | Move::Down => shift_cols(self, dir),
        }
    }

    /// Simulate a slide. Returns the new board and the merge reward, or `None`
    /// when nothing moves.
    ///
    /// ```
    /// use ai_2048_agents::engine::{Board, Move};
    /// let b = Board::from_cells([1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    /// let (after, reward) = b.slide(Move::Left).unwrap();
    /// assert_eq!(after.cell(0), 2);
    /// assert_eq!(reward, 4);
    /// assert!(b.slide(Move::Up).is_none());
    /// ```
    pub fn slide(self, dir: Move) -> Option<(Board, u64)> {
        let moved = self.shift(dir);
        if moved == self {
            return None;
        }
        // merges add exactly the created tile's value to the line score
        Some((moved, moved.score() - self.score()))
    }

    /// Compute the total score for this board.
    #[inline]
    pub fn score(self) -> Score { get_score(self) }

    /// Return true if no legal moves remain.
    #[inline]
    pub fn is_game_over(self) -> bool { is_game_over(self) }

    /// Return the highest tile value (e.g., 2048) present on the board.
    #[inline]
    pub fn highest_tile(self) -> Tile { get_highest_tile_val(self) }

    /// Count the number of empty cells on the board.
    #[inline]
    pub fn count_empty(self) -> u64 { count_empty(self) }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:#018x})", self.0)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let board: Vec<_> = self.cells().iter().map(format_val).collect();
        for (row, chunk) in board.chunks(4).enumerate() {
            if row > 0 {
                writeln!(f, "--------------------------------")?;
            }
            writeln!(f, "{}|{}|{}|{}", chunk[0], chunk[1], chunk[2], chunk[3])?;
        }
        Ok(())
    }
}

impl From<BoardRaw> for Board { fn from(v: BoardRaw) -> Self { Board::from_raw(v) } }
impl From<Board> for BoardRaw { fn from(b: Board) -> Self { b.raw() } }

/// Initialize internal tables ahead of first use. Safe to call multiple times.
pub fn new() {
    stores();
}

/// Compute the total score for a board.
pub fn get_score(board: Board) -> Score {
    let score_table = &stores().score;
    (0..4).fold(0, |acc, idx| {
        let row_val = extract_line(board.0, idx) as usize;
        acc + score_table[row_val]
    })
}

// Credit to Nneonneo
fn transpose(x: BoardRaw) -> BoardRaw {
    let a1 = x & 0xF0F00F0FF0F00F0F;
    let a2 = x & 0x0000F0F00000F0F0;
    let a3 = x & 0x0F0F00000F0F0000;
    let a = a1 | (a2 << 12) | (a3 >> 12);
    let b1 = a & 0xFF00FF0000FF00FF;
    let b2 = a & 0x00FF00FF00000000;
    let b3 = a & 0x00000000FF00FF00;
    b1 | (b2 >> 24) | (b3 << 24)
}

fn extract_line(board: BoardRaw, line_idx: u64) -> Line {
    (board >> ((3 - line_idx) * 16)) & 0xffff
}

fn line_to_vec(line: Line) -> Vec<Tile> {
    (0..4).fold(Vec::new(), |mut tiles, tile_idx| {
        tiles.push(line >> ((3 - tile_idx) * 4) & 0xf);
        tiles
    })
}

/// True if no move in any direction changes the board.
pub fn is_game_over(board: Board) -> bool {
    Move::ALL.iter().all(|&dir| board.shift(dir) == board)
}

// https://stackoverflow.com/questions/38225571/count-number-of-zero-nibbles-in-an-unsigned-64-bit-integer
/// Count the number of zero tiles.
pub fn count_empty(board: Board) -> u64 {
    16 - count_non_empty(board)
}

static STORES: OnceLock<Stores> = OnceLock::new();

fn create_stores() -> Stores {
    // Allocate on the heap to avoid large stack frames
    let mut shift_left = vec![0u64; LINE_TABLE_SIZE];
    let mut shift_right = vec![0u64; LINE_TABLE_SIZE];
    let mut shift_up = vec![0u64; LINE_TABLE_SIZE];
    let mut shift_down = vec![0u64; LINE_TABLE_SIZE];
    let mut score = vec![0u64; LINE_TABLE_SIZE];

    for val in 0..LINE_TABLE_SIZE {
        let line = val as u64;
        shift_left[val] = shift_line(line, Move::Left);
        shift_right[val] = shift_line(line, Move::Right);
        shift_up[val] = shift_line(line, Move::Up);
        shift_down[val] = shift_line(line, Move::Down);
        score[val] = calc_score(line);
    }

    Stores {
        shift_left: shift_left.into_boxed_slice(),
        shift_right: shift_right.into_boxed_slice(),
        shift_up: shift_up.into_boxed_slice(),
        shift_down: shift_down.into_boxed_slice(),
        score: score.into_boxed_slice(),
    }
}

#[inline(always)]
fn stores() -> &'static Stores {
    STORES.get_or_init(create_stores)
}

fn shift_rows(board: Board, move_dir: Move) -> Board {
    let s = stores();
    let table: &[u64] = match move_dir {
        Move::Right => &s.shift_right,
        _ => &s.shift_left,
    };
    let res = (0..4).fold(0, |new_board, row_idx| {
        let row_val = extract_line(board.0, row_idx) as usize;
        new_board | (table[row_val] << (48 - (16 * row_idx)))
    });
    Board(res)
}

fn shift_cols(board: Board, move_dir: Move) -> Board {
    let transpose_board = transpose(board.0);
    let s = stores();
    let table: &[u64] = match move_dir {
        Move::Down => &s.shift_down,
        _ => &s.shift_up,
    };
    let res = (0..4).fold(0, |new_board, col_idx| {
        let col_val = extract_line(transpose_board, col_idx) as usize;
        new_board | (table[col_val] << (12 - (4 * col_idx)))
    });
    Board(res)
}

fn shift_line(line: Line, direction: Move) -> Line {
    let tiles = line_to_vec(line);
    match direction {
        Move::Left | Move::Right => vec_to_row(shift_vec(tiles, direction)),
        Move::Up | Move::Down => vec_to_col(shift_vec(tiles, direction)),
    }
}

fn vec_to_row(tiles: Vec<Tile>) -> Line {
    tiles[0] << 12 | tiles[1] << 8 | tiles[2] << 4 | tiles[3]
}

fn vec_to_col(tiles: Vec<Tile>) -> Line {
    tiles[0] << 48 | tiles[1] << 32 | tiles[2] << 16 | tiles[3]
}

fn shift_vec(vec: Vec<Tile>, direction: Move) -> Vec<Tile> {
    match direction {
        Move::Left | Move::Up => shift_vec_left(vec),
        Move::Right | Move::Down => shift_vec_right(vec),
    }
}

fn shift_vec_right(vec: Vec<Tile>) -> Vec<Tile> {
    let rev_vec: Vec<Tile> = vec.into_iter().rev().collect();
    shift_vec_left(rev_vec).iter().rev().copied().collect()
}

fn shift_vec_left(mut vec: Vec<Tile>) -> Vec<Tile> {
    for i in 0..4 {
        calculate_left_shift(&mut vec[i..]);
    }
    vec
}

fn calculate_left_shift(slice: &mut [Tile]) {
    let mut acc = 0;
    for idx in 0..slice.len() {
        let val = slice[idx];
        if acc != 0 && acc == val && acc < MAX_TILE_CODE {
            slice[idx] = 0;
            acc += 1;
            break;
        } else if acc != 0 && val != 0 {
            break;
        } else if acc == 0 && val != 0 {
            slice[idx] = 0;
            acc = val;
        };
    }
    slice[0] = acc;
}

// Credit to Nneonneo
fn calc_score(line: Line) -> Score {
    let mut score = 0;
    for tile_val in line_to_vec(line) {
        if tile_val >= 2 {
            // the score is the total sum of the tile and all intermediate merged tiles
            score += (tile_val - 1) * (1 << tile_val);
        }
    }
    score
}

fn count_non_empty(board: Board) -> u64 {
    let mut board_copy = board.0;
    board_copy |= board_copy >> 1;
    board_copy |= board_copy >> 2;
    board_copy &= 0x1111111111111111;
    board_copy.count_ones() as u64
}

fn extract_tile(board: Board, idx: usize) -> Tile {
    (board.0 >> ((15 - idx) * 4)) & 0xf
}

fn format_val(val: &u8) -> String {
    match val {
        0 => String::from("       "),
        &x => format!("{:^7}", 2_u32.pow(x as u32)),
    }
}

fn get_highest_tile_val(board: Board) -> Tile {
    let max_tile = board.cells().into_iter().max().unwrap_or(0);
    if max_tile == 0 { 0 } else { 2_u64.pow(max_tile as u32) }
}
