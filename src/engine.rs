use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Side length of the (fixed) square grid.
pub const SIZE: usize = 4;
/// Number of cells on the board.
pub const CELLS: usize = SIZE * SIZE;
/// Tile value that marks a game as won.
pub const WIN_VALUE: u32 = 2048;
/// Largest tile a 4x4 game can reach.
pub const MAX_TILE: u32 = 1 << 17;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Number of clockwise quarter turns after which this move becomes a slide to the left.
    #[inline]
    pub fn rotations(self) -> usize {
        match self {
            Move::Left => 0,
            Move::Down => 1,
            Move::Right => 2,
            Move::Up => 3,
        }
    }

    /// Decode a direction byte (0 = up, 1 = down, 2 = left, 3 = right).
    ///
    /// Anything outside that range is treated as `Left`.
    pub fn from_u8(v: u8) -> Move {
        match v {
            0 => Move::Up,
            1 => Move::Down,
            3 => Move::Right,
            _ => Move::Left,
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            Move::Up => 0,
            Move::Down => 1,
            Move::Left => 2,
            Move::Right => 3,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        };
        f.write_str(name)
    }
}

/// Stable token following a physical tile across transitions.
///
/// Only presentation layers care about it; the rules never look at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u64);

/// An occupied cell. `value` is always a power of two, at least 2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    value: u32,
    id: TileId,
    merged_from: Option<Box<[Tile; 2]>>,
    is_new: bool,
}

impl Tile {
    pub(crate) fn spawned(value: u32, id: TileId) -> Tile {
        Tile { value, id, merged_from: None, is_new: true }
    }

    /// Combine two equal tiles; the result keeps the identity of `first`.
    fn merge(first: Tile, second: Tile) -> Tile {
        debug_assert_eq!(first.value, second.value);
        Tile {
            value: first.value * 2,
            id: first.id,
            merged_from: Some(Box::new([first, second])),
            is_new: true,
        }
    }

    #[inline]
    pub fn value(&self) -> u32 { self.value }

    #[inline]
    pub fn id(&self) -> TileId { self.id }

    /// The two tiles this one was produced from, if it was created by the last move.
    pub fn merged_from(&self) -> Option<&[Tile; 2]> { self.merged_from.as_deref() }

    /// True if the tile was spawned or produced by a merge in the last move.
    #[inline]
    pub fn is_new(&self) -> bool { self.is_new }

    /// A copy of this tile without the transient presentation markers.
    pub fn settled(&self) -> Tile {
        Tile { value: self.value, id: self.id, merged_from: None, is_new: false }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("expected {expected} cells, got {len}")]
    WrongLength { expected: usize, len: usize },
    #[error("cell {index} holds {value}, which is not a power of two between 2 and 131072")]
    InvalidValue { index: usize, value: u32 },
}

const EMPTY_CELL: Option<Tile> = None;

/// A 4x4 grid of optional tiles, stored row-major.
///
/// Serializes as its 16 row-major values; deserializing goes through
/// [`Board::from_values`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct Board {
    cells: [Option<Tile>; CELLS],
}

impl Board {
    /// A constant empty board.
    pub const EMPTY: Board = Board { cells: [EMPTY_CELL; CELLS] };

    /// Build a board from 16 row-major values, 0 meaning empty.
    ///
    /// Tiles get ids `0, 1, 2, ...` in row-major order.
    ///
    /// ```
    /// use game_2048::engine::Board;
    /// let b = Board::from_values(&[2, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 4]).unwrap();
    /// assert_eq!(b.count_empty(), 13);
    /// assert!(Board::from_values(&[3; 16]).is_err());
    /// ```
    pub fn from_values(values: &[u32]) -> Result<Board, BoardError> {
        if values.len() != CELLS {
            return Err(BoardError::WrongLength { expected: CELLS, len: values.len() });
        }
        let mut board = Board::EMPTY;
        let mut next_id = 0;
        for (index, &value) in values.iter().enumerate() {
            if value == 0 {
                continue;
            }
            if value < 2 || value > MAX_TILE || !value.is_power_of_two() {
                return Err(BoardError::InvalidValue { index, value });
            }
            board.cells[index] = Some(Tile { value, id: TileId(next_id), merged_from: None, is_new: false });
            next_id += 1;
        }
        Ok(board)
    }

    /// Same as [`Board::from_values`], taking a grid of rows.
    pub fn from_rows(rows: [[u32; SIZE]; SIZE]) -> Result<Board, BoardError> {
        Board::from_values(&rows.concat())
    }

    /// Tile at (`row`, `col`), if any.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<&Tile> {
        self.cells[row * SIZE + col].as_ref()
    }

    /// Row-major iterator over all cells.
    pub fn cells(&self) -> impl Iterator<Item = Option<&Tile>> + '_ {
        self.cells.iter().map(Option::as_ref)
    }

    /// Value at index (0 if empty). Index runs 0..16 row-major.
    #[inline]
    pub fn tile_value(&self, idx: usize) -> u32 {
        self.cells[idx].as_ref().map_or(0, Tile::value)
    }

    /// The value pattern of the board, 0 for empty cells.
    pub fn values(&self) -> [u32; CELLS] {
        std::array::from_fn(|idx| self.tile_value(idx))
    }

    /// Structural equality: same values at the same positions, ignoring ids and markers.
    #[inline]
    pub fn same_layout(&self, other: &Board) -> bool {
        self.values() == other.values()
    }

    /// Count the number of empty cells on the board.
    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// Indices of the empty cells, row-major.
    pub fn empty_cells(&self) -> Vec<usize> {
        (0..CELLS).filter(|&idx| self.cells[idx].is_none()).collect()
    }

    /// Return the highest tile value present (0 on an empty board).
    pub fn highest_tile(&self) -> u32 {
        self.values().into_iter().max().unwrap_or(0)
    }

    pub fn contains_value(&self, value: u32) -> bool {
        self.cells.iter().flatten().any(|t| t.value == value)
    }

    /// Sum of all tile values.
    pub fn total_value(&self) -> u64 {
        self.cells.iter().flatten().map(|t| u64::from(t.value)).sum()
    }

    pub(crate) fn max_tile_id(&self) -> Option<TileId> {
        self.cells.iter().flatten().map(Tile::id).max()
    }

    /// A fresh board with the same tiles, stripped of merge/new markers.
    pub fn settled(&self) -> Board {
        Board { cells: std::array::from_fn(|idx| self.cells[idx].as_ref().map(Tile::settled)) }
    }

    /// Rotate the grid clockwise by `times` quarter turns.
    ///
    /// The cell at (row, col) lands on (col, 3 - row) per turn; tiles move with
    /// their ids and markers.
    pub fn rotate(self, times: usize) -> Board {
        let mut board = self;
        for _ in 0..times % 4 {
            let mut cells = board.cells;
            board = Board {
                cells: std::array::from_fn(|idx| {
                    let (row, col) = (idx / SIZE, idx % SIZE);
                    cells[(SIZE - 1 - col) * SIZE + row].take()
                }),
            };
        }
        board
    }

    /// Slide and merge every row towards column 0. Returns the new board and
    /// the sum of the merged tile values.
    ///
    /// ```
    /// use game_2048::engine::Board;
    /// let b = Board::from_rows([[2, 2, 2, 2], [0; 4], [0; 4], [0; 4]]).unwrap();
    /// let (moved, gained) = b.slide_left();
    /// assert_eq!(&moved.values()[..4], &[4, 4, 0, 0]);
    /// assert_eq!(gained, 8);
    /// ```
    pub fn slide_left(self) -> (Board, u64) {
        let mut cells = self.cells;
        let mut out = Board::EMPTY;
        let mut gained = 0;
        for row in 0..SIZE {
            let line = (0..SIZE).filter_map(|col| cells[row * SIZE + col].take().map(|t| t.settled()));
            let (merged, score) = merge_line(line);
            gained += score;
            for (col, tile) in merged.into_iter().enumerate() {
                out.cells[row * SIZE + col] = Some(tile);
            }
        }
        (out, gained)
    }

    /// Return the board resulting from sliding/merging tiles in `dir` (no random insert),
    /// together with the score gained by the merges.
    pub fn shift(&self, dir: Move) -> (Board, u64) {
        let rotations = dir.rotations();
        let (moved, gained) = self.settled().rotate(rotations).slide_left();
        (moved.rotate((4 - rotations) % 4), gained)
    }

    /// Insert a 2 (90%) or 4 (10%) tile into a uniformly chosen empty cell.
    ///
    /// A full board is returned unchanged.
    ///
    /// ```
    /// use game_2048::engine::{Board, TileId};
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let b = Board::EMPTY.with_random_tile(&mut rng, TileId(0)).with_random_tile(&mut rng, TileId(1));
    /// assert_eq!(b.count_empty(), 14);
    /// ```
    pub fn with_random_tile<R: Rng + ?Sized>(self, rng: &mut R, id: TileId) -> Board {
        let empty = self.empty_cells();
        if empty.is_empty() {
            return self;
        }
        let idx = empty[rng.gen_range(0..empty.len())];
        let value = generate_random_value(rng);
        let mut cells = self.cells;
        cells[idx] = Some(Tile::spawned(value, id));
        Board { cells }
    }

    /// True if a move in some direction would change the board: an empty cell,
    /// or two equal neighbours in a row or a column.
    pub fn has_possible_moves(&self) -> bool {
        let values = self.values();
        if values.contains(&0) {
            return true;
        }
        (0..SIZE).any(|row| {
            (0..SIZE - 1).any(|col| {
                let idx = row * SIZE + col;
                values[idx] == values[idx + 1] || values[col * SIZE + row] == values[(col + 1) * SIZE + row]
            })
        })
    }

    /// Return true if no legal moves remain.
    #[inline]
    pub fn is_game_over(&self) -> bool { !self.has_possible_moves() }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..SIZE {
            if row > 0 {
                writeln!(f, "-------------------------------")?;
            }
            let line: Vec<String> = (0..SIZE).map(|col| format_val(self.tile_value(row * SIZE + col))).collect();
            writeln!(f, "{}", line.join("|"))?;
        }
        Ok(())
    }
}

impl TryFrom<Vec<u32>> for Board {
    type Error = BoardError;

    fn try_from(values: Vec<u32>) -> Result<Board, BoardError> {
        Board::from_values(&values)
    }
}

impl From<Board> for Vec<u32> {
    fn from(board: Board) -> Vec<u32> {
        board.values().to_vec()
    }
}

/// Slide/merge tiles in the given direction. No randomness.
///
/// ```
/// use game_2048::engine::{self, Board, Move};
/// let b = Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [4, 0, 0, 4]]).unwrap();
/// let (moved, gained) = engine::shift(&b, Move::Right);
/// assert_eq!(gained, 12);
/// assert_eq!(engine::count_empty(&moved), 14);
/// assert!(!engine::is_game_over(&moved));
/// ```
pub fn shift(board: &Board, direction: Move) -> (Board, u64) {
    board.shift(direction)
}

/// True if no move in any direction changes the board.
pub fn is_game_over(board: &Board) -> bool {
    board.is_game_over()
}

/// Count the number of empty cells.
pub fn count_empty(board: &Board) -> usize {
    board.count_empty()
}

// Adjacent equal tiles merge once per pass; a merged tile is never merged again in the same pass.
fn merge_line<I: Iterator<Item = Tile>>(tiles: I) -> (Vec<Tile>, u64) {
    let mut tiles = tiles.peekable();
    let mut line = Vec::with_capacity(SIZE);
    let mut gained = 0;
    while let Some(tile) = tiles.next() {
        match tiles.next_if(|next| next.value == tile.value) {
            Some(partner) => {
                let merged = Tile::merge(tile, partner);
                gained += u64::from(merged.value);
                line.push(merged);
            }
            None => line.push(tile),
        }
    }
    (line, gained)
}

fn generate_random_value<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    if rng.gen_range(0..10) < 9 { 2 } else { 4 }
}

fn format_val(val: u32) -> String {
    match val {
        0 => String::from("       "),
        x => format!("{:^7}", x),
    }
}
