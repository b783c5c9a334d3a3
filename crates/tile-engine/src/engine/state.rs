use std::fmt;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use super::ops;

/// A tile value: `0` for an empty cell, otherwise a power of two >= 2.
pub type Tile = u64;

/// Largest tile a board can be built with. Merges may grow past it.
pub const MAX_TILE: Tile = 1 << 32;

/// Default board width (columns).
pub const DEFAULT_WIDTH: usize = 4;
/// Default board height (rows).
pub const DEFAULT_HEIGHT: usize = 4;

/// A direction to slide/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

/// Outcome of a directional move.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveResult {
    /// Whether any cell's position or value changed. A spawn must only
    /// follow a move that changed the board.
    pub changed: bool,
}

/// Outcome of a spawn attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    /// A new tile of `value` was written at (`row`, `col`).
    Placed { row: usize, col: usize, value: Tile },
    /// No empty cell was left; the game is over.
    Full,
}

impl SpawnOutcome {
    #[inline]
    pub fn is_full(&self) -> bool {
        matches!(self, SpawnOutcome::Full)
    }
}

/// Fixed-size `width x height` grid of tiles, stored row-major.
///
/// Dimensions never change after construction. Every non-zero cell holds a
/// power of two >= 2; the constructors enforce this and the move/spawn
/// operations preserve it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Tile>,
}

impl Board {
    /// Construct an empty board of the given dimensions.
    ///
    /// ```
    /// use tile_engine::engine::Board;
    /// let b = Board::new(5, 3).unwrap();
    /// assert_eq!(b.count_empty(), 15);
    /// assert!(Board::new(0, 4).is_err());
    /// ```
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            bail!("board dimensions must be non-zero, got {width}x{height}");
        }
        let Some(len) = width
            .checked_mul(height)
            .filter(|&n| n <= isize::MAX as usize / std::mem::size_of::<Tile>())
        else {
            bail!("board dimensions {width}x{height} are too large");
        };
        Ok(Board {
            width,
            height,
            cells: vec![0; len],
        })
    }

    /// Build a board from explicit rows of tile values.
    ///
    /// Rows must be non-empty, all of the same length, and every value must
    /// be `0` or a power of two in `2..=MAX_TILE`.
    ///
    /// ```
    /// use tile_engine::engine::Board;
    /// let b = Board::from_rows([[2, 0], [0, 4]]).unwrap();
    /// assert_eq!(b.get(1, 1), Some(4));
    /// assert!(Board::from_rows([[3, 0], [0, 0]]).is_err());
    /// ```
    pub fn from_rows<I, R>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = Tile>,
    {
        let rows: Vec<Vec<Tile>> = rows.into_iter().map(|r| r.into_iter().collect()).collect();
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut board = Board::new(width, height)?;
        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != width {
                bail!("row {row_idx} has {} cells, expected {width}", row.len());
            }
            for (col_idx, &value) in row.iter().enumerate() {
                if !ops::is_valid_tile(value) {
                    bail!("cell ({row_idx}, {col_idx}) holds {value}, which is not a tile value");
                }
                board.cells[row_idx * width + col_idx] = value;
            }
        }
        Ok(board)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells (`width * height`).
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: boards have at least one cell.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Tile at (`row`, `col`), or `None` if out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<Tile> {
        if row < self.height && col < self.width {
            Some(self.cells[row * self.width + col])
        } else {
            None
        }
    }

    /// All cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[Tile] {
        &self.cells
    }

    /// Iterate over rows, top to bottom.
    #[inline]
    pub fn rows(&self) -> std::slice::Chunks<'_, Tile> {
        self.cells.chunks(self.width)
    }

    /// Convenience: copy the rows out into nested vectors.
    pub fn to_rows(&self) -> Vec<Vec<Tile>> {
        self.rows().map(<[Tile]>::to_vec).collect()
    }

    #[inline]
    pub fn count_empty(&self) -> usize {
        ops::count_empty(self)
    }

    /// Number of cells currently holding exactly `value`.
    #[inline]
    pub fn count_value(&self, value: Tile) -> usize {
        self.cells.iter().filter(|&&v| v == value).count()
    }

    /// Highest tile on the board (0 if the board is empty).
    #[inline]
    pub fn highest_tile(&self) -> Tile {
        ops::highest_tile(self)
    }

    /// Sum of all tile values, saturating at `Tile::MAX`. Moves never change it.
    #[inline]
    pub fn sum(&self) -> Tile {
        self.cells.iter().fold(0, |acc: Tile, &v| acc.saturating_add(v))
    }

    /// Return the board resulting from sliding/merging in `dir` (no spawn),
    /// together with whether anything changed.
    ///
    /// ```
    /// use tile_engine::engine::{Board, Direction};
    /// let b = Board::from_rows([[2, 2, 2, 2]]).unwrap();
    /// let (after, changed) = b.shifted(Direction::Left);
    /// assert!(changed);
    /// assert_eq!(after.to_rows(), vec![vec![4, 4, 0, 0]]);
    /// ```
    pub fn shifted(&self, dir: Direction) -> (Board, bool) {
        let mut next = self.clone();
        let result = ops::shift(&mut next, dir);
        (next, result.changed)
    }

    /// True if a move in at least one direction would change the board.
    ///
    /// ```
    /// use tile_engine::engine::Board;
    /// // No tiles means nothing can slide.
    /// assert!(!Board::new(4, 4).unwrap().has_legal_move());
    /// ```
    #[inline]
    pub fn has_legal_move(&self) -> bool {
        ops::has_legal_move(self)
    }

    #[inline]
    pub(crate) fn cells_mut(&mut self) -> &mut [Tile] {
        &mut self.cells
    }
}

impl Default for Board {
    fn default() -> Self {
        Board {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            cells: vec![0; DEFAULT_WIDTH * DEFAULT_HEIGHT],
        }
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("rows", &self.to_rows())
            .finish()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(self.width * (ops::CELL_WIDTH + 1));
        writeln!(f)?;
        for (row_idx, row) in self.rows().enumerate() {
            if row_idx > 0 {
                writeln!(f, "{rule}")?;
            }
            let cells: Vec<String> = row.iter().map(|&v| ops::format_val(v)).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}
