use log::debug;
use rand::Rng;

use super::state::{Board, SpawnOutcome, Tile};

/// Weight of the 2-fill ratio in the chance of spawning a 4.
pub const FOUR_BIAS: f64 = 0.4;

/// Source of the two random draws a spawn needs.
///
/// Every `rand::Rng` is a `TileSource`; tests can implement it directly to
/// script exact placements.
pub trait TileSource {
    /// Pick which empty cell (in `0..empty`, row-major order) gets the tile.
    /// `empty` is always at least 1. A pick past the end lands on the last
    /// empty cell.
    fn pick_cell(&mut self, empty: usize) -> usize;

    /// Uniform draw in `[0, 1)` deciding between a 2 and a 4.
    fn roll(&mut self) -> f64;
}

impl<R: Rng + ?Sized> TileSource for R {
    #[inline]
    fn pick_cell(&mut self, empty: usize) -> usize {
        self.gen_range(0..empty)
    }

    #[inline]
    fn roll(&mut self) -> f64 {
        self.gen_range(0.0..1.0)
    }
}

/// Value to spawn given how many cells hold a 2, the board size and the
/// roll `u`: a 4 when `u > 1 - 0.4 * twos / cells`, otherwise a 2.
///
/// ```
/// use tile_engine::engine::spawn::spawn_value;
/// // No 2s on the board: the threshold is 1.0, so a 4 never spawns.
/// assert_eq!(spawn_value(0, 16, 0.999_999), 2);
/// // Half the board is 2s: anything above 0.8 spawns a 4.
/// assert_eq!(spawn_value(8, 16, 0.81), 4);
/// assert_eq!(spawn_value(8, 16, 0.79), 2);
/// ```
pub fn spawn_value(twos: usize, cells: usize, u: f64) -> Tile {
    let ratio = twos as f64 / cells as f64;
    if u > 1.0 - FOUR_BIAS * ratio { 4 } else { 2 }
}

/// Place one new tile into a random empty cell of `board`.
///
/// Draws the cell first, then the value. Returns `SpawnOutcome::Full` and
/// leaves the board untouched when no cell is empty.
pub fn place_random_tile<S: TileSource + ?Sized>(
    board: &mut Board,
    source: &mut S,
) -> SpawnOutcome {
    let empty = board.count_empty();
    if empty == 0 {
        return SpawnOutcome::Full;
    }
    let pick = source.pick_cell(empty).min(empty - 1);
    let value = spawn_value(board.count_value(2), board.len(), source.roll());

    let width = board.width();
    // `pick < empty`, so the n-th empty cell exists.
    let Some(idx) = board
        .cells()
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v == 0)
        .map(|(idx, _)| idx)
        .nth(pick)
    else {
        return SpawnOutcome::Full;
    };
    board.cells_mut()[idx] = value;

    let (row, col) = (idx / width, idx % width);
    debug!("spawned {value} at ({row}, {col}), {} empty left", empty - 1);
    SpawnOutcome::Placed { row, col, value }
}
