use anyhow::Result;
use log::{debug, info};
use rand::{SeedableRng, rngs::StdRng};

use super::ops;
use super::spawn::{self, TileSource};
use super::state::{Board, Direction, MoveResult, SpawnOutcome};

/// Owns a board and runs the move/spawn cycle over it.
///
/// The engine is the only mutator of its board; callers get `&Board`.
/// `is_over` turns true only when `spawn` finds no empty cell.
pub struct GridEngine<S = StdRng> {
    board: Board,
    terminated: bool,
    source: S,
}

impl GridEngine<StdRng> {
    /// New `width x height` engine with one spawned tile, seeded from OS entropy.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::with_source(width, height, StdRng::from_entropy())
    }

    /// Deterministic engine: the same seed replays the same spawns.
    ///
    /// ```
    /// use tile_engine::engine::{Direction, GridEngine};
    /// let mut a = GridEngine::seeded(4, 4, 42).unwrap();
    /// let mut b = GridEngine::seeded(4, 4, 42).unwrap();
    /// assert_eq!(a.board(), b.board());
    /// for dir in [Direction::Left, Direction::Up, Direction::Right] {
    ///     let _ = a.step(dir);
    ///     let _ = b.step(dir);
    /// }
    /// assert_eq!(a.board(), b.board());
    /// ```
    pub fn seeded(width: usize, height: usize, seed: u64) -> Result<Self> {
        Self::with_source(width, height, StdRng::seed_from_u64(seed))
    }
}

impl<S: TileSource> GridEngine<S> {
    /// New engine drawing its spawns from `source`; places the first tile.
    pub fn with_source(width: usize, height: usize, source: S) -> Result<Self> {
        let board = Board::new(width, height)?;
        let mut engine = Self::from_board(board, source);
        let _ = engine.spawn();
        Ok(engine)
    }

    /// Resume from an existing position. No tile is spawned.
    pub fn from_board(board: Board, source: S) -> Self {
        Self {
            board,
            terminated: false,
            source,
        }
    }

    /// Slide and merge every line toward `direction`.
    ///
    /// Returns `changed = false` when nothing moved; the caller must not
    /// spawn in that case.
    pub fn shift(&mut self, direction: Direction) -> MoveResult {
        let result = ops::shift(&mut self.board, direction);
        debug!("move {direction}: changed={}", result.changed);
        result
    }

    /// Place a 2 or a 4 in a random empty cell.
    ///
    /// On a full board nothing is written, the engine is marked over and
    /// `SpawnOutcome::Full` is returned.
    pub fn spawn(&mut self) -> SpawnOutcome {
        let outcome = spawn::place_random_tile(&mut self.board, &mut self.source);
        if outcome.is_full() && !self.terminated {
            info!(
                "no empty cell left on {}x{} board; game over (highest tile {})",
                self.board.width(),
                self.board.height(),
                self.board.highest_tile()
            );
            self.terminated = true;
        }
        outcome
    }

    /// Move, then spawn only if the move changed the board.
    ///
    /// ```
    /// use tile_engine::engine::{Board, Direction, GridEngine};
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let board = Board::from_rows([[2, 2, 0, 0]]).unwrap();
    /// let mut engine = GridEngine::from_board(board, StdRng::seed_from_u64(1));
    /// let (moved, spawned) = engine.step(Direction::Left);
    /// assert!(moved.changed && spawned.is_some());
    /// let (moved, spawned) = engine.step(Direction::Up);
    /// assert!(!moved.changed && spawned.is_none());
    /// ```
    pub fn step(&mut self, direction: Direction) -> (MoveResult, Option<SpawnOutcome>) {
        let moved = self.shift(direction);
        let spawned = moved.changed.then(|| self.spawn());
        (moved, spawned)
    }

    /// True once a spawn has found the board full.
    #[inline]
    pub fn is_over(&self) -> bool {
        self.terminated
    }

    /// True if some direction would still change the board. Informational
    /// only: it does not affect `is_over`.
    #[inline]
    pub fn has_legal_move(&self) -> bool {
        self.board.has_legal_move()
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.board.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.board.height()
    }
}
