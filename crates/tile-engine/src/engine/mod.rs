//! Engine module: a fixed-size tile board, the slide/merge move, the
//! fill-ratio spawn policy and the `GridEngine` that ties them together.
//!
//! - `Board` is the read-only view callers render from.
//! - `GridEngine` owns a board and is its only mutator.
//! - Free functions mirror the board queries when convenient (e.g., `count_empty`).

mod game;
mod ops;
pub mod spawn;
pub mod state;

pub use game::GridEngine;
pub use spawn::TileSource;
pub use state::{
    Board, DEFAULT_HEIGHT, DEFAULT_WIDTH, Direction, MAX_TILE, MoveResult, SpawnOutcome, Tile,
};

pub use ops::{count_empty, has_legal_move, highest_tile};
