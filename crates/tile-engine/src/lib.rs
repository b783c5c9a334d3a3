//! tile-engine: rules for a sliding-tile merge puzzle on a fixed grid.
//!
//! Quick start:
//! ```
//! use tile_engine::engine::{Direction, GridEngine, SpawnOutcome};
//!
//! // Seeded engine; construction places the first tile.
//! let mut engine = GridEngine::seeded(4, 4, 42).unwrap();
//!
//! // Move, and only spawn when the board changed.
//! let moved = engine.shift(Direction::Left);
//! if moved.changed {
//!     if let SpawnOutcome::Full = engine.spawn() {
//!         assert!(engine.is_over());
//!     }
//! }
//! println!("{}", engine.board());
//! ```

pub mod engine;
