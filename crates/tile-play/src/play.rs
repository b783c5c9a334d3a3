use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::{SeedableRng, rngs::StdRng};
use tile_engine::engine::{Board, Direction, GridEngine, SpawnOutcome, Tile, TileSource};

use crate::config::{Config, PolicyKind};
use crate::input::{Command, parse_command};

/// End-of-game report for one played board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    pub game: u32,
    pub seed: u64,
    /// Board-changing moves applied.
    pub moves: u64,
    pub highest_tile: Tile,
    pub tile_sum: Tile,
    /// True if the game ended on a failed spawn rather than a move cap or quit.
    pub over: bool,
}

impl GameSummary {
    fn from_engine<S: TileSource>(game: u32, seed: u64, moves: u64, engine: &GridEngine<S>) -> Self {
        Self {
            game,
            seed,
            moves,
            highest_tile: engine.board().highest_tile(),
            tile_sum: engine.board().sum(),
            over: engine.is_over(),
        }
    }
}

/// Direction picker for unattended play.
pub enum Policy {
    Random(StdRng),
    Cycle { order: Vec<Direction>, next: usize },
}

impl Policy {
    pub fn from_config(config: &Config, seed: u64) -> Self {
        match config.run.policy {
            PolicyKind::Random => Policy::Random(StdRng::seed_from_u64(seed)),
            PolicyKind::Cycle => Policy::Cycle {
                order: config.run.cycle.clone(),
                next: 0,
            },
        }
    }

    /// Every direction, most preferred first.
    fn preference(&mut self) -> Vec<Direction> {
        match self {
            Policy::Random(rng) => {
                let mut dirs = Direction::ALL.to_vec();
                dirs.shuffle(rng);
                dirs
            }
            Policy::Cycle { order, next } => {
                let start = *next % order.len().max(1);
                *next = start + 1;
                let mut dirs: Vec<Direction> =
                    order[start..].iter().chain(&order[..start]).copied().collect();
                for dir in Direction::ALL {
                    if !dirs.contains(&dir) {
                        dirs.push(dir);
                    }
                }
                dirs
            }
        }
    }

    /// Most preferred direction that changes `board`, or `None` if nothing
    /// can move.
    pub fn choose(&mut self, board: &Board) -> Option<Direction> {
        self.preference()
            .into_iter()
            .find(|&dir| board.shifted(dir).1)
    }
}

/// Play `config.run.games` unattended games and report each one.
pub fn run_auto(config: &Config) -> Result<Vec<GameSummary>> {
    let base_seed = config.run.seed.unwrap_or_else(rand::random);
    let mut summaries = Vec::with_capacity(config.run.games as usize);
    for game in 0..config.run.games {
        let seed = base_seed.wrapping_add(game as u64);
        let summary = play_auto_game(config, game, seed)?;
        info!(
            "game {} (seed {}): {} moves, highest tile {}, tile sum {}{}",
            summary.game,
            summary.seed,
            summary.moves,
            summary.highest_tile,
            summary.tile_sum,
            if summary.over { "" } else { " (move cap)" }
        );
        summaries.push(summary);
    }
    Ok(summaries)
}

fn play_auto_game(config: &Config, game: u32, seed: u64) -> Result<GameSummary> {
    let mut engine = GridEngine::seeded(config.board.width, config.board.height, seed)
        .with_context(|| format!("failed to start game {game}"))?;
    let policy = Policy::from_config(config, seed.rotate_left(32));
    let moves = drive_auto(config, &mut engine, policy);
    Ok(GameSummary::from_engine(game, seed, moves, &engine))
}

/// Let `policy` play `engine` until game over, the move cap, or a board
/// with nothing to move. Returns the number of board-changing moves.
fn drive_auto<S: TileSource>(config: &Config, engine: &mut GridEngine<S>, mut policy: Policy) -> u64 {
    let mut moves = 0u64;
    while !engine.is_over() {
        if config.run.max_moves.is_some_and(|cap| moves >= cap) {
            break;
        }
        match policy.choose(engine.board()) {
            Some(dir) => {
                let (moved, _) = engine.step(dir);
                debug_assert!(moved.changed);
                moves += 1;
            }
            // A full board that cannot move ends on the failed spawn.
            None if engine.board().count_empty() == 0 => {
                let _ = engine.spawn();
            }
            // An empty board cannot move either; there is nothing to play.
            None => break,
        }
    }
    moves
}

/// Drive `engine` from line-based player input, echoing the board to `out`.
///
/// Stops on quit, end of input, or game over.
pub fn run_interactive<S, R, W>(
    engine: &mut GridEngine<S>,
    seed: u64,
    input: R,
    mut out: W,
) -> Result<GameSummary>
where
    S: TileSource,
    R: BufRead,
    W: Write,
{
    let mut moves = 0u64;
    writeln!(out, "{}", engine.board())?;
    writeln!(out, "move with w/a/s/d, h/j/k/l or up/down/left/right; q quits")?;
    for line in input.lines() {
        let line = line.context("failed to read input")?;
        let dir = match parse_command(&line) {
            Some(Command::Quit) => break,
            Some(Command::Move(dir)) => dir,
            None => {
                writeln!(out, "unrecognized input {:?}", line.trim())?;
                continue;
            }
        };
        let (moved, spawned) = engine.step(dir);
        if !moved.changed {
            writeln!(out, "nothing moves {dir}")?;
        } else {
            moves += 1;
            if let Some(SpawnOutcome::Placed { row, col, value }) = spawned {
                debug!("new {value} at ({row}, {col})");
            }
        }
        if !engine.is_over() && engine.board().count_empty() == 0 && !engine.has_legal_move() {
            let _ = engine.spawn();
        }
        writeln!(out, "{}", engine.board())?;
        if engine.is_over() {
            writeln!(out, "game over: highest tile {}", engine.board().highest_tile())?;
            break;
        }
    }
    out.flush()?;
    Ok(GameSummary::from_engine(0, seed, moves, engine))
}
