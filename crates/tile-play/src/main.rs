mod config;
mod input;
mod play;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::info;
use tile_engine::engine::GridEngine;

use config::Config;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Read moves from stdin and print the board after each one
    Interactive,
    /// Let a seeded policy play `run.games` games and log summaries
    Auto,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Play the sliding-tile merge puzzle in the terminal"
)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, value_name = "FILE", value_parser = clap::value_parser!(PathBuf))]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Mode::Interactive)]
    mode: Mode,

    /// Base seed (overrides run.seed)
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Number of games in auto mode (overrides run.games)
    #[arg(long, value_name = "N")]
    games: Option<u32>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut config = match &cli.config {
        Some(path) => {
            info!("Using configuration file: {}", path.display());
            Config::from_toml(path)?
        }
        None => Config::default(),
    };
    if let Some(seed) = cli.seed {
        config.run.seed = Some(seed);
    }
    if let Some(games) = cli.games {
        config.run.games = games;
    }
    config.validate()?;

    match cli.mode {
        Mode::Auto => {
            let summaries = play::run_auto(&config)?;
            let finished = summaries.iter().filter(|s| s.over).count();
            let best = summaries.iter().map(|s| s.highest_tile).max().unwrap_or(0);
            info!(
                "Completed {} game(s): {} ran to game over, best tile {}",
                summaries.len(),
                finished,
                best
            );
        }
        Mode::Interactive => {
            let seed = config.run.seed.unwrap_or_else(rand::random);
            let mut engine = GridEngine::seeded(config.board.width, config.board.height, seed)?;
            let stdin = io::stdin();
            let summary = play::run_interactive(&mut engine, seed, stdin.lock(), io::stdout().lock())?;
            info!(
                "Session over (seed {}): {} moves, highest tile {}",
                summary.seed, summary.moves, summary.highest_tile
            );
        }
    }
    Ok(())
}
