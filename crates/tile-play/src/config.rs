use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tile_engine::engine::Direction;

/// How the auto player picks its next direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// Uniformly shuffled preference each turn.
    #[default]
    Random,
    /// Rotate through `run.cycle`, one step per turn.
    Cycle,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub run: RunConfig,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct BoardConfig {
    #[serde(default = "defaults::width")]
    pub width: usize,
    #[serde(default = "defaults::height")]
    pub height: usize,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct RunConfig {
    /// Base seed; game `i` uses `seed + i`. Drawn from entropy when omitted.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "defaults::games")]
    pub games: u32,
    /// Stop a game after this many board-changing moves.
    #[serde(default)]
    pub max_moves: Option<u64>,
    #[serde(default)]
    pub policy: PolicyKind,
    #[serde(default = "defaults::cycle")]
    pub cycle: Vec<Direction>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: defaults::width(),
            height: defaults::height(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: None,
            games: defaults::games(),
            max_moves: None,
            policy: PolicyKind::default(),
            cycle: defaults::cycle(),
        }
    }
}

impl Config {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = std::fs::File::open(path)
            .with_context(|| format!("failed to open config {}", path.display()))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let cfg: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(cfg)
    }

    /// Reject settings the engine or the auto player cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.board.width == 0 || self.board.height == 0 {
            bail!(
                "board dimensions must be non-zero, got {}x{}",
                self.board.width,
                self.board.height
            );
        }
        if self.run.games == 0 {
            bail!("run.games must be at least 1");
        }
        if self.run.policy == PolicyKind::Cycle && self.run.cycle.is_empty() {
            bail!("run.cycle must list at least one direction for the cycle policy");
        }
        Ok(())
    }
}

mod defaults {
    use super::Direction;

    pub fn width() -> usize { tile_engine::engine::DEFAULT_WIDTH }
    pub fn height() -> usize { tile_engine::engine::DEFAULT_HEIGHT }
    pub fn games() -> u32 { 1 }
    pub fn cycle() -> Vec<Direction> {
        vec![Direction::Up, Direction::Right, Direction::Down, Direction::Left]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_config(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let td = tempdir().unwrap();
        let path = td.path().join("play.toml");
        std::fs::write(&path, contents).unwrap();
        (td, path)
    }

    #[test]
    fn empty_file_uses_defaults() {
        let (_td, path) = write_config("");
        let cfg = Config::from_toml(&path).expect("load");
        assert_eq!(cfg, Config::default());
        assert_eq!((cfg.board.width, cfg.board.height), (4, 4));
        assert_eq!(cfg.run.games, 1);
        assert_eq!(cfg.run.policy, PolicyKind::Random);
        cfg.validate().unwrap();
    }

    #[test]
    fn full_config_roundtrip() {
        let (_td, path) = write_config(
            r#"
            [board]
            width = 5
            height = 3

            [run]
            seed = 42
            games = 10
            max_moves = 500
            policy = "cycle"
            cycle = ["left", "down"]
            "#,
        );
        let cfg = Config::from_toml(&path).expect("load");
        assert_eq!(cfg.board, BoardConfig { width: 5, height: 3 });
        assert_eq!(cfg.run.seed, Some(42));
        assert_eq!(cfg.run.games, 10);
        assert_eq!(cfg.run.max_moves, Some(500));
        assert_eq!(cfg.run.policy, PolicyKind::Cycle);
        assert_eq!(cfg.run.cycle, vec![Direction::Left, Direction::Down]);
        cfg.validate().unwrap();
    }

    #[test]
    fn rejects_unknown_policy_and_direction() {
        let (_td, path) = write_config("[run]\npolicy = \"greedy\"\n");
        assert!(Config::from_toml(&path).is_err());
        let (_td, path) = write_config("[run]\ncycle = [\"sideways\"]\n");
        assert!(Config::from_toml(&path).is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let td = tempdir().unwrap();
        let path = td.path().join("nope.toml");
        let err = Config::from_toml(&path).unwrap_err();
        assert!(format!("{err:#}").contains("nope.toml"));
    }

    #[test]
    fn validate_catches_unplayable_settings() {
        let mut cfg = Config::default();
        cfg.board.width = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.run.games = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.run.policy = PolicyKind::Cycle;
        cfg.run.cycle.clear();
        assert!(cfg.validate().is_err());
    }
}
