use tile_engine::engine::Direction;

/// A parsed line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Quit,
}

/// Accepted spellings for each direction: WASD, vi keys and full words.
const KEYMAP: &[(&str, Direction)] = &[
    ("w", Direction::Up),
    ("k", Direction::Up),
    ("up", Direction::Up),
    ("s", Direction::Down),
    ("j", Direction::Down),
    ("down", Direction::Down),
    ("a", Direction::Left),
    ("h", Direction::Left),
    ("left", Direction::Left),
    ("d", Direction::Right),
    ("l", Direction::Right),
    ("right", Direction::Right),
];

/// Map one input line to a command; `None` if it is not recognized.
pub fn parse_command(line: &str) -> Option<Command> {
    let key = line.trim().to_ascii_lowercase();
    if key == "q" || key == "quit" {
        return Some(Command::Quit);
    }
    KEYMAP
        .iter()
        .find(|(name, _)| *name == key)
        .map(|&(_, dir)| Command::Move(dir))
}
