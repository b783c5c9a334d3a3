use super::state::{Board, Direction, MAX_TILE, MoveResult, Tile};

/// Width of one rendered cell in `Board`'s `Display` output.
pub(crate) const CELL_WIDTH: usize = 7;

/// Slide/merge every line of `board` in place. No randomness.
///
/// Lines are rows for Left/Right and columns for Up/Down; each is resolved
/// destination-first so a tile closer to the edge settles before the tiles
/// behind it.
pub fn shift(board: &mut Board, direction: Direction) -> MoveResult {
    let lines = line_indices(board.width(), board.height(), direction);
    let mut merged = vec![false; board.width().max(board.height())];
    let cells = board.cells_mut();
    let mut changed = false;
    for line in &lines {
        merged.fill(false);
        changed |= slide_line(cells, line, &mut merged);
    }
    MoveResult { changed }
}

/// Cell indices of every line touched by `direction`, each ordered from the
/// destination edge outward.
pub(crate) fn line_indices(width: usize, height: usize, direction: Direction) -> Vec<Vec<usize>> {
    match direction {
        Direction::Left => (0..height)
            .map(|row| (0..width).map(|col| row * width + col).collect())
            .collect(),
        Direction::Right => (0..height)
            .map(|row| (0..width).rev().map(|col| row * width + col).collect())
            .collect(),
        Direction::Up => (0..width)
            .map(|col| (0..height).map(|row| row * width + col).collect())
            .collect(),
        Direction::Down => (0..width)
            .map(|col| (0..height).rev().map(|row| row * width + col).collect())
            .collect(),
    }
}

/// Resolve one line. `line[0]` is the destination edge; `merged[k]` marks a
/// position that already absorbed a merge during this move.
fn slide_line(cells: &mut [Tile], line: &[usize], merged: &mut [bool]) -> bool {
    let mut changed = false;
    for src in 1..line.len() {
        let mut value = cells[line[src]];
        if value == 0 {
            continue;
        }
        let mut dest = src;
        let mut did_merge = false;
        for k in (0..src).rev() {
            let other = cells[line[k]];
            if other == 0 {
                dest = k;
            } else if other == value && !merged[k] {
                // A merge that would overflow `Tile` blocks like a different value.
                if let Some(doubled) = value.checked_mul(2) {
                    value = doubled;
                    dest = k;
                    did_merge = true;
                }
                break;
            } else {
                break;
            }
        }
        if dest != src {
            cells[line[dest]] = value;
            cells[line[src]] = 0;
            merged[dest] = did_merge;
            changed = true;
        }
    }
    changed
}

/// True if a move in any direction changes the board.
pub fn has_legal_move(board: &Board) -> bool {
    Direction::ALL
        .into_iter()
        .any(|direction| board.shifted(direction).1)
}

/// Count the number of empty cells.
pub fn count_empty(board: &Board) -> usize {
    board.cells().iter().filter(|&&v| v == 0).count()
}

pub fn highest_tile(board: &Board) -> Tile {
    board.cells().iter().copied().max().unwrap_or(0)
}

/// `0` (empty) or a power of two in `2..=MAX_TILE`.
pub(crate) fn is_valid_tile(value: Tile) -> bool {
    value == 0 || ((2..=MAX_TILE).contains(&value) && value.is_power_of_two())
}

pub(crate) fn format_val(val: Tile) -> String {
    match val {
        0 => " ".repeat(CELL_WIDTH),
        x => format!("{x:^CELL_WIDTH$}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_after(tiles: &[Tile], direction: Direction) -> (Vec<Tile>, bool) {
        let mut board = Board::from_rows([tiles.to_vec()]).unwrap();
        let result = shift(&mut board, direction);
        (board.cells().to_vec(), result.changed)
    }

    fn board(rows: &[[Tile; 4]]) -> Board {
        Board::from_rows(rows.iter().copied()).unwrap()
    }

    #[test]
    fn it_shift_line_left() {
        assert_eq!(line_after(&[0, 0, 0, 0], Direction::Left), (vec![0, 0, 0, 0], false));
        assert_eq!(line_after(&[2, 4, 2, 4], Direction::Left), (vec![2, 4, 2, 4], false));
        assert_eq!(line_after(&[2, 2, 4, 4], Direction::Left), (vec![4, 8, 0, 0], true));
        assert_eq!(line_after(&[2, 0, 0, 2], Direction::Left), (vec![4, 0, 0, 0], true));
        assert_eq!(line_after(&[0, 0, 0, 2], Direction::Left), (vec![2, 0, 0, 0], true));
    }

    #[test]
    fn it_shift_line_right() {
        assert_eq!(line_after(&[0, 0, 0, 0], Direction::Right), (vec![0, 0, 0, 0], false));
        assert_eq!(line_after(&[2, 4, 2, 4], Direction::Right), (vec![2, 4, 2, 4], false));
        assert_eq!(line_after(&[2, 2, 4, 4], Direction::Right), (vec![0, 0, 4, 8], true));
        assert_eq!(line_after(&[32, 0, 0, 32], Direction::Right), (vec![0, 0, 0, 64], true));
        assert_eq!(line_after(&[0, 4, 4, 4], Direction::Right), (vec![0, 0, 4, 8], true));
    }

    #[test]
    fn merge_chains_collapse_pairwise() {
        assert_eq!(line_after(&[2, 2, 2, 2], Direction::Left).0, vec![4, 4, 0, 0]);
        assert_eq!(line_after(&[2, 2, 4, 0], Direction::Left).0, vec![4, 4, 0, 0]);
        assert_eq!(line_after(&[4, 2, 2, 0], Direction::Left).0, vec![4, 4, 0, 0]);
    }

    #[test]
    fn merged_tile_does_not_merge_again() {
        assert_eq!(line_after(&[2, 2, 2, 0], Direction::Left).0, vec![4, 2, 0, 0]);
        // The 8 arriving behind a fresh 8 stays separate.
        assert_eq!(line_after(&[4, 4, 8, 0], Direction::Left).0, vec![8, 8, 0, 0]);
        assert_eq!(line_after(&[0, 8, 4, 4], Direction::Right).0, vec![0, 0, 8, 8]);
    }

    #[test]
    fn different_value_blocks_the_walk() {
        // The trailing 2 cannot jump over the 4 to reach the leading 2.
        assert_eq!(line_after(&[2, 4, 2, 0], Direction::Left), (vec![2, 4, 2, 0], false));
        assert_eq!(line_after(&[2, 0, 4, 2], Direction::Left).0, vec![2, 4, 2, 0]);
    }

    #[test]
    fn compacted_line_is_a_no_op() {
        let mut b = Board::from_rows([[2, 4, 0, 0]]).unwrap();
        let before = b.clone();
        assert!(!shift(&mut b, Direction::Left).changed);
        assert_eq!(b, before);
    }

    #[test]
    fn test_move_left() {
        let mut game = board(&[[2, 4, 8, 16], [2, 8, 8, 4], [4, 0, 0, 4], [2, 0, 0, 4]]);
        assert!(shift(&mut game, Direction::Left).changed);
        assert_eq!(
            game,
            board(&[[2, 4, 8, 16], [2, 16, 4, 0], [8, 0, 0, 0], [2, 4, 0, 0]])
        );
    }

    #[test]
    fn test_move_right() {
        let mut game = board(&[[2, 4, 8, 16], [2, 8, 8, 4], [4, 0, 0, 4], [2, 0, 0, 4]]);
        assert!(shift(&mut game, Direction::Right).changed);
        assert_eq!(
            game,
            board(&[[2, 4, 8, 16], [0, 2, 16, 4], [0, 0, 0, 8], [0, 0, 2, 4]])
        );
    }

    #[test]
    fn test_move_up() {
        let mut game = board(&[[2, 2, 4, 2], [4, 8, 0, 0], [8, 8, 0, 0], [16, 4, 4, 4]]);
        assert!(shift(&mut game, Direction::Up).changed);
        assert_eq!(
            game,
            board(&[[2, 2, 8, 2], [4, 16, 0, 4], [8, 4, 0, 0], [16, 0, 0, 0]])
        );
    }

    #[test]
    fn test_move_down() {
        let mut game = board(&[[2, 2, 4, 2], [4, 8, 0, 0], [8, 8, 0, 0], [16, 4, 4, 4]]);
        assert!(shift(&mut game, Direction::Down).changed);
        assert_eq!(
            game,
            board(&[[2, 0, 0, 0], [4, 2, 0, 0], [8, 16, 0, 2], [16, 4, 8, 4]])
        );
    }

    #[test]
    fn shift_on_rectangular_board() {
        let mut game = Board::from_rows([[2, 0, 2, 0, 4], [0, 0, 0, 0, 4]]).unwrap();
        assert!(shift(&mut game, Direction::Up).changed);
        assert_eq!(game.to_rows(), vec![vec![2, 0, 2, 0, 8], vec![0, 0, 0, 0, 0]]);
        assert!(shift(&mut game, Direction::Right).changed);
        assert_eq!(game.to_rows(), vec![vec![0, 0, 0, 4, 8], vec![0, 0, 0, 0, 0]]);
    }

    #[test]
    fn moves_conserve_tile_sum() {
        let start = board(&[[2, 2, 4, 8], [2, 0, 4, 4], [8, 8, 8, 2], [0, 2, 2, 2]]);
        for first in Direction::ALL {
            for second in Direction::ALL {
                let mut game = start.clone();
                let _ = shift(&mut game, first);
                let _ = shift(&mut game, second);
                assert_eq!(game.sum(), start.sum(), "{first} then {second}");
            }
        }
    }

    #[test]
    fn repeated_direction_is_idempotent_without_merges() {
        let mut game = board(&[[2, 0, 4, 0], [0, 8, 0, 16], [0, 0, 0, 0], [32, 0, 0, 64]]);
        assert!(shift(&mut game, Direction::Left).changed);
        assert_eq!(
            game,
            board(&[[2, 4, 0, 0], [8, 16, 0, 0], [0, 0, 0, 0], [32, 64, 0, 0]])
        );
        assert!(!shift(&mut game, Direction::Left).changed);
        assert!(shift(&mut game, Direction::Right).changed);
        assert_eq!(
            game,
            board(&[[0, 0, 2, 4], [0, 0, 8, 16], [0, 0, 0, 0], [0, 0, 32, 64]])
        );
        assert!(!shift(&mut game, Direction::Right).changed);
    }

    #[test]
    fn it_has_legal_move() {
        let stuck = board(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert!(!has_legal_move(&stuck));
        let mergeable = board(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 4]]);
        assert!(has_legal_move(&mergeable));
        let with_gap = board(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 0]]);
        assert!(has_legal_move(&with_gap));
    }

    #[test]
    fn it_count_empty() {
        let game = board(&[[2, 2, 2, 2], [0, 0, 0, 0], [2, 2, 2, 2], [0, 0, 0, 0]]);
        assert_eq!(count_empty(&game), 8);
        assert_eq!(highest_tile(&game), 2);
        assert_eq!(highest_tile(&Board::default()), 0);
    }

    #[test]
    fn it_validates_tiles() {
        assert!(is_valid_tile(0));
        assert!(is_valid_tile(2));
        assert!(is_valid_tile(65536));
        assert!(!is_valid_tile(1));
        assert!(!is_valid_tile(6));
        assert!(is_valid_tile(MAX_TILE));
        assert!(!is_valid_tile(MAX_TILE * 2));
        assert!(!is_valid_tile(1 << 63));
    }

    #[test]
    fn largest_tiles_merge_without_overflow() {
        let mut game = Board::from_rows([[MAX_TILE, MAX_TILE]]).unwrap();
        assert!(shift(&mut game, Direction::Left).changed);
        assert_eq!(game.to_rows(), vec![vec![MAX_TILE * 2, 0]]);
        assert_eq!(game.sum(), MAX_TILE * 2);
        assert!(Board::from_rows([[1 << 63, 1 << 63]]).is_err());
    }

    #[test]
    fn overflowing_merge_is_blocked() {
        let top: Tile = 1 << 63;
        let mut cells = vec![top, top, 0];
        let mut merged = vec![false; 3];
        assert!(!slide_line(&mut cells, &[0, 1, 2], &mut merged));
        assert_eq!(cells, vec![top, top, 0]);
        // Sliding still works; only the merge is refused.
        let mut cells = vec![top, 0, top];
        merged.fill(false);
        assert!(slide_line(&mut cells, &[0, 1, 2], &mut merged));
        assert_eq!(cells, vec![top, top, 0]);
    }

    #[test]
    fn it_formats_cells() {
        assert_eq!(format_val(0), "       ");
        assert_eq!(format_val(2), "   2   ");
        assert_eq!(format_val(2048), " 2048  ");
        assert_eq!(format_val(131072), "131072 ");
    }
}
