use std::fmt;
use std::str::FromStr;

use super::state::{Grid, Position, Tile, SIZE};

/// A direction to move/merge tiles.
///
/// The discriminant is the host's integer code; [`Move::ALL`] is the canonical
/// order in which the search visits directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Move {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Move {
    /// Canonical order: Up, Right, Down, Left.
    pub const ALL: [Move; 4] = [Move::Up, Move::Right, Move::Down, Move::Left];

    /// Unit step of a tile moving in this direction.
    #[inline]
    pub const fn vector(self) -> (i32, i32) {
        match self {
            Move::Up => (0, -1),
            Move::Right => (1, 0),
            Move::Down => (0, 1),
            Move::Left => (-1, 0),
        }
    }

    #[inline]
    pub const fn code(self) -> u8 { self as u8 }

    pub fn from_code(code: u8) -> Option<Move> {
        Move::ALL.get(code as usize).copied()
    }

    pub const fn name(self) -> &'static str {
        match self {
            Move::Up => "up",
            Move::Right => "right",
            Move::Down => "down",
            Move::Left => "left",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.pad(self.name()) }
}

impl FromStr for Move {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" | "0" => Ok(Move::Up),
            "right" | "1" => Ok(Move::Right),
            "down" | "2" => Ok(Move::Down),
            "left" | "3" => Ok(Move::Left),
            other => Err(format!("unknown direction '{other}'")),
        }
    }
}

/// Result of sliding a grid in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// At least one tile changed cell.
    pub moved: bool,
    pub grid: Grid,
    /// Sum of the values of tiles created by merges.
    pub score: u64,
}

/// Cell visiting order for a move: farthest cells in the direction of travel first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Traversals {
    pub x: [i32; SIZE],
    pub y: [i32; SIZE],
}

impl Traversals {
    pub fn new((dx, dy): (i32, i32)) -> Self {
        let mut x = [0, 1, 2, 3];
        let mut y = [0, 1, 2, 3];
        if dx == 1 {
            x.reverse();
        }
        if dy == 1 {
            y.reverse();
        }
        Traversals { x, y }
    }
}

impl Grid {
    /// Walk from `cell` along `vector` while cells stay in bounds and empty.
    ///
    /// Returns the last reachable cell and the first blocking one, which may
    /// lie off the board.
    pub fn find_farthest_position(&self, cell: Position, vector: (i32, i32)) -> (Position, Position) {
        let mut previous = cell;
        let mut next = cell.step(vector);
        while self.cell_available(next) {
            previous = next;
            next = next.step(vector);
        }
        (previous, next)
    }

    fn move_tile(&mut self, tile: Tile, cell: Position) {
        self.remove_tile(&tile);
        let mut moved = tile;
        moved.update_position(cell);
        self.insert_tile(moved);
    }

    fn prepare_tiles(&mut self) {
        for tile in self.tiles_mut() {
            tile.merged_from = None;
        }
    }

    /// Slide and merge every tile in `direction`. The receiver is left untouched.
    ///
    /// ```
    /// use agent_2048::engine::{Grid, Move};
    /// let g = Grid::from_rows([[2, 2, 4, 0], [0; 4], [0; 4], [0; 4]]);
    /// let out = g.apply_move(Move::Left);
    /// assert!(out.moved);
    /// assert_eq!(out.score, 4);
    /// assert_eq!(out.grid.to_rows()[0], [4, 4, 0, 0]);
    /// ```
    pub fn apply_move(&self, direction: Move) -> MoveOutcome {
        let mut grid = *self;
        grid.prepare_tiles();

        let vector = direction.vector();
        let traversals = Traversals::new(vector);
        let mut moved = false;
        let mut score = 0u64;

        for &x in &traversals.x {
            for &y in &traversals.y {
                let cell = Position::new(x, y);
                let Some(tile) = grid.cell_content(cell).copied() else { continue };

                let (farthest, next) = grid.find_farthest_position(cell, vector);
                let merge_target = grid
                    .cell_content(next)
                    .copied()
                    .filter(|other| other.value == tile.value && other.merged_from.is_none());

                let destination = match merge_target {
                    Some(other) => {
                        let mut merged = Tile::new(next, tile.value * 2);
                        merged.merged_from = Some([tile.position, other.position]);
                        grid.remove_tile(&other);
                        grid.remove_tile(&tile);
                        grid.insert_tile(merged);
                        score += u64::from(merged.value);
                        next
                    }
                    None => {
                        if farthest != cell {
                            grid.move_tile(tile, farthest);
                        }
                        farthest
                    }
                };

                if destination != cell {
                    moved = true;
                }
            }
        }

        if !moved {
            // a no-op keeps the previous merge marks
            return MoveOutcome { moved, grid: *self, score: 0 };
        }
        MoveOutcome { moved, grid, score }
    }

    /// The grid after sliding in `direction`, without a random spawn.
    #[inline]
    pub fn shift(&self, direction: Move) -> Grid { self.apply_move(direction).grid }

    /// Directions that change the grid, in canonical order.
    pub fn legal_moves(&self) -> Vec<Move> {
        Move::ALL.into_iter().filter(|&dir| self.apply_move(dir).moved).collect()
    }

    /// True if no direction changes the grid.
    pub fn is_game_over(&self) -> bool {
        Move::ALL.iter().all(|&dir| !self.apply_move(dir).moved)
    }
}

/// Free-function form of [`Grid::apply_move`].
#[inline]
pub fn apply_move(grid: &Grid, direction: Move) -> MoveOutcome { grid.apply_move(direction) }

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: [u32; 4]) -> Grid { Grid::from_rows([values, [0; 4], [0; 4], [0; 4]]) }

    fn first_row(grid: &Grid) -> [u32; 4] { grid.to_rows()[0] }

    #[test]
    fn traversals_reverse_positive_axis() {
        assert_eq!(Traversals::new(Move::Right.vector()).x, [3, 2, 1, 0]);
        assert_eq!(Traversals::new(Move::Right.vector()).y, [0, 1, 2, 3]);
        assert_eq!(Traversals::new(Move::Down.vector()).y, [3, 2, 1, 0]);
        assert_eq!(Traversals::new(Move::Left.vector()).x, [0, 1, 2, 3]);
        assert_eq!(Traversals::new(Move::Up.vector()).y, [0, 1, 2, 3]);
    }

    #[test]
    fn farthest_position_stops_at_obstacles() {
        let g = row([0, 4, 0, 2]);
        let (far, next) = g.find_farthest_position(Position::new(3, 0), Move::Left.vector());
        assert_eq!(far, Position::new(2, 0));
        assert_eq!(next, Position::new(1, 0));
        let (far, next) = g.find_farthest_position(Position::new(1, 0), Move::Left.vector());
        assert_eq!(far, Position::new(0, 0));
        assert_eq!(next, Position::new(-1, 0));
    }

    #[test]
    fn shift_left_rows() {
        assert_eq!(first_row(&row([0, 0, 0, 2]).shift(Move::Left)), [2, 0, 0, 0]);
        assert_eq!(first_row(&row([2, 0, 2, 0]).shift(Move::Left)), [4, 0, 0, 0]);
        assert_eq!(first_row(&row([2, 8, 8, 4]).shift(Move::Left)), [2, 16, 4, 0]);
        assert_eq!(first_row(&row([2, 4, 8, 16]).shift(Move::Left)), [2, 4, 8, 16]);
        assert_eq!(first_row(&row([2, 0, 0, 4]).shift(Move::Left)), [2, 4, 0, 0]);
        assert_eq!(first_row(&row([4, 4, 8, 8]).shift(Move::Left)), [8, 16, 0, 0]);
    }

    #[test]
    fn shift_right_rows() {
        assert_eq!(first_row(&row([2, 0, 0, 0]).shift(Move::Right)), [0, 0, 0, 2]);
        assert_eq!(first_row(&row([2, 0, 2, 0]).shift(Move::Right)), [0, 0, 0, 4]);
        assert_eq!(first_row(&row([2, 8, 8, 4]).shift(Move::Right)), [0, 2, 16, 4]);
        assert_eq!(first_row(&row([0, 2, 2, 2]).shift(Move::Right)), [0, 0, 2, 4]);
        assert_eq!(first_row(&row([32, 0, 0, 32]).shift(Move::Right)), [0, 0, 0, 64]);
    }

    #[test]
    fn three_equal_tiles_merge_farthest_pair_once() {
        let out = row([2, 2, 2, 0]).apply_move(Move::Left);
        assert_eq!(first_row(&out.grid), [4, 2, 0, 0]);
        assert_eq!(out.score, 4);

        let out = row([2, 2, 2, 2]).apply_move(Move::Left);
        assert_eq!(first_row(&out.grid), [4, 4, 0, 0]);
        assert_eq!(out.score, 8);
    }

    #[test]
    fn merged_tile_does_not_merge_again() {
        // 4 + (2+2) must not chain into 8
        let out = row([4, 2, 2, 0]).apply_move(Move::Left);
        assert_eq!(first_row(&out.grid), [4, 4, 0, 0]);
        assert_eq!(out.score, 4);
    }

    #[test]
    fn move_up_and_down_columns() {
        let g = Grid::from_rows([[2, 0, 4, 0], [2, 0, 0, 0], [0, 0, 4, 0], [4, 2, 0, 0]]);
        let up = g.apply_move(Move::Up);
        assert_eq!(up.grid.to_rows(), [[4, 2, 8, 0], [4, 0, 0, 0], [0; 4], [0; 4]]);
        assert_eq!(up.score, 12);
        let down = g.apply_move(Move::Down);
        assert_eq!(down.grid.to_rows(), [[0; 4], [0; 4], [4, 0, 0, 0], [4, 2, 8, 0]]);
        assert_eq!(down.score, 12);
    }

    #[test]
    fn example_row_moves_left_with_score_four() {
        let out = row([2, 2, 4, 0]).apply_move(Move::Left);
        assert!(out.moved);
        assert_eq!(first_row(&out.grid), [4, 4, 0, 0]);
        assert_eq!(out.score, 4);
    }

    #[test]
    fn no_op_move_leaves_grid_identical() {
        let g = row([2, 4, 8, 16]);
        let out = g.apply_move(Move::Left);
        assert!(!out.moved);
        assert_eq!(out.grid, g);
        assert_eq!(out.score, 0);
        assert!(!g.apply_move(Move::Up).moved);

        let merged = row([2, 2, 0, 0]).apply_move(Move::Left).grid;
        let out = merged.apply_move(Move::Left);
        assert!(!out.moved);
        assert_eq!(out.grid, merged);
        assert!(out.grid.cell_content(Position::new(0, 0)).unwrap().merged_from.is_some());
    }

    #[test]
    fn merge_marks_are_cleared_on_next_move() {
        let once = row([2, 2, 0, 0]).apply_move(Move::Left).grid;
        assert!(once.cell_content(Position::new(0, 0)).unwrap().merged_from.is_some());
        let twice = once.apply_move(Move::Right).grid;
        assert!(twice.tiles().all(|t| t.merged_from.is_none()));
        assert_eq!(first_row(&twice), [0, 0, 0, 4]);
    }

    #[test]
    fn tile_positions_follow_cells() {
        let out = row([0, 0, 2, 2]).apply_move(Move::Left).grid;
        for x in 0..4 {
            for y in 0..4 {
                let p = Position::new(x, y);
                if let Some(t) = out.cell_content(p) {
                    assert_eq!(t.position, p);
                }
            }
        }
    }

    #[test]
    fn full_board_without_pairs_is_game_over() {
        let g = Grid::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert!(!g.has_available_cells());
        for dir in Move::ALL {
            assert!(!g.apply_move(dir).moved, "{dir} should not move");
        }
        assert!(g.is_game_over());
        assert!(g.legal_moves().is_empty());
    }

    #[test]
    fn full_board_with_pair_has_merge_moves_only() {
        let g = Grid::from_rows([[2, 2, 4, 8], [4, 8, 16, 32], [8, 16, 32, 64], [16, 32, 64, 128]]);
        assert!(!g.has_available_cells());
        assert_eq!(g.legal_moves(), vec![Move::Right, Move::Left]);
        assert!(!g.is_game_over());
    }

    #[test]
    fn move_codes_and_parsing() {
        for (i, dir) in Move::ALL.into_iter().enumerate() {
            assert_eq!(dir.code() as usize, i);
            assert_eq!(Move::from_code(i as u8), Some(dir));
            assert_eq!(dir.name().parse::<Move>(), Ok(dir));
        }
        assert_eq!(Move::from_code(4), None);
        assert!("north".parse::<Move>().is_err());
    }
}
