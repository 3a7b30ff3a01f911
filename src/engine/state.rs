use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::serialization::{GridSnapshot, SnapshotError, TileState};

/// Width and height of the board.
pub const SIZE: usize = 4;

/// Largest tile a 4x4 game can build. Restored snapshots may not exceed it, so
/// the tile sum of any board stays far below `u32::MAX`.
pub const MAX_TILE: u32 = 1 << 17;

/// A cell coordinate. Signed so that stepping off the board is representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self { Position { x, y } }

    /// The neighbouring position one step along `(dx, dy)`.
    #[inline]
    pub fn step(self, (dx, dy): (i32, i32)) -> Self {
        Position { x: self.x + dx, y: self.y + dy }
    }
}

/// A numbered tile.
///
/// `merged_from` is only set on a tile produced by a merge during the current
/// move and holds the cells of its two sources. It is cleared before every move
/// and never leaves the grid through a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub value: u32,
    pub position: Position,
    pub merged_from: Option<[Position; 2]>,
}

impl Tile {
    #[inline]
    pub fn new(position: Position, value: u32) -> Self {
        Tile { value, position, merged_from: None }
    }

    #[inline]
    pub fn update_position(&mut self, position: Position) { self.position = position; }
}

/// The 4x4 board, stored as `cells[x][y]` like the host game.
///
/// `Grid` is `Copy`: search code clones it freely and never shares a board
/// between branches.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Grid {
    cells: [[Option<Tile>; SIZE]; SIZE],
}

impl Grid {
    /// A grid with no tiles.
    pub const EMPTY: Grid = Grid { cells: [[None; SIZE]; SIZE] };

    /// Build a grid from tile values laid out row by row (`rows[y][x]`), `0` meaning empty.
    ///
    /// ```
    /// use agent_2048::engine::{Grid, Position};
    /// let g = Grid::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0, 0, 0, 4]]);
    /// assert_eq!(g.cell_content(Position::new(3, 3)).map(|t| t.value), Some(4));
    /// ```
    pub fn from_rows(rows: [[u32; SIZE]; SIZE]) -> Self {
        let mut grid = Grid::EMPTY;
        for (y, row) in rows.iter().enumerate() {
            for (x, &value) in row.iter().enumerate() {
                if value != 0 {
                    grid.insert_tile(Tile::new(Position::new(x as i32, y as i32), value));
                }
            }
        }
        grid
    }

    /// Tile values row by row (`[y][x]`), `0` for empty cells.
    pub fn to_rows(&self) -> [[u32; SIZE]; SIZE] {
        let mut rows = [[0; SIZE]; SIZE];
        for (x, column) in self.cells.iter().enumerate() {
            for (y, cell) in column.iter().enumerate() {
                rows[y][x] = cell.map_or(0, |t| t.value);
            }
        }
        rows
    }

    #[inline]
    pub fn within_bounds(&self, pos: Position) -> bool {
        (0..SIZE as i32).contains(&pos.x) && (0..SIZE as i32).contains(&pos.y)
    }

    /// The tile at `pos`, or `None` for an empty or out-of-bounds cell.
    #[inline]
    pub fn cell_content(&self, pos: Position) -> Option<&Tile> {
        if self.within_bounds(pos) {
            self.cells[pos.x as usize][pos.y as usize].as_ref()
        } else {
            None
        }
    }

    #[inline]
    pub fn cell_occupied(&self, pos: Position) -> bool { self.cell_content(pos).is_some() }

    /// In bounds and empty.
    #[inline]
    pub fn cell_available(&self, pos: Position) -> bool {
        self.within_bounds(pos) && !self.cell_occupied(pos)
    }

    /// Empty cells, `x` in the outer loop and `y` in the inner loop.
    pub fn available_cells(&self) -> Vec<Position> {
        let mut out = Vec::with_capacity(SIZE * SIZE);
        for x in 0..SIZE {
            for y in 0..SIZE {
                if self.cells[x][y].is_none() {
                    out.push(Position::new(x as i32, y as i32));
                }
            }
        }
        out
    }

    #[inline]
    pub fn has_available_cells(&self) -> bool {
        self.cells.iter().flatten().any(Option::is_none)
    }

    /// Place `tile` at its own position.
    ///
    /// # Panics
    /// If the cell is out of bounds or already occupied, or the value is not a
    /// power of two of at least 2.
    pub fn insert_tile(&mut self, tile: Tile) {
        assert!(
            tile.value >= 2 && tile.value.is_power_of_two(),
            "tile value {} is not a power of two >= 2",
            tile.value
        );
        assert!(
            self.cell_available(tile.position),
            "cell ({}, {}) is not available for insertion",
            tile.position.x,
            tile.position.y
        );
        self.cells[tile.position.x as usize][tile.position.y as usize] = Some(tile);
    }

    /// Clear the cell the tile occupies.
    pub fn remove_tile(&mut self, tile: &Tile) {
        if self.within_bounds(tile.position) {
            self.cells[tile.position.x as usize][tile.position.y as usize] = None;
        }
    }

    /// Visit every occupied cell mutably.
    pub(crate) fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.cells.iter_mut().flatten().flatten()
    }

    /// All tiles, `x` outer and `y` inner.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.cells.iter().flatten().flatten()
    }

    pub fn tile_count(&self) -> usize { self.tiles().count() }

    /// Highest tile value on the board, 0 when empty.
    pub fn highest_tile(&self) -> u32 { self.tiles().map(|t| t.value).max().unwrap_or(0) }

    /// Log2 of each cell value (0 for empty), `cells[x][y]` order.
    ///
    /// Two grids with equal exponents hold the same tiles, whatever their
    /// transient merge markers say.
    pub fn exponents(&self) -> [u8; SIZE * SIZE] {
        let mut out = [0u8; SIZE * SIZE];
        for (slot, cell) in out.iter_mut().zip(self.cells.iter().flatten()) {
            *slot = cell.map_or(0, |t| t.value.trailing_zeros() as u8);
        }
        out
    }

    /// Deep copy of the cell matrix in the host snapshot format.
    pub fn serialize(&self) -> GridSnapshot {
        let cells = self
            .cells
            .iter()
            .map(|column| {
                column
                    .iter()
                    .map(|cell| cell.map(|t| TileState { value: t.value, position: Some(t.position) }))
                    .collect()
            })
            .collect();
        GridSnapshot { size: SIZE, cells }
    }

    /// Rebuild a grid from a host snapshot.
    ///
    /// ```
    /// use agent_2048::engine::Grid;
    /// let g = Grid::from_rows([[2, 4, 0, 0], [0; 4], [0; 4], [0; 4]]);
    /// assert_eq!(Grid::restore(&g.serialize()).unwrap(), g);
    /// ```
    pub fn restore(snapshot: &GridSnapshot) -> Result<Grid, SnapshotError> {
        if snapshot.size != SIZE {
            return Err(SnapshotError::Size(snapshot.size));
        }
        if snapshot.cells.len() != SIZE {
            return Err(SnapshotError::Columns(snapshot.cells.len()));
        }
        let mut grid = Grid::EMPTY;
        for (x, column) in snapshot.cells.iter().enumerate() {
            if column.len() != SIZE {
                return Err(SnapshotError::Rows { column: x, len: column.len() });
            }
            for (y, cell) in column.iter().enumerate() {
                let Some(state) = cell else { continue };
                let position = Position::new(x as i32, y as i32);
                if state.value < 2 || state.value > MAX_TILE || !state.value.is_power_of_two() {
                    return Err(SnapshotError::Value { x, y, value: state.value });
                }
                if let Some(claimed) = state.position {
                    if claimed != position {
                        return Err(SnapshotError::Position { x, y, claimed_x: claimed.x, claimed_y: claimed.y });
                    }
                }
                grid.insert_tile(Tile::new(position, state.value));
            }
        }
        Ok(grid)
    }

    /// A uniformly random empty cell, `None` on a full board.
    pub fn random_available_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Position> {
        let cells = self.available_cells();
        if cells.is_empty() { None } else { Some(cells[rng.gen_range(0..cells.len())]) }
    }

    /// Insert a 2 (90%) or 4 (10%) into a random empty cell. No-op on a full board.
    ///
    /// ```
    /// use agent_2048::engine::Grid;
    /// use rand::{rngs::StdRng, SeedableRng};
    /// let mut rng = StdRng::seed_from_u64(3);
    /// let mut g = Grid::EMPTY;
    /// g.add_random_tile(&mut rng);
    /// assert_eq!(g.tile_count(), 1);
    /// ```
    pub fn add_random_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if let Some(cell) = self.random_available_cell(rng) {
            let value = if rng.gen_bool(0.9) { 2 } else { 4 };
            self.insert_tile(Tile::new(cell, value));
        }
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grid({:?})", self.to_rows())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.to_rows();
        writeln!(f)?;
        for (i, row) in rows.iter().enumerate() {
            let cells: Vec<String> = row.iter().map(|&v| format_val(v)).collect();
            writeln!(f, "{}", cells.join("|"))?;
            if i + 1 < SIZE {
                writeln!(f, "-------------------------------")?;
            }
        }
        Ok(())
    }
}

fn format_val(val: u32) -> String {
    match val {
        0 => String::from("       "),
        v => format!("{:^7}", v),
    }
}
