//! Host snapshot format.
//!
//! The host game hands over its board as JSON (`{size, cells}` with
//! `cells[x][y]` either `null` or a tile object). [`GridSnapshot`] mirrors that
//! shape with serde; [`crate::engine::Grid::restore`] validates it into a grid.

mod snapshot;

pub use snapshot::{GridSnapshot, SnapshotError, TileState};
