//! 2048 board model and move simulation.
//!
//! - [`Grid`]: the 4x4 cell matrix of [`Tile`]s with snapshot/restore.
//! - [`Grid::apply_move`]: slide + merge in one [`Move`] direction, reporting
//!   whether anything moved and the merge score.
//! - [`Game`]: a small host stand-in that spawns random tiles between moves.
//!
//! ```
//! use agent_2048::engine::{Grid, Move};
//! let g = Grid::from_rows([[0, 2, 0, 2], [0; 4], [0; 4], [0; 4]]);
//! let out = g.apply_move(Move::Right);
//! assert_eq!(out.grid.to_rows()[0], [0, 0, 0, 4]);
//! assert_eq!(out.score, 4);
//! ```

mod game;
mod moves;
mod state;

pub use game::Game;
pub use moves::{apply_move, Move, MoveOutcome, Traversals};
pub use state::{Grid, Position, Tile, MAX_TILE, SIZE};
