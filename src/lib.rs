//! agent-2048: move selection for the 2048 sliding-tile game.
//!
//! This crate provides:
//! - A `Grid` board model with tile-level move simulation (`engine` module)
//! - A depth-limited expectiminimax searcher and move selector (`expectimax` module)
//! - The host snapshot format, JSON via serde (`serialization` module)
//!
//! Quick start:
//! ```
//! use agent_2048::engine::{Grid, Move};
//!
//! let g = Grid::from_rows([[2, 2, 4, 0], [0; 4], [0; 4], [0; 4]]);
//! let out = g.apply_move(Move::Left);
//! assert!(out.moved);
//! assert_eq!(out.score, 4);
//! ```
//!
//! Full loop against the bundled host stand-in:
//! ```
//! use agent_2048::engine::Game;
//! use agent_2048::expectimax::{Expectiminimax, ExpectimaxConfig};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(123);
//! let mut game = Game::new(&mut rng);
//! let mut policy = Expectiminimax::with_config(ExpectimaxConfig { depth: 3, ..Default::default() });
//!
//! while !game.is_over() && game.moves < 4 {
//!     match policy.best_move(&game.grid) {
//!         Some(dir) => { game.play(dir, &mut rng); }
//!         None => break,
//!     }
//! }
//! assert_eq!(game.moves, 4);
//! ```
//!
pub mod engine;
pub mod expectimax;
pub mod serialization;
#[cfg(feature = "wasm")]
pub mod wasm;
