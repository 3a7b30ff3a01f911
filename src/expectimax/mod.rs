//! Expectiminimax move selection for 2048.
//!
//! [`Expectiminimax`] alternates MAX layers (the player picks the best of up
//! to four directions) with CHANCE layers (every empty cell receives a 2 with
//! probability 0.9 or a 4 with probability 0.1) down to a fixed depth, and
//! scores the frontier with a static [`Heuristic`].
//!
//! Notes
//! - The search is deterministic and single-threaded; every node works on its
//!   own copy of the grid.
//! - A direction that does not move the board is never chosen. When no
//!   direction moves, [`Expectiminimax::best_move`] returns `None`.
//!
//! Quick start
//! ```
//! use agent_2048::engine::{Game, Move};
//! use agent_2048::expectimax::{Expectiminimax, ExpectimaxConfig};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(123);
//! let mut game = Game::new(&mut rng);
//! let mut ai = Expectiminimax::with_config(ExpectimaxConfig { depth: 2, ..Default::default() });
//! for _ in 0..4 {
//!     let Some(dir) = ai.best_move(&game.grid) else { break };
//!     assert!(game.play(dir, &mut rng));
//! }
//! assert!(game.moves > 0);
//! ```

use crate::engine::{Grid, Move};
use crate::serialization::{GridSnapshot, SnapshotError};

mod heuristic;
mod search;

pub use heuristic::{evaluate, Heuristic};
pub use search::{chance_outcomes, ChanceOutcome, Expectiminimax, Layer, SearchNode};

/// Deepest search accepted; deeper requests are clamped.
pub const MAX_SEARCH_DEPTH: u32 = 8;

/// Spawn values with their probabilities.
pub const SPAWN_OUTCOMES: [(u32, f64); 2] = [(2, 0.9), (4, 0.1)];

/// Configurable knobs for the search.
///
/// - `depth`: plies from the root, counting MAX and CHANCE layers.
/// - `cache_enabled`: reuse CHANCE-layer values for repeated (grid, depth) pairs.
/// - `heuristic`: frontier evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpectimaxConfig {
    pub depth: u32,
    pub cache_enabled: bool,
    pub heuristic: Heuristic,
}

impl Default for ExpectimaxConfig {
    fn default() -> Self {
        Self { depth: 5, cache_enabled: true, heuristic: Heuristic::CornerWeights }
    }
}

/// Per-direction value at the root.
///
/// - `ev` is the expected value of playing `dir`, `f64::NEG_INFINITY` when illegal.
/// - `legal` is false when the move does not change the board.
/// - `score` is the merge score the move itself earns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchEval {
    pub dir: Move,
    pub ev: f64,
    pub legal: bool,
    pub score: u64,
}

impl BranchEval {
    #[inline]
    pub fn illegal(dir: Move) -> Self {
        BranchEval { dir, ev: f64::NEG_INFINITY, legal: false, score: 0 }
    }
}

/// Basic search stats for a single evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub peak_nodes: u64,
    pub cache_hits: u64,
}

/// First legal direction with the strictly greatest value, in canonical order.
pub fn pick_best(branches: &[BranchEval; 4]) -> Option<Move> {
    let mut best: Option<&BranchEval> = None;
    for branch in branches.iter().filter(|b| b.legal) {
        if best.map_or(true, |b| branch.ev > b.ev) {
            best = Some(branch);
        }
    }
    best.map(|b| b.dir)
}

/// One-shot entry point for a host: restore `snapshot`, search to `depth`, and
/// return the chosen direction (`None` when no move is possible).
///
/// ```
/// use agent_2048::engine::{Grid, Move};
/// use agent_2048::expectimax::select_move;
/// let snap = Grid::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]).serialize();
/// let dir = select_move(&snap, 2).unwrap();
/// assert!(matches!(dir, Some(Move::Right) | Some(Move::Down)));
/// ```
pub fn select_move(snapshot: &GridSnapshot, depth: u32) -> Result<Option<Move>, SnapshotError> {
    let grid = Grid::restore(snapshot)?;
    let mut ai = Expectiminimax::with_config(ExpectimaxConfig { depth, ..Default::default() });
    Ok(ai.best_move(&grid))
}
