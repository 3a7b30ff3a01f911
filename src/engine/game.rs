use rand::Rng;

use super::moves::Move;
use super::state::Grid;

/// Minimal stand-in for the host game: owns the authoritative grid and score,
/// spawns tiles after each effective move and reports game over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Game {
    pub grid: Grid,
    pub score: u64,
    pub moves: u32,
}

impl Game {
    /// A fresh game with two random starting tiles.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut grid = Grid::EMPTY;
        grid.add_random_tile(rng);
        grid.add_random_tile(rng);
        Game::from_grid(grid)
    }

    pub fn from_grid(grid: Grid) -> Self { Game { grid, score: 0, moves: 0 } }

    /// Apply `direction`; on an effective move add the merge score and spawn a tile.
    ///
    /// Returns whether the grid moved.
    ///
    /// ```
    /// use agent_2048::engine::{Game, Grid, Move};
    /// use rand::{rngs::StdRng, SeedableRng};
    /// let mut rng = StdRng::seed_from_u64(5);
    /// let mut game = Game::from_grid(Grid::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]));
    /// assert!(game.play(Move::Left, &mut rng));
    /// assert_eq!(game.score, 4);
    /// assert_eq!(game.grid.tile_count(), 2);
    /// ```
    pub fn play<R: Rng + ?Sized>(&mut self, direction: Move, rng: &mut R) -> bool {
        let outcome = self.grid.apply_move(direction);
        if !outcome.moved {
            return false;
        }
        self.grid = outcome.grid;
        self.score += outcome.score;
        self.moves += 1;
        self.grid.add_random_tile(rng);
        true
    }

    #[inline]
    pub fn is_over(&self) -> bool { self.grid.is_game_over() }

    #[inline]
    pub fn highest_tile(&self) -> u32 { self.grid.highest_tile() }
}
