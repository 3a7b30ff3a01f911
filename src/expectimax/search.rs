use std::collections::HashMap;

use crate::engine::{Grid, Move, MoveOutcome, Position, Tile, SIZE};

use super::{pick_best, BranchEval, ExpectimaxConfig, SearchStats, MAX_SEARCH_DEPTH, SPAWN_OUTCOMES};

/// Whose turn a search node models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// The player picks the best direction.
    Max,
    /// The game spawns a random tile.
    Chance,
}

/// A position in the search tree. Each node owns its grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchNode {
    pub grid: Grid,
    /// Merge score accumulated from the root.
    pub score: u64,
    /// Remaining plies.
    pub depth: u32,
    pub layer: Layer,
}

impl SearchNode {
    pub fn new(grid: Grid, depth: u32, layer: Layer) -> Self {
        SearchNode { grid, score: 0, depth, layer }
    }

    /// Frontier: out of depth, or no cell left for a spawn.
    #[inline]
    pub fn is_terminal(&self) -> bool { self.depth == 0 || !self.grid.has_available_cells() }

    fn after_move(&self, outcome: MoveOutcome) -> SearchNode {
        SearchNode {
            grid: outcome.grid,
            score: self.score + outcome.score,
            depth: self.depth.saturating_sub(1),
            layer: Layer::Chance,
        }
    }

    fn after_spawn(&self, grid: Grid) -> SearchNode {
        SearchNode { grid, score: self.score, depth: self.depth.saturating_sub(1), layer: Layer::Max }
    }
}

/// One (cell, value) spawn considered by a CHANCE layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChanceOutcome {
    pub cell: Position,
    pub value: u32,
    /// `(1 / empty cells) * spawn probability`.
    pub probability: f64,
}

/// Every spawn a CHANCE layer averages over. Probabilities sum to 1 unless the
/// grid is full, in which case the list is empty.
///
/// ```
/// use agent_2048::engine::Grid;
/// use agent_2048::expectimax::chance_outcomes;
/// let g = Grid::from_rows([[2, 4, 8, 16], [2, 4, 8, 16], [2, 4, 8, 16], [2, 4, 0, 0]]);
/// let outcomes = chance_outcomes(&g);
/// assert_eq!(outcomes.len(), 4);
/// let total: f64 = outcomes.iter().map(|o| o.probability).sum();
/// assert!((total - 1.0).abs() < 1e-12);
/// ```
pub fn chance_outcomes(grid: &Grid) -> Vec<ChanceOutcome> {
    let cells = grid.available_cells();
    if cells.is_empty() {
        return Vec::new();
    }
    let per_cell = 1.0 / cells.len() as f64;
    let mut out = Vec::with_capacity(cells.len() * SPAWN_OUTCOMES.len());
    for cell in cells {
        for &(value, p) in &SPAWN_OUTCOMES {
            out.push(ChanceOutcome { cell, value, probability: per_cell * p });
        }
    }
    out
}

type CacheKey = ([u8; SIZE * SIZE], u32);

/// Scratch state for one top-level search call.
#[derive(Default)]
struct SearchContext {
    cache: HashMap<CacheKey, f64>,
    nodes: u64,
    cache_hits: u64,
}

/// Depth-limited expectiminimax searcher.
///
/// Holds only configuration and the stats of the last call; every call builds
/// its own cache, so separate instances can run on separate threads.
pub struct Expectiminimax {
    cfg: ExpectimaxConfig,
    stats: SearchStats,
}

impl Expectiminimax {
    pub fn new() -> Self { Self::with_config(ExpectimaxConfig::default()) }

    /// Build a searcher; depths above [`MAX_SEARCH_DEPTH`] are clamped.
    pub fn with_config(mut cfg: ExpectimaxConfig) -> Self {
        if cfg.depth > MAX_SEARCH_DEPTH {
            log::warn!("search depth {} clamped to {}", cfg.depth, MAX_SEARCH_DEPTH);
            cfg.depth = MAX_SEARCH_DEPTH;
        }
        Self { cfg, stats: SearchStats::default() }
    }

    #[inline]
    pub fn config(&self) -> &ExpectimaxConfig { &self.cfg }

    /// Pick the direction with the highest expected value.
    ///
    /// Directions are tried in the order Up, Right, Down, Left; ties go to the
    /// earliest. Returns `None` when no direction changes the board.
    ///
    /// Example
    /// ```
    /// use agent_2048::engine::{Grid, Move};
    /// use agent_2048::expectimax::{Expectiminimax, ExpectimaxConfig};
    /// // Only a downward slide moves anything here.
    /// let g = Grid::from_rows([[2, 4, 8, 16], [0; 4], [0; 4], [0; 4]]);
    /// let mut ai = Expectiminimax::with_config(ExpectimaxConfig { depth: 2, ..Default::default() });
    /// assert_eq!(ai.best_move(&g), Some(Move::Down));
    /// ```
    pub fn best_move(&mut self, grid: &Grid) -> Option<Move> {
        log::trace!("selecting move for:{}", grid);
        let branches = self.branch_evals(grid);
        let best = pick_best(&branches);
        log::debug!(
            "values up={:.1} right={:.1} down={:.1} left={:.1} -> {} ({} nodes)",
            branches[0].ev,
            branches[1].ev,
            branches[2].ev,
            branches[3].ev,
            best.map_or("none", Move::name),
            self.stats.nodes
        );
        best
    }

    /// Expected value of every direction from `grid`, in canonical order.
    ///
    /// Illegal directions carry `legal = false` and `ev = f64::NEG_INFINITY`.
    pub fn branch_evals(&mut self, grid: &Grid) -> [BranchEval; 4] {
        let mut ctx = SearchContext::default();
        let root = SearchNode::new(*grid, self.cfg.depth, Layer::Max);
        let out = Move::ALL.map(|dir| {
            let outcome = grid.apply_move(dir);
            if !outcome.moved {
                return BranchEval::illegal(dir);
            }
            let ev = self.search(&root.after_move(outcome), &mut ctx);
            BranchEval { dir, ev, legal: true, score: outcome.score }
        });
        self.record(&ctx);
        out
    }

    /// Value of `grid` as a MAX layer at the configured depth.
    pub fn state_value(&mut self, grid: &Grid) -> f64 {
        let mut ctx = SearchContext::default();
        let value = self.search(&SearchNode::new(*grid, self.cfg.depth, Layer::Max), &mut ctx);
        self.record(&ctx);
        value
    }

    /// Statistics collected from the last call to [`Self::best_move`],
    /// [`Self::branch_evals`] or [`Self::state_value`].
    #[inline]
    pub fn last_stats(&self) -> SearchStats { self.stats }

    #[inline]
    pub fn reset_stats(&mut self) { self.stats = SearchStats::default(); }

    fn record(&mut self, ctx: &SearchContext) {
        self.stats.nodes = ctx.nodes;
        self.stats.cache_hits = ctx.cache_hits;
        self.stats.peak_nodes = self.stats.peak_nodes.max(ctx.nodes);
    }

    fn search(&self, node: &SearchNode, ctx: &mut SearchContext) -> f64 {
        ctx.nodes += 1;
        if node.is_terminal() {
            return self.cfg.heuristic.evaluate(&node.grid);
        }
        match node.layer {
            Layer::Max => self.evaluate_max(node, ctx),
            Layer::Chance => self.evaluate_chance(node, ctx),
        }
    }

    fn evaluate_max(&self, node: &SearchNode, ctx: &mut SearchContext) -> f64 {
        let mut best: Option<f64> = None;
        for dir in Move::ALL {
            let outcome = node.grid.apply_move(dir);
            if outcome.moved {
                let value = self.search(&node.after_move(outcome), ctx);
                best = Some(best.map_or(value, |b| b.max(value)));
            }
        }
        // stuck with free cells only happens on an empty grid
        best.unwrap_or_else(|| self.cfg.heuristic.evaluate(&node.grid))
    }

    fn evaluate_chance(&self, node: &SearchNode, ctx: &mut SearchContext) -> f64 {
        let key = (node.grid.exponents(), node.depth);
        if self.cfg.cache_enabled {
            if let Some(&score) = ctx.cache.get(&key) {
                ctx.cache_hits += 1;
                return score;
            }
        }
        let mut expected = 0.0;
        for outcome in chance_outcomes(&node.grid) {
            let mut child = node.grid;
            child.insert_tile(Tile::new(outcome.cell, outcome.value));
            expected += outcome.probability * self.search(&node.after_spawn(child), ctx);
        }
        if self.cfg.cache_enabled {
            ctx.cache.insert(key, expected);
        }
        expected
    }
}

impl Default for Expectiminimax {
    fn default() -> Self { Self::new() }
}
