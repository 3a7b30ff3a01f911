use std::fmt;
use std::str::FromStr;

use crate::engine::{Grid, SIZE};

/// Static board evaluation used at the search frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Heuristic {
    /// Best of four corner-biased positional weight matrices.
    #[default]
    CornerWeights,
    /// Per-line empty/merge/monotonicity/sum shape score over rows and columns.
    LineShape,
}

impl Heuristic {
    #[inline]
    pub fn evaluate(self, grid: &Grid) -> f64 {
        match self {
            Heuristic::CornerWeights => corner_weights_score(grid),
            Heuristic::LineShape => line_shape_score(grid),
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Heuristic::CornerWeights => "corner",
            Heuristic::LineShape => "line",
        })
    }
}

impl FromStr for Heuristic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "corner" | "corner-weights" => Ok(Heuristic::CornerWeights),
            "line" | "line-shape" => Ok(Heuristic::LineShape),
            other => Err(format!("unknown heuristic '{other}' (expected corner|line)")),
        }
    }
}

/// Evaluate `grid` with the default corner-weights heuristic.
///
/// ```
/// use agent_2048::engine::Grid;
/// use agent_2048::expectimax::evaluate;
/// let corner = Grid::from_rows([[64, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
/// let centre = Grid::from_rows([[0; 4], [0, 64, 0, 0], [0; 4], [0; 4]]);
/// assert!(evaluate(&corner) > evaluate(&centre));
/// ```
#[inline]
pub fn evaluate(grid: &Grid) -> f64 { Heuristic::CornerWeights.evaluate(grid) }

type Weights = [[f64; SIZE]; SIZE];

// Rows are board rows (`[y][x]`). Each matrix snakes from 32768 in one corner down to 1.
const CORNER_WEIGHTS: [Weights; 4] = [
    // top-left
    [
        [32768., 16384., 8192., 4096.],
        [256., 512., 1024., 2048.],
        [128., 64., 32., 16.],
        [1., 2., 4., 8.],
    ],
    // bottom-left
    [
        [4096., 2048., 16., 8.],
        [8192., 1024., 32., 4.],
        [16384., 512., 64., 2.],
        [32768., 256., 128., 1.],
    ],
    // bottom-right
    [
        [8., 4., 2., 1.],
        [16., 32., 64., 128.],
        [2048., 1024., 512., 256.],
        [4096., 8192., 16384., 32768.],
    ],
    // top-right
    [
        [1., 128., 256., 32768.],
        [2., 64., 512., 16384.],
        [4., 32., 1024., 8192.],
        [8., 16., 2048., 4096.],
    ],
];

fn corner_weights_score(grid: &Grid) -> f64 {
    let rows = grid.to_rows();
    CORNER_WEIGHTS
        .iter()
        .map(|weights| {
            rows.iter()
                .zip(weights)
                .flat_map(|(row, w)| row.iter().zip(w))
                .fold(0.0, |acc, (&value, &weight)| acc + f64::from(value) * weight)
        })
        .fold(f64::NEG_INFINITY, f64::max)
}

// Credit to nneonneo for the line heuristic structure
fn line_shape_score(grid: &Grid) -> f64 {
    // `exponents` is laid out `[x * SIZE + y]`.
    let e = grid.exponents();
    (0..SIZE).fold(0.0, |score, i| {
        let column = [e[i * SIZE], e[i * SIZE + 1], e[i * SIZE + 2], e[i * SIZE + 3]];
        let row = [e[i], e[SIZE + i], e[2 * SIZE + i], e[3 * SIZE + i]];
        score + line_shape(row) + line_shape(column)
    })
}

/// Score of one row or column given as tile exponents (0 is empty).
fn line_shape(line: [u8; SIZE]) -> f64 {
    const BASE: f64 = 200_000.0;
    const EMPTY_WEIGHT: f64 = 270.0;
    const MERGE_WEIGHT: f64 = 700.0;
    const MONOTONICITY_WEIGHT: f64 = 47.0;
    const SUM_WEIGHT: f64 = 11.0;

    let empty = line.iter().filter(|&&e| e == 0).count() as f64;
    let mass: f64 = line.iter().map(|&e| f64::from(e).powf(3.5)).sum();
    BASE + empty * EMPTY_WEIGHT + mergeable_tiles(line) as f64 * MERGE_WEIGHT
        - disorder(line) * MONOTONICITY_WEIGHT
        - mass * SUM_WEIGHT
}

/// Tiles that sit in a run of two or more equal neighbours.
fn mergeable_tiles(line: [u8; SIZE]) -> usize {
    let mut total = 0;
    let mut run = 1;
    for i in 1..=SIZE {
        if i < SIZE && line[i] != 0 && line[i] == line[i - 1] {
            run += 1;
            continue;
        }
        if run > 1 {
            total += run;
        }
        run = 1;
    }
    total
}

/// Smaller of the rising and falling steps, on fourth powers of the exponents.
/// Zero for a monotone line.
fn disorder(line: [u8; SIZE]) -> f64 {
    let (rising, falling) = line.windows(2).fold((0.0, 0.0), |(up, down), pair| {
        let step = f64::from(pair[1]).powi(4) - f64::from(pair[0]).powi(4);
        if step > 0.0 { (up + step, down) } else { (up, down - step) }
    });
    f64::min(rising, falling)
}
