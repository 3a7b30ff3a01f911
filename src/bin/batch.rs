use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use agent_2048::engine::Game;
use agent_2048::expectimax::{Expectiminimax, ExpectimaxConfig, Heuristic};
use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;

#[derive(Debug, Parser)]
#[command(name = "batch", about = "Play many seeded 2048 games in parallel and summarize the results")]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 16)]
    games: u64,

    /// Seed of the first game; game i uses seed + i
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Search depth in plies
    #[arg(long, default_value_t = 3)]
    depth: u32,

    /// Frontier heuristic (corner|line)
    #[arg(long, default_value_t = Heuristic::CornerWeights)]
    heuristic: Heuristic,

    /// Disable the chance-layer transposition cache
    #[arg(long)]
    no_cache: bool,

    /// Stop each game after this many moves
    #[arg(long)]
    steps: Option<u32>,

    /// Worker threads (defaults to rayon's choice)
    #[arg(long)]
    threads: Option<usize>,

    /// Suppress the progress bar
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy)]
struct GameReport {
    seed: u64,
    score: u64,
    moves: u32,
    highest_tile: u32,
    thinking: Duration,
}

fn play_game(seed: u64, cfg: ExpectimaxConfig, steps: Option<u32>) -> GameReport {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut agent = Expectiminimax::with_config(cfg);
    let mut game = Game::new(&mut rng);
    let mut thinking = Duration::ZERO;
    loop {
        if let Some(limit) = steps {
            if game.moves >= limit {
                break;
            }
        }
        let start = Instant::now();
        let direction = agent.best_move(&game.grid);
        thinking += start.elapsed();
        let Some(direction) = direction else { break };
        game.play(direction, &mut rng);
    }
    log::debug!("seed {seed}: score {} after {} moves", game.score, game.moves);
    GameReport { seed, score: game.score, moves: game.moves, highest_tile: game.highest_tile(), thinking }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    if let Some(n) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .context("failed to configure thread pool")?;
    }
    let cfg = ExpectimaxConfig { depth: args.depth, cache_enabled: !args.no_cache, heuristic: args.heuristic };

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(args.games);
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} games ({eta})")?
                .progress_chars("=>-"),
        );
        pb
    };

    let start = Instant::now();
    let reports: Vec<GameReport> = (0..args.games)
        .into_par_iter()
        .map(|i| {
            let report = play_game(args.seed + i, cfg, args.steps);
            pb.inc(1);
            report
        })
        .collect();
    pb.finish_and_clear();

    if reports.is_empty() {
        println!("No games played");
        return Ok(());
    }

    let games = reports.len() as f64;
    let total_moves: u64 = reports.iter().map(|r| u64::from(r.moves)).sum();
    let thinking: Duration = reports.iter().map(|r| r.thinking).sum();
    let mean_score = reports.iter().map(|r| r.score as f64).sum::<f64>() / games;
    let best = reports.iter().max_by_key(|r| r.score).context("no reports")?;
    let mut tiles: BTreeMap<u32, usize> = BTreeMap::new();
    for r in &reports {
        *tiles.entry(r.highest_tile).or_default() += 1;
    }

    println!(
        "Games: {} | depth: {} | heuristic: {} | wall: {:.1}s",
        reports.len(),
        cfg.depth,
        cfg.heuristic,
        start.elapsed().as_secs_f64()
    );
    println!("Mean score: {:.1} | best: {} (seed {})", mean_score, best.score, best.seed);
    println!(
        "Moves: {} | ms/move: {:.3}",
        total_moves,
        thinking.as_secs_f64() * 1e3 / (total_moves.max(1) as f64)
    );
    for (tile, count) in tiles.iter().rev() {
        println!("  highest {:>6}: {:>5.1}%", tile, 100.0 * *count as f64 / games);
    }
    Ok(())
}
