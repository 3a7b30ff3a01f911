use std::io::Read;
use std::path::PathBuf;

use agent_2048::engine::Grid;
use agent_2048::expectimax::{Expectiminimax, ExpectimaxConfig, Heuristic};
use agent_2048::serialization::GridSnapshot;
use anyhow::Context;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "select",
    about = "Choose a move for a host board snapshot ({size, cells[x][y]} JSON)"
)]
struct Args {
    /// Snapshot file; reads stdin when omitted
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Search depth in plies
    #[arg(long, default_value_t = 5)]
    depth: u32,

    /// Frontier heuristic (corner|line)
    #[arg(long, default_value_t = Heuristic::CornerWeights)]
    heuristic: Heuristic,

    /// Print every direction's expected value
    #[arg(long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let snapshot = match &args.input {
        Some(path) => GridSnapshot::read_from_path(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?,
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text).context("failed to read stdin")?;
            GridSnapshot::from_json(&text).context("failed to parse snapshot")?
        }
    };
    let grid = Grid::restore(&snapshot).context("invalid snapshot")?;

    let cfg = ExpectimaxConfig { depth: args.depth, heuristic: args.heuristic, ..Default::default() };
    let mut agent = Expectiminimax::with_config(cfg);
    let branches = agent.branch_evals(&grid);
    if args.verbose {
        print!("{}", grid);
        for b in &branches {
            if b.legal {
                println!("{:>5}: {:.3}", b.dir, b.ev);
            } else {
                println!("{:>5}: illegal", b.dir);
            }
        }
    }
    match agent_2048::expectimax::pick_best(&branches) {
        Some(dir) => println!("{} {}", dir, dir.code()),
        None => println!("none"),
    }
    Ok(())
}
