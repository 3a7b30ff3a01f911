use agent_2048::engine::Game;
use agent_2048::expectimax::{Expectiminimax, ExpectimaxConfig, Heuristic};
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};

#[derive(Debug, Parser)]
#[command(name = "agent-2048", about = "Play one 2048 game with the expectiminimax agent")]
struct Args {
    /// Search depth in plies
    #[arg(long, default_value_t = 5)]
    depth: u32,

    /// Frontier heuristic (corner|line)
    #[arg(long, default_value_t = Heuristic::CornerWeights)]
    heuristic: Heuristic,

    /// Disable the chance-layer transposition cache
    #[arg(long)]
    no_cache: bool,

    /// Seed for tile spawns (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Do not print the board after every move
    #[arg(long)]
    quiet: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let cfg = ExpectimaxConfig { depth: args.depth, cache_enabled: !args.no_cache, heuristic: args.heuristic };
    let mut agent = Expectiminimax::with_config(cfg);
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut game = Game::new(&mut rng);
    if !args.quiet {
        println!("{}", game.grid);
    }
    let mut total_states: u64 = 0;
    let mut peak_states: u64 = 0;
    while let Some(direction) = agent.best_move(&game.grid) {
        game.play(direction, &mut rng);
        if !args.quiet {
            println!("{}", game.grid);
        }
        let stats = agent.last_stats();
        total_states = total_states.saturating_add(stats.nodes);
        peak_states = peak_states.max(stats.nodes);
    }
    println!(
        "Moves made: {}, Score: {}, Highest tile: {}, States considered: {}, Max states considered for a move: {}",
        game.moves,
        game.score,
        game.highest_tile(),
        total_states,
        peak_states
    );
}
