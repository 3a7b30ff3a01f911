use agent_2048::engine::{Game, Grid, Move};
use agent_2048::expectimax::{evaluate, Heuristic};
use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;

fn corpus() -> Vec<Grid> {
    let mut rng = StdRng::seed_from_u64(1337);
    let mut grids = vec![Grid::EMPTY];
    let mut game = Game::new(&mut rng);
    grids.push(game.grid);
    for i in 0..24 {
        game.play(Move::ALL[i % 4], &mut rng);
        grids.push(game.grid);
    }
    grids
}

fn bench_heuristic(c: &mut Criterion) {
    let grids = corpus();
    c.bench_function("heuristic/corner_weights", |bch| {
        bch.iter(|| {
            let mut acc = 0f64;
            for g in &grids {
                acc = acc.mul_add(1.000_000_1, evaluate(g));
            }
            black_box(acc)
        })
    });
    let line = Heuristic::LineShape;
    let _ = line.evaluate(&Grid::EMPTY);
    c.bench_function("heuristic/line_shape", |bch| {
        bch.iter(|| {
            let mut acc = 0f64;
            for g in &grids {
                acc = acc.mul_add(1.000_000_1, line.evaluate(g));
            }
            black_box(acc)
        })
    });
}

criterion_group!(heuristic, bench_heuristic);
criterion_main!(heuristic);
