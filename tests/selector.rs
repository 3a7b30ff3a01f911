use agent_2048::engine::{Game, Grid, Move};
use agent_2048::expectimax::{chance_outcomes, evaluate, pick_best, select_move, Expectiminimax, ExpectimaxConfig};
use agent_2048::serialization::GridSnapshot;
use rand::{rngs::StdRng, SeedableRng};

fn agent(depth: u32) -> Expectiminimax {
    Expectiminimax::with_config(ExpectimaxConfig { depth, ..Default::default() })
}

fn grids_from_play(seed: u64, n: usize) -> Vec<Grid> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut game = Game::new(&mut rng);
    let mut out = vec![game.grid];
    for i in 0..n {
        game.play(Move::ALL[(i * 3 + 1) % 4], &mut rng);
        out.push(game.grid);
    }
    out
}

#[test]
fn apply_move_is_deterministic() {
    for g in grids_from_play(1, 30) {
        for dir in Move::ALL {
            assert_eq!(g.apply_move(dir), g.apply_move(dir));
        }
    }
}

#[test]
fn score_delta_is_sum_of_new_merged_tiles() {
    for g in grids_from_play(2, 40) {
        for dir in Move::ALL {
            let out = g.apply_move(dir);
            let merged: u64 = out
                .grid
                .tiles()
                .filter(|t| t.merged_from.is_some())
                .map(|t| u64::from(t.value))
                .sum();
            assert_eq!(out.score, merged);
            // merges never create or destroy value
            let before: u64 = g.tiles().map(|t| u64::from(t.value)).sum();
            let after: u64 = out.grid.tiles().map(|t| u64::from(t.value)).sum();
            assert_eq!(before, after);
            if !out.moved {
                assert_eq!(out.grid.to_rows(), g.to_rows());
                assert_eq!(out.score, 0);
            }
        }
    }
}

#[test]
fn long_row_merges_each_pair_once() {
    let g = Grid::from_rows([[8, 8, 8, 8], [0; 4], [0; 4], [0; 4]]);
    let out = g.apply_move(Move::Right);
    assert_eq!(out.grid.to_rows()[0], [0, 0, 16, 16]);
    assert_eq!(out.score, 32);
    let out = out.grid.apply_move(Move::Right);
    assert_eq!(out.grid.to_rows()[0], [0, 0, 0, 32]);
}

#[test]
fn chance_probabilities_are_conserved() {
    for g in grids_from_play(3, 25) {
        let outcomes = chance_outcomes(&g);
        let k = g.available_cells().len();
        assert_eq!(outcomes.len(), 2 * k);
        if k > 0 {
            let total: f64 = outcomes.iter().map(|o| o.probability).sum();
            assert!((total - 1.0).abs() < 1e-12);
        }
    }
}

#[test]
fn depth_zero_selects_best_single_move() {
    let mut ai = agent(0);
    for g in grids_from_play(4, 20) {
        let expected = Move::ALL
            .into_iter()
            .filter_map(|dir| {
                let out = g.apply_move(dir);
                out.moved.then(|| (dir, evaluate(&out.grid)))
            })
            .fold(None::<(Move, f64)>, |best, (dir, v)| match best {
                Some((_, b)) if b >= v => best,
                _ => Some((dir, v)),
            })
            .map(|(dir, _)| dir);
        assert_eq!(ai.best_move(&g), expected);
    }
}

#[test]
fn chosen_move_is_always_legal() {
    let mut ai = agent(3);
    for g in grids_from_play(5, 20) {
        match ai.best_move(&g) {
            Some(dir) => assert!(g.apply_move(dir).moved),
            None => assert!(g.is_game_over()),
        }
    }
}

#[test]
fn branch_evals_agree_with_best_move() {
    let mut ai = agent(3);
    for g in grids_from_play(6, 10) {
        let branches = ai.branch_evals(&g);
        assert_eq!(pick_best(&branches), ai.best_move(&g));
        for (b, dir) in branches.iter().zip(Move::ALL) {
            assert_eq!(b.dir, dir);
            assert_eq!(b.legal, g.apply_move(dir).moved);
            if !b.legal {
                assert_eq!(b.ev, f64::NEG_INFINITY);
            }
        }
    }
}

#[test]
fn host_snapshot_json_to_move_code() {
    let json = r#"{"size":4,"cells":[
        [{"position":{"x":0,"y":0},"value":2},{"position":{"x":0,"y":1},"value":2},null,null],
        [null,null,null,null],
        [null,null,null,null],
        [null,null,null,null]]}"#;
    let snapshot = GridSnapshot::from_json(json).unwrap();
    let dir = select_move(&snapshot, 2).unwrap().unwrap();
    let grid = Grid::restore(&snapshot).unwrap();
    assert!(grid.apply_move(dir).moved);
    assert!(dir.code() <= 3);
}

#[test]
fn independent_searchers_agree_across_threads() {
    let grids = grids_from_play(7, 8);
    let expected: Vec<Option<Move>> = grids.iter().map(|g| agent(2).best_move(g)).collect();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let grids = grids.clone();
            std::thread::spawn(move || {
                let mut ai = agent(2);
                grids.iter().map(|g| ai.best_move(g)).collect::<Vec<_>>()
            })
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), expected);
    }
}

#[test]
fn agent_plays_a_short_game() {
    let mut rng = StdRng::seed_from_u64(2048);
    let mut game = Game::new(&mut rng);
    let mut ai = agent(2);
    while game.moves < 60 {
        let Some(dir) = ai.best_move(&game.grid) else { break };
        assert!(game.play(dir, &mut rng));
    }
    assert!(game.score > 0);
    assert!(game.highest_tile() >= 16);
}

#[test]
fn locked_full_board_is_terminal() {
    let g = Grid::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
    for dir in Move::ALL {
        assert!(!g.apply_move(dir).moved);
    }
    assert!(g.is_game_over());
    assert_eq!(agent(4).best_move(&g), None);
    assert!(chance_outcomes(&g).is_empty());
}
