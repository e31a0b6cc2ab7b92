use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use rollout_2048::engine::{Direction, Grid};
use rollout_2048::montecarlo::{Budget, MoveSearch, SearchConfig};
use std::hint::black_box;

fn corpus() -> Vec<Grid> {
    let mut rng = StdRng::seed_from_u64(7777);
    let mut grids = Vec::new();
    let mut g = Grid::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    grids.push(g);
    let seq = [Direction::Left, Direction::Up, Direction::Right, Direction::Down];
    for i in 0..16 {
        if g.apply_move(seq[i % seq.len()]) {
            g.spawn_random_tile(&mut rng);
        }
        grids.push(g);
    }
    grids
}

fn bench_direction_evals(c: &mut Criterion) {
    let grids = corpus();
    // Pin small pools for stability
    for threads in [1usize, 4] {
        let cfg = SearchConfig { threads: Some(threads), seed: Some(1), playouts_per_trial: 20, ..Default::default() };
        let mut search = MoveSearch::with_config(cfg).unwrap();
        c.bench_function(&format!("rollout_par/direction_evals_{threads}t"), |bch| {
            bch.iter(|| {
                let mut acc = 0u64;
                for g in &grids {
                    for e in search.direction_evals(g, Budget::Trials(4)) { acc += e.total_moves; }
                }
                black_box(acc)
            })
        });
    }
}

fn bench_e2e(c: &mut Criterion) {
    let cfg = SearchConfig { threads: Some(4), seed: Some(13), playouts_per_trial: 20, ..Default::default() };
    let mut search = MoveSearch::with_config(cfg).unwrap();
    c.bench_function("e2e_rollout/32_moves", |bch| {
        bch.iter(|| {
            let mut rng = StdRng::seed_from_u64(13);
            let mut g = Grid::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
            let mut steps = 0;
            while steps < 32 {
                match search.best_move(&g, Budget::Trials(2)) {
                    Some(dir) if g.apply_move(dir) => { g.spawn_random_tile(&mut rng); }
                    _ => break,
                }
                steps += 1;
            }
            black_box((g, steps))
        })
    });
}

criterion_group!(rollout_par, bench_direction_evals, bench_e2e);
criterion_main!(rollout_par);
