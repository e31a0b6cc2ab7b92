//! Property-based tests for the move engine.
//!
//! Grids are built from random exponents so every non-zero cell is a power of two.

use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use rollout_2048::engine::{Direction, Grid};

/// Generate a grid with each cell empty or a power of two up to 2048.
fn arb_grid() -> impl Strategy<Value = Grid> {
    proptest::collection::vec(0u32..12, 16).prop_map(|exps| {
        let cells: Vec<u32> = exps.into_iter().map(|e| if e == 0 { 0 } else { 1 << e }).collect();
        Grid::from_flat_sequence(&cells).unwrap()
    })
}

/// Generate a grid with at least one empty cell.
fn arb_open_grid() -> impl Strategy<Value = Grid> {
    arb_grid().prop_filter("needs an empty cell", |g| g.count_empty() > 0)
}

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Right),
        Just(Direction::Down),
        Just(Direction::Left),
    ]
}

fn sum(g: &Grid) -> u64 {
    g.to_flat_sequence().iter().map(|&v| v as u64).sum()
}

/// True if two equal values sit next to each other along the lines `dir` moves.
fn has_adjacent_pair(g: &Grid, dir: Direction) -> bool {
    (0..4).any(|line| {
        (0..3).any(|k| {
            let (a, b) = match dir {
                Direction::Left | Direction::Right => (g.get(k, line), g.get(k + 1, line)),
                Direction::Up | Direction::Down => (g.get(line, k), g.get(line, k + 1)),
            };
            a != 0 && a == b
        })
    })
}

proptest! {
    #[test]
    fn rotation_commutes_with_moves(g in arb_grid(), dir in arb_direction()) {
        let mut direct = g;
        let moved = direct.apply_move(dir);
        let mut rotated = g.rotate_clockwise();
        let moved_rotated = rotated.apply_move(dir.clockwise());
        prop_assert_eq!(moved, moved_rotated);
        prop_assert_eq!(direct.rotate_clockwise(), rotated);
    }

    #[test]
    fn moves_conserve_tile_sum(g in arb_grid(), dir in arb_direction()) {
        let mut after = g;
        after.apply_move(dir);
        prop_assert_eq!(sum(&after), sum(&g));
        prop_assert!(after.count_empty() >= g.count_empty());
    }

    #[test]
    fn illegal_move_leaves_grid_identical(g in arb_grid(), dir in arb_direction()) {
        let mut after = g;
        if !after.apply_move(dir) {
            prop_assert_eq!(after, g);
        } else {
            prop_assert_ne!(after, g);
        }
    }

    #[test]
    fn reapplying_only_changes_on_fresh_pairs(g in arb_grid(), dir in arb_direction()) {
        let mut once = g;
        once.apply_move(dir);
        let mut twice = once;
        let changed = twice.apply_move(dir);
        // Lines are already packed, so a second move can only merge.
        prop_assert_eq!(changed, has_adjacent_pair(&once, dir));
        prop_assert_eq!(twice.count_empty() > once.count_empty(), changed);
    }

    #[test]
    fn no_chain_merges(exp in 1u32..12, dir in arb_direction()) {
        let v = 1u32 << exp;
        // A full line of v along the top row (or left column), compressed toward `dir`.
        let mut g = Grid::EMPTY;
        for k in 0..4 {
            match dir {
                Direction::Left | Direction::Right => g.set(k, 0, v),
                Direction::Up | Direction::Down => g.set(0, k, v),
            }
        }
        prop_assert!(g.apply_move(dir));
        let line: Vec<u32> = (0..4)
            .map(|k| match dir {
                Direction::Left => g.get(k, 0),
                Direction::Right => g.get(3 - k, 0),
                Direction::Up => g.get(0, k),
                Direction::Down => g.get(0, 3 - k),
            })
            .collect();
        prop_assert_eq!(line, vec![2 * v, 2 * v, 0, 0]);
    }

    #[test]
    fn spawn_never_overwrites(g in arb_open_grid(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut after = g;
        prop_assert!(after.spawn_random_tile(&mut rng));
        let before = g.to_flat_sequence();
        let cells = after.to_flat_sequence();
        let changed: Vec<usize> = (0..16).filter(|&i| before[i] != cells[i]).collect();
        prop_assert_eq!(changed.len(), 1);
        let i = changed[0];
        prop_assert_eq!(before[i], 0);
        prop_assert!(cells[i] == 2 || cells[i] == 4);
    }

    #[test]
    fn game_over_matches_legal_moves(g in arb_grid()) {
        let any_legal = Direction::ALL.iter().any(|&d| g.shift(d) != g);
        prop_assert_eq!(g.is_game_over(), !any_legal);
        prop_assert_eq!(g.legal_moves().count() > 0, any_legal);
    }
}

#[test]
fn locked_grid_is_lost_in_every_direction() {
    let values = [2, 4, 8, 16, 4, 8, 16, 32, 8, 16, 32, 64, 16, 32, 64, 128];
    let g = Grid::from(values);
    for dir in Direction::ALL {
        let mut after = g;
        assert!(!after.apply_move(dir), "{dir} should be illegal");
        assert_eq!(after.to_flat_sequence(), values);
    }
}

#[test]
fn two_rows_merge_up() {
    let mut g = Grid::from([2, 4, 8, 16, 2, 4, 8, 16, 0, 0, 0, 0, 0, 0, 0, 0]);
    assert!(g.apply_move(Direction::Up));
    assert_eq!(g.to_flat_sequence(), [4, 8, 16, 32, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
}
