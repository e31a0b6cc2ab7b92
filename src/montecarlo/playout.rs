//! Random playouts: the unit of work inside a search trial.

use rand::Rng;

use crate::engine::{Direction, Grid};

/// Totals of one trial: spawn/move cycles over all playouts, and playouts finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrialOutcome {
    pub moves: u64,
    pub games: u64,
}

/// Apply a uniformly random direction, retrying up to `max_attempts` times
/// until one changes the grid.
///
/// Returns the direction that applied, or `None` when every attempt was
/// illegal, which ends the playout.
pub fn random_move<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R, max_attempts: u32) -> Option<Direction> {
    for _ in 0..max_attempts {
        let dir = Direction::ALL[rng.gen_range(0..4)];
        if grid.apply_move(dir) {
            return Some(dir);
        }
    }
    None
}

/// Play one random game from `start` and return its length in spawn/move cycles.
///
/// Each cycle spawns a tile, counts itself, then tries a random move. The game
/// ends on the first cycle without a legal move, or when no tile can be spawned.
///
/// ```
/// use rollout_2048::engine::Grid;
/// use rollout_2048::montecarlo::playout::playout;
/// use rand::{rngs::StdRng, SeedableRng};
/// let mut rng = StdRng::seed_from_u64(1);
/// assert!(playout(&Grid::EMPTY, &mut rng, 50) >= 1);
/// ```
pub fn playout<R: Rng + ?Sized>(start: &Grid, rng: &mut R, max_attempts: u32) -> u64 {
    let mut game = *start;
    let mut cycles = 0u64;
    loop {
        if !game.spawn_random_tile(rng) {
            break;
        }
        cycles += 1;
        if random_move(&mut game, rng, max_attempts).is_none() {
            break;
        }
    }
    cycles
}

/// One trial: move `grid` toward `dir`, then run `playouts` random games from there.
///
/// This is the unit of work each search lane runs. `None` when the move is
/// illegal; such a trial contributes nothing.
pub fn run_trial<R: Rng + ?Sized>(
    grid: &Grid,
    dir: Direction,
    rng: &mut R,
    playouts: u32,
    max_attempts: u32,
) -> Option<TrialOutcome> {
    let mut start = *grid;
    if !start.apply_move(dir) {
        return None;
    }
    Some((0..playouts).fold(TrialOutcome::default(), |acc, _| TrialOutcome {
        moves: acc.moves + playout(&start, rng, max_attempts),
        games: acc.games + 1,
    }))
}
