use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, trace};

use crate::engine::{Direction, Grid};

use super::playout::run_trial;
use super::{Budget, DirectionEval, RolloutStats, SearchConfig, SearchError, SearchStats};

const DIRECTIONS: u64 = Direction::ALL.len() as u64;

/// Parallel Monte Carlo move search on a rayon pool.
///
/// Trials are handed out round-robin over `[Up, Right, Down, Left]` from a
/// shared counter; every pool thread runs a lane that keeps claiming trials
/// until the budget runs out.
pub struct MoveSearch {
    cfg: SearchConfig,
    pool: Option<ThreadPool>,
    stats: SearchStats,
}

impl MoveSearch {
    /// Default config on the global rayon pool.
    pub fn new() -> Self {
        Self { cfg: SearchConfig::default(), pool: None, stats: SearchStats::default() }
    }

    /// Build a search from `cfg`; a private pool is created when `cfg.threads` is set.
    ///
    /// Fails when `cfg.playouts_per_trial` is zero, since no trial could ever
    /// finish a game.
    pub fn with_config(cfg: SearchConfig) -> Result<Self, SearchError> {
        if cfg.playouts_per_trial == 0 {
            return Err(SearchError::NoPlayouts);
        }
        let pool = match cfg.threads {
            Some(n) => Some(ThreadPoolBuilder::new().num_threads(n).build()?),
            None => None,
        };
        Ok(Self { cfg, pool, stats: SearchStats::default() })
    }

    /// Pick the direction whose random games last longest within `time_budget_ms`.
    ///
    /// Returns `None` only when no direction is legal for `grid`.
    ///
    /// ```
    /// use rollout_2048::engine::{Direction, Grid};
    /// use rollout_2048::montecarlo::MoveSearch;
    /// // Only Down changes this grid.
    /// let g = Grid::from([2, 4, 8, 16, 4, 8, 16, 32, 8, 16, 32, 64, 0, 0, 0, 0]);
    /// let mut search = MoveSearch::new();
    /// assert_eq!(search.choose_move(&g, 5), Some(Direction::Down));
    /// ```
    #[inline]
    pub fn choose_move(&mut self, grid: &Grid, time_budget_ms: u64) -> Option<Direction> {
        self.best_move(grid, Budget::from_millis(time_budget_ms))
    }

    /// Best direction under an arbitrary [`Budget`].
    #[inline]
    pub fn best_move(&mut self, grid: &Grid, budget: Budget) -> Option<Direction> {
        let evals = self.direction_evals(grid, budget);
        select_best(&evals)
    }

    /// Best direction together with the evaluations it was chosen from.
    pub fn best_move_with_evals(&mut self, grid: &Grid, budget: Budget) -> (Option<Direction>, [DirectionEval; 4]) {
        let evals = self.direction_evals(grid, budget);
        (select_best(&evals), evals)
    }

    /// Core function: run trials for every direction and return their aggregates.
    ///
    /// Returns a fixed array in `[Up, Right, Down, Left]` order; illegal
    /// directions are marked `legal=false` and never finish a game.
    pub fn direction_evals(&mut self, grid: &Grid, budget: Budget) -> [DirectionEval; 4] {
        let started = Instant::now();
        let legal = Direction::ALL.map(|dir| grid.shift(dir) != *grid);
        let stats: [RolloutStats; 4] = Default::default();
        let next_trial = AtomicU64::new(0);
        let base_seed = self.cfg.seed.unwrap_or_else(rand::random);
        let job = Job { cfg: &self.cfg, grid, legal: &legal, stats: &stats, next_trial: &next_trial, base_seed, budget, started };

        if legal.contains(&true) {
            match &self.pool {
                Some(pool) => pool.install(|| job.run()),
                None => job.run(),
            }
        }

        let evals = Direction::ALL.map(|dir| stats[dir.index()].snapshot(dir, legal[dir.index()]));
        let trials: u64 = evals.iter().map(|e| e.trials).sum();
        let playouts: u64 = evals.iter().map(|e| e.total_games).sum();
        self.stats = SearchStats { trials, playouts, elapsed: started.elapsed() };
        for eval in &evals {
            trace!(dir = %eval.dir, legal = eval.legal, trials = eval.trials, games = eval.total_games, avg = eval.average(), "direction evaluated");
        }
        debug!(
            elapsed = ?self.stats.elapsed,
            trials,
            playouts,
            best = ?select_best(&evals),
            "rollout search finished"
        );
        evals
    }

    /// Statistics collected from the last call to [`Self::direction_evals`] or
    /// any of the move-choosing wrappers.
    #[inline]
    pub fn last_stats(&self) -> SearchStats { self.stats }

    /// Reset accumulated stats to zero.
    #[inline]
    pub fn reset_stats(&mut self) { self.stats = SearchStats::default(); }
}

impl Default for MoveSearch { fn default() -> Self { Self::new() } }

/// Choose the direction with the strictly greatest average game length.
///
/// Directions are compared in `[Up, Right, Down, Left]` order and an exact tie
/// keeps the earlier one. Directions without finished games never win.
pub fn select_best(evals: &[DirectionEval; 4]) -> Option<Direction> {
    let mut best: Option<Direction> = None;
    let mut best_avg = f64::NEG_INFINITY;
    for eval in evals {
        let avg = eval.average();
        if avg > best_avg {
            best_avg = avg;
            best = Some(eval.dir);
        }
    }
    best
}

/// Shared, read-only view of one search handed to every lane.
struct Job<'a> {
    cfg: &'a SearchConfig,
    grid: &'a Grid,
    legal: &'a [bool; 4],
    stats: &'a [RolloutStats; 4],
    next_trial: &'a AtomicU64,
    base_seed: u64,
    budget: Budget,
    started: Instant,
}

impl Job<'_> {
    fn run(&self) {
        let lanes = rayon::current_num_threads().max(1);
        (0..lanes).into_par_iter().for_each(|_| self.lane());
    }

    fn lane(&self) {
        loop {
            let t = self.next_trial.fetch_add(1, Ordering::Relaxed);
            if self.exhausted(t) {
                break;
            }
            let dir = Direction::ALL[(t % DIRECTIONS) as usize];
            if !self.legal[dir.index()] {
                continue;
            }
            let mut rng = StdRng::seed_from_u64(trial_seed(self.base_seed, t));
            let trial = run_trial(self.grid, dir, &mut rng, self.cfg.playouts_per_trial, self.cfg.max_move_attempts);
            if let Some(outcome) = trial {
                self.stats[dir.index()].record(outcome.moves, outcome.games);
            }
        }
    }

    // The first round always runs so a zero budget still sees every direction.
    #[inline]
    fn exhausted(&self, t: u64) -> bool {
        match self.budget {
            Budget::Trials(n) => t >= n.saturating_mul(DIRECTIONS),
            Budget::Time(limit) => t >= DIRECTIONS && deadline_passed(self.started, limit),
        }
    }
}

#[inline]
fn deadline_passed(started: Instant, limit: Duration) -> bool { started.elapsed() >= limit }

#[inline]
fn trial_seed(base: u64, trial: u64) -> u64 { splitmix64(base ^ splitmix64(trial)) }

fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
