//! Monte Carlo rollout move selection for 2048.
//!
//! For each candidate direction the search applies the move to a copy of the
//! grid and then plays many random games from the result. The direction whose
//! games last the longest on average wins.
//!
//! - [`MoveSearch`]: rayon-parallel, time- or trial-bounded search.
//! - [`playout`]: the single-threaded building blocks (random move, playout, trial).
//!
//! Notes
//! - Every trial owns a private RNG seeded from the search seed and the trial
//!   number, so a fixed [`SearchConfig::seed`] plus [`Budget::Trials`] gives the
//!   same result on any number of threads.
//! - Under [`Budget::Time`] the first round of four trials always runs.
//!
//! Quick start
//! ```
//! use rollout_2048::engine::Grid;
//! use rollout_2048::montecarlo::{Budget, MoveSearch, SearchConfig};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(123);
//! let g = Grid::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
//!
//! let cfg = SearchConfig { playouts_per_trial: 10, seed: Some(5), ..Default::default() };
//! let mut search = MoveSearch::with_config(cfg).unwrap();
//! let (best, evals) = search.best_move_with_evals(&g, Budget::Trials(2));
//! assert!(best.is_some());
//! assert_eq!(evals.len(), 4);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::engine::Direction;

pub mod playout;
mod search_par;

pub use search_par::{select_best, MoveSearch};

/// Knobs for [`MoveSearch`]. Defaults match the classic rollout advisor.
///
/// - `playouts_per_trial`: random games played after each candidate move.
/// - `max_move_attempts`: random directions tried per cycle before a playout ends.
/// - `threads`: size of a private rayon pool; `None` uses the global pool.
/// - `seed`: base seed for trial RNGs; `None` draws a fresh one per search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub playouts_per_trial: u32,
    pub max_move_attempts: u32,
    pub threads: Option<usize>,
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { playouts_per_trial: 100, max_move_attempts: 50, threads: None, seed: None }
    }
}

/// How long a search keeps scheduling trials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Budget {
    /// Stop claiming trials once this much wall-clock time has passed.
    Time(Duration),
    /// Run exactly this many trials per direction.
    Trials(u64),
}

impl Budget {
    #[inline]
    pub fn from_millis(ms: u64) -> Self { Budget::Time(Duration::from_millis(ms)) }
}

#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    #[error("failed to build search thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("playouts_per_trial must be at least 1")]
    NoPlayouts,
}

/// Per-direction accumulator shared by all workers during one search.
#[derive(Debug, Default)]
pub struct RolloutStats {
    moves: AtomicU64,
    games: AtomicU64,
    trials: AtomicU64,
}

impl RolloutStats {
    /// Publish one finished trial.
    #[inline]
    pub fn record(&self, moves: u64, games: u64) {
        self.moves.fetch_add(moves, Ordering::Relaxed);
        self.games.fetch_add(games, Ordering::Relaxed);
        self.trials.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, dir: Direction, legal: bool) -> DirectionEval {
        DirectionEval {
            dir,
            legal,
            total_moves: self.moves.load(Ordering::Relaxed),
            total_games: self.games.load(Ordering::Relaxed),
            trials: self.trials.load(Ordering::Relaxed),
        }
    }
}

/// Aggregated rollout results for one root direction.
///
/// - `legal` is false when the move is a no-op for the root grid.
/// - `total_moves` counts spawn/move cycles over all finished playouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionEval {
    pub dir: Direction,
    pub legal: bool,
    pub total_moves: u64,
    pub total_games: u64,
    pub trials: u64,
}

impl DirectionEval {
    pub fn empty(dir: Direction) -> Self {
        Self { dir, legal: false, total_moves: 0, total_games: 0, trials: 0 }
    }

    /// Average cycles per finished playout, `-inf` when nothing finished.
    #[inline]
    pub fn average(&self) -> f64 {
        if self.total_games == 0 {
            f64::NEG_INFINITY
        } else {
            self.total_moves as f64 / self.total_games as f64
        }
    }
}

/// Basic stats for the last search.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchStats {
    pub trials: u64,
    pub playouts: u64,
    pub elapsed: Duration,
}
