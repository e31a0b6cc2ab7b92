//! rollout-2048: a 2048 move engine + Monte Carlo rollout move advisor
//!
//! This crate provides:
//! - A value-type `Grid` with the game's move rule (`apply_move`, `shift`, `spawn_random_tile`, ...)
//! - A parallel rollout search (`montecarlo` module) that ranks the four directions
//!   by how long random games last after each of them
//!
//! Quick start:
//! ```
//! use rollout_2048::engine::{Direction, Grid};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic grid initialization with a seeded RNG
//! let mut rng = StdRng::seed_from_u64(42);
//! let g0 = Grid::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
//! let g1 = g0.shift(Direction::Left);
//! assert!(g1.count_empty() >= 14);
//! ```
//!
//! Full loop (simplest possible)
//! ```
//! use rollout_2048::engine::Grid;
//! use rollout_2048::montecarlo::{Budget, MoveSearch, SearchConfig};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // 1) Policy with a small, reproducible budget
//! let cfg = SearchConfig { playouts_per_trial: 10, seed: Some(7), ..Default::default() };
//! let mut policy = MoveSearch::with_config(cfg).unwrap();
//! let mut rng = StdRng::seed_from_u64(123);
//!
//! // 2) Start grid with two random tiles
//! let mut g = Grid::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
//! let mut moves = 0u32;
//!
//! // 3) Ask for a move, apply it, spawn a tile (keep doctests fast)
//! while !g.is_game_over() && moves < 4 {
//!     match policy.best_move(&g, Budget::Trials(1)) {
//!         Some(dir) if g.apply_move(dir) => {
//!             g.spawn_random_tile(&mut rng);
//!             moves += 1;
//!         }
//!         _ => break,
//!     }
//! }
//! assert!(moves > 0);
//! ```
//!
pub mod engine;
pub mod montecarlo;
