//! exponentile: a match-3 board with power-of-two tiles + a lookahead player
//!
//! This crate provides:
//! - A square `Board` whose swaps collapse runs of three or more equal tiles
//!   into one tile worth `value * 2^(cells - 2)`, with gravity, refills and
//!   chain reactions (`engine` module)
//! - Move selection strategies: depth-bounded `Lookahead` and `RandomStrategy` (`search` module)
//! - Diagnostic board renderers (`render` module) and a reference game driver (`game` module)
//!
//! Randomness is always injected: anything implementing `rand::Rng` works,
//! so seeded generators give fully reproducible games.
//!
//! Quick start:
//! ```
//! use exponentile::engine::{Board, ScanMode};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut board = Board::new(8, &mut rng);
//! let moves = board.find_moves();
//! if let Some(&mv) = moves.first() {
//!     let gained = board.apply_move(mv, &mut rng);
//!     assert_eq!(board.score(), gained);
//! }
//! // The board is always stable between moves.
//! assert!(board.find_runs(ScanMode::Probe).is_empty());
//! ```
//!
//! Full loop (simplest possible)
//! ```
//! use exponentile::engine::Board;
//! use exponentile::search::{Lookahead, LookaheadConfig, Strategy};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // 1) Board and policy, each with its own random source
//! let mut rng = StdRng::seed_from_u64(123);
//! let mut board = Board::new(8, &mut rng);
//! let mut policy = Lookahead::with_config(LookaheadConfig { depth: 1 }, StdRng::seed_from_u64(124));
//!
//! // 2) Loop a few moves to demonstrate flow (keep doctests fast)
//! let mut moves = 0u32;
//! while moves < 4 {
//!     let Some(mv) = policy.next_move(&board) else { break };
//!     board.apply_move(mv, &mut rng);
//!     moves += 1;
//! }
//!
//! // 3) Inspect final state
//! let _score = board.score();
//! let _best = board.highest_tile();
//! ```
//!
pub mod engine;
pub mod game;
pub mod render;
pub mod search;
