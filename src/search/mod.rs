//! Move selection strategies.
//!
//! - [`Lookahead`]: depth-bounded search that replays candidate moves on
//!   scratch boards and keeps the one with the best reachable score.
//! - [`RandomStrategy`]: uniform choice among the legal moves.
//!
//! Both implement [`Strategy`], so a driver can pick one at construction time
//! and hold it as `Box<dyn Strategy>`.
//!
//! Quick start
//! ```
//! use exponentile::engine::Board;
//! use exponentile::search::{Lookahead, LookaheadConfig, Strategy};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(21);
//! let board = Board::new(8, &mut rng);
//!
//! let cfg = LookaheadConfig { depth: 1 };
//! let mut search = Lookahead::with_config(cfg, StdRng::seed_from_u64(22));
//! if let Some(mv) = search.next_move(&board) {
//!     assert!(board.find_moves().contains(&mv));
//! }
//! ```

use crate::engine::{Board, Move};

mod lookahead;
mod random;

pub use lookahead::Lookahead;
pub use random::RandomStrategy;

/// Chooses the next move for a board, or `None` when no legal move exists.
pub trait Strategy {
    fn next_move(&mut self, board: &Board) -> Option<Move>;
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    #[inline]
    fn next_move(&mut self, board: &Board) -> Option<Move> { (**self).next_move(board) }
}

/// Knobs for [`Lookahead`].
///
/// - `depth`: number of nested simulated moves per candidate. 0 is treated as 1.
#[derive(Debug, Clone)]
pub struct LookaheadConfig {
    pub depth: usize,
}

impl Default for LookaheadConfig {
    fn default() -> Self { Self { depth: 2 } }
}

/// Basic search stats for a single evaluation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchStats {
    /// Moves simulated by the last call.
    pub nodes: u64,
    /// Largest `nodes` seen since the last reset.
    pub peak_nodes: u64,
}
