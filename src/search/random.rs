use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engine::{Board, Move, RandomBound};

use super::Strategy;

/// Uniformly random choice among the legal moves.
pub struct RandomStrategy<R = StdRng> {
    rng: R,
}

impl RandomStrategy<StdRng> {
    pub fn new() -> Self { Self::with_rng(StdRng::from_entropy()) }
}

impl Default for RandomStrategy<StdRng> {
    fn default() -> Self { Self::new() }
}

impl<R: RandomBound> RandomStrategy<R> {
    pub fn with_rng(rng: R) -> Self { Self { rng } }
}

impl<R: RandomBound> Strategy for RandomStrategy<R> {
    fn next_move(&mut self, board: &Board) -> Option<Move> {
        let moves = board.find_moves();
        if moves.is_empty() {
            return None;
        }
        moves.get(self.rng.below(moves.len())).copied()
    }
}
