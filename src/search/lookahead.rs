use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engine::{Board, Move, RandomBound, Score};

use super::{LookaheadConfig, SearchStats, Strategy};

/// Depth-bounded lookahead over the real resolution rules.
///
/// Every candidate move is applied to a scratch copy of the board, chain
/// reactions and random refills included, and recursively explored until
/// `depth` moves have been simulated. A branch is worth the best total score
/// reachable at its deepest level; a branch that runs out of moves early is
/// worth its own score. Ties keep the first candidate in enumeration order.
///
/// Scratch boards are allocated once per board size, one per depth level, and
/// overwritten on every visit. A `Lookahead` owns its pool and its random
/// source, so it must not be shared between concurrent games.
pub struct Lookahead<R = StdRng> {
    cfg: LookaheadConfig,
    pool: Vec<Board>,
    rng: R,
    stats: SearchStats,
}

impl Lookahead<StdRng> {
    /// Default depth with an entropy-seeded random source.
    pub fn new() -> Self { Self::with_config(LookaheadConfig::default(), StdRng::from_entropy()) }
}

impl Default for Lookahead<StdRng> {
    fn default() -> Self { Self::new() }
}

impl<R: RandomBound> Lookahead<R> {
    pub fn with_config(mut cfg: LookaheadConfig, rng: R) -> Self {
        cfg.depth = cfg.depth.max(1);
        Self { cfg, pool: Vec::new(), rng, stats: SearchStats::default() }
    }

    #[inline]
    pub fn depth(&self) -> usize { self.cfg.depth }

    /// Best move for `board`, or `None` if it has no legal move. `board` is not modified.
    pub fn best_move(&mut self, board: &Board) -> Option<Move> { self.best_move_with_score(board).map(|(mv, _)| mv) }

    /// Like [`Self::best_move`], also returning the branch score that won.
    pub fn best_move_with_score(&mut self, board: &Board) -> Option<(Move, Score)> {
        self.ensure_pool(board.size());
        let mut nodes = 0u64;
        let result = explore(board, &mut self.pool, &mut self.rng, &mut nodes);
        self.stats.nodes = nodes;
        self.stats.peak_nodes = self.stats.peak_nodes.max(nodes);
        if let Some((mv, score)) = result {
            log::debug!("lookahead depth {}: {mv} scores {score} ({nodes} nodes)", self.cfg.depth);
        }
        result
    }

    /// Statistics collected from the last call to [`Self::best_move`].
    #[inline]
    pub fn last_stats(&self) -> SearchStats { self.stats }

    /// Reset accumulated stats to zero.
    #[inline]
    pub fn reset_stats(&mut self) { self.stats = SearchStats::default(); }

    fn ensure_pool(&mut self, size: usize) {
        let fits = self.pool.len() == self.cfg.depth && self.pool.iter().all(|b| b.size() == size);
        if !fits {
            self.pool = (0..self.cfg.depth).map(|_| Board::with_size(size)).collect();
        }
    }
}

impl<R: RandomBound> Strategy for Lookahead<R> {
    #[inline]
    fn next_move(&mut self, board: &Board) -> Option<Move> { self.best_move(board) }
}

/// Search one level: `pool[0]` is this level's scratch board, the rest belong to deeper levels.
fn explore<R: RandomBound + ?Sized>(
    parent: &Board,
    pool: &mut [Board],
    rng: &mut R,
    nodes: &mut u64,
) -> Option<(Move, Score)> {
    let (scratch, deeper) = pool.split_first_mut()?;
    let moves = parent.find_moves();
    let mut best: Option<(usize, Score)> = None;
    for (i, &mv) in moves.iter().enumerate() {
        scratch.copy_from(parent);
        scratch.apply_move(mv, rng);
        *nodes += 1;
        let score = if deeper.is_empty() {
            scratch.score()
        } else {
            match explore(scratch, deeper, rng, nodes) {
                Some((_, sub)) => sub,
                None => scratch.score(),
            }
        };
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((i, score));
        }
    }
    best.map(|(i, score)| (moves[i], score))
}
