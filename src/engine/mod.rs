//! Board state and the collapse/resolution engine.
//!
//! A [`Board`] is a square grid of power-of-two tiles plus a running score.
//! Swapping two adjacent tiles ([`Board::apply_move`]) triggers the resolution
//! loop: runs of three or more equal tiles are found, intersecting runs are
//! grouped, every group collapses into a single anchor tile, gravity compacts
//! the columns and refills them from the top, and the loop repeats until no run
//! is left standing.
//!
//! Randomness is never owned by the board. Every operation that needs fresh
//! tiles takes a [`RandomBound`] source, which any [`rand::Rng`] satisfies.

use rand::Rng;
use std::fmt;

mod collapse;
mod gravity;
mod moves;
mod scan;

pub use collapse::{multiplier, Collapse};
pub use moves::Move;
pub use scan::{Run, ScanMode};

use scan::RunTags;

/// A tile value. `0` marks an empty cell, which only exists mid-resolution.
///
/// Collapsed values saturate at `u64::MAX`.
pub type Tile = u64;
/// Accumulated score; saturates at `u64::MAX`.
pub type Score = u64;

/// Side length used when the caller asks for a size of 0.
pub const DEFAULT_SIZE: usize = 8;
/// Largest supported side length. Larger requests are clamped to it.
///
/// A collapse covers at most `2 * MAX_SIZE - 1` cells, so every total stays
/// inside the multiplier table.
pub const MAX_SIZE: usize = 32;

/// Values a freshly drawn tile can take.
const NEW_TILES: [Tile; 3] = [2, 4, 8];

/// Source of uniformly drawn integers below a bound.
///
/// Implemented for every [`rand::Rng`]; tests plug in scripted sources.
pub trait RandomBound {
    /// Return an integer in `[0, bound)`. `bound` is always positive.
    fn below(&mut self, bound: usize) -> usize;
}

impl<R: Rng + ?Sized> RandomBound for R {
    #[inline]
    fn below(&mut self, bound: usize) -> usize { self.gen_range(0..bound) }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("{len} cells do not form a non-empty square board")]
    NotSquare { len: usize },
    #[error("board size {size} exceeds the maximum of {max}")]
    TooLarge { size: usize, max: usize },
    #[error("cells {a} and {b} are not orthogonally adjacent")]
    NotAdjacent { a: Point, b: Point },
}

/// A cell coordinate: `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    #[inline]
    pub const fn new(x: usize, y: usize) -> Self { Point { x, y } }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "({},{})", self.x, self.y) }
}

/// Flat row-major tile store. Bounds are the caller's responsibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Grid {
    size: usize,
    cells: Vec<Tile>,
}

impl Grid {
    /// An all-empty grid of `size * size` cells.
    pub fn new(size: usize) -> Self { Grid { size, cells: vec![0; size * size] } }

    #[inline]
    pub fn cells(&self) -> &[Tile] { &self.cells }

    #[inline]
    pub fn index(&self, p: Point) -> usize { p.y * self.size + p.x }

    #[inline]
    pub fn contains(&self, p: Point) -> bool { p.x < self.size && p.y < self.size }

    #[inline]
    pub fn get(&self, p: Point) -> Tile { self.cells[self.index(p)] }

    #[inline]
    pub fn set(&mut self, p: Point, value: Tile) {
        let idx = self.index(p);
        self.cells[idx] = value;
    }

    #[inline]
    pub fn swap(&mut self, a: Point, b: Point) {
        let (ia, ib) = (self.index(a), self.index(b));
        self.cells.swap(ia, ib);
    }

    /// Overwrite with `source`, reallocating only when the dimensions differ.
    pub fn copy_from(&mut self, source: &Grid) {
        if self.size != source.size || self.cells.len() != source.cells.len() {
            self.cells = vec![0; source.cells.len()];
            self.size = source.size;
        }
        self.cells.copy_from_slice(&source.cells);
    }
}

/// A live board: tiles, score, and the scratch index used while resolving.
#[derive(Debug, Clone)]
pub struct Board {
    grid: Grid,
    score: Score,
    tags: RunTags,
}

impl Board {
    /// Create a randomly filled, settled board with a score of 0.
    ///
    /// A `size` of 0 falls back to [`DEFAULT_SIZE`]. A `size` above [`MAX_SIZE`]
    /// is clamped to [`MAX_SIZE`] and logged as a warning; the board never grows
    /// past that cap.
    ///
    /// ```
    /// use exponentile::engine::Board;
    /// use rand::{rngs::StdRng, SeedableRng};
    /// let mut rng = StdRng::seed_from_u64(1);
    /// let board = Board::new(0, &mut rng);
    /// assert_eq!(board.size(), 8);
    /// assert_eq!(board.score(), 0);
    /// assert!(board.cells().iter().all(|&t| t > 0));
    /// ```
    pub fn new<R: RandomBound + ?Sized>(size: usize, rng: &mut R) -> Self {
        let mut board = Board::with_size(normalize_size(size));
        board.reshuffle(rng);
        board
    }

    /// An all-empty board, used as a scratch buffer before [`Board::copy_from`].
    ///
    /// `size` is normalized the same way as in [`Board::new`].
    pub fn with_size(size: usize) -> Self {
        let size = normalize_size(size);
        Board { grid: Grid::new(size), score: 0, tags: RunTags::new(size) }
    }

    /// Build a board from row-major cells. The cell count must be a non-zero perfect square.
    ///
    /// ```
    /// use exponentile::engine::{Board, BoardError};
    /// let b = Board::from_cells(vec![2, 4, 8, 2]).unwrap();
    /// assert_eq!(b.size(), 2);
    /// assert_eq!(Board::from_cells(vec![2, 4, 8]).unwrap_err(), BoardError::NotSquare { len: 3 });
    /// ```
    pub fn from_cells(cells: Vec<Tile>) -> Result<Self, BoardError> {
        let len = cells.len();
        let size = (len as f64).sqrt().round() as usize;
        if size == 0 || size * size != len {
            return Err(BoardError::NotSquare { len });
        }
        if size > MAX_SIZE {
            return Err(BoardError::TooLarge { size, max: MAX_SIZE });
        }
        Ok(Board { grid: Grid { size, cells }, score: 0, tags: RunTags::new(size) })
    }

    #[inline]
    pub fn size(&self) -> usize { self.grid.size }

    #[inline]
    pub fn score(&self) -> Score { self.score }

    #[inline]
    pub fn cells(&self) -> &[Tile] { self.grid.cells() }

    #[inline]
    pub fn get(&self, p: Point) -> Tile { self.grid.get(p) }

    /// Highest tile currently on the board.
    pub fn highest_tile(&self) -> Tile { self.grid.cells.iter().copied().max().unwrap_or(0) }

    /// Make this board a copy of `source`: tiles and score only.
    ///
    /// The run-tag scratch index is resized if needed but never copied.
    pub fn copy_from(&mut self, source: &Board) {
        self.grid.copy_from(&source.grid);
        self.score = source.score;
        if self.tags.len() != self.grid.cells.len() {
            self.tags = RunTags::new(self.grid.size);
        }
    }

    /// Refill every cell at random, settle any standing runs, and zero the score.
    pub fn reshuffle<R: RandomBound + ?Sized>(&mut self, rng: &mut R) {
        self.random_fill(rng);
        self.settle(rng);
        self.score = 0;
    }

    pub(crate) fn random_fill<R: RandomBound + ?Sized>(&mut self, rng: &mut R) {
        for cell in self.grid.cells.iter_mut() {
            *cell = random_tile(rng);
        }
    }

    /// Swap the two cells of `mv`, then resolve collapses and chain reactions until stable.
    ///
    /// Returns the score gained; the same amount is added to [`Board::score`].
    /// A swap that forms no run is left in place and scores nothing.
    ///
    /// # Panics
    /// If either cell is off the board or the cells are not adjacent.
    ///
    /// ```
    /// use exponentile::engine::Board;
    /// use rand::{rngs::StdRng, SeedableRng};
    /// let mut rng = StdRng::seed_from_u64(3);
    /// let mut board = Board::new(8, &mut rng);
    /// if let Some(&mv) = board.find_moves().first() {
    ///     let gained = board.apply_move(mv, &mut rng);
    ///     assert!(gained >= 4);
    ///     assert_eq!(board.score(), gained);
    /// }
    /// ```
    pub fn apply_move<R: RandomBound + ?Sized>(&mut self, mv: Move, rng: &mut R) -> Score {
        assert!(
            self.grid.contains(mv.a) && self.grid.contains(mv.b),
            "move {mv} is outside a {0}x{0} board",
            self.grid.size
        );
        assert!(mv.a.x.abs_diff(mv.b.x) + mv.a.y.abs_diff(mv.b.y) == 1, "move {mv} does not swap neighbours");
        self.grid.swap(mv.a, mv.b);
        self.resolve_loop(Some(mv), rng)
    }

    /// Resolve standing runs with no initiating swap (chain reactions only).
    pub fn settle<R: RandomBound + ?Sized>(&mut self, rng: &mut R) -> Score { self.resolve_loop(None, rng) }

    fn resolve_loop<R: RandomBound + ?Sized>(&mut self, swap: Option<Move>, rng: &mut R) -> Score {
        let mut gained = 0;
        let mut passes = 0u32;
        let mut phase = Phase::Resolving { swap };
        loop {
            match phase {
                Phase::Resolving { swap } => {
                    let runs = self.find_runs(ScanMode::Commit);
                    if runs.is_empty() {
                        phase = Phase::Stable;
                        continue;
                    }
                    let collapses = self.group_runs(&runs);
                    gained = self.resolve_collapses(&collapses, swap.as_ref()).saturating_add(gained);
                    passes += 1;
                    phase = Phase::Settling;
                }
                Phase::Settling => {
                    self.gravity_down(rng);
                    phase = Phase::Resolving { swap: None };
                }
                Phase::Stable => break,
            }
        }
        if passes > 0 {
            log::trace!("resolved {passes} pass(es), +{gained} -> {}", self.score);
        }
        gained
    }
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    /// Only the first pass after a swap carries it, for anchor selection.
    Resolving { swap: Option<Move> },
    Settling,
    Stable,
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.grid.cells.chunks(self.grid.size) {
            for v in row {
                write!(f, "{v:6}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn normalize_size(size: usize) -> usize {
    match size {
        0 => DEFAULT_SIZE,
        s if s > MAX_SIZE => {
            log::warn!("board size {s} clamped to {MAX_SIZE}");
            MAX_SIZE
        }
        s => s,
    }
}

#[inline]
pub(crate) fn random_tile<R: RandomBound + ?Sized>(rng: &mut R) -> Tile {
    NEW_TILES.get(rng.below(NEW_TILES.len())).copied().unwrap_or(NEW_TILES[0])
}

#[cfg(test)]
pub(crate) mod testing {
    use super::RandomBound;

    /// Replays a fixed list of draws; panics when exhausted or out of range.
    pub(crate) struct Scripted {
        values: Vec<usize>,
        pos: usize,
    }

    impl Scripted {
        pub(crate) fn new(values: &[usize]) -> Self { Scripted { values: values.to_vec(), pos: 0 } }
    }

    impl RandomBound for Scripted {
        fn below(&mut self, bound: usize) -> usize {
            let out = self.values[self.pos];
            self.pos += 1;
            assert!(out < bound, "scripted draw {out} not below {bound}");
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::Scripted;
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn size_is_normalized() {
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(Board::new(0, &mut rng).size(), DEFAULT_SIZE);
        assert_eq!(Board::new(5, &mut rng).size(), 5);
        assert_eq!(Board::with_size(MAX_SIZE + 10).size(), MAX_SIZE);

        let capped = Board::new(MAX_SIZE + 1, &mut rng);
        assert_eq!(capped.size(), MAX_SIZE);
        assert_eq!(capped.cells().len(), MAX_SIZE * MAX_SIZE);
    }

    #[test]
    fn new_board_is_full_and_stable() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let mut board = Board::new(8, &mut rng);
            assert_eq!(board.score(), 0);
            assert!(board.cells().iter().all(|&t| t >= 2 && t.is_power_of_two()));
            assert!(board.find_runs(ScanMode::Probe).is_empty());
        }
    }

    #[test]
    fn random_tile_maps_draws() {
        let mut rng = Scripted::new(&[0, 1, 2]);
        assert_eq!(random_tile(&mut rng), 2);
        assert_eq!(random_tile(&mut rng), 4);
        assert_eq!(random_tile(&mut rng), 8);
    }

    #[test]
    fn from_cells_rejects_bad_shapes() {
        assert_eq!(Board::from_cells(vec![]).unwrap_err(), BoardError::NotSquare { len: 0 });
        assert_eq!(Board::from_cells(vec![2; 5]).unwrap_err(), BoardError::NotSquare { len: 5 });
        let big = MAX_SIZE + 1;
        assert_eq!(
            Board::from_cells(vec![2; big * big]).unwrap_err(),
            BoardError::TooLarge { size: big, max: MAX_SIZE }
        );
    }

    #[test]
    fn copy_from_takes_tiles_and_score_only() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut src = Board::new(6, &mut rng);
        src.score = 1234;
        let mut dst = Board::with_size(4);
        dst.copy_from(&src);
        assert_eq!(dst.size(), 6);
        assert_eq!(dst.cells(), src.cells());
        assert_eq!(dst.score(), 1234);

        // Same dimensions: storage is reused.
        let ptr = dst.grid.cells.as_ptr();
        let other = Board::new(6, &mut rng);
        dst.copy_from(&other);
        assert_eq!(dst.grid.cells.as_ptr(), ptr);
        assert_eq!(dst.cells(), other.cells());
    }

    #[test]
    fn apply_move_scores_a_simple_triple() {
        // Swapping (2,0)<->(2,1) lines up three 2s along row 0.
        #[rustfmt::skip]
        let mut board = Board::from_cells(vec![
            2, 2, 4, 8,
            4, 8, 2, 4,
            8, 4, 8, 2,
            2, 8, 4, 8,
        ]).unwrap();
        let mv = Move::swap(Point::new(2, 0), Point::new(2, 1)).unwrap();
        let mut rng = Scripted::new(&[1, 2]);
        let gained = board.apply_move(mv, &mut rng);
        assert_eq!(gained, 4);
        assert_eq!(board.score(), 4);
        // Anchor is the swapped cell at (2,0); (0,0) and (1,0) were cleared and refilled.
        #[rustfmt::skip]
        let expected: &[Tile] = &[
            4, 8, 4, 8,
            4, 8, 4, 4,
            8, 4, 8, 2,
            2, 8, 4, 8,
        ];
        assert_eq!(board.cells(), expected);
    }

    #[test]
    fn chain_reactions_leave_no_runs() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut board = Board::new(8, &mut rng);
        let mut total = 0;
        for _ in 0..50 {
            let moves = board.find_moves();
            let Some(&mv) = moves.first() else { break };
            total += board.apply_move(mv, &mut rng);
            assert!(board.find_runs(ScanMode::Commit).is_empty());
            assert!(board.cells().iter().all(|&t| t > 0));
        }
        assert_eq!(board.score(), total);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn out_of_bounds_move_is_fatal() {
        let mut board = Board::from_cells(vec![2, 4, 8, 2]).unwrap();
        let mv = Move::swap(Point::new(1, 1), Point::new(2, 1)).unwrap();
        board.apply_move(mv, &mut Scripted::new(&[]));
    }

    #[test]
    fn display_right_aligns_six_wide() {
        let board = Board::from_cells(vec![2, 4, 8, 1024]).unwrap();
        assert_eq!(board.to_string(), "     2     4\n     8  1024\n");
    }
}
