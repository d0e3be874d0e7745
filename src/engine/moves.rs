use std::fmt;
use std::hash::{Hash, Hasher};

use super::scan::scan_runs;
use super::{Board, BoardError, Point};

/// A swap of two orthogonally adjacent cells.
///
/// Moves produced by [`Board::find_moves`] also carry a touch count: the
/// total length of every run the swap would create. It is a hint for
/// strategies and does not take part in equality.
#[derive(Debug, Clone, Copy)]
pub struct Move {
    pub a: Point,
    pub b: Point,
    touch: usize,
}

impl Move {
    /// Build a swap, rejecting cells that are not neighbours.
    ///
    /// ```
    /// use exponentile::engine::{Move, Point};
    /// assert!(Move::swap(Point::new(0, 0), Point::new(1, 0)).is_ok());
    /// assert!(Move::swap(Point::new(0, 0), Point::new(1, 1)).is_err());
    /// ```
    pub fn swap(a: Point, b: Point) -> Result<Self, BoardError> {
        if a.x.abs_diff(b.x) + a.y.abs_diff(b.y) != 1 {
            return Err(BoardError::NotAdjacent { a, b });
        }
        Ok(Move { a, b, touch: 0 })
    }

    /// Sum of run lengths this swap creates; 0 for hand-built moves.
    #[inline]
    pub fn touch(&self) -> usize { self.touch }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool { self.a == other.a && self.b == other.b }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.a.hash(state);
        self.b.hash(state);
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{} <-> {}", self.a, self.b) }
}

impl Board {
    /// Every swap that would create at least one run, in scan order: for each
    /// cell row by row, the swap with its right neighbour, then with the one below.
    ///
    /// Each swap is tried on a swapped view of the cells, so the board is
    /// never touched. An empty result means the game is over.
    ///
    /// ```
    /// use exponentile::engine::{Board, Move, Point};
    /// let b = Board::from_cells(vec![
    ///     2, 2, 4,
    ///     4, 8, 8,
    ///     8, 4, 2,
    /// ]).unwrap();
    /// let moves = b.find_moves();
    /// assert_eq!(moves, vec![Move::swap(Point::new(0, 1), Point::new(0, 2)).unwrap()]);
    /// ```
    pub fn find_moves(&self) -> Vec<Move> {
        let size = self.grid.size;
        let mut moves = Vec::new();
        for y in 0..size {
            for x in 0..size {
                let a = Point::new(x, y);
                if x + 1 < size {
                    self.try_swap(a, Point::new(x + 1, y), &mut moves);
                }
                if y + 1 < size {
                    self.try_swap(a, Point::new(x, y + 1), &mut moves);
                }
            }
        }
        moves
    }

    /// True if any swap would create a run.
    pub fn has_moves(&self) -> bool { !self.find_moves().is_empty() }

    fn try_swap(&self, a: Point, b: Point, moves: &mut Vec<Move>) {
        let (ia, ib) = (self.grid.index(a), self.grid.index(b));
        let cells = self.grid.cells();
        let swapped = |i: usize| {
            if i == ia {
                cells[ib]
            } else if i == ib {
                cells[ia]
            } else {
                cells[i]
            }
        };
        let mut touch = 0;
        scan_runs(self.grid.size, swapped, |run| touch += run.len());
        if touch > 0 {
            moves.push(Move { a, b, touch });
        }
    }
}
