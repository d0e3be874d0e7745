use std::fmt;

use super::{Board, Move, Point, Run, Score, Tile};

const MULTIPLIER_LEN: usize = 64;

const fn build_multipliers() -> [u64; MULTIPLIER_LEN] {
    let mut table = [1u64; MULTIPLIER_LEN];
    let mut total = 3;
    while total < MULTIPLIER_LEN {
        table[total] = 1 << (total - 2);
        total += 1;
    }
    table
}

static MULTIPLIERS: [u64; MULTIPLIER_LEN] = build_multipliers();

/// Value factor for a collapse covering `total` cells: `2^(total - 2)` from three cells up.
///
/// ```
/// use exponentile::engine::multiplier;
/// assert_eq!(multiplier(3), 2);
/// assert_eq!(multiplier(4), 4);
/// assert_eq!(multiplier(5), 8);
/// ```
#[inline]
pub fn multiplier(total: usize) -> u64 { MULTIPLIERS[total] }

/// One run, or a row run and a column run that cross, resolved together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collapse {
    ranges: Vec<Run>,
}

impl Collapse {
    pub fn new(ranges: Vec<Run>) -> Self { Collapse { ranges } }

    #[inline]
    pub fn ranges(&self) -> &[Run] { &self.ranges }

    /// Covered cell count; a shared intersection cell counts once.
    pub fn total(&self) -> usize {
        let sum: usize = self.ranges.iter().map(Run::len).sum();
        sum - self.ranges.len().saturating_sub(1)
    }

    #[inline]
    pub fn multiplier(&self) -> u64 { multiplier(self.total()) }

    /// Tile value shared by every covered cell.
    #[inline]
    pub fn value(&self) -> Tile { self.ranges.first().map_or(0, |r| r.value) }

    /// The start cell of a single run, or the crossing cell of two.
    ///
    /// # Panics
    /// On an empty collapse or one with more than two ranges; the scanner
    /// and grouper never build either.
    pub fn anchor_point(&self) -> Point {
        match self.ranges.as_slice() {
            [only] => only.start,
            [r1, r2] => {
                if r1.is_horizontal() {
                    Point::new(r2.start.x, r1.start.y)
                } else {
                    Point::new(r1.start.x, r2.start.y)
                }
            }
            ranges => panic!("collapse with {} ranges has no anchor point: {}", ranges.len(), self),
        }
    }

    /// Anchor for the first pass after a player swap: a single run lands on
    /// whichever swapped cell it covers, checking `a` before `b`.
    pub fn anchor_for(&self, swap: Option<&Move>) -> Point {
        if let (Some(mv), [only]) = (swap, self.ranges.as_slice()) {
            if only.contains(mv.a) {
                return mv.a;
            }
            if only.contains(mv.b) {
                return mv.b;
            }
        }
        self.anchor_point()
    }
}

impl fmt::Display for Collapse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, r) in self.ranges.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} <-> {}", r.start, r.end)?;
        }
        f.write_str("}")
    }
}

impl Board {
    /// Group the runs of the latest [`ScanMode::Commit`](super::ScanMode::Commit) scan.
    ///
    /// Each run not yet taken starts a collapse; the first crossing run that is
    /// still free joins it. A crossing run already taken by an earlier collapse
    /// stays there. Order follows `runs`.
    pub fn group_runs(&self, runs: &[Run]) -> Vec<Collapse> {
        let size = self.grid.size;
        let mut taken = vec![false; runs.len()];
        let mut out = Vec::with_capacity(runs.len());
        for (i, run) in runs.iter().enumerate() {
            if taken[i] {
                continue;
            }
            taken[i] = true;
            let mut ranges = vec![*run];
            let crossing = run.points().find_map(|p| {
                let tag = self.tags.get(p.y * size + p.x);
                let other = if run.is_horizontal() { tag.col } else { tag.row };
                other.filter(|&j| j < runs.len() && !taken[j])
            });
            if let Some(j) = crossing {
                taken[j] = true;
                ranges.push(runs[j]);
            }
            out.push(Collapse::new(ranges));
        }
        out
    }

    /// Collapse every group into its anchor and return the score gained.
    ///
    /// All covered cells but the anchor become empty; the anchor becomes
    /// `value * multiplier`, which is also added to the score. Both saturate
    /// at `u64::MAX` instead of wrapping.
    pub(crate) fn resolve_collapses(&mut self, collapses: &[Collapse], swap: Option<&Move>) -> Score {
        let mut gained: Score = 0;
        for collapse in collapses {
            let anchor = collapse.anchor_for(swap);
            let new_value = collapse.value().saturating_mul(collapse.multiplier());
            for run in collapse.ranges() {
                self.clear_except(run, anchor);
            }
            self.grid.set(anchor, new_value);
            gained = gained.saturating_add(new_value);
            log::trace!("collapse {collapse} -> {new_value} at {anchor}");
        }
        self.score = self.score.saturating_add(gained);
        gained
    }

    fn clear_except(&mut self, run: &Run, keep: Point) {
        for p in run.points() {
            if p != keep {
                self.grid.set(p, 0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::Scripted;
    use crate::engine::ScanMode;

    fn run(ax: usize, ay: usize, bx: usize, by: usize, value: Tile) -> Run {
        Run { start: Point::new(ax, ay), end: Point::new(bx, by), value }
    }

    #[test]
    fn multiplier_table() {
        assert_eq!(multiplier(3), 2);
        assert_eq!(multiplier(4), 4);
        assert_eq!(multiplier(5), 8);
        assert_eq!(multiplier(6), 16);
        for t in 1..MULTIPLIER_LEN {
            assert!(multiplier(t) >= multiplier(t - 1));
        }
    }

    #[test]
    fn totals_count_the_crossing_once() {
        let single = Collapse::new(vec![run(0, 0, 4, 0, 2)]);
        assert_eq!(single.total(), 5);
        let cross = Collapse::new(vec![run(0, 1, 2, 1, 2), run(1, 0, 1, 3, 2)]);
        assert_eq!(cross.total(), 6);
        assert_eq!(cross.multiplier(), 16);
        assert_eq!(cross.anchor_point(), Point::new(1, 1));
        // Order of the two ranges doesn't matter.
        let flipped = Collapse::new(vec![run(1, 0, 1, 3, 2), run(0, 1, 2, 1, 2)]);
        assert_eq!(flipped.anchor_point(), Point::new(1, 1));
    }

    #[test]
    #[should_panic(expected = "3 ranges")]
    fn three_ranges_are_fatal() {
        let c = Collapse::new(vec![run(0, 0, 2, 0, 2), run(0, 0, 0, 2, 2), run(2, 0, 2, 2, 2)]);
        c.anchor_point();
    }

    #[test]
    fn clear_except_keeps_one_cell() {
        #[rustfmt::skip]
        let mut b = Board::from_cells(vec![
            1, 2, 3, 4,
            5, 6, 7, 8,
            1, 2, 3, 4,
            5, 6, 7, 8,
        ]).unwrap();
        b.clear_except(&run(1, 1, 3, 1, 6), Point::new(2, 1));
        assert_eq!(&b.cells()[4..8], &[5, 0, 7, 0]);
        b.clear_except(&run(1, 1, 1, 3, 6), Point::new(1, 2));
        assert_eq!(b.get(Point::new(1, 2)), 2);
        assert_eq!(b.get(Point::new(1, 3)), 0);
    }

    #[test]
    fn single_run_off_the_swap_resolves_to_its_start() {
        #[rustfmt::skip]
        let mut b = Board::from_cells(vec![
            8, 8, 8, 8, 8,
            2, 4, 2, 4, 2,
            4, 2, 4, 2, 4,
            2, 4, 2, 4, 2,
            4, 2, 4, 2, 4,
        ]).unwrap();
        let runs = b.find_runs(ScanMode::Commit);
        let collapses = b.group_runs(&runs);
        assert_eq!(collapses.len(), 1);
        assert_eq!(collapses[0].multiplier(), 8);
        // The swap touched cells the run doesn't cover.
        let mv = Move::swap(Point::new(0, 3), Point::new(1, 3)).unwrap();
        let gained = b.resolve_collapses(&collapses, Some(&mv));
        assert_eq!(gained, 64);
        assert_eq!(&b.cells()[..5], &[64, 0, 0, 0, 0]);
        assert_eq!(b.score(), 64);
    }

    #[test]
    fn single_run_prefers_the_swapped_cell() {
        #[rustfmt::skip]
        let mut b = Board::from_cells(vec![
            2, 4, 4, 4,
            8, 2, 8, 2,
            2, 8, 2, 8,
            8, 2, 8, 2,
        ]).unwrap();
        let runs = b.find_runs(ScanMode::Commit);
        let collapses = b.group_runs(&runs);
        let mv = Move::swap(Point::new(2, 0), Point::new(2, 1)).unwrap();
        b.resolve_collapses(&collapses, Some(&mv));
        assert_eq!(&b.cells()[..4], &[2, 0, 8, 0]);

        // Only `b` lies on the run.
        let mut b2 = Board::from_cells(vec![2, 4, 4, 4, 8, 2, 8, 2, 2, 8, 2, 8, 8, 2, 8, 2]).unwrap();
        let runs = b2.find_runs(ScanMode::Commit);
        let collapses = b2.group_runs(&runs);
        let mv = Move::swap(Point::new(3, 1), Point::new(3, 0)).unwrap();
        b2.resolve_collapses(&collapses, Some(&mv));
        assert_eq!(&b2.cells()[..4], &[2, 0, 0, 8]);
    }

    #[test]
    fn crossing_runs_group_and_land_on_the_intersection() {
        // Row run of three 4s at y=1, column run of four 4s at x=2.
        #[rustfmt::skip]
        let mut b = Board::from_cells(vec![
            2, 8, 4, 2, 8,
            8, 4, 4, 4, 2,
            2, 8, 4, 8, 8,
            8, 2, 4, 2, 2,
            2, 8, 2, 8, 8,
        ]).unwrap();
        let runs = b.find_runs(ScanMode::Commit);
        assert_eq!(runs, vec![run(1, 1, 3, 1, 4), run(2, 0, 2, 3, 4)]);
        let collapses = b.group_runs(&runs);
        assert_eq!(collapses.len(), 1);
        let c = &collapses[0];
        assert_eq!(c.total(), 6);
        assert_eq!(c.multiplier(), 16);
        assert_eq!(c.anchor_point(), Point::new(2, 1));

        // Even with a swap on the column, the crossing wins.
        let mv = Move::swap(Point::new(2, 3), Point::new(2, 4)).unwrap();
        let gained = b.resolve_collapses(&collapses, Some(&mv));
        assert_eq!(gained, 64);
        #[rustfmt::skip]
        let expected: &[Tile] = &[
            2, 8, 0, 2, 8,
            8, 0, 64, 0, 2,
            2, 8, 0, 8, 8,
            8, 2, 0, 2, 2,
            2, 8, 2, 8, 8,
        ];
        assert_eq!(b.cells(), expected);
    }

    #[test]
    fn a_row_crossing_two_columns_pairs_with_the_first() {
        #[rustfmt::skip]
        let mut b = Board::from_cells(vec![
            2, 8, 2, 8, 2,
            8, 2, 8, 2, 8,
            4, 2, 4, 2, 4,
            4, 4, 4, 4, 4,
            2, 8, 4, 8, 4,
        ]).unwrap();
        let runs = b.find_runs(ScanMode::Commit);
        // Row y=3, then the columns at x=2 and x=4.
        assert_eq!(runs, vec![run(0, 3, 4, 3, 4), run(2, 2, 2, 4, 4), run(4, 2, 4, 4, 4)]);
        let collapses = b.group_runs(&runs);
        assert_eq!(collapses.len(), 2);
        assert_eq!(collapses[0].ranges(), &[runs[0], runs[1]]);
        assert_eq!(collapses[1].ranges(), &[runs[2]]);

        let gained = b.resolve_collapses(&collapses, None);
        // 4 * 2^(7-2) at (2,3), then 4 * 2 at (4,2).
        assert_eq!(gained, 128 + 8);
        assert_eq!(b.get(Point::new(2, 3)), 128);
        assert_eq!(b.get(Point::new(4, 2)), 8);
        assert_eq!(b.get(Point::new(4, 3)), 0);
        assert_eq!(b.get(Point::new(4, 4)), 0);
    }

    #[test]
    fn huge_collapses_saturate_instead_of_wrapping() {
        let big: Tile = 1 << 63;
        #[rustfmt::skip]
        let mut b = Board::from_cells(vec![
            big, big, big,
            2,   4,   8,
            4,   8,   2,
        ]).unwrap();
        b.score = 10;
        let gained = b.settle(&mut Scripted::new(&[0, 0]));
        assert_eq!(gained, u64::MAX);
        assert_eq!(b.score(), u64::MAX);
        let expected: &[Tile] = &[u64::MAX, 2, 2, 2, 4, 8, 4, 8, 2];
        assert_eq!(b.cells(), expected);
    }
}
