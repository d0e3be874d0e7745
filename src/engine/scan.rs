use std::fmt;

use super::{Board, Point, Tile};

/// How [`Board::find_runs`] treats the per-cell run index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Report runs only; no side effects.
    Probe,
    /// Report runs and tag every covered cell, so intersecting runs can be grouped.
    Commit,
}

/// A maximal horizontal or vertical run of at least three equal, non-empty tiles.
///
/// `start` is the leftmost/topmost cell and `end` the rightmost/bottommost, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub start: Point,
    pub end: Point,
    pub value: Tile,
}

impl Run {
    /// Inclusive cell count.
    #[inline]
    pub fn len(&self) -> usize {
        if self.is_horizontal() {
            self.end.x - self.start.x + 1
        } else {
            self.end.y - self.start.y + 1
        }
    }

    /// True for row-constant runs.
    #[inline]
    pub fn is_horizontal(&self) -> bool { self.start.y == self.end.y }

    pub fn contains(&self, p: Point) -> bool {
        if self.is_horizontal() {
            p.y == self.start.y && (self.start.x..=self.end.x).contains(&p.x)
        } else {
            p.x == self.start.x && (self.start.y..=self.end.y).contains(&p.y)
        }
    }

    /// Covered cells in scan order.
    pub fn points(&self) -> impl Iterator<Item = Point> {
        let run = *self;
        (0..run.len()).map(move |i| {
            if run.is_horizontal() {
                Point::new(run.start.x + i, run.start.y)
            } else {
                Point::new(run.start.x, run.start.y + i)
            }
        })
    }
}

impl fmt::Display for Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {} x{}", self.start, self.end, self.value)
    }
}

/// Which runs of the current commit scan cover a cell.
///
/// A cell lies on at most one row run and one column run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct CellTag {
    pub(crate) row: Option<usize>,
    pub(crate) col: Option<usize>,
}

/// Scratch index from cell to covering runs, rebuilt by every commit scan.
#[derive(Debug, Clone)]
pub(crate) struct RunTags(Vec<CellTag>);

impl RunTags {
    pub(crate) fn new(size: usize) -> Self { RunTags(vec![CellTag::default(); size * size]) }

    #[inline]
    pub(crate) fn len(&self) -> usize { self.0.len() }

    #[inline]
    pub(crate) fn get(&self, idx: usize) -> CellTag { self.0[idx] }

    fn clear(&mut self) { self.0.fill(CellTag::default()); }

    fn tag(&mut self, size: usize, run: &Run, run_idx: usize) {
        let horizontal = run.is_horizontal();
        for p in run.points() {
            let slot = &mut self.0[p.y * size + p.x];
            if horizontal {
                slot.row = Some(run_idx);
            } else {
                slot.col = Some(run_idx);
            }
        }
    }
}

impl Board {
    /// Find every run of three or more equal, non-empty tiles.
    ///
    /// Rows are scanned top to bottom (left to right within a row), then
    /// columns left to right (top to bottom within a column); runs are
    /// returned in that order. [`ScanMode::Commit`] also rebuilds the cell
    /// index that [`Board::group_runs`] relies on.
    ///
    /// ```
    /// use exponentile::engine::{Board, ScanMode};
    /// let mut b = Board::from_cells(vec![
    ///     4, 4, 4,
    ///     2, 8, 2,
    ///     8, 2, 8,
    /// ]).unwrap();
    /// let runs = b.find_runs(ScanMode::Probe);
    /// assert_eq!(runs.len(), 1);
    /// assert_eq!(runs[0].len(), 3);
    /// ```
    pub fn find_runs(&mut self, mode: ScanMode) -> Vec<Run> {
        let size = self.grid.size;
        let mut runs = Vec::new();
        match mode {
            ScanMode::Probe => scan_runs(size, |i| self.grid.cells[i], |run| runs.push(run)),
            ScanMode::Commit => {
                let cells = &self.grid.cells;
                let tags = &mut self.tags;
                tags.clear();
                scan_runs(
                    size,
                    |i| cells[i],
                    |run| {
                        tags.tag(size, &run, runs.len());
                        runs.push(run);
                    },
                );
            }
        }
        runs
    }
}

/// Scan rows then columns of a `size * size` board read through `cell`, emitting each run.
///
/// Empty cells never start or extend a run.
pub(crate) fn scan_runs<F, E>(size: usize, cell: F, mut emit: E)
where
    F: Fn(usize) -> Tile,
    E: FnMut(Run),
{
    for y in 0..size {
        scan_line(size, |i| cell(y * size + i), |a, b, value| {
            emit(Run { start: Point::new(a, y), end: Point::new(b, y), value })
        });
    }
    for x in 0..size {
        scan_line(size, |i| cell(i * size + x), |a, b, value| {
            emit(Run { start: Point::new(x, a), end: Point::new(x, b), value })
        });
    }
}

#[inline]
fn scan_line<F, E>(len: usize, cell: F, mut emit: E)
where
    F: Fn(usize) -> Tile,
    E: FnMut(usize, usize, Tile),
{
    let mut prev: Tile = 0;
    let mut run_len = 0usize;
    let mut start = 0usize;
    for i in 0..len {
        let cur = cell(i);
        if cur != 0 && cur == prev {
            run_len += 1;
            continue;
        }
        if run_len >= 3 {
            emit(start, i - 1, prev);
        }
        prev = cur;
        start = i;
        run_len = usize::from(cur != 0);
    }
    if run_len >= 3 {
        emit(start, len - 1, prev);
    }
}
