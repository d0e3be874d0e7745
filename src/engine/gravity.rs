use super::{random_tile, Board, RandomBound};

impl Board {
    /// Drop tiles into empty cells below them, column by column, and refill the
    /// vacated top cells with fresh tiles.
    ///
    /// One pass per column: `out` walks up looking for holes while `inp` stays
    /// above it, skipping holes until it finds the next tile to pull down.
    pub(crate) fn gravity_down<R: RandomBound + ?Sized>(&mut self, rng: &mut R) {
        let size = self.grid.size;
        let cells = &mut self.grid.cells;
        for x in 0..size {
            let mut out = size as isize - 1;
            let mut inp = out - 1;
            while out >= 0 {
                let o = out as usize * size + x;
                if cells[o] == 0 {
                    while inp >= 0 && cells[inp as usize * size + x] == 0 {
                        inp -= 1;
                    }
                    if inp >= 0 {
                        let i = inp as usize * size + x;
                        cells[o] = cells[i];
                        cells[i] = 0;
                    } else {
                        cells[o] = random_tile(rng);
                    }
                }
                out -= 1;
                inp -= 1;
            }
        }
    }
}
