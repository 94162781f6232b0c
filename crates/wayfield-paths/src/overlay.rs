//! The live per-cell search overlay.
//!
//! Every search owns one [`Overlay`]: a flat array of [`SearchCell`]s, one
//! per grid coordinate, created when the search starts and mutated only by
//! that search. Renderers read it through the search's
//! [`SearchResult`](crate::SearchResult) to animate OPEN/CLOSED/BEST
//! frontiers; it is distinct from the permanent wall layout.

use wayfield_core::Point;

/// Visualization state of one cell within a single search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellState {
    #[default]
    Unknown,
    Open,
    Closed,
    Best,
}

/// Per-cell bookkeeping of one search.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SearchCell {
    /// Distance traveled from the start (g).
    pub g: f64,
    /// Estimated full travel distance through this cell (f = g + estimate).
    pub f: f64,
    pub state: CellState,
    /// Flat index of the cell this one was reached from. Exclusive to this
    /// search; never aliased across searches.
    pub(crate) parent: Option<usize>,
}

/// A `width × height` array of [`SearchCell`]s addressable by point or by
/// flat index.
#[derive(Clone, Debug)]
pub struct Overlay {
    width: i32,
    height: i32,
    cells: Vec<SearchCell>,
}

impl Overlay {
    pub(crate) fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            cells: vec![SearchCell::default(); (width * height).max(0) as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Convert a point to a flat index. Returns `None` if out of range.
    #[inline]
    pub(crate) fn idx(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height {
            Some((p.y * self.width + p.x) as usize)
        } else {
            None
        }
    }

    /// Convert a flat index back to a point.
    #[inline]
    pub(crate) fn point(&self, idx: usize) -> Point {
        Point::new(idx as i32 % self.width, idx as i32 / self.width)
    }

    #[inline]
    pub(crate) fn cell(&self, idx: usize) -> &SearchCell {
        &self.cells[idx]
    }

    #[inline]
    pub(crate) fn cell_mut(&mut self, idx: usize) -> &mut SearchCell {
        &mut self.cells[idx]
    }

    /// The search state of the cell at `p` (`Unknown` when out of bounds).
    pub fn state_at(&self, p: Point) -> CellState {
        self.idx(p).map_or(CellState::Unknown, |i| self.cells[i].state)
    }

    /// The full search cell at `p`, or `None` when out of bounds.
    pub fn cell_at(&self, p: Point) -> Option<SearchCell> {
        self.idx(p).map(|i| self.cells[i])
    }

    /// The coordinate this cell was reached from, or `None` for the start
    /// cell and untouched cells.
    pub fn parent_of(&self, p: Point) -> Option<Point> {
        let i = self.idx(p)?;
        self.cells[i].parent.map(|pi| self.point(pi))
    }

    /// Whether every cell is back in the `Unknown` state.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.state == CellState::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idx_point_round_trip() {
        let ov = Overlay::new(4, 3);
        for y in 0..3 {
            for x in 0..4 {
                let p = Point::new(x, y);
                let i = ov.idx(p).unwrap();
                assert_eq!(ov.point(i), p);
            }
        }
        assert_eq!(ov.idx(Point::new(4, 0)), None);
        assert_eq!(ov.idx(Point::new(0, 3)), None);
        assert_eq!(ov.idx(Point::new(-1, 1)), None);
    }

    #[test]
    fn fresh_overlay_is_blank() {
        let ov = Overlay::new(5, 5);
        assert!(ov.is_blank());
        assert_eq!(ov.state_at(Point::new(2, 2)), CellState::Unknown);
        // Out of bounds reads are Unknown, not a panic.
        assert_eq!(ov.state_at(Point::new(-3, 9)), CellState::Unknown);
        assert_eq!(ov.cell_at(Point::new(9, 9)), None);
    }
}
