//! The [`Field`] type — a generic 2D container addressable by [`Point`].
//!
//! Unlike a sparse map, a `Field` always holds exactly `width × height`
//! values in row-major order. It supports resize-with-preservation (values
//! at retained coordinates survive, new coordinates are filled from a
//! closure) and 8-directional neighbor enumeration.

use crate::geom::Point;
use std::ops::{Index, IndexMut};

/// A fixed-size 2D container of `T` values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field<T> {
    width: i32,
    height: i32,
    cells: Vec<T>,
}

impl<T> Field<T> {
    /// Create a new field, filling each cell from `fill`.
    ///
    /// # Panics
    /// Panics if `width` or `height` is not positive.
    pub fn new(width: i32, height: i32, mut fill: impl FnMut(Point) -> T) -> Self {
        assert!(width > 0, "field width must be positive, got {width}");
        assert!(height > 0, "field height must be positive, got {height}");
        let mut cells = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                cells.push(fill(Point::new(x, y)));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Width of the field.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height of the field.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Size as a `Point` (width = x, height = y).
    #[inline]
    pub fn size(&self) -> Point {
        Point::new(self.width, self.height)
    }

    /// Whether `p` lies inside the field.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height
    }

    #[inline]
    fn flat(&self, p: Point) -> usize {
        (p.y * self.width + p.x) as usize
    }

    /// Borrow the value at `p`, or `None` if out of bounds.
    #[inline]
    pub fn get(&self, p: Point) -> Option<&T> {
        if self.contains(p) {
            Some(&self.cells[self.flat(p)])
        } else {
            None
        }
    }

    /// Mutably borrow the value at `p`, or `None` if out of bounds.
    #[inline]
    pub fn get_mut(&mut self, p: Point) -> Option<&mut T> {
        if self.contains(p) {
            let i = self.flat(p);
            Some(&mut self.cells[i])
        } else {
            None
        }
    }

    /// Resize the field, preserving values at retained coordinates and
    /// filling new coordinates from `fill`.
    ///
    /// # Panics
    /// Panics if `width` or `height` is not positive.
    pub fn resize(&mut self, width: i32, height: i32, mut fill: impl FnMut(Point) -> T) {
        assert!(width > 0, "field width must be positive, got {width}");
        assert!(height > 0, "field height must be positive, got {height}");
        let (old_width, old_height) = (self.width, self.height);
        let mut old: Vec<Option<T>> = std::mem::take(&mut self.cells).into_iter().map(Some).collect();
        let old_contains =
            move |p: Point| p.x >= 0 && p.x < old_width && p.y >= 0 && p.y < old_height;
        let mut cells = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                let p = Point::new(x, y);
                if old_contains(p) {
                    let i = (p.y * old_width + p.x) as usize;
                    cells.push(old[i].take().unwrap_or_else(|| fill(p)));
                } else {
                    cells.push(fill(p));
                }
            }
        }
        self.width = width;
        self.height = height;
        self.cells = cells;
    }

    /// Row-major iterator over every point in the field.
    pub fn points(&self) -> impl Iterator<Item = Point> + 'static {
        let (w, h) = (self.width, self.height);
        (0..h).flat_map(move |y| (0..w).map(move |x| Point::new(x, y)))
    }

    /// Row-major iterator over `(Point, &T)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point, &T)> {
        self.points().map(move |p| (p, &self[p]))
    }

    /// The in-bounds 8-directional neighbours of `p`, clockwise from north.
    pub fn neighbors(&self, p: Point) -> impl Iterator<Item = Point> + '_ {
        p.neighbors_8().into_iter().filter(|&n| self.contains(n))
    }
}

impl<T: Clone> Field<T> {
    /// Create a new field with every cell set to `value`.
    pub fn filled(width: i32, height: i32, value: T) -> Self {
        Self::new(width, height, |_| value.clone())
    }
}

impl<T> Index<Point> for Field<T> {
    type Output = T;

    /// # Panics
    /// Panics if `p` is out of bounds — addressing a coordinate outside the
    /// field is a caller defect.
    #[inline]
    fn index(&self, p: Point) -> &T {
        match self.get(p) {
            Some(v) => v,
            None => panic!("point {p} outside {}x{} field", self.width, self.height),
        }
    }
}

impl<T> IndexMut<Point> for Field<T> {
    #[inline]
    fn index_mut(&mut self, p: Point) -> &mut T {
        let (w, h) = (self.width, self.height);
        match self.get_mut(p) {
            Some(v) => v,
            None => panic!("point {p} outside {w}x{h} field"),
        }
    }
}
