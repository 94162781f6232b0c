//! Distance estimators used both as step costs and as goal estimates.

use wayfield_core::Point;

/// A distance function over grid points.
///
/// The same function is used for the cost of one step between adjacent
/// cells and for the estimated remaining distance to the target, so
/// estimates stay admissible for their movement model.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Heuristic {
    /// |dx| + |dy| — 4-directional movement.
    Manhattan,
    /// Octile distance — 8-directional movement with √2 diagonals.
    Diagonal,
    /// Straight-line √(dx² + dy²).
    Euclidean,
}

impl Heuristic {
    /// Distance from `a` to `b` under this metric.
    pub fn distance(self, a: Point, b: Point) -> f64 {
        let dx = f64::from((a.x - b.x).abs());
        let dy = f64::from((a.y - b.y).abs());
        match self {
            Heuristic::Manhattan => dx + dy,
            Heuristic::Diagonal => (dx + dy) + (std::f64::consts::SQRT_2 - 2.0) * dx.min(dy),
            Heuristic::Euclidean => (dx * dx + dy * dy).sqrt(),
        }
    }
}
