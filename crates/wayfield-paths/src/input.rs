//! Search invocation inputs: [`SearchConfig`] and [`SearchInput`].

use wayfield_core::{Field, Point};

use crate::heuristic::Heuristic;

/// The search algorithm to run.
///
/// Only A* is implemented; the input/result contract is algorithm-shaped so
/// further algorithms can be added behind the same [`search`](crate::search)
/// entry point.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    #[default]
    AStar,
}

/// Per-agent search configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchConfig {
    pub heuristic: Heuristic,
    pub algorithm: Algorithm,
    /// When set, the search suspends after every cell-state transition so a
    /// driver can animate it, and overlay-change notifications are fired.
    pub use_delay: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            heuristic: Heuristic::Euclidean,
            algorithm: Algorithm::AStar,
            use_delay: false,
        }
    }
}

/// An immutable per-invocation search bundle.
///
/// `walkable` is a snapshot derived from the live world (walls plus agent
/// occupancy), never the live world itself: the search only ever reads this
/// copy, so concurrent world edits cannot corrupt an in-flight search.
#[derive(Clone, Debug)]
pub struct SearchInput {
    pub walkable: Field<bool>,
    pub start: Point,
    pub target: Point,
    pub config: SearchConfig,
}
