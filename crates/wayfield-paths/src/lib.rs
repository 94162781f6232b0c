//! Grid pathfinding with observable intermediate state.
//!
//! This crate computes shortest paths on 2D grids with 8-way movement, but
//! unlike a classic pathfinding library it exposes the search itself: every
//! task carries a shared [`Overlay`] recording which cells are open, closed
//! or on the current best path, and advances one cell-state transition at a
//! time, so a caller can render the frontier as it grows.
//!
//! The entry point is [`search`], which takes a [`SearchInput`] (an owned
//! walkability snapshot plus endpoints and a [`SearchConfig`]) and returns a
//! [`SearchTask`]. Drive the task with [`SearchTask::run`] for an immediate
//! answer or [`SearchTask::step`] to animate it; either way the outcome
//! lands in the [`SearchResult`] handle, which stays valid after the task is
//! dropped.

pub mod astar;
pub mod heuristic;
pub mod input;
pub mod overlay;
pub mod result;

pub use astar::SearchTask;
pub use heuristic::Heuristic;
pub use input::{Algorithm, SearchConfig, SearchInput};
pub use overlay::{CellState, Overlay, SearchCell};
pub use result::SearchResult;

/// Start a search for the given input, dispatching on the configured
/// algorithm. The returned task has not done any work yet (beyond resolving
/// degenerate inputs); drive it with [`SearchTask::step`] or
/// [`SearchTask::run`].
pub fn search(input: SearchInput) -> SearchTask {
    match input.config.algorithm {
        Algorithm::AStar => SearchTask::new(input),
    }
}
