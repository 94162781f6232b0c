//! **wayfield-core** — foundational types for the wayfield multi-agent
//! pathfinding library.
//!
//! This crate provides the primitives the rest of the workspace builds on:
//! integer grid geometry ([`Point`]), a generic 2D container with
//! resize-with-preservation and 8-directional neighbor enumeration
//! ([`Field`]), and a lightweight observer-style notification utility
//! ([`Signal`]).

pub mod event;
pub mod field;
pub mod geom;

pub use event::Signal;
pub use field::Field;
pub use geom::Point;
