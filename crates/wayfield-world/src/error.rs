use thiserror::Error;
use wayfield_core::Point;

use crate::agent::AgentId;

/// Errors surfaced by world and directory editing operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum WorldError {
    #[error("position {0} is already occupied")]
    PositionOccupied(Point),
    #[error("no agent with id {0}")]
    UnknownAgent(AgentId),
    #[error("position {0} is outside the world")]
    OutOfBounds(Point),
    #[error("agent {0} cannot target itself")]
    SelfTarget(AgentId),
}
