//! Agents and their goals.

use std::fmt;

use wayfield_core::Point;

/// A stable identifier for an agent. Ids are allocated by the directory,
/// start at 1 and are never reused within a world.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What an agent is trying to reach: either a fixed cell or another agent,
/// whose position is re-read every time the target is resolved.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Target {
    Fixed(Point),
    Agent(AgentId),
}

impl Target {
    /// The targeted agent's id, if this target follows an agent.
    pub fn agent_id(self) -> Option<AgentId> {
        match self {
            Target::Agent(id) => Some(id),
            Target::Fixed(_) => None,
        }
    }
}

/// A mobile entity on the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Agent {
    pos: Point,
    last_pos: Option<Point>,
    pub target: Target,
}

impl Agent {
    pub fn new(pos: Point, target: Target) -> Self {
        Self {
            pos,
            last_pos: None,
            target,
        }
    }

    pub fn pos(&self) -> Point {
        self.pos
    }

    /// Where the agent stood before its most recent move, if it has moved.
    pub fn last_pos(&self) -> Option<Point> {
        self.last_pos
    }

    pub(crate) fn set_pos(&mut self, pos: Point) {
        self.last_pos = Some(self.pos);
        self.pos = pos;
    }
}
