//! The agent directory: id allocation, occupancy, and target resolution.
//!
//! All position changes go through [`Agents::move_to`], which refuses to
//! place two agents on the same cell. That single choke point is what makes
//! the scheduler collision-free: a move that would land on an occupied cell
//! fails loudly instead of silently stacking agents.

use wayfield_core::Point;

use crate::agent::{Agent, AgentId, Target};
use crate::error::WorldError;

struct Entry {
    id: AgentId,
    agent: Agent,
}

/// All agents in a world, in insertion order.
pub struct Agents {
    entries: Vec<Entry>,
    next_id: u32,
}

impl Default for Agents {
    fn default() -> Self {
        Self::new()
    }
}

impl Agents {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add an agent, allocating its id. Fails if the position is taken.
    pub(crate) fn add(&mut self, agent: Agent) -> Result<AgentId, WorldError> {
        if self.at(agent.pos()).is_some() {
            return Err(WorldError::PositionOccupied(agent.pos()));
        }
        let id = AgentId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, agent });
        Ok(id)
    }

    /// Remove an agent and return it. Any other agent targeting the removed
    /// one is retargeted to the removed agent's final position, so targets
    /// never dangle.
    pub(crate) fn remove(&mut self, id: AgentId) -> Result<Agent, WorldError> {
        let i = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(WorldError::UnknownAgent(id))?;
        let removed = self.entries.remove(i).agent;
        for e in &mut self.entries {
            if e.agent.target == Target::Agent(id) {
                e.agent.target = Target::Fixed(removed.pos());
            }
        }
        Ok(removed)
    }

    /// Move an agent onto a cell. The destination must be free.
    pub(crate) fn move_to(&mut self, id: AgentId, pos: Point) -> Result<(), WorldError> {
        if let Some(other) = self.at(pos) {
            if other != id {
                return Err(WorldError::PositionOccupied(pos));
            }
        }
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(WorldError::UnknownAgent(id))?;
        entry.agent.set_pos(pos);
        Ok(())
    }

    pub(crate) fn set_target(&mut self, id: AgentId, target: Target) -> Result<(), WorldError> {
        if let Target::Agent(other) = target {
            if other == id {
                return Err(WorldError::SelfTarget(id));
            }
            if self.get(other).is_none() {
                return Err(WorldError::UnknownAgent(other));
            }
        }
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(WorldError::UnknownAgent(id))?;
        entry.agent.target = target;
        Ok(())
    }

    /// The agent standing on `pos`, if any.
    pub fn at(&self, pos: Point) -> Option<AgentId> {
        self.entries
            .iter()
            .find(|e| e.agent.pos() == pos)
            .map(|e| e.id)
    }

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.agent)
    }

    /// Resolve an agent's target to a concrete cell. A target that follows
    /// an agent reads that agent's current position.
    pub fn target_position(&self, id: AgentId) -> Option<Point> {
        match self.get(id)?.target {
            Target::Fixed(p) => Some(p),
            Target::Agent(other) => self.get(other).map(Agent::pos),
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.entries.iter().map(|e| e.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AgentId, &Agent)> + '_ {
        self.entries.iter().map(|e| (e.id, &e.agent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic_and_never_reused() {
        let mut agents = Agents::new();
        let a = agents
            .add(Agent::new(Point::new(0, 0), Target::Fixed(Point::ZERO)))
            .unwrap();
        let b = agents
            .add(Agent::new(Point::new(1, 0), Target::Fixed(Point::ZERO)))
            .unwrap();
        assert_eq!((a, b), (AgentId(1), AgentId(2)));
        agents.remove(a).unwrap();
        let c = agents
            .add(Agent::new(Point::new(2, 0), Target::Fixed(Point::ZERO)))
            .unwrap();
        assert_eq!(c, AgentId(3));
    }

    #[test]
    fn add_and_move_refuse_occupied_cells() {
        let mut agents = Agents::new();
        let a = agents
            .add(Agent::new(Point::new(0, 0), Target::Fixed(Point::ZERO)))
            .unwrap();
        let b = agents
            .add(Agent::new(Point::new(1, 0), Target::Fixed(Point::ZERO)))
            .unwrap();
        assert_eq!(
            agents.add(Agent::new(Point::new(0, 0), Target::Fixed(Point::ZERO))),
            Err(WorldError::PositionOccupied(Point::new(0, 0)))
        );
        assert_eq!(
            agents.move_to(a, Point::new(1, 0)),
            Err(WorldError::PositionOccupied(Point::new(1, 0)))
        );
        // Moving onto one's own cell is a no-op move, not a collision.
        agents.move_to(b, Point::new(1, 0)).unwrap();
    }

    #[test]
    fn removal_rewrites_dangling_targets() {
        let mut agents = Agents::new();
        let a = agents
            .add(Agent::new(Point::new(0, 0), Target::Fixed(Point::ZERO)))
            .unwrap();
        let b = agents
            .add(Agent::new(Point::new(3, 3), Target::Agent(a)))
            .unwrap();
        agents.move_to(a, Point::new(1, 1)).unwrap();
        agents.remove(a).unwrap();
        assert_eq!(
            agents.get(b).unwrap().target,
            Target::Fixed(Point::new(1, 1))
        );
        assert_eq!(agents.target_position(b), Some(Point::new(1, 1)));
    }

    #[test]
    fn set_target_validates_its_arguments() {
        let mut agents = Agents::new();
        let a = agents
            .add(Agent::new(Point::new(0, 0), Target::Fixed(Point::ZERO)))
            .unwrap();
        assert_eq!(
            agents.set_target(a, Target::Agent(a)),
            Err(WorldError::SelfTarget(a))
        );
        assert_eq!(
            agents.set_target(a, Target::Agent(AgentId(99))),
            Err(WorldError::UnknownAgent(AgentId(99)))
        );
        agents.set_target(a, Target::Fixed(Point::new(4, 4))).unwrap();
        assert_eq!(agents.target_position(a), Some(Point::new(4, 4)));
    }

    #[test]
    fn agent_target_tracks_the_followed_agent() {
        let mut agents = Agents::new();
        let a = agents
            .add(Agent::new(Point::new(0, 0), Target::Fixed(Point::ZERO)))
            .unwrap();
        let b = agents
            .add(Agent::new(Point::new(5, 5), Target::Fixed(Point::ZERO)))
            .unwrap();
        agents.set_target(a, Target::Agent(b)).unwrap();
        assert_eq!(agents.target_position(a), Some(Point::new(5, 5)));
        agents.move_to(b, Point::new(6, 6)).unwrap();
        assert_eq!(agents.target_position(a), Some(Point::new(6, 6)));
    }
}
