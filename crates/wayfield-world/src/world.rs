//! The coordination scheduler: a shared grid of walls and agents whose
//! paths are recomputed as the world changes.
//!
//! [`World::tick`] runs in two phases. Phase A replans every agent whose
//! cached path has gone stale and then barrier-checks that every agent has
//! a resolved result; if any animated search is still in flight the tick
//! aborts and tries again next period. Phase B re-checks staleness (earlier
//! moves in the same pass can invalidate later paths) and advances each
//! agent one step along its path through the directory, which rejects any
//! move onto an occupied cell. Agents chasing each other therefore end in
//! an adjacent standoff instead of stacking or swapping through one
//! another.

use std::collections::HashMap;
use std::time::Duration;

use wayfield_core::{Field, Point, Signal};
use wayfield_paths::{search, SearchInput, SearchTask};

use crate::agent::{Agent, AgentId, Target};
use crate::directory::Agents;
use crate::error::WorldError;
use crate::record::{AgentRecord, Status};

/// One grid cell of the shared world.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldCell {
    pub wall: bool,
}

struct PendingSearch {
    agent: AgentId,
    task: SearchTask,
}

/// A grid of walls plus the agents moving on it.
pub struct World {
    field: Field<WorldCell>,
    agents: Agents,
    records: HashMap<AgentId, AgentRecord>,
    pending: Vec<PendingSearch>,
    paused: bool,
    step_delay: Duration,
    update: Signal,
}

impl World {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            field: Field::filled(width, height, WorldCell::default()),
            agents: Agents::new(),
            records: HashMap::new(),
            pending: Vec::new(),
            paused: false,
            step_delay: Duration::ZERO,
            update: Signal::new(),
        }
    }

    // ------------------------------------------------------------------
    // Observation

    pub fn width(&self) -> i32 {
        self.field.width()
    }

    pub fn height(&self) -> i32 {
        self.field.height()
    }

    /// Wall state at `p`; out-of-bounds cells read as open.
    pub fn is_wall(&self, p: Point) -> bool {
        self.field.get(p).is_some_and(|c| c.wall)
    }

    pub fn agents(&self) -> &Agents {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id)
    }

    /// The scheduling record for an agent, if the scheduler has touched it.
    pub fn record(&self, id: AgentId) -> Option<&AgentRecord> {
        self.records.get(&id)
    }

    /// The (lazily created) scheduling record for an agent, for adjusting
    /// its search configuration.
    pub fn record_mut(&mut self, id: AgentId) -> Result<&mut AgentRecord, WorldError> {
        if self.agents.get(id).is_none() {
            return Err(WorldError::UnknownAgent(id));
        }
        Ok(self.records.entry(id).or_default())
    }

    /// Signal fired after every successful edit, at the end of every
    /// completed tick, on every overlay change of an animated search, and
    /// on every search resolution.
    pub fn update_signal(&self) -> &Signal {
        &self.update
    }

    pub fn on_update(&self, listener: impl Fn() + 'static) {
        self.update.subscribe(listener);
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Delay between animated search steps; zero drains them continuously.
    pub fn step_delay(&self) -> Duration {
        self.step_delay
    }

    pub fn has_pending_searches(&self) -> bool {
        !self.pending.is_empty()
    }

    // ------------------------------------------------------------------
    // Editing

    /// Resize the grid, preserving cells at retained coordinates.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.field.resize(width, height, |_| WorldCell::default());
        self.update.notify();
    }

    /// Flip the wall at `p`. Rejected (returns `false`) when out of bounds,
    /// when an agent stands on `p`, or when `p` is some agent's current
    /// target position.
    pub fn toggle_wall(&mut self, p: Point) -> bool {
        if !self.field.contains(p) {
            return false;
        }
        if self.agents.at(p).is_some() {
            log::debug!("wall toggle at {p} rejected: cell is occupied");
            return false;
        }
        if self
            .agents
            .ids()
            .any(|id| self.agents.target_position(id) == Some(p))
        {
            log::debug!("wall toggle at {p} rejected: cell is a target");
            return false;
        }
        let cell = &mut self.field[p];
        cell.wall = !cell.wall;
        self.update.notify();
        true
    }

    pub fn add_agent(&mut self, pos: Point, target: Target) -> Result<AgentId, WorldError> {
        if !self.field.contains(pos) {
            return Err(WorldError::OutOfBounds(pos));
        }
        if let Target::Agent(other) = target {
            if self.agents.get(other).is_none() {
                return Err(WorldError::UnknownAgent(other));
            }
        }
        let id = self.agents.add(Agent::new(pos, target))?;
        log::debug!("agent {id} added at {pos}");
        self.update.notify();
        Ok(id)
    }

    /// Remove an agent, dropping its record and any search in flight for
    /// it. Other agents that targeted it keep chasing its final position.
    pub fn remove_agent(&mut self, id: AgentId) -> Result<Agent, WorldError> {
        let agent = self.agents.remove(id)?;
        self.records.remove(&id);
        self.pending.retain(|p| p.agent != id);
        log::debug!("agent {id} removed");
        self.update.notify();
        Ok(agent)
    }

    pub fn set_target(&mut self, id: AgentId, target: Target) -> Result<(), WorldError> {
        self.agents.set_target(id, target)?;
        self.update.notify();
        Ok(())
    }

    /// Teleport an agent to `pos` (an editing-layer drag, not a scheduled
    /// move). The destination must be inside the grid and unoccupied.
    pub fn move_agent(&mut self, id: AgentId, pos: Point) -> Result<(), WorldError> {
        if !self.field.contains(pos) {
            return Err(WorldError::OutOfBounds(pos));
        }
        self.agents.move_to(id, pos)?;
        self.update.notify();
        Ok(())
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            self.update.notify();
        }
    }

    pub fn unpause(&mut self) {
        if self.paused {
            self.paused = false;
            self.update.notify();
        }
    }

    pub fn set_step_delay(&mut self, delay: Duration) {
        self.step_delay = delay;
    }

    // ------------------------------------------------------------------
    // Scheduling

    /// Advance the world by one tick. No-op while paused.
    pub fn tick(&mut self) {
        if self.paused {
            log::trace!("tick skipped: paused");
            return;
        }
        let ids: Vec<AgentId> = self.agents.ids().collect();

        // Phase A: replan every stale agent, then barrier on resolution.
        for &id in &ids {
            self.replan_if_stale(id);
        }
        for &id in &ids {
            let resolved = self
                .records
                .get(&id)
                .and_then(AgentRecord::result)
                .is_some_and(|r| r.is_resolved());
            if !resolved {
                log::debug!("tick aborted: agent {id} still pathfinding");
                return;
            }
        }

        // Phase B: one step per agent, in directory order.
        for &id in &ids {
            self.record_entry(id).set_status(Status::Moving);
            // Earlier moves this pass may have invalidated this path.
            self.replan_if_stale(id);
            let Some(mut path) = self
                .records
                .get(&id)
                .and_then(AgentRecord::result)
                .and_then(|r| r.path())
            else {
                continue;
            };
            let target_agent = self.agents.get(id).and_then(|a| a.target.agent_id());
            if target_agent.is_some() {
                // Never step onto a live target agent.
                path.pop();
            }
            let pos = match self.agents.get(id) {
                Some(a) => a.pos(),
                None => continue,
            };
            let Some(at) = path.iter().position(|&p| p == pos) else {
                continue;
            };
            if at + 1 >= path.len() {
                continue;
            }
            let next = path[at + 1];
            match self.agents.move_to(id, next) {
                Ok(()) => log::trace!("agent {id} stepped to {next}"),
                Err(err) => log::warn!("agent {id} step to {next} rejected: {err}"),
            }
        }

        self.update.notify();
    }

    /// Advance every pending animated search by one suspension point.
    /// No-op while paused, which freezes all animations together.
    pub fn step_searches(&mut self) {
        if self.paused {
            return;
        }
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].task.step() {
                let done = self.pending.remove(i);
                self.record_entry(done.agent).set_status(Status::Waiting);
            } else {
                i += 1;
            }
        }
    }

    fn record_entry(&mut self, id: AgentId) -> &mut AgentRecord {
        debug_assert!(self.agents.get(id).is_some(), "record for unknown agent {id}");
        self.records.entry(id).or_default()
    }

    fn replan_if_stale(&mut self, id: AgentId) {
        if self.is_stale(id) {
            self.replan(id);
        }
    }

    /// Whether the agent's cached result no longer fits the world: missing,
    /// computed for a different target position, or holding a non-empty
    /// path the agent has left or that now crosses a wall or a foreign
    /// agent. An in-flight or empty result is not stale.
    fn is_stale(&self, id: AgentId) -> bool {
        let Some(agent) = self.agents.get(id) else {
            return false;
        };
        let Some(target) = self.agents.target_position(id) else {
            return false;
        };
        let Some(result) = self.records.get(&id).and_then(AgentRecord::result) else {
            return true;
        };
        if result.target() != target {
            return true;
        }
        let Some(path) = result.path() else {
            return false;
        };
        if path.is_empty() {
            return false;
        }
        if !path.contains(&agent.pos()) {
            return true;
        }
        let target_agent = agent.target.agent_id();
        for &p in &path {
            if !self.field.contains(p) || self.field[p].wall {
                return true;
            }
            if let Some(other) = self.agents.at(p) {
                if other != id && Some(other) != target_agent {
                    return true;
                }
            }
        }
        false
    }

    /// Start a fresh search for an agent against a snapshot of the current
    /// world. Animated searches are queued for [`step_searches`]; silent
    /// ones run to completion here.
    fn replan(&mut self, id: AgentId) {
        let agent = self.agents.get(id).expect("replan for unknown agent");
        let start = agent.pos();
        let target_agent = agent.target.agent_id();
        let target = self
            .agents
            .target_position(id)
            .expect("agent targets are never dangling");
        let walkable = self.walkable_for(id, target_agent);
        let config = self.records.entry(id).or_default().config;

        log::debug!("agent {id} replanning {start} -> {target}");
        let mut task = search(SearchInput {
            walkable,
            start,
            target,
            config,
        });
        {
            let rec = self.record_entry(id);
            rec.set_status(Status::Pathfinding);
            rec.result = Some(task.result());
        }
        // Search progress is world progress: every overlay change of an
        // animated search and every resolution reaches world observers.
        let update = self.update.clone();
        task.result().on_change(move || update.notify());
        if config.use_delay {
            // Supersede any older queued search for this agent.
            self.pending.retain(|p| p.agent != id);
            self.pending.push(PendingSearch { agent: id, task });
        } else {
            task.run();
            self.record_entry(id).set_status(Status::Waiting);
        }
    }

    /// Walkability snapshot for one agent's search: walls are blocked, and
    /// so is every cell occupied by an agent other than the searcher and
    /// its target agent.
    fn walkable_for(&self, id: AgentId, target_agent: Option<AgentId>) -> Field<bool> {
        let mut walkable =
            Field::new(self.field.width(), self.field.height(), |p| !self.field[p].wall);
        for (other, agent) in self.agents.iter() {
            if other == id || Some(other) == target_agent {
                continue;
            }
            if let Some(cell) = walkable.get_mut(agent.pos()) {
                *cell = false;
            }
        }
        walkable
    }
}
