//! Per-agent scheduling state.

use wayfield_paths::{SearchConfig, SearchResult};

/// What an agent is doing this tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    /// A search for this agent is in flight.
    Pathfinding,
    /// A result is cached and the agent has not moved yet this tick.
    Waiting,
    /// The agent moved (or tried to) this tick.
    Moving,
}

/// Scheduling state the world keeps per agent: its current and previous
/// status (`None` until the scheduler first touches the agent), its search
/// configuration, and the most recent search result.
#[derive(Default)]
pub struct AgentRecord {
    status: Option<Status>,
    last_status: Option<Status>,
    pub config: SearchConfig,
    pub(crate) result: Option<SearchResult>,
}

impl AgentRecord {
    pub fn status(&self) -> Option<Status> {
        self.status
    }

    /// The status before the most recent transition.
    pub fn last_status(&self) -> Option<Status> {
        self.last_status
    }

    pub(crate) fn set_status(&mut self, status: Status) {
        if self.status != Some(status) {
            self.last_status = self.status;
            self.status = Some(status);
        }
    }

    /// The latest search result for this agent, if one exists.
    pub fn result(&self) -> Option<&SearchResult> {
        self.result.as_ref()
    }
}
