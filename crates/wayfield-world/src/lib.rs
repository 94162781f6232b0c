//! Multi-agent coordination on a shared pathfinding grid.
//!
//! A [`World`] holds a grid of walls and a directory of [`Agent`]s, each
//! chasing a fixed cell or another agent. Every scheduler tick it replans
//! stale paths with `wayfield_paths`, waits for all searches to resolve,
//! then moves each agent one step, refusing moves that would stack two
//! agents on a cell. [`Runner`] drives ticks and animated-search pumping
//! from caller-supplied elapsed time.
//!
//! ```
//! use std::time::Duration;
//! use wayfield_core::Point;
//! use wayfield_world::{Runner, Target, World};
//!
//! let mut world = World::new(10, 10);
//! world.toggle_wall(Point::new(9, 0));
//! let id = world.add_agent(Point::new(0, 0), Target::Fixed(Point::new(9, 9)))?;
//! let mut runner = Runner::new(world);
//! runner.advance(Duration::from_secs(1));
//! assert_eq!(runner.world().agent(id).unwrap().pos(), Point::new(1, 1));
//! # Ok::<(), wayfield_world::WorldError>(())
//! ```

pub mod agent;
pub mod directory;
pub mod error;
pub mod record;
pub mod runner;
pub mod world;

pub use agent::{Agent, AgentId, Target};
pub use directory::Agents;
pub use error::WorldError;
pub use record::{AgentRecord, Status};
pub use runner::{Runner, TICK_PERIOD};
pub use world::{World, WorldCell};

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn target_round_trip() {
        for t in [
            Target::Fixed(wayfield_core::Point::new(3, 4)),
            Target::Agent(AgentId(7)),
        ] {
            let json = serde_json::to_string(&t).unwrap();
            let back: Target = serde_json::from_str(&json).unwrap();
            assert_eq!(t, back);
        }
    }

    #[test]
    fn status_round_trip() {
        for s in [Status::Pathfinding, Status::Waiting, Status::Moving] {
            let json = serde_json::to_string(&s).unwrap();
            let back: Status = serde_json::from_str(&json).unwrap();
            assert_eq!(s, back);
        }
    }
}
