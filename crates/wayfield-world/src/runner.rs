//! Virtual-time tick driver.
//!
//! [`Runner`] owns a [`World`] and consumes caller-supplied elapsed time:
//! every tick period it runs [`World::tick`], and between ticks it pumps
//! pending animated searches at the world's step delay. There is no
//! wall-clock dependence, so a host loop feeds it real frame times and
//! tests feed it whatever they like.

use std::time::Duration;

use crate::world::World;

/// Default interval between scheduler ticks.
pub const TICK_PERIOD: Duration = Duration::from_millis(1000);

pub struct Runner {
    world: World,
    period: Duration,
    tick_acc: Duration,
    step_acc: Duration,
}

impl Runner {
    pub fn new(world: World) -> Self {
        Self::with_period(world, TICK_PERIOD)
    }

    pub fn with_period(world: World, period: Duration) -> Self {
        assert!(!period.is_zero(), "tick period must be positive");
        Self {
            world,
            period,
            tick_acc: Duration::ZERO,
            step_acc: Duration::ZERO,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn into_world(self) -> World {
        self.world
    }

    /// Consume `elapsed` time: run every due tick, then advance pending
    /// animated searches. A zero step delay drains pending searches
    /// completely on every call.
    pub fn advance(&mut self, elapsed: Duration) {
        self.tick_acc += elapsed;
        while self.tick_acc >= self.period {
            self.tick_acc -= self.period;
            self.world.tick();
        }

        let delay = self.world.step_delay();
        if delay.is_zero() {
            while self.world.has_pending_searches() && !self.world.is_paused() {
                self.world.step_searches();
            }
        } else {
            self.step_acc += elapsed;
            while self.step_acc >= delay {
                self.step_acc -= delay;
                self.world.step_searches();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfield_core::Point;
    use crate::agent::Target;

    #[test]
    fn ticks_fire_once_per_period() {
        let mut world = World::new(6, 6);
        let id = world
            .add_agent(Point::new(0, 0), Target::Fixed(Point::new(3, 3)))
            .unwrap();
        let mut runner = Runner::new(world);

        runner.advance(Duration::from_millis(999));
        assert_eq!(runner.world().agent(id).unwrap().pos(), Point::new(0, 0));
        runner.advance(Duration::from_millis(1));
        assert_eq!(runner.world().agent(id).unwrap().pos(), Point::new(1, 1));
        // A long stall catches up tick by tick.
        runner.advance(Duration::from_millis(2000));
        assert_eq!(runner.world().agent(id).unwrap().pos(), Point::new(3, 3));
    }

    #[test]
    fn zero_step_delay_drains_animated_searches() {
        let mut world = World::new(6, 6);
        let id = world
            .add_agent(Point::new(0, 0), Target::Fixed(Point::new(3, 3)))
            .unwrap();
        world.record_mut(id).unwrap().config.use_delay = true;
        let mut runner = Runner::with_period(world, Duration::from_millis(100));

        // First tick starts the search; the same call drains it.
        runner.advance(Duration::from_millis(100));
        assert!(!runner.world().has_pending_searches());
        // The next tick moves the agent along the resolved path.
        runner.advance(Duration::from_millis(100));
        assert_eq!(runner.world().agent(id).unwrap().pos(), Point::new(1, 1));
    }

    #[test]
    fn nonzero_step_delay_paces_animated_searches() {
        let mut world = World::new(6, 6);
        let id = world
            .add_agent(Point::new(0, 0), Target::Fixed(Point::new(3, 3)))
            .unwrap();
        world.record_mut(id).unwrap().config.use_delay = true;
        world.set_step_delay(Duration::from_millis(50));
        let mut runner = Runner::with_period(world, Duration::from_millis(100));

        runner.advance(Duration::from_millis(100));
        assert!(runner.world().has_pending_searches());
        // Each 50 ms pumps exactly one suspension point; the search needs
        // more than two, so it is still pending after one more step.
        runner.advance(Duration::from_millis(50));
        assert!(runner.world().has_pending_searches());

        let mut remaining = 10_000;
        while runner.world().has_pending_searches() {
            runner.advance(Duration::from_millis(50));
            remaining -= 1;
            assert!(remaining > 0, "search must finish");
        }
        runner.advance(Duration::from_millis(100));
        assert_eq!(runner.world().agent(id).unwrap().pos(), Point::new(1, 1));
    }

    #[test]
    fn paused_runner_neither_ticks_nor_pumps() {
        let mut world = World::new(6, 6);
        let id = world
            .add_agent(Point::new(0, 0), Target::Fixed(Point::new(3, 3)))
            .unwrap();
        let mut runner = Runner::new(world);
        runner.world_mut().pause();
        runner.advance(Duration::from_millis(5000));
        assert_eq!(runner.world().agent(id).unwrap().pos(), Point::new(0, 0));
    }
}
