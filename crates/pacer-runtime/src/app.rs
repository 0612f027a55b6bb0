//! App - world plus scheduler, the host-facing entry point

use crate::clock::{Clock, SystemClock};
use crate::config::SchedulerConfig;
use crate::resources::{time_seed, Rand, Termination, Tick};
use crate::schedule::Schedule;
use crate::scheduler::Scheduler;
use crate::system::{AnySystem, DualSystem, System, UiSystem};
use pacer_core::{PacerError, Result, SystemId};
use pacer_ecs::World;
use tracing::debug;

/// Top-level entry point: owns the world and schedules its units
///
/// Simulation units are updated at `tps`, presentation units at `fps`,
/// both held by the [`Schedule`] resource. Every app provides the
/// [`Tick`], [`Termination`], [`Rand`] and [`Schedule`] resources.
///
/// ```no_run
/// use pacer_runtime::App;
///
/// let mut app = App::new();
/// app.seed(&[123]).unwrap();
/// app.schedule_mut().tps = 60.0;
/// // app.add_system(...)
/// app.run().unwrap();
/// ```
pub struct App {
    world: World,
    scheduler: Scheduler,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Create an app paced by a custom clock
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        let mut app = Self {
            world: World::new(),
            scheduler: Scheduler::with_clock(clock),
        };
        app.install_resources(Schedule::default());
        app
    }

    fn install_resources(&mut self, schedule: Schedule) {
        self.world.insert_resource(Rand::from_time());
        self.world.insert_resource(Tick::default());
        self.world.insert_resource(Termination::default());
        self.world.insert_resource(schedule);
    }

    /// Seed the app's [`Rand`] resource
    ///
    /// With no seed, seeds from the current time. More than one seed is an
    /// argument error.
    pub fn seed(&mut self, seeds: &[u64]) -> Result<&mut Self> {
        let seed = match seeds {
            [] => time_seed(),
            [seed] => *seed,
            _ => {
                return Err(PacerError::Argument(format!(
                    "can only use a single random seed, got {}",
                    seeds.len()
                )))
            }
        };
        self.world.insert_resource(Rand::from_seed(seed));
        Ok(self)
    }

    /// Apply pacing and seed from a config
    pub fn configure(&mut self, config: &SchedulerConfig) -> Result<&mut Self> {
        config.validate()?;
        let schedule = self.schedule_mut();
        schedule.tps = config.tps;
        schedule.fps = config.fps;
        schedule.paused = config.paused;
        if let Some(seed) = config.seed {
            self.seed(&[seed])?;
        }
        Ok(self)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Pacing configuration, also reachable by units as a resource
    pub fn schedule_mut(&mut self) -> &mut Schedule {
        self.world.resource_or_default::<Schedule>()
    }

    /// Ticks executed in the current session
    pub fn tick(&self) -> u64 {
        self.world.resource::<Tick>().map(|t| t.tick).unwrap_or(0)
    }

    pub fn add_system(&mut self, system: impl System + 'static) -> Result<SystemId> {
        self.scheduler.add_system(AnySystem::simulation(system))
    }

    pub fn add_ui_system(&mut self, system: impl UiSystem + 'static) -> Result<SystemId> {
        self.scheduler.add_ui_system(AnySystem::presentation(system))
    }

    /// Add a unit that is both a [`System`] and a [`UiSystem`]; it joins both lists
    pub fn add_dual_system(&mut self, system: impl DualSystem + 'static) -> Result<SystemId> {
        self.scheduler.add_ui_system(AnySystem::dual(system))
    }

    /// Register through the simulation path; dual units are rejected here
    pub fn add_any_system(&mut self, system: AnySystem) -> Result<SystemId> {
        self.scheduler.add_system(system)
    }

    /// Register through the presentation path
    pub fn add_any_ui_system(&mut self, system: AnySystem) -> Result<SystemId> {
        self.scheduler.add_ui_system(system)
    }

    pub fn remove_system(&mut self, id: SystemId) -> Result<()> {
        self.scheduler.remove_system(&mut self.world, id)
    }

    pub fn remove_ui_system(&mut self, id: SystemId) -> Result<()> {
        self.scheduler.remove_ui_system(&mut self.world, id)
    }

    /// Run until the [`Termination`] resource is set, initializing first if
    /// needed and finalizing afterwards
    pub fn run(&mut self) -> Result<()> {
        self.scheduler.run(&mut self.world)
    }

    pub fn initialize(&mut self) -> Result<()> {
        self.scheduler.initialize(&mut self.world)
    }

    /// Update simulation units once, ignoring `tps`. Returns whether the run should continue.
    pub fn update(&mut self) -> Result<bool> {
        self.scheduler.step_systems(&mut self.world)
    }

    /// Update presentation units once, ignoring `fps`
    pub fn update_ui(&mut self) -> Result<()> {
        self.scheduler.step_ui_systems(&mut self.world)
    }

    pub fn finalize(&mut self) -> Result<()> {
        self.scheduler.finalize(&mut self.world)
    }

    /// Remove all entities, resources and units for a fresh session
    ///
    /// Pacing settings survive; the PRNG is re-seeded from the clock.
    /// The world's storage is reused rather than reallocated.
    pub fn reset(&mut self) {
        let pacing = self.world.resource::<Schedule>().ok().map(|s| Schedule {
            tps: s.tps,
            fps: s.fps,
            paused: s.paused,
            ..Schedule::default()
        });
        self.scheduler.reset(&mut self.world);
        self.world.reset();
        self.install_resources(pacing.unwrap_or_default());
        debug!("app reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    struct StopAfter {
        steps: u64,
        done: u64,
    }

    impl System for StopAfter {
        fn initialize(&mut self, _: &mut World) -> Result<()> {
            self.done = 0;
            Ok(())
        }

        fn update(&mut self, world: &mut World) -> Result<()> {
            self.done += 1;
            if self.done >= self.steps {
                world.resource_mut::<Termination>()?.terminate = true;
            }
            Ok(())
        }

        fn finalize(&mut self, _: &mut World) -> Result<()> {
            Ok(())
        }
    }

    /// Draws one number per tick and records it
    struct Sampler(std::rc::Rc<std::cell::RefCell<Vec<u64>>>);

    impl System for Sampler {
        fn initialize(&mut self, _: &mut World) -> Result<()> {
            Ok(())
        }

        fn update(&mut self, world: &mut World) -> Result<()> {
            let value = world.resource_mut::<Rand>()?.random::<u64>();
            self.0.borrow_mut().push(value);
            Ok(())
        }

        fn finalize(&mut self, _: &mut World) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_new_app_has_resources() {
        let app = App::new();
        assert!(app.world().has_resource::<Rand>());
        assert!(app.world().has_resource::<Tick>());
        assert!(app.world().has_resource::<Termination>());
        assert!(app.world().has_resource::<Schedule>());
        assert_eq!(app.tick(), 0);
    }

    #[test]
    fn test_seed() {
        let mut app = App::new();
        app.seed(&[123]).unwrap();
        let a: u64 = app.world_mut().resource_mut::<Rand>().unwrap().random();
        app.seed(&[123]).unwrap();
        let b: u64 = app.world_mut().resource_mut::<Rand>().unwrap().random();
        assert_eq!(a, b);

        app.seed(&[]).unwrap();
        let c: u64 = app.world_mut().resource_mut::<Rand>().unwrap().random();
        assert_ne!(a, c);

        assert!(matches!(
            app.seed(&[1, 2, 3]),
            Err(PacerError::Argument(_))
        ));
    }

    #[test]
    fn test_run_to_termination() {
        let mut app = App::new();
        app.add_system(StopAfter { steps: 10, done: 0 }).unwrap();
        app.run().unwrap();
        assert_eq!(app.tick(), 10);
    }

    #[test]
    fn test_manual_driving() {
        let mut app = App::new();
        app.add_system(StopAfter { steps: 10, done: 0 }).unwrap();
        assert!(matches!(app.update(), Err(PacerError::Sequencing(_))));
        assert!(matches!(app.update_ui(), Err(PacerError::Sequencing(_))));

        app.initialize().unwrap();
        app.schedule_mut().paused = true;
        assert!(app.update().unwrap());
        app.schedule_mut().paused = false;

        while app.update().unwrap() {
            app.update_ui().unwrap();
        }
        app.finalize().unwrap();
        assert_eq!(app.tick(), 10);
    }

    #[test]
    fn test_reset_reruns_identically() {
        let mut app = App::new();
        let mut trajectories = Vec::new();
        for _ in 0..3 {
            app.reset();
            app.seed(&[123]).unwrap();
            let samples = std::rc::Rc::default();
            app.add_system(Sampler(std::rc::Rc::clone(&samples))).unwrap();
            app.add_system(StopAfter { steps: 10, done: 0 }).unwrap();
            app.run().unwrap();
            assert_eq!(app.tick(), 10);
            trajectories.push(samples.borrow().clone());
        }
        assert_eq!(trajectories[0], trajectories[1]);
        assert_eq!(trajectories[1], trajectories[2]);

        let mut fresh = App::new();
        fresh.seed(&[123]).unwrap();
        let samples = std::rc::Rc::default();
        fresh
            .add_system(Sampler(std::rc::Rc::clone(&samples)))
            .unwrap();
        fresh.add_system(StopAfter { steps: 10, done: 0 }).unwrap();
        fresh.run().unwrap();
        assert_eq!(*samples.borrow(), trajectories[0]);
    }

    #[test]
    fn test_reset_keeps_pacing_and_clears_entities() {
        let mut app = App::new();
        app.schedule_mut().tps = 42.0;
        app.world_mut().spawn((1u32,));
        app.reset();
        assert_eq!(app.schedule_mut().tps, 42.0);
        assert_eq!(app.world().entity_count(), 0);
        assert!(app.scheduler().registry().is_empty());
    }

    #[test]
    fn test_configure() {
        let mut app = App::new();
        let config = SchedulerConfig {
            tps: 5.0,
            fps: -1.0,
            paused: true,
            seed: Some(1),
        };
        app.configure(&config).unwrap();
        let schedule = app.schedule_mut();
        assert_eq!(schedule.tps, 5.0);
        assert_eq!(schedule.fps, -1.0);
        assert!(schedule.paused);
    }

    #[test]
    fn test_configure_rejects_nan_rate() {
        let mut app = App::new();
        let config = SchedulerConfig {
            tps: f64::NAN,
            ..SchedulerConfig::default()
        };
        assert!(matches!(
            app.configure(&config),
            Err(PacerError::Config(_))
        ));
        assert_eq!(app.schedule_mut().tps, 0.0);
    }

    #[test]
    fn test_dual_through_simulation_path() {
        struct Both;
        impl System for Both {
            fn initialize(&mut self, _: &mut World) -> Result<()> {
                Ok(())
            }
            fn update(&mut self, _: &mut World) -> Result<()> {
                Ok(())
            }
            fn finalize(&mut self, _: &mut World) -> Result<()> {
                Ok(())
            }
        }
        impl UiSystem for Both {
            fn initialize_ui(&mut self, _: &mut World) -> Result<()> {
                Ok(())
            }
            fn update_ui(&mut self, _: &mut World) -> Result<()> {
                Ok(())
            }
            fn post_update_ui(&mut self, _: &mut World) -> Result<()> {
                Ok(())
            }
            fn finalize_ui(&mut self, _: &mut World) -> Result<()> {
                Ok(())
            }
        }

        let mut app = App::new();
        assert!(matches!(
            app.add_any_system(AnySystem::dual(Both)),
            Err(PacerError::CapabilityMismatch { .. })
        ));
        let id = app.add_dual_system(Both).unwrap();
        assert_eq!(app.scheduler().registry().system_ids(), &[id]);
        assert_eq!(app.scheduler().registry().ui_system_ids(), &[id]);
    }
}
