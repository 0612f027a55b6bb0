//! Lifecycle driver for simulation and presentation units

use crate::clock::{Clock, SystemClock};
use crate::gate::{self, Gate, DEFAULT_FPS, PAUSED_FPS_CAP, PAUSED_TPS_CAP};
use crate::registry::Registry;
use crate::resources::{Termination, Tick};
use crate::schedule::Schedule;
use crate::system::AnySystem;
use pacer_core::{PacerError, Result, SystemId};
use pacer_ecs::World;
use tracing::{debug, trace, warn};

/// Where the scheduler is in its session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Units may be registered; nothing has been initialized
    Unbuilt,
    Initialized,
    /// At least one cycle or step has been executed
    Running,
    Finalized,
}

/// Drives initialize, update and finalize of all registered units
///
/// Simulation units are updated at the tick rate, presentation units at the
/// frame rate, both read from the world's [`Schedule`] each cycle. Execution
/// is strictly sequential in registration order. Structural changes to the
/// unit lists requested during a cycle are applied once its callbacks have
/// finished.
pub struct Scheduler {
    registry: Registry,
    clock: Box<dyn Clock>,
    update_gate: Gate,
    draw_gate: Gate,
    state: Lifecycle,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    /// Create a scheduler paced by the system clock
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            registry: Registry::new(),
            clock: Box::new(clock),
            update_gate: Gate::new(),
            draw_gate: Gate::new(),
            state: Lifecycle::Unbuilt,
        }
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state != Lifecycle::Unbuilt
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Register a simulation-only unit. Only allowed before initialization.
    pub fn add_system(&mut self, unit: AnySystem) -> Result<SystemId> {
        self.ensure_unbuilt()?;
        self.registry.add_system(unit)
    }

    /// Register a presentation unit; dual units join both lists.
    /// Only allowed before initialization.
    pub fn add_ui_system(&mut self, unit: AnySystem) -> Result<SystemId> {
        self.ensure_unbuilt()?;
        self.registry.add_ui_system(unit)
    }

    /// Remove a simulation unit, calling its finalizer
    ///
    /// Applied immediately unless a cycle is in progress, in which case it
    /// waits for the cycle's callbacks to finish.
    pub fn remove_system(&mut self, world: &mut World, id: SystemId) -> Result<()> {
        world.resource_or_default::<Schedule>().remove_system(id);
        if !self.registry.is_locked() {
            self.registry.drain(world)?;
        }
        Ok(())
    }

    /// Remove a presentation unit; dual units leave both lists
    pub fn remove_ui_system(&mut self, world: &mut World, id: SystemId) -> Result<()> {
        world.resource_or_default::<Schedule>().remove_ui_system(id);
        if !self.registry.is_locked() {
            self.registry.drain(world)?;
        }
        Ok(())
    }

    /// Initialize all units: every simulation unit first, then every presentation unit
    pub fn initialize(&mut self, world: &mut World) -> Result<()> {
        if self.is_initialized() {
            return Err(PacerError::Sequencing("scheduler is already initialized".into()));
        }

        let schedule = world.resource_or_default::<Schedule>();
        if schedule.fps == 0.0 {
            warn!(fps = DEFAULT_FPS, "frame rate is zero, using default");
            schedule.fps = DEFAULT_FPS;
        }
        world.resource_or_default::<Tick>();
        world.resource_or_default::<Termination>();

        self.locked(world, |s, w| {
            s.registry.for_each_system(w, |u, w| u.initialize(w))?;
            s.registry.for_each_ui_system(w, |u, w| u.initialize_ui(w))
        })?;

        self.state = Lifecycle::Initialized;
        self.update_gate.reset();
        self.draw_gate.reset();
        world.resource_or_default::<Tick>().tick = 0;
        debug!(
            systems = self.registry.system_ids().len(),
            ui_systems = self.registry.ui_system_ids().len(),
            "scheduler initialized"
        );
        Ok(())
    }

    /// One paced cycle. Returns whether the run should continue.
    ///
    /// Simulation units run if the tick gate is due, presentation units if
    /// the frame gate is due (or, with a negative frame rate, whenever a
    /// tick ran). When no tick ran the call sleeps until the nearest deadline.
    pub fn update(&mut self, world: &mut World) -> Result<bool> {
        self.ensure_active()?;

        let updated = self.locked(world, |s, w| {
            let updated = s.update_systems_timed(w)?;
            s.update_ui_systems_timed(w, updated)?;
            Ok(updated)
        })?;
        trace!(updated, "cycle");

        if updated {
            world.resource_or_default::<Tick>().tick += 1;
        } else {
            self.wait(world);
        }
        Ok(!world.resource_or_default::<Termination>().terminate)
    }

    /// Update all simulation units once, ignoring the tick rate
    ///
    /// Does nothing while paused. Returns whether the run should continue.
    pub fn step_systems(&mut self, world: &mut World) -> Result<bool> {
        self.ensure_active()?;
        if world.resource_or_default::<Schedule>().paused {
            return Ok(true);
        }

        self.locked(world, |s, w| s.registry.for_each_system(w, |u, w| u.update(w)))?;

        world.resource_or_default::<Tick>().tick += 1;
        Ok(!world.resource_or_default::<Termination>().terminate)
    }

    /// Update all presentation units once, ignoring the frame rate
    pub fn step_ui_systems(&mut self, world: &mut World) -> Result<()> {
        self.ensure_active()?;
        self.locked(world, |s, w| s.update_ui_pass(w))
    }

    /// Finalize all units: every simulation unit first, then every presentation unit
    pub fn finalize(&mut self, world: &mut World) -> Result<()> {
        match self.state {
            Lifecycle::Unbuilt => {
                return Err(PacerError::Sequencing("scheduler is not initialized".into()))
            }
            Lifecycle::Finalized => {
                return Err(PacerError::Sequencing("scheduler is already finalized".into()))
            }
            _ => {}
        }

        self.locked(world, |s, w| {
            s.registry.for_each_system(w, |u, w| u.finalize(w))?;
            s.registry.for_each_ui_system(w, |u, w| u.finalize_ui(w))
        })?;

        self.state = Lifecycle::Finalized;
        debug!(tick = world.resource_or_default::<Tick>().tick, "scheduler finalized");
        Ok(())
    }

    /// Initialize if needed, cycle until termination, then finalize
    pub fn run(&mut self, world: &mut World) -> Result<()> {
        if !self.is_initialized() {
            self.initialize(world)?;
        }
        while self.update(world)? {}
        self.finalize(world)
    }

    /// Drop all units and timing state, back to [`Lifecycle::Unbuilt`]
    pub fn reset(&mut self, world: &mut World) {
        self.registry.clear();
        if let Ok(schedule) = world.resource_mut::<Schedule>() {
            schedule.clear_removals();
            schedule.set_current(None);
        }
        self.update_gate.reset();
        self.draw_gate.reset();
        self.state = Lifecycle::Unbuilt;
        debug!("scheduler reset");
    }

    fn update_systems_timed(&mut self, world: &mut World) -> Result<bool> {
        let Schedule { tps, paused, .. } = *world.resource_or_default::<Schedule>();
        let now = self.clock.now();

        if paused {
            // Keep the tick deadline moving at a throttled rate so the
            // loop sleeps instead of spinning.
            self.update_gate
                .poll(now, gate::limited_rate(tps, PAUSED_TPS_CAP));
            return Ok(false);
        }

        if !self.update_gate.poll(now, tps) {
            return Ok(false);
        }
        self.registry.for_each_system(world, |u, w| u.update(w))?;
        Ok(true)
    }

    fn update_ui_systems_timed(&mut self, world: &mut World, updated: bool) -> Result<()> {
        let Schedule { fps, paused, .. } = *world.resource_or_default::<Schedule>();

        if !paused && !gate::is_paced(fps) {
            if updated {
                self.update_ui_pass(world)?;
            }
            return Ok(());
        }

        let rate = if paused {
            gate::limited_rate(fps, PAUSED_FPS_CAP)
        } else {
            fps
        };
        if self.draw_gate.poll(self.clock.now(), rate) {
            self.update_ui_pass(world)?;
        }
        Ok(())
    }

    /// Both frame passes, never interleaved per unit
    fn update_ui_pass(&mut self, world: &mut World) -> Result<()> {
        self.registry.for_each_ui_system(world, |u, w| u.update_ui(w))?;
        self.registry
            .for_each_ui_system(world, |u, w| u.post_update_ui(w))
    }

    /// Sleep until the next tick or frame is due
    fn wait(&self, world: &mut World) {
        let Schedule { fps, paused, .. } = *world.resource_or_default::<Schedule>();
        let now = self.clock.now();
        let duration = gate::sleep_duration(
            now,
            self.update_gate.deadline(),
            self.draw_gate.deadline(),
            paused || gate::is_paced(fps),
        );
        if !duration.is_zero() {
            trace!(?duration, "idle");
            self.clock.sleep(duration);
        }
    }

    /// Run `f` with the unit lists locked, then apply queued removals
    fn locked<T>(
        &mut self,
        world: &mut World,
        f: impl FnOnce(&mut Self, &mut World) -> Result<T>,
    ) -> Result<T> {
        self.registry.lock();
        let result = f(self, world);
        self.registry.unlock();
        let value = result?;
        self.registry.drain(world)?;
        if self.state == Lifecycle::Initialized {
            self.state = Lifecycle::Running;
        }
        Ok(value)
    }

    fn ensure_unbuilt(&self) -> Result<()> {
        if self.is_initialized() {
            return Err(PacerError::Sequencing(
                "adding systems after initialization is not supported".into(),
            ));
        }
        Ok(())
    }

    fn ensure_active(&self) -> Result<()> {
        match self.state {
            Lifecycle::Unbuilt => Err(PacerError::Sequencing("scheduler is not initialized".into())),
            Lifecycle::Finalized => Err(PacerError::Sequencing("scheduler is already finalized".into())),
            _ => Ok(()),
        }
    }
}
