//! Update unit traits

use pacer_core::Result;
use pacer_ecs::World;

/// A simulation unit, updated at the tick rate (TPS)
///
/// Systems are updated in registration order. The world is borrowed for the
/// duration of each call; the scheduler and its pacing are reachable through
/// the [`Schedule`](crate::Schedule) resource.
pub trait System {
    /// Called once when the scheduler is initialized
    fn initialize(&mut self, world: &mut World) -> Result<()>;

    /// Called once per executed tick
    fn update(&mut self, world: &mut World) -> Result<()>;

    /// Called when the run ends or when the system is removed
    fn finalize(&mut self, world: &mut World) -> Result<()>;
}

/// A presentation unit, updated at the frame rate (FPS)
///
/// Frame updates run in two passes: every `update_ui` in registration order,
/// then every `post_update_ui` (e.g. presenting a window).
pub trait UiSystem {
    fn initialize_ui(&mut self, world: &mut World) -> Result<()>;

    fn update_ui(&mut self, world: &mut World) -> Result<()>;

    /// Second pass of a frame, after all units ran `update_ui`
    fn post_update_ui(&mut self, world: &mut World) -> Result<()>;

    fn finalize_ui(&mut self, world: &mut World) -> Result<()>;
}

/// A unit that is both a [`System`] and a [`UiSystem`]
pub trait DualSystem: System + UiSystem {}

impl<T: System + UiSystem> DualSystem for T {}

/// A boxed unit tagged with the capabilities it was registered with
pub enum AnySystem {
    Simulation(Box<dyn System>),
    Presentation(Box<dyn UiSystem>),
    Dual(Box<dyn DualSystem>),
}

impl AnySystem {
    pub fn simulation(system: impl System + 'static) -> Self {
        AnySystem::Simulation(Box::new(system))
    }

    pub fn presentation(system: impl UiSystem + 'static) -> Self {
        AnySystem::Presentation(Box::new(system))
    }

    pub fn dual(system: impl DualSystem + 'static) -> Self {
        AnySystem::Dual(Box::new(system))
    }

    /// Whether the unit takes part in the tick loop
    pub fn is_simulation(&self) -> bool {
        matches!(self, AnySystem::Simulation(_) | AnySystem::Dual(_))
    }

    /// Whether the unit takes part in the frame loop
    pub fn is_presentation(&self) -> bool {
        matches!(self, AnySystem::Presentation(_) | AnySystem::Dual(_))
    }

    pub(crate) fn initialize(&mut self, world: &mut World) -> Result<()> {
        match self {
            AnySystem::Simulation(s) => s.initialize(world),
            AnySystem::Dual(s) => System::initialize(s.as_mut(), world),
            AnySystem::Presentation(_) => Ok(()),
        }
    }

    pub(crate) fn update(&mut self, world: &mut World) -> Result<()> {
        match self {
            AnySystem::Simulation(s) => s.update(world),
            AnySystem::Dual(s) => System::update(s.as_mut(), world),
            AnySystem::Presentation(_) => Ok(()),
        }
    }

    pub(crate) fn finalize(&mut self, world: &mut World) -> Result<()> {
        match self {
            AnySystem::Simulation(s) => s.finalize(world),
            AnySystem::Dual(s) => System::finalize(s.as_mut(), world),
            AnySystem::Presentation(_) => Ok(()),
        }
    }

    pub(crate) fn initialize_ui(&mut self, world: &mut World) -> Result<()> {
        match self {
            AnySystem::Presentation(s) => s.initialize_ui(world),
            AnySystem::Dual(s) => UiSystem::initialize_ui(s.as_mut(), world),
            AnySystem::Simulation(_) => Ok(()),
        }
    }

    pub(crate) fn update_ui(&mut self, world: &mut World) -> Result<()> {
        match self {
            AnySystem::Presentation(s) => s.update_ui(world),
            AnySystem::Dual(s) => UiSystem::update_ui(s.as_mut(), world),
            AnySystem::Simulation(_) => Ok(()),
        }
    }

    pub(crate) fn post_update_ui(&mut self, world: &mut World) -> Result<()> {
        match self {
            AnySystem::Presentation(s) => s.post_update_ui(world),
            AnySystem::Dual(s) => UiSystem::post_update_ui(s.as_mut(), world),
            AnySystem::Simulation(_) => Ok(()),
        }
    }

    pub(crate) fn finalize_ui(&mut self, world: &mut World) -> Result<()> {
        match self {
            AnySystem::Presentation(s) => s.finalize_ui(world),
            AnySystem::Dual(s) => UiSystem::finalize_ui(s.as_mut(), world),
            AnySystem::Simulation(_) => Ok(()),
        }
    }
}

impl std::fmt::Debug for AnySystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            AnySystem::Simulation(_) => "Simulation",
            AnySystem::Presentation(_) => "Presentation",
            AnySystem::Dual(_) => "Dual",
        };
        f.debug_tuple("AnySystem").field(&kind).finish()
    }
}
