//! Pacer Runtime - Lifecycle and timing scheduler
//!
//! Provides the building blocks of a paced simulation loop:
//! - `System` / `UiSystem` — capability traits for update units
//! - `Scheduler` — drives initialize, update and finalize of registered units
//!   at independent tick (TPS) and frame (FPS) rates
//! - `gate` — deadline scheduling for a single rate
//! - `Schedule` — pacing and removal requests, reachable by units as a resource
//! - `App` — owns the world and the scheduler

mod app;
mod clock;
mod config;
pub mod gate;
mod registry;
mod resources;
mod schedule;
mod scheduler;
mod system;

pub use app::App;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::SchedulerConfig;
pub use registry::Registry;
pub use resources::{Rand, SelectedEntity, Termination, Tick};
pub use schedule::Schedule;
pub use scheduler::{Lifecycle, Scheduler};
pub use system::{AnySystem, DualSystem, System, UiSystem};

pub use pacer_core::{PacerError, Result, SystemId, SystemList};
pub use pacer_ecs::World;
