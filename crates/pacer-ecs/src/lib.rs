//! Pacer ECS - World and resource container
//!
//! This crate wraps hecs with a typed singleton resource container.
//! Entity storage and queries are hecs; the scheduler only relies on
//! typed get/put of resources.

mod resources;
mod world;

pub use resources::Resources;
pub use world::World;

pub use hecs;
