//! World - ECS entity storage plus typed resources

use crate::resources::Resources;
use pacer_core::Result;

/// The world handed to every update unit
///
/// Wraps hecs::World with:
/// - A typed singleton resource container (tick, termination, RNG, ...)
/// - Reset that keeps the allocation around for the next run
pub struct World {
    /// The underlying hecs world
    entities: hecs::World,
    resources: Resources,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        Self {
            entities: hecs::World::new(),
            resources: Resources::new(),
        }
    }

    /// Entity storage, for queries
    pub fn entities(&self) -> &hecs::World {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut hecs::World {
        &mut self.entities
    }

    /// Spawn an entity with the given components
    pub fn spawn(&mut self, components: impl hecs::DynamicBundle) -> hecs::Entity {
        self.entities.spawn(components)
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len() as usize
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut Resources {
        &mut self.resources
    }

    /// Insert a resource, replacing any previous value of the same type
    pub fn insert_resource<T: 'static>(&mut self, value: T) -> Option<T> {
        self.resources.insert(value)
    }

    pub fn resource<T: 'static>(&self) -> Result<&T> {
        self.resources.get::<T>()
    }

    pub fn resource_mut<T: 'static>(&mut self) -> Result<&mut T> {
        self.resources.get_mut::<T>()
    }

    /// Retrieve-or-create a singleton resource
    pub fn resource_or_default<T: Default + 'static>(&mut self) -> &mut T {
        self.resources.get_or_default::<T>()
    }

    pub fn has_resource<T: 'static>(&self) -> bool {
        self.resources.contains::<T>()
    }

    /// Remove all entities and resources
    pub fn reset(&mut self) {
        self.entities.clear();
        self.resources.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Position(f64);

    #[derive(Default)]
    struct Score(u32);

    #[test]
    fn test_spawn_and_query() {
        let mut world = World::new();
        world.spawn((Position(1.0),));
        world.spawn((Position(2.0),));
        assert_eq!(world.entity_count(), 2);

        let sum: f64 = world
            .entities_mut()
            .query_mut::<&Position>()
            .into_iter()
            .map(|(_, p)| p.0)
            .sum();
        assert!((sum - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_resources() {
        let mut world = World::new();
        assert!(!world.has_resource::<Score>());
        world.resource_or_default::<Score>().0 = 4;
        assert_eq!(world.resource::<Score>().unwrap().0, 4);
        world.resource_mut::<Score>().unwrap().0 += 1;
        assert_eq!(world.resource::<Score>().unwrap().0, 5);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut world = World::new();
        world.spawn((Position(0.0),));
        world.insert_resource(Score(1));
        world.reset();
        assert_eq!(world.entity_count(), 0);
        assert!(world.resources().is_empty());
    }
}
