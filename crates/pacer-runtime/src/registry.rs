//! Ordered unit lists with deferred removal

use crate::schedule::Schedule;
use crate::system::AnySystem;
use pacer_core::{PacerError, Result, SystemId, SystemList};
use pacer_ecs::World;
use std::collections::HashMap;
use tracing::debug;

/// Owns every registered unit and the two ordered lists referencing them
///
/// A dual unit is stored once and listed in both sequences. While locked,
/// the lists must not change shape; removal requests wait in the
/// [`Schedule`] queues until [`Registry::drain`] runs unlocked.
#[derive(Default)]
pub struct Registry {
    units: HashMap<SystemId, AnySystem>,
    systems: Vec<SystemId>,
    ui_systems: Vec<SystemId>,
    locked: bool,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a simulation-only unit
    pub fn add_system(&mut self, unit: AnySystem) -> Result<SystemId> {
        let id = SystemId::next();
        if unit.is_presentation() {
            return Err(PacerError::CapabilityMismatch {
                id,
                expected: SystemList::Presentation,
            });
        }
        self.systems.push(id);
        self.units.insert(id, unit);
        Ok(id)
    }

    /// Append a presentation unit, and to the simulation list as well if it is dual
    pub fn add_ui_system(&mut self, unit: AnySystem) -> Result<SystemId> {
        let id = SystemId::next();
        if !unit.is_presentation() {
            return Err(PacerError::CapabilityMismatch {
                id,
                expected: SystemList::Simulation,
            });
        }
        self.ui_systems.push(id);
        if unit.is_simulation() {
            self.systems.push(id);
        }
        self.units.insert(id, unit);
        Ok(id)
    }

    /// Simulation units in update order
    pub fn system_ids(&self) -> &[SystemId] {
        &self.systems
    }

    /// Presentation units in update order
    pub fn ui_system_ids(&self) -> &[SystemId] {
        &self.ui_systems
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub(crate) fn lock(&mut self) {
        self.locked = true;
    }

    pub(crate) fn unlock(&mut self) {
        self.locked = false;
    }

    /// Run `f` on every simulation unit in registration order
    pub(crate) fn for_each_system(
        &mut self,
        world: &mut World,
        f: impl FnMut(&mut AnySystem, &mut World) -> Result<()>,
    ) -> Result<()> {
        walk(&mut self.units, &self.systems, world, f)
    }

    /// Run `f` on every presentation unit in registration order
    pub(crate) fn for_each_ui_system(
        &mut self,
        world: &mut World,
        f: impl FnMut(&mut AnySystem, &mut World) -> Result<()>,
    ) -> Result<()> {
        walk(&mut self.units, &self.ui_systems, world, f)
    }

    /// Apply all removal requests queued in the world's [`Schedule`]
    ///
    /// Finalizers run during the drain may queue further removals; those are
    /// applied in the same drain.
    pub fn drain(&mut self, world: &mut World) -> Result<()> {
        if self.locked {
            return Err(PacerError::LockViolation(
                "removal drained while the unit lists are being iterated".into(),
            ));
        }

        loop {
            let (removals, ui_removals) = world.resource_or_default::<Schedule>().take_removals();
            if removals.is_empty() && ui_removals.is_empty() {
                return Ok(());
            }
            for id in removals {
                if self.units.get(&id).is_some_and(AnySystem::is_presentation) {
                    return Err(PacerError::CapabilityMismatch {
                        id,
                        expected: SystemList::Presentation,
                    });
                }
                self.remove_system(id, world)?;
                self.units.remove(&id);
            }
            for id in ui_removals {
                if !self.ui_systems.contains(&id) {
                    return Err(PacerError::NotFound {
                        id,
                        list: SystemList::Presentation,
                    });
                }
                if self.units.get(&id).is_some_and(AnySystem::is_simulation) {
                    self.remove_system(id, world)?;
                }
                self.remove_ui_system(id, world)?;
                self.units.remove(&id);
            }
        }
    }

    fn remove_system(&mut self, id: SystemId, world: &mut World) -> Result<()> {
        let idx = self
            .systems
            .iter()
            .position(|s| *s == id)
            .ok_or(PacerError::NotFound {
                id,
                list: SystemList::Simulation,
            })?;
        debug!(%id, "removing system");
        self.systems.remove(idx);
        if let Some(unit) = self.units.get_mut(&id) {
            world.resource_or_default::<Schedule>().set_current(Some(id));
            let result = unit.finalize(world);
            world.resource_or_default::<Schedule>().set_current(None);
            result?;
        }
        Ok(())
    }

    fn remove_ui_system(&mut self, id: SystemId, world: &mut World) -> Result<()> {
        let idx = self
            .ui_systems
            .iter()
            .position(|s| *s == id)
            .ok_or(PacerError::NotFound {
                id,
                list: SystemList::Presentation,
            })?;
        debug!(%id, "removing UI system");
        self.ui_systems.remove(idx);
        if let Some(unit) = self.units.get_mut(&id) {
            world.resource_or_default::<Schedule>().set_current(Some(id));
            let result = unit.finalize_ui(world);
            world.resource_or_default::<Schedule>().set_current(None);
            result?;
        }
        Ok(())
    }

    /// Drop every unit, keeping the list allocations
    pub fn clear(&mut self) {
        self.units.clear();
        self.systems.clear();
        self.ui_systems.clear();
        self.locked = false;
    }
}

/// Call `f` on each listed unit, publishing its id as the current system
fn walk(
    units: &mut HashMap<SystemId, AnySystem>,
    list: &[SystemId],
    world: &mut World,
    mut f: impl FnMut(&mut AnySystem, &mut World) -> Result<()>,
) -> Result<()> {
    let mut result = Ok(());
    for id in list {
        let Some(unit) = units.get_mut(id) else {
            continue;
        };
        world.resource_or_default::<Schedule>().set_current(Some(*id));
        result = f(unit, world);
        if result.is_err() {
            break;
        }
    }
    world.resource_or_default::<Schedule>().set_current(None);
    result
}
