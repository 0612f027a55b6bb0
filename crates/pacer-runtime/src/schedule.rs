//! Scheduler handle stored in the world

use crate::gate::DEFAULT_FPS;
use pacer_core::SystemId;

/// Pacing configuration and removal requests, reachable by every unit
///
/// The scheduler reads the pacing fields at each cycle, so changes made by
/// the host or by a unit take effect on the next gate evaluation. Removal
/// requests are buffered here and applied by the scheduler at its next
/// flush point, never while the unit lists are being walked.
#[derive(Debug, Clone)]
pub struct Schedule {
    /// Ticks per second for simulation units. Values <= 0 mean as fast as possible.
    pub tps: f64,
    /// Frames per second for presentation units.
    /// Zero at initialization becomes 30; negative values follow ticks.
    pub fps: f64,
    /// While paused, only presentation units are updated.
    pub paused: bool,
    pub(crate) current: Option<SystemId>,
    pub(crate) pending: Vec<SystemId>,
    pub(crate) pending_ui: Vec<SystemId>,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            tps: 0.0,
            fps: DEFAULT_FPS,
            paused: false,
            current: None,
            pending: Vec::new(),
            pending_ui: Vec::new(),
        }
    }
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// The unit whose callback is currently executing, if any
    pub fn current_system(&self) -> Option<SystemId> {
        self.current
    }

    /// Request removal of a simulation unit.
    ///
    /// Takes effect after the current cycle's callbacks finish.
    pub fn remove_system(&mut self, id: SystemId) {
        self.pending.push(id);
    }

    /// Request removal of a presentation unit. Dual units leave both lists.
    ///
    /// Takes effect after the current cycle's callbacks finish.
    pub fn remove_ui_system(&mut self, id: SystemId) {
        self.pending_ui.push(id);
    }

    pub fn has_pending_removals(&self) -> bool {
        !self.pending.is_empty() || !self.pending_ui.is_empty()
    }

    pub(crate) fn set_current(&mut self, id: Option<SystemId>) {
        self.current = id;
    }

    /// Hand both queues to the scheduler, leaving them empty
    pub(crate) fn take_removals(&mut self) -> (Vec<SystemId>, Vec<SystemId>) {
        (
            std::mem::take(&mut self.pending),
            std::mem::take(&mut self.pending_ui),
        )
    }

    pub(crate) fn clear_removals(&mut self) {
        self.pending.clear();
        self.pending_ui.clear();
    }
}
