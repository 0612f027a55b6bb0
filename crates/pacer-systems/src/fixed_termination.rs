//! Terminate a run after a fixed number of ticks

use pacer_runtime::{Result, System, Termination, World};

/// Sets [`Termination`] once `steps` updates have run
#[derive(Debug, Clone)]
pub struct FixedTermination {
    /// Number of simulation ticks to run
    pub steps: u64,
    step: u64,
}

impl FixedTermination {
    pub fn new(steps: u64) -> Self {
        Self { steps, step: 0 }
    }
}

impl System for FixedTermination {
    fn initialize(&mut self, world: &mut World) -> Result<()> {
        world.resource_or_default::<Termination>();
        self.step = 0;
        Ok(())
    }

    fn update(&mut self, world: &mut World) -> Result<()> {
        if self.step + 1 >= self.steps {
            world.resource_mut::<Termination>()?.terminate = true;
        }
        self.step += 1;
        Ok(())
    }

    fn finalize(&mut self, _world: &mut World) -> Result<()> {
        Ok(())
    }
}
