//! Terminate a run when a callback says so

use pacer_runtime::{Result, System, Termination, World};

/// Sets [`Termination`] when `callback(step)` returns true
///
/// `step` counts this unit's updates from zero.
pub struct CallbackTermination {
    callback: Box<dyn FnMut(u64) -> bool>,
    step: u64,
}

impl CallbackTermination {
    pub fn new(callback: impl FnMut(u64) -> bool + 'static) -> Self {
        Self {
            callback: Box::new(callback),
            step: 0,
        }
    }
}

impl System for CallbackTermination {
    fn initialize(&mut self, world: &mut World) -> Result<()> {
        world.resource_or_default::<Termination>();
        self.step = 0;
        Ok(())
    }

    fn update(&mut self, world: &mut World) -> Result<()> {
        if (self.callback)(self.step) {
            world.resource_mut::<Termination>()?.terminate = true;
        }
        self.step += 1;
        Ok(())
    }

    fn finalize(&mut self, _world: &mut World) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pacer_runtime::App;

    #[test]
    fn test_callback_termination() {
        let mut app = App::new();
        app.schedule_mut().fps = 0.0;
        app.add_system(CallbackTermination::new(|t| t >= 99)).unwrap();
        app.run().unwrap();
        assert_eq!(app.tick(), 100);
        assert_eq!(app.schedule_mut().fps, 30.0);
    }

    #[test]
    fn test_callback_sees_consecutive_steps() {
        let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let log = seen.clone();
        let mut app = App::new();
        app.add_system(CallbackTermination::new(move |t| {
            log.borrow_mut().push(t);
            t >= 4
        }))
        .unwrap();
        app.run().unwrap();
        assert_eq!(*seen.borrow(), vec![0, 1, 2, 3, 4]);
    }
}
