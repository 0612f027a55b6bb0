//! Log elapsed wall time per tick

use pacer_runtime::{Result, System, World};
use std::time::{Duration, Instant};
use tracing::info;

/// Logs the mean time per update every `update_interval` ticks, and a total on finalize
#[derive(Debug, Clone)]
pub struct PerfTimer {
    /// Report interval in ticks
    pub update_interval: u64,
    start: Option<Instant>,
    start_sim: Option<Instant>,
    step: u64,
}

impl PerfTimer {
    pub fn new(update_interval: u64) -> Self {
        Self {
            update_interval: update_interval.max(1),
            start: None,
            start_sim: None,
            step: 0,
        }
    }

    /// Updates seen since initialization
    pub fn steps(&self) -> u64 {
        self.step
    }

    /// Mean time per update since the first update
    pub fn mean(&self) -> Option<Duration> {
        let start = self.start_sim?;
        if self.step == 0 {
            return None;
        }
        Some(start.elapsed().div_f64(self.step as f64))
    }
}

impl System for PerfTimer {
    fn initialize(&mut self, _world: &mut World) -> Result<()> {
        self.step = 0;
        self.start = None;
        self.start_sim = None;
        Ok(())
    }

    fn update(&mut self, _world: &mut World) -> Result<()> {
        let now = Instant::now();
        if self.step == 0 {
            self.start = Some(now);
            self.start_sim = Some(now);
        }
        if self.step % self.update_interval == 0 {
            if let Some(start) = self.start.filter(|_| self.step > 0) {
                let usec = now.duration_since(start).as_secs_f64() * 1e6
                    / self.update_interval as f64;
                info!(updates = self.update_interval, "{usec:.2} us/update");
            }
            self.start = Some(now);
        }
        self.step += 1;
        Ok(())
    }

    fn finalize(&mut self, _world: &mut World) -> Result<()> {
        if let Some(mean) = self.mean() {
            info!(
                updates = self.step,
                "total: {:.2} us/update",
                mean.as_secs_f64() * 1e6
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FixedTermination;
    use pacer_runtime::App;

    #[test]
    fn test_perf_timer_counts_updates() {
        let mut timer = PerfTimer::new(10);
        let mut world = World::new();
        timer.initialize(&mut world).unwrap();
        assert!(timer.mean().is_none());
        for _ in 0..30 {
            timer.update(&mut world).unwrap();
        }
        assert_eq!(timer.steps(), 30);
        assert!(timer.mean().is_some());
        timer.finalize(&mut world).unwrap();
    }

    #[test]
    fn test_perf_timer_in_app() {
        let mut app = App::new();
        app.add_system(PerfTimer::new(10)).unwrap();
        app.add_system(FixedTermination::new(30)).unwrap();
        app.run().unwrap();
        assert_eq!(app.tick(), 30);
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        assert_eq!(PerfTimer::new(0).update_interval, 1);
    }
}
