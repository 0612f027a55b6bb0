//! Run command — random-walk demo under the scheduler

use anyhow::{Context, Result};
use pacer_runtime::{App, Rand, Result as PacerResult, SchedulerConfig, System, UiSystem, World};
use pacer_systems::{FixedTermination, PerfTimer};
use rand::Rng;
use tracing::{debug, info};

pub struct RunArgs {
    pub steps: u64,
    pub walkers: usize,
    pub tps: Option<f64>,
    pub fps: Option<f64>,
    pub seed: Option<u64>,
    pub config: Option<String>,
    pub report_interval: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Position {
    x: f64,
    y: f64,
}

/// Moves every walker one random unit step per tick
struct RandomWalk {
    walkers: usize,
}

impl System for RandomWalk {
    fn initialize(&mut self, world: &mut World) -> PacerResult<()> {
        for _ in 0..self.walkers {
            world.spawn((Position::default(),));
        }
        Ok(())
    }

    fn update(&mut self, world: &mut World) -> PacerResult<()> {
        let steps: Vec<(f64, f64)> = {
            let rng = world.resource_mut::<Rand>()?;
            (0..self.walkers)
                .map(|_| (rng.random_range(-1.0..=1.0), rng.random_range(-1.0..=1.0)))
                .collect()
        };
        for ((_, pos), (dx, dy)) in world
            .entities_mut()
            .query_mut::<&mut Position>()
            .into_iter()
            .zip(steps)
        {
            pos.x += dx;
            pos.y += dy;
        }
        Ok(())
    }

    fn finalize(&mut self, _world: &mut World) -> PacerResult<()> {
        Ok(())
    }
}

/// Logs the walkers' centroid once per frame
struct Centroid {
    frames: u64,
}

impl UiSystem for Centroid {
    fn initialize_ui(&mut self, _world: &mut World) -> PacerResult<()> {
        self.frames = 0;
        Ok(())
    }

    fn update_ui(&mut self, world: &mut World) -> PacerResult<()> {
        let (x, y) = centroid(world);
        debug!(frame = self.frames, x, y, "centroid");
        Ok(())
    }

    fn post_update_ui(&mut self, _world: &mut World) -> PacerResult<()> {
        self.frames += 1;
        Ok(())
    }

    fn finalize_ui(&mut self, _world: &mut World) -> PacerResult<()> {
        info!(frames = self.frames, "presentation finished");
        Ok(())
    }
}

fn centroid(world: &World) -> (f64, f64) {
    let mut query = world.entities().query::<&Position>();
    let (mut sx, mut sy, mut n) = (0.0, 0.0, 0usize);
    for (_, pos) in query.iter() {
        sx += pos.x;
        sy += pos.y;
        n += 1;
    }
    if n == 0 {
        return (0.0, 0.0);
    }
    (sx / n as f64, sy / n as f64)
}

pub fn run(args: RunArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => SchedulerConfig::load(path)
            .with_context(|| format!("Failed to load config {path}"))?,
        None => SchedulerConfig::default(),
    };
    if let Some(tps) = args.tps {
        config.tps = tps;
    }
    if let Some(fps) = args.fps {
        config.fps = fps;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let mut app = App::new();
    app.configure(&config).context("Failed to configure scheduler")?;
    app.add_system(RandomWalk {
        walkers: args.walkers,
    })?;
    app.add_system(PerfTimer::new(args.report_interval))?;
    app.add_system(FixedTermination::new(args.steps))?;
    app.add_ui_system(Centroid { frames: 0 })?;

    info!(
        tps = config.tps,
        fps = config.fps,
        steps = args.steps,
        walkers = args.walkers,
        "starting run"
    );
    app.run().context("Simulation failed")?;

    let (x, y) = centroid(app.world());
    println!("Ticks: {}", app.tick());
    println!("Walkers: {}", app.world().entity_count());
    println!("Centroid: ({x:.3}, {y:.3})");
    Ok(())
}
