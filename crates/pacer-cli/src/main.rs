//! Pacer CLI - run paced simulations from the command line

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::run;

#[derive(Parser)]
#[command(name = "pacer")]
#[command(about = "Run simulations under the Pacer tick/frame scheduler", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the random-walk demo simulation
    Run {
        /// Number of ticks to run
        #[arg(long, default_value_t = 1000)]
        steps: u64,

        /// Number of walker entities
        #[arg(long, default_value_t = 100)]
        walkers: usize,

        /// Ticks per second (<= 0 for as fast as possible)
        #[arg(long, allow_hyphen_values = true)]
        tps: Option<f64>,

        /// Frames per second (0 for 30, negative to follow ticks)
        #[arg(long, allow_hyphen_values = true)]
        fps: Option<f64>,

        /// Random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Path to a TOML scheduler config; flags override its values
        #[arg(long)]
        config: Option<String>,

        /// Log a performance report every N ticks
        #[arg(long, default_value_t = 250)]
        report_interval: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pacer=info".parse()?)
                .add_directive("pacer_systems=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            steps,
            walkers,
            tps,
            fps,
            seed,
            config,
            report_interval,
        } => run::run(run::RunArgs {
            steps,
            walkers,
            tps,
            fps,
            seed,
            config,
            report_interval,
        }),
    }
}
