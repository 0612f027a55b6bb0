//! Pacer Systems - Reusable update units
//!
//! - `FixedTermination` — stop after a fixed number of ticks
//! - `CallbackTermination` — stop when a callback returns true
//! - `PerfTimer` — log time per tick

mod callback_termination;
mod fixed_termination;
mod perf_timer;

pub use callback_termination::CallbackTermination;
pub use fixed_termination::FixedTermination;
pub use perf_timer::PerfTimer;
