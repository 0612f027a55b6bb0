//! Timing gate: deadline scheduling for rate-limited loops
//!
//! A gate decides whether an activity running at a target rate is due.
//! Deadlines advance by a fixed period from the previous deadline, not from
//! the time the activity actually ran, so lateness in one cycle does not
//! accumulate into drift over a run.

use std::time::{Duration, Instant};

/// Frame rate used when the configured FPS is exactly zero at initialization
pub const DEFAULT_FPS: f64 = 30.0;

/// Highest tick rate evaluated while paused
pub const PAUSED_TPS_CAP: f64 = 10.0;

/// Highest frame rate used while paused
pub const PAUSED_FPS_CAP: f64 = 30.0;

/// A deadline further behind "now" than this is re-anchored instead of
/// caught up with a burst of back-to-back cycles
pub const MAX_DEADLINE_LAG: Duration = Duration::from_secs(1);

/// Longest period a gate schedules. Slower rates wait this long between fires.
pub const MAX_PERIOD: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Outcome of one gate evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateDecision {
    pub fire: bool,
    /// Deadline after this evaluation. `None` is the zero time: always due.
    pub deadline: Option<Instant>,
}

/// Length of one period at `rate` updates per second, at most [`MAX_PERIOD`]
pub fn period(rate: f64) -> Duration {
    Duration::try_from_secs_f64(1.0 / rate).map_or(MAX_PERIOD, |p| p.min(MAX_PERIOD))
}

/// Whether `rate` asks for pacing at all. NaN does not.
pub fn is_paced(rate: f64) -> bool {
    rate > 0.0
}

/// Decide whether an activity at `rate` fires at `now`
///
/// Rates `<= 0` (and NaN) mean "as fast as possible": always fire, deadline
/// untouched.
pub fn evaluate(now: Instant, rate: f64, deadline: Option<Instant>) -> GateDecision {
    if !is_paced(rate) {
        return GateDecision {
            fire: true,
            deadline,
        };
    }

    let fire = deadline.is_none_or(|d| now >= d);
    if !fire {
        return GateDecision {
            fire: false,
            deadline,
        };
    }

    GateDecision {
        fire: true,
        deadline: Some(next_deadline(deadline, rate, now)),
    }
}

/// The deadline following `deadline` at `rate`
pub fn next_deadline(deadline: Option<Instant>, rate: f64, now: Instant) -> Instant {
    let step = period(rate);
    match deadline {
        Some(d) if now.saturating_duration_since(d) <= MAX_DEADLINE_LAG => d + step,
        _ => now + step,
    }
}

/// Clamp `actual` to `cap`; uncapped rates become the cap
pub fn limited_rate(actual: f64, cap: f64) -> f64 {
    if is_paced(actual) && actual <= cap {
        actual
    } else {
        cap
    }
}

/// Time to wait until the nearest of the two deadlines
///
/// The frame deadline is only considered when `include_draw` is set, i.e.
/// when frames are paced on their own rather than following ticks.
pub fn sleep_duration(
    now: Instant,
    next_update: Option<Instant>,
    next_draw: Option<Instant>,
    include_draw: bool,
) -> Duration {
    let nearest = if include_draw {
        next_update.min(next_draw)
    } else {
        next_update
    };
    nearest
        .map(|d| d.saturating_duration_since(now))
        .unwrap_or(Duration::ZERO)
}

/// A single rate-limited activity and its deadline
#[derive(Debug, Default, Clone, Copy)]
pub struct Gate {
    deadline: Option<Instant>,
}

impl Gate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate the gate at `now`, storing the advanced deadline
    pub fn poll(&mut self, now: Instant, rate: f64) -> bool {
        let decision = evaluate(now, rate, self.deadline);
        self.deadline = decision.deadline;
        decision.fire
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Back to the zero time, so the next poll fires
    pub fn reset(&mut self) {
        self.deadline = None;
    }
}
