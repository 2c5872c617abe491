//! Planning cycle time budget.
//!
//! Scoring calls cannot be cancelled, so a planner keeps within its budget by
//! limiting how many calls it issues. [`PlanningBudget`] measures a cycle and
//! reports when it overran.

use std::time::{Duration, Instant};

use tracing::warn;

use crate::config::RouteConfig;

/// Maximum duration of one planning cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlanningBudget {
    max_planning_time: Option<Duration>,
}

impl PlanningBudget {
    /// Budget of `seconds`; zero or less disables the check.
    pub fn from_secs_f64(seconds: f64) -> Self {
        let max_planning_time = (seconds.is_finite() && seconds > 0.0)
            .then(|| Duration::from_secs_f64(seconds));
        Self { max_planning_time }
    }

    pub fn from_config(config: &RouteConfig) -> Self {
        Self::from_secs_f64(config.max_planning_time)
    }

    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn max_planning_time(&self) -> Option<Duration> {
        self.max_planning_time
    }

    /// Start timing a planning cycle.
    pub fn start(&self) -> PlanningTimer {
        PlanningTimer {
            budget: *self,
            started: Instant::now(),
        }
    }

    /// Whether `elapsed` exceeds the budget.
    pub fn is_exceeded(&self, elapsed: Duration) -> bool {
        self.max_planning_time
            .is_some_and(|limit| elapsed > limit)
    }
}

/// A running planning cycle.
#[derive(Debug, Clone, Copy)]
pub struct PlanningTimer {
    budget: PlanningBudget,
    started: Instant,
}

impl PlanningTimer {
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Whether the cycle has used up its budget.
    pub fn is_exceeded(&self) -> bool {
        self.budget.is_exceeded(self.elapsed())
    }

    /// End the cycle, warning when it overran. Returns its duration.
    pub fn finish(self) -> Duration {
        let elapsed = self.elapsed();
        if let Some(limit) = self.budget.max_planning_time {
            if elapsed > limit {
                warn!(
                    desired_hz = 1.0 / limit.as_secs_f64(),
                    actual_hz = 1.0 / elapsed.as_secs_f64(),
                    "route planner missed its desired rate"
                );
            }
        }
        elapsed
    }
}
