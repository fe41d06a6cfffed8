//! Per-step timing passed to constraint solvers.

use crate::{SolverConfig, Tolerances};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Timing for one simulation step.
///
/// `dt_ratio` is the current step's `dt` times the previous step's inverse
/// `dt`. Joints scale their cached impulses by it when warm starting so that
/// a change of step size keeps the cached impulse consistent.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeStep {
    /// Step duration (s).
    pub dt: f64,
    /// Inverse step duration (1/s), 0 when `dt` is 0.
    pub inv_dt: f64,
    /// `dt * previous_inv_dt`.
    pub dt_ratio: f64,
    /// Number of velocity iterations.
    pub velocity_iterations: usize,
    /// Maximum number of position iterations.
    pub position_iterations: usize,
    /// Whether joints apply their cached impulses at initialization.
    pub warm_starting: bool,
    /// Numeric tolerances for this step.
    pub tolerances: Tolerances,
}

impl TimeStep {
    /// Build the step that follows a step with inverse duration `prev_inv_dt`.
    ///
    /// Pass `prev_inv_dt = 0` on the first step; the cached impulses are then
    /// scaled to zero.
    #[must_use]
    pub fn new(dt: f64, prev_inv_dt: f64, config: &SolverConfig) -> Self {
        Self {
            dt,
            inv_dt: if dt > 0.0 { 1.0 / dt } else { 0.0 },
            dt_ratio: prev_inv_dt * dt,
            velocity_iterations: config.velocity_iterations,
            position_iterations: config.position_iterations,
            warm_starting: config.warm_starting,
            tolerances: config.tolerances,
        }
    }

    /// A step of duration `dt` that follows a step of the same duration.
    #[must_use]
    pub fn fixed(dt: f64) -> Self {
        let config = SolverConfig::default();
        let inv_dt = if dt > 0.0 { 1.0 / dt } else { 0.0 };
        Self {
            dt_ratio: 1.0,
            ..Self::new(dt, inv_dt, &config)
        }
    }

    /// Override the step ratio.
    #[must_use]
    pub fn with_dt_ratio(mut self, dt_ratio: f64) -> Self {
        self.dt_ratio = dt_ratio;
        self
    }

    /// Enable or disable warm starting.
    #[must_use]
    pub fn with_warm_starting(mut self, enabled: bool) -> Self {
        self.warm_starting = enabled;
        self
    }
}
