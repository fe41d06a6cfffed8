//! Configuration types for constraint solving.
//!
//! [`SolverConfig`] controls how a step is driven: iteration counts, warm
//! starting, gravity and damping. [`Tolerances`] holds the numeric thresholds
//! that joints read while solving.

use nalgebra::Vector2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default linear slop (m).
pub const DEFAULT_LINEAR_SLOP: f64 = 0.005;

/// Default maximum position correction per position iteration (m).
pub const DEFAULT_MAX_LINEAR_CORRECTION: f64 = 0.2;

/// Standard gravity (m/s²).
pub const STANDARD_GRAVITY: f64 = 9.81;

/// Numeric tolerances shared by every joint.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tolerances {
    /// Position error below which a constraint counts as satisfied, and
    /// separation below which a constraint direction is undefined.
    pub linear_slop: f64,
    /// Largest position correction applied by one position iteration.
    pub max_linear_correction: f64,
    /// Smallest combined inverse mass treated as non-zero.
    pub epsilon: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            linear_slop: DEFAULT_LINEAR_SLOP,
            max_linear_correction: DEFAULT_MAX_LINEAR_CORRECTION,
            epsilon: f64::EPSILON,
        }
    }
}

impl Tolerances {
    /// Validate the tolerances.
    pub fn validate(&self) -> crate::Result<()> {
        if !self.linear_slop.is_finite() || self.linear_slop <= 0.0 {
            return Err(crate::SimError::invalid_config(
                "linear_slop must be positive and finite",
            ));
        }

        if !self.max_linear_correction.is_finite() || self.max_linear_correction <= 0.0 {
            return Err(crate::SimError::invalid_config(
                "max_linear_correction must be positive and finite",
            ));
        }

        if self.max_linear_correction < self.linear_slop {
            return Err(crate::SimError::invalid_config(
                "max_linear_correction must not be smaller than linear_slop",
            ));
        }

        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(crate::SimError::invalid_config(
                "epsilon must be non-negative and finite",
            ));
        }

        Ok(())
    }
}

/// Configuration for the constraint solver.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolverConfig {
    /// Number of velocity iterations per step.
    pub velocity_iterations: usize,
    /// Maximum number of position iterations per step. At least 1.
    pub position_iterations: usize,
    /// Whether to warm-start joints from the previous step's impulses.
    pub warm_starting: bool,
    /// Gravitational acceleration (m/s²).
    pub gravity: Vector2<f64>,
    /// Linear velocity damping (1/s).
    pub linear_damping: f64,
    /// Angular velocity damping (1/s).
    pub angular_damping: f64,
    /// Numeric tolerances.
    pub tolerances: Tolerances,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            velocity_iterations: 8,
            position_iterations: 3,
            warm_starting: true,
            gravity: Vector2::new(0.0, -STANDARD_GRAVITY),
            linear_damping: 0.0,
            angular_damping: 0.0,
            tolerances: Tolerances::default(),
        }
    }
}

impl SolverConfig {
    /// Fast configuration for real-time applications.
    #[must_use]
    pub fn realtime() -> Self {
        Self {
            velocity_iterations: 4,
            position_iterations: 2,
            ..Default::default()
        }
    }

    /// High-accuracy configuration.
    #[must_use]
    pub fn high_accuracy() -> Self {
        Self {
            velocity_iterations: 16,
            position_iterations: 8,
            tolerances: Tolerances {
                linear_slop: 0.001,
                max_linear_correction: 0.1,
                ..Tolerances::default()
            },
            ..Default::default()
        }
    }

    /// Set the number of solver iterations.
    #[must_use]
    pub fn iterations(mut self, velocity: usize, position: usize) -> Self {
        self.velocity_iterations = velocity;
        self.position_iterations = position;
        self
    }

    /// Enable or disable warm starting.
    #[must_use]
    pub fn warm_starting(mut self, enabled: bool) -> Self {
        self.warm_starting = enabled;
        self
    }

    /// Set the gravity.
    #[must_use]
    pub fn gravity(mut self, gravity: Vector2<f64>) -> Self {
        self.gravity = gravity;
        self
    }

    /// Disable gravity.
    #[must_use]
    pub fn zero_gravity(mut self) -> Self {
        self.gravity = Vector2::zeros();
        self
    }

    /// Set linear and angular damping.
    #[must_use]
    pub fn damping(mut self, linear: f64, angular: f64) -> Self {
        self.linear_damping = linear.max(0.0);
        self.angular_damping = angular.max(0.0);
        self
    }

    /// Set the tolerances.
    #[must_use]
    pub fn tolerances(mut self, tolerances: Tolerances) -> Self {
        self.tolerances = tolerances;
        self
    }

    /// Validate the solver configuration.
    pub fn validate(&self) -> crate::Result<()> {
        if self.velocity_iterations == 0 {
            return Err(crate::SimError::invalid_config(
                "velocity_iterations must be at least 1",
            ));
        }

        if self.position_iterations == 0 {
            return Err(crate::SimError::invalid_config(
                "position_iterations must be at least 1",
            ));
        }

        if !self.gravity.iter().all(|x| x.is_finite()) {
            return Err(crate::SimError::invalid_config("gravity must be finite"));
        }

        if !self.linear_damping.is_finite() || self.linear_damping < 0.0 {
            return Err(crate::SimError::invalid_config(
                "linear_damping must be non-negative and finite",
            ));
        }

        if !self.angular_damping.is_finite() || self.angular_damping < 0.0 {
            return Err(crate::SimError::invalid_config(
                "angular_damping must be non-negative and finite",
            ));
        }

        self.tolerances.validate()
    }
}
