//! Errors raised while building a scene or stepping it.
//!
//! The solve phases themselves never fail; degenerate geometry is absorbed
//! inside the joints. Everything here is detected at a boundary: constructing
//! bodies and joints, validating a [`SolverConfig`](crate::SolverConfig), or
//! checking the body set after a step.

use thiserror::Error;

use crate::BodyId;

/// Setup and stepping failures.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// A joint or lookup named a body that is not in the [`BodySet`](crate::BodySet).
    #[error("{0} is not in the body set")]
    InvalidBodyId(BodyId),

    /// A step was requested with a zero, negative or non-finite duration.
    #[error("time step must be positive and finite, got {0}")]
    InvalidTimestep(f64),

    /// A body left the step with `NaN` or infinite position or velocity.
    #[error("step produced non-finite state: {reason}")]
    Diverged {
        /// Which body and what went wrong.
        reason: String,
    },

    /// Solver settings or joint parameters were rejected.
    #[error("configuration rejected: {reason}")]
    InvalidConfig {
        /// The offending setting.
        reason: String,
    },

    /// Mass, inertia or center of mass were rejected.
    #[error("mass properties rejected: {reason}")]
    InvalidMassProperties {
        /// The offending property.
        reason: String,
    },
}

impl SimError {
    /// A [`SimError::Diverged`] with the given reason.
    #[must_use]
    pub fn diverged(reason: impl Into<String>) -> Self {
        Self::Diverged {
            reason: reason.into(),
        }
    }

    /// A [`SimError::InvalidConfig`] with the given reason.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// A [`SimError::InvalidMassProperties`] with the given reason.
    #[must_use]
    pub fn invalid_mass(reason: impl Into<String>) -> Self {
        Self::InvalidMassProperties {
            reason: reason.into(),
        }
    }

    /// Whether the step blew up numerically.
    #[must_use]
    pub fn is_diverged(&self) -> bool {
        matches!(self, Self::Diverged { .. })
    }

    /// Whether a setting was rejected, as opposed to a body or mass problem.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. })
    }
}
