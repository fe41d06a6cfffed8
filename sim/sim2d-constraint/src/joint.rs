//! The joint abstraction shared by every joint type.

use nalgebra::Vector2;
use sim2d_types::{BodyId, BodySet, TimeStep, Tolerances};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Trait for all joint types.
///
/// A solver drives every joint through the same per-step sequence:
///
/// 1. [`init_velocity_constraints`](Joint::init_velocity_constraints) once
/// 2. [`solve_velocity_constraints`](Joint::solve_velocity_constraints) once per
///    velocity iteration
/// 3. external position integration
/// 4. [`solve_position_constraints`](Joint::solve_position_constraints) once per
///    position iteration, stopping early once every joint reports `true`
///
/// Every call writes its correction straight back into the body set, so joints
/// solved later in the same pass see the effect (Gauss-Seidel). Joints sharing
/// a body must be visited in a fixed order.
pub trait Joint {
    /// Get the joint type.
    fn joint_type(&self) -> JointType;

    /// The body this joint moves.
    fn body_a(&self) -> BodyId;

    /// The second constrained body, or `None` when the other side is fixed in
    /// world space.
    fn body_b(&self) -> Option<BodyId>;

    /// Derive per-step solver coefficients and apply the warm-start impulse.
    fn init_velocity_constraints(&mut self, bodies: &mut BodySet, step: &TimeStep);

    /// Apply one velocity-level correction.
    fn solve_velocity_constraints(&mut self, bodies: &mut BodySet, step: &TimeStep);

    /// Apply one position-level correction.
    ///
    /// Returns `true` when the constraint is already satisfied within
    /// tolerance.
    fn solve_position_constraints(&mut self, bodies: &mut BodySet, tolerances: &Tolerances)
        -> bool;

    /// Constraint force from the last step, given `1 / dt`.
    ///
    /// This is the reaction felt by the anchor on the other side; body A
    /// receives the opposite force.
    fn reaction_force(&self, inv_dt: f64) -> Vector2<f64>;

    /// Constraint torque from the last step, given `1 / dt`.
    fn reaction_torque(&self, inv_dt: f64) -> f64;
}

impl<J: Joint + ?Sized> Joint for Box<J> {
    fn joint_type(&self) -> JointType {
        (**self).joint_type()
    }

    fn body_a(&self) -> BodyId {
        (**self).body_a()
    }

    fn body_b(&self) -> Option<BodyId> {
        (**self).body_b()
    }

    fn init_velocity_constraints(&mut self, bodies: &mut BodySet, step: &TimeStep) {
        (**self).init_velocity_constraints(bodies, step);
    }

    fn solve_velocity_constraints(&mut self, bodies: &mut BodySet, step: &TimeStep) {
        (**self).solve_velocity_constraints(bodies, step);
    }

    fn solve_position_constraints(
        &mut self,
        bodies: &mut BodySet,
        tolerances: &Tolerances,
    ) -> bool {
        (**self).solve_position_constraints(bodies, tolerances)
    }

    fn reaction_force(&self, inv_dt: f64) -> Vector2<f64> {
        (**self).reaction_force(inv_dt)
    }

    fn reaction_torque(&self, inv_dt: f64) -> f64 {
        (**self).reaction_torque(inv_dt)
    }
}

/// Type of joint constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JointType {
    /// Distance between a body anchor and a fixed world point (1 constraint).
    FixedDistance,
}

impl JointType {
    /// Number of scalar constraints the joint removes.
    #[must_use]
    pub fn constrained_dof(&self) -> usize {
        match self {
            Self::FixedDistance => 1,
        }
    }

    /// Number of planar DOF (out of 3) left free for a single body.
    #[must_use]
    pub fn dof(&self) -> usize {
        3 - self.constrained_dof()
    }
}

impl std::fmt::Display for JointType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FixedDistance => write!(f, "Fixed Distance"),
        }
    }
}
