//! Distance joint between a body anchor and a fixed world point.
//!
//! # Constraint Formulation
//!
//! With `r1` the anchor's offset from body A's center of mass and `p` the
//! fixed world anchor:
//!
//! ```text
//! u    = p - (c1 + r1)
//! C    = |u| - L                      (position constraint)
//! Cdot = dot(u_hat, -(v1 + w1 × r1))  (velocity constraint)
//! K    = m1⁻¹ + I1⁻¹ · (r1 × u_hat)²  (effective inverse mass)
//! ```
//!
//! # Soft Constraint
//!
//! With a frequency above zero the joint behaves as an implicit
//! spring-damper. With `ω = 2πf`, `k = m·ω²` and `d = 2·m·ζ·ω`:
//!
//! ```text
//! γ    = 1 / (h · (d + h·k))
//! bias = C · h · k · γ
//! m'   = 1 / (K + γ)
//! Δλ   = -m' · (Cdot + bias + γ·λ)
//! ```
//!
//! Soft joints skip position correction so the spring is free to oscillate.

use std::f64::consts::PI;

use nalgebra::{Point2, Vector2};
use sim2d_types::math::cross;
use sim2d_types::{BodyId, BodySet, SimError, TimeStep, Tolerances, DEFAULT_LINEAR_SLOP};
use tracing::warn;

use crate::{Joint, JointType};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Shortest natural length a distance joint accepts (m).
pub const MIN_JOINT_LENGTH: f64 = DEFAULT_LINEAR_SLOP;

/// Keeps an anchor on one body at a fixed distance from a point in world
/// space, either as a rigid rod or as a soft spring.
///
/// # Example
///
/// ```
/// use sim2d_constraint::{FixedDistanceJoint, Joint};
/// use sim2d_types::{BodySet, MassProperties, RigidBody, TimeStep};
/// use nalgebra::Point2;
///
/// let mut bodies = BodySet::new();
/// let ball = bodies.insert(RigidBody::dynamic(
///     Point2::new(0.0, -1.0),
///     0.0,
///     &MassProperties::disk(1.0, 0.1),
/// )?);
///
/// // Hang the ball from the origin; the length defaults to the current separation
/// let mut rope = FixedDistanceJoint::new(&bodies, ball, Point2::origin(), Point2::origin())?
///     .with_frequency(4.0)
///     .with_damping_ratio(0.5);
/// assert!((rope.length() - 1.0).abs() < 1e-12);
///
/// let step = TimeStep::fixed(1.0 / 60.0);
/// rope.init_velocity_constraints(&mut bodies, &step);
/// rope.solve_velocity_constraints(&mut bodies, &step);
/// # Ok::<(), sim2d_types::SimError>(())
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FixedDistanceJoint {
    /// The constrained body.
    body_a: BodyId,
    /// Anchor on body A, in body A's local frame.
    local_anchor_a: Point2<f64>,
    /// Fixed anchor in world space.
    world_anchor: Point2<f64>,
    /// Natural length (m).
    length: f64,
    /// Spring frequency (Hz). Zero means rigid.
    frequency: f64,
    /// Damping ratio (0 = undamped, 1 = critical).
    damping_ratio: f64,

    /// Accumulated impulse. The only state carried between steps.
    impulse: f64,
    /// Effective mass for the current step.
    mass: f64,
    /// Soft relaxation coefficient for the current step.
    gamma: f64,
    /// Soft position bias for the current step.
    bias: f64,
    /// Unit direction from the body anchor toward the world anchor.
    direction: Vector2<f64>,
}

impl FixedDistanceJoint {
    /// Create a rigid distance joint.
    ///
    /// The natural length is the separation between the two anchors right now,
    /// so restoring a saved scene does not make the body snap.
    pub fn new(
        bodies: &BodySet,
        body_a: BodyId,
        local_anchor_a: Point2<f64>,
        world_anchor: Point2<f64>,
    ) -> sim2d_types::Result<Self> {
        let body = bodies
            .get(body_a)
            .ok_or(SimError::InvalidBodyId(body_a))?;

        if !is_finite_point(&local_anchor_a) || !is_finite_point(&world_anchor) {
            return Err(SimError::invalid_config("joint anchors must be finite"));
        }

        let separation = (world_anchor - body.world_point(&local_anchor_a)).norm();

        Ok(Self {
            body_a,
            local_anchor_a,
            world_anchor,
            length: separation.max(MIN_JOINT_LENGTH),
            frequency: 0.0,
            damping_ratio: 0.0,
            impulse: 0.0,
            mass: 0.0,
            gamma: 0.0,
            bias: 0.0,
            direction: Vector2::zeros(),
        })
    }

    /// Override the natural length.
    #[must_use]
    pub fn with_length(mut self, length: f64) -> Self {
        self.set_length(length);
        self
    }

    /// Set the spring frequency (Hz). Zero keeps the joint rigid.
    #[must_use]
    pub fn with_frequency(mut self, frequency: f64) -> Self {
        self.set_frequency(frequency);
        self
    }

    /// Set the damping ratio.
    #[must_use]
    pub fn with_damping_ratio(mut self, damping_ratio: f64) -> Self {
        self.set_damping_ratio(damping_ratio);
        self
    }

    /// Set the natural length, clamped to at least [`MIN_JOINT_LENGTH`].
    pub fn set_length(&mut self, length: f64) {
        if !length.is_finite() {
            warn!(body = %self.body_a, length, "ignoring non-finite joint length");
            return;
        }
        self.length = length.max(MIN_JOINT_LENGTH);
    }

    /// Set the spring frequency (Hz), clamped to be non-negative.
    pub fn set_frequency(&mut self, frequency: f64) {
        if !frequency.is_finite() {
            warn!(body = %self.body_a, frequency, "ignoring non-finite joint frequency");
            return;
        }
        self.frequency = frequency.max(0.0);
    }

    /// Set the damping ratio, clamped to be non-negative.
    pub fn set_damping_ratio(&mut self, damping_ratio: f64) {
        if !damping_ratio.is_finite() {
            warn!(body = %self.body_a, damping_ratio, "ignoring non-finite damping ratio");
            return;
        }
        self.damping_ratio = damping_ratio.max(0.0);
    }

    /// Move the fixed world anchor.
    pub fn set_world_anchor(&mut self, world_anchor: Point2<f64>) {
        if !is_finite_point(&world_anchor) {
            warn!(body = %self.body_a, "ignoring non-finite world anchor");
            return;
        }
        self.world_anchor = world_anchor;
    }

    /// Anchor on body A, in body A's local frame.
    #[must_use]
    pub fn local_anchor_a(&self) -> Point2<f64> {
        self.local_anchor_a
    }

    /// Anchor on body A in world space, if the body exists.
    #[must_use]
    pub fn anchor_a(&self, bodies: &BodySet) -> Option<Point2<f64>> {
        bodies
            .get(self.body_a)
            .map(|body| body.world_point(&self.local_anchor_a))
    }

    /// The fixed world anchor.
    #[must_use]
    pub fn anchor_b(&self) -> Point2<f64> {
        self.world_anchor
    }

    /// Current distance between the two anchors, if the body exists.
    #[must_use]
    pub fn current_length(&self, bodies: &BodySet) -> Option<f64> {
        self.anchor_a(bodies)
            .map(|anchor| (self.world_anchor - anchor).norm())
    }

    /// Natural length (m).
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Spring frequency (Hz).
    #[must_use]
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Damping ratio.
    #[must_use]
    pub fn damping_ratio(&self) -> f64 {
        self.damping_ratio
    }

    /// Whether the joint acts as a spring rather than a rigid rod.
    #[must_use]
    pub fn is_soft(&self) -> bool {
        self.frequency > 0.0
    }

    /// Accumulated impulse along [`direction`](Self::direction).
    #[must_use]
    pub fn impulse(&self) -> f64 {
        self.impulse
    }

    /// Unit direction from the body anchor toward the world anchor, or zero
    /// when the anchors coincide.
    #[must_use]
    pub fn direction(&self) -> Vector2<f64> {
        self.direction
    }

    /// Effective mass for the current step.
    #[must_use]
    pub fn effective_mass(&self) -> f64 {
        self.mass
    }

    /// Soft relaxation coefficient for the current step.
    #[must_use]
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Soft position bias for the current step.
    #[must_use]
    pub fn bias(&self) -> f64 {
        self.bias
    }
}

impl Joint for FixedDistanceJoint {
    fn joint_type(&self) -> JointType {
        JointType::FixedDistance
    }

    fn body_a(&self) -> BodyId {
        self.body_a
    }

    fn body_b(&self) -> Option<BodyId> {
        None
    }

    #[allow(clippy::float_cmp)]
    fn init_velocity_constraints(&mut self, bodies: &mut BodySet, step: &TimeStep) {
        let Some(body) = bodies.get_mut(self.body_a) else {
            warn!(body = %self.body_a, "distance joint references a missing body");
            return;
        };
        let tolerances = &step.tolerances;

        let r1 = body.anchor_offset(&self.local_anchor_a);
        let separation = self.world_anchor - (body.center + r1);
        let current_length = separation.norm();

        debug_assert!(
            body.inv_mass > 0.0 || body.inv_inertia > 0.0,
            "distance joint attached to an immovable body {}",
            self.body_a
        );

        if current_length <= tolerances.linear_slop {
            // No direction to push along: inert this step, and nothing to warm start next step
            self.direction = Vector2::zeros();
            self.mass = 0.0;
            self.gamma = 0.0;
            self.bias = 0.0;
            self.impulse = 0.0;
            return;
        }
        self.direction = separation / current_length;

        // The world side is immovable and contributes nothing
        let cr1 = cross(&r1, &self.direction);
        let inv_mass = body.inv_mass + body.inv_inertia * cr1 * cr1;

        self.mass = if inv_mass > tolerances.epsilon {
            1.0 / inv_mass
        } else {
            0.0
        };

        if self.is_soft() {
            let c = current_length - self.length;
            let omega = 2.0 * PI * self.frequency;
            let damping = 2.0 * self.mass * self.damping_ratio * omega;
            let stiffness = self.mass * omega * omega;

            let h = step.dt;
            let denom = h * (damping + h * stiffness);
            self.gamma = if denom != 0.0 { 1.0 / denom } else { 0.0 };
            self.bias = c * h * stiffness * self.gamma;

            let softened = inv_mass + self.gamma;
            self.mass = if softened != 0.0 { 1.0 / softened } else { 0.0 };
        } else {
            self.gamma = 0.0;
            self.bias = 0.0;
        }

        if step.warm_starting {
            self.impulse *= step.dt_ratio;
            let p = self.impulse * self.direction;
            body.apply_impulse(&-p, &r1);
        } else {
            self.impulse = 0.0;
        }
    }

    fn solve_velocity_constraints(&mut self, bodies: &mut BodySet, _step: &TimeStep) {
        let Some(body) = bodies.get_mut(self.body_a) else {
            return;
        };

        // Orientation may have changed since init; do not cache r1
        let r1 = body.anchor_offset(&self.local_anchor_a);
        let v1 = body.velocity_at_offset(&r1);
        let cdot = self.direction.dot(&-v1);

        let impulse = -self.mass * (cdot + self.bias + self.gamma * self.impulse);
        self.impulse += impulse;

        let p = impulse * self.direction;
        body.apply_impulse(&-p, &r1);
    }

    #[allow(clippy::float_cmp)]
    fn solve_position_constraints(
        &mut self,
        bodies: &mut BodySet,
        tolerances: &Tolerances,
    ) -> bool {
        if self.is_soft() {
            return true;
        }

        let Some(body) = bodies.get_mut(self.body_a) else {
            return true;
        };

        let r1 = body.anchor_offset(&self.local_anchor_a);
        let separation = self.world_anchor - (body.center + r1);
        let current_length = separation.norm();
        if current_length == 0.0 {
            return true;
        }

        let direction = separation / current_length;
        let c = (current_length - self.length).clamp(
            -tolerances.max_linear_correction,
            tolerances.max_linear_correction,
        );

        let impulse = -self.mass * c;
        let p = impulse * direction;
        body.apply_position_impulse(&-p, &r1);
        self.direction = direction;

        c.abs() < tolerances.linear_slop
    }

    fn reaction_force(&self, inv_dt: f64) -> Vector2<f64> {
        (inv_dt * self.impulse) * self.direction
    }

    fn reaction_torque(&self, _inv_dt: f64) -> f64 {
        0.0
    }
}

fn is_finite_point(p: &Point2<f64>) -> bool {
    p.coords.iter().all(|x| x.is_finite())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use sim2d_types::{MassProperties, RigidBody};

    const DT: f64 = 1.0 / 60.0;

    /// Unit-mass body at `origin` with unit inverse inertia.
    fn unit_body(bodies: &mut BodySet, origin: Point2<f64>) -> BodyId {
        let mass = MassProperties::new(1.0, 1.0, Vector2::zeros());
        bodies.insert(RigidBody::dynamic(origin, 0.0, &mass).unwrap())
    }

    fn stretched_rod() -> (BodySet, BodyId, FixedDistanceJoint) {
        let mut bodies = BodySet::new();
        let a = unit_body(&mut bodies, Point2::origin());
        let joint = FixedDistanceJoint::new(&bodies, a, Point2::origin(), Point2::new(2.0, 0.0))
            .unwrap()
            .with_length(1.0);
        (bodies, a, joint)
    }

    #[test]
    fn test_length_defaults_to_initial_separation() {
        let mut bodies = BodySet::new();
        let a = unit_body(&mut bodies, Point2::new(1.0, 1.0));
        let joint =
            FixedDistanceJoint::new(&bodies, a, Point2::new(0.5, 0.0), Point2::new(1.5, 4.0))
                .unwrap();

        assert_relative_eq!(joint.length(), 3.0, epsilon = 1e-12);
        assert_relative_eq!(joint.current_length(&bodies).unwrap(), 3.0, epsilon = 1e-12);
        assert!(!joint.is_soft());
        assert_eq!(joint.body_b(), None);
        assert_eq!(joint.joint_type(), JointType::FixedDistance);
    }

    #[test]
    fn test_new_rejects_missing_body() {
        let bodies = BodySet::new();
        let result =
            FixedDistanceJoint::new(&bodies, BodyId::new(3), Point2::origin(), Point2::origin());
        assert_eq!(result.unwrap_err(), SimError::InvalidBodyId(BodyId::new(3)));
    }

    #[test]
    fn test_new_rejects_non_finite_anchor() {
        let mut bodies = BodySet::new();
        let a = unit_body(&mut bodies, Point2::origin());
        let result =
            FixedDistanceJoint::new(&bodies, a, Point2::origin(), Point2::new(f64::NAN, 0.0));
        assert!(result.unwrap_err().is_config_error());
    }

    #[test]
    fn test_configuration_is_sanitized() {
        let (_, _, mut joint) = stretched_rod();

        joint.set_length(0.0);
        assert_relative_eq!(joint.length(), MIN_JOINT_LENGTH);

        joint.set_length(f64::NAN);
        assert_relative_eq!(joint.length(), MIN_JOINT_LENGTH);

        joint.set_frequency(-3.0);
        assert_relative_eq!(joint.frequency(), 0.0);

        joint.set_damping_ratio(f64::INFINITY);
        assert_relative_eq!(joint.damping_ratio(), 0.0);

        joint.set_damping_ratio(0.7);
        assert_relative_eq!(joint.damping_ratio(), 0.7);
    }

    #[test]
    fn test_rigid_effective_mass() {
        let (mut bodies, _, mut joint) = stretched_rod();
        let step = TimeStep::fixed(DT);

        joint.init_velocity_constraints(&mut bodies, &step);

        assert_relative_eq!(joint.direction(), Vector2::x(), epsilon = 1e-12);
        assert_relative_eq!(joint.effective_mass(), 1.0, epsilon = 1e-12);
        assert_eq!(joint.gamma(), 0.0);
        assert_eq!(joint.bias(), 0.0);
    }

    #[test]
    fn test_effective_mass_includes_rotation() {
        let mut bodies = BodySet::new();
        let mass = MassProperties::new(2.0, 0.5, Vector2::zeros());
        let a = bodies.insert(RigidBody::dynamic(Point2::origin(), 0.0, &mass).unwrap());

        // Lever arm (1, 0), direction (0, 1): r1 × u = 1
        let mut joint =
            FixedDistanceJoint::new(&bodies, a, Point2::new(1.0, 0.0), Point2::new(1.0, 2.0))
                .unwrap();
        joint.init_velocity_constraints(&mut bodies, &TimeStep::fixed(DT));

        // K = 1/2 + 2 * 1² = 2.5
        assert_relative_eq!(joint.effective_mass(), 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_soft_coefficients() {
        let (mut bodies, _, joint) = stretched_rod();
        let mut joint = joint.with_frequency(2.0).with_damping_ratio(0.5);
        let step = TimeStep::fixed(DT);

        joint.init_velocity_constraints(&mut bodies, &step);

        let omega = 2.0 * PI * 2.0;
        let d = 2.0 * 1.0 * 0.5 * omega;
        let k = omega * omega;
        let gamma = 1.0 / (DT * (d + DT * k));
        assert_relative_eq!(joint.gamma(), gamma, epsilon = 1e-9);
        assert_relative_eq!(joint.bias(), 1.0 * DT * k * gamma, epsilon = 1e-9);
        assert_relative_eq!(joint.effective_mass(), 1.0 / (1.0 + gamma), epsilon = 1e-9);
    }

    #[test]
    fn test_soft_joint_pulls_toward_anchor() {
        let (mut bodies, a, joint) = stretched_rod();
        let mut joint = joint.with_frequency(1.0).with_damping_ratio(0.2);
        let step = TimeStep::fixed(DT);

        joint.init_velocity_constraints(&mut bodies, &step);
        joint.solve_velocity_constraints(&mut bodies, &step);

        let body = bodies.get(a).unwrap();
        assert!(body.linear_velocity.x > 0.0);
        assert_relative_eq!(body.linear_velocity.y, 0.0, epsilon = 1e-12);
        // Pulling the body toward the anchor is a negative impulse along u
        assert!(joint.impulse() < 0.0);
    }

    #[test]
    fn test_rigid_scenario_first_step() {
        let (mut bodies, a, mut joint) = stretched_rod();
        let step = TimeStep::fixed(DT);
        let tolerances = Tolerances::default();

        joint.init_velocity_constraints(&mut bodies, &step);
        joint.solve_velocity_constraints(&mut bodies, &step);

        // At rest with no bias: the velocity pass has nothing to correct
        let body = bodies.get(a).unwrap();
        assert!(body.linear_velocity.x >= 0.0);
        assert_relative_eq!(body.linear_velocity.norm(), 0.0, epsilon = 1e-12);
        assert_eq!(joint.impulse(), 0.0);

        let converged = joint.solve_position_constraints(&mut bodies, &tolerances);
        assert!(!converged);

        let expected = tolerances.max_linear_correction.min(1.0);
        let body = bodies.get(a).unwrap();
        assert_relative_eq!(body.center.x, expected, epsilon = 1e-12);
        assert_relative_eq!(body.center.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(body.angle, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_position_correction_converges() {
        let (mut bodies, a, mut joint) = stretched_rod();
        let tolerances = Tolerances::default();
        joint.init_velocity_constraints(&mut bodies, &TimeStep::fixed(DT));

        let mut converged = false;
        for _ in 0..10 {
            if joint.solve_position_constraints(&mut bodies, &tolerances) {
                converged = true;
                break;
            }
        }

        assert!(converged);
        let separation = joint.current_length(&bodies).unwrap();
        assert!((separation - 1.0).abs() < tolerances.linear_slop);
        assert_relative_eq!(bodies.get(a).unwrap().center.x, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_soft_position_solve_is_a_no_op() {
        let (mut bodies, a, joint) = stretched_rod();
        let mut joint = joint.with_frequency(5.0);
        joint.init_velocity_constraints(&mut bodies, &TimeStep::fixed(DT));

        let before = *bodies.get(a).unwrap();
        assert!(joint.solve_position_constraints(&mut bodies, &Tolerances::default()));
        assert_eq!(*bodies.get(a).unwrap(), before);
    }

    #[test]
    fn test_coincident_anchors_are_inert() {
        let mut bodies = BodySet::new();
        let a = unit_body(&mut bodies, Point2::new(1.0, 1.0));
        bodies.get_mut(a).unwrap().linear_velocity = Vector2::new(0.5, -0.25);

        let mut joint =
            FixedDistanceJoint::new(&bodies, a, Point2::origin(), Point2::new(1.0, 1.0))
                .unwrap()
                .with_frequency(3.0)
                .with_damping_ratio(1.0);
        let step = TimeStep::fixed(DT);

        joint.init_velocity_constraints(&mut bodies, &step);
        assert_eq!(joint.direction(), Vector2::zeros());

        joint.solve_velocity_constraints(&mut bodies, &step);
        let body = bodies.get(a).unwrap();
        assert_eq!(body.linear_velocity, Vector2::new(0.5, -0.25));
        assert_eq!(body.angular_velocity, 0.0);
        assert!(body.is_finite());
        assert_eq!(joint.impulse(), 0.0);
        assert_eq!(joint.reaction_force(60.0), Vector2::zeros());
    }

    #[test]
    fn test_coincident_anchors_leave_nothing_to_warm_start() {
        let mut bodies = BodySet::new();
        let a = unit_body(&mut bodies, Point2::new(2.0, 0.0));
        let mut joint =
            FixedDistanceJoint::new(&bodies, a, Point2::origin(), Point2::new(2.0, 0.0))
                .unwrap()
                .with_length(1.0)
                .with_frequency(5.0)
                .with_damping_ratio(0.5);
        let step = TimeStep::fixed(DT);

        joint.init_velocity_constraints(&mut bodies, &step);
        for _ in 0..8 {
            joint.solve_velocity_constraints(&mut bodies, &step);
        }
        assert_eq!(joint.impulse(), 0.0);
        assert_eq!(joint.effective_mass(), 0.0);
        assert_eq!(joint.gamma(), 0.0);
        assert_eq!(joint.bias(), 0.0);

        // At rest at exactly the natural length: the next init must not kick it
        bodies.get_mut(a).unwrap().center = Point2::new(1.0, 0.0);
        joint.init_velocity_constraints(&mut bodies, &step);
        assert_eq!(bodies.get(a).unwrap().linear_velocity, Vector2::zeros());
        assert_eq!(bodies.get(a).unwrap().angular_velocity, 0.0);

        joint.solve_velocity_constraints(&mut bodies, &step);
        assert_eq!(bodies.get(a).unwrap().linear_velocity, Vector2::zeros());
    }

    #[test]
    fn test_zero_effective_mass_is_inert() {
        // Rotation only, with the lever arm along the constraint direction
        let mass = MassProperties::new(0.0, 1.0, Vector2::zeros());
        let step = TimeStep::fixed(DT);

        for frequency in [0.0, 2.0] {
            let mut bodies = BodySet::new();
            let a = bodies.insert(
                RigidBody::dynamic(Point2::origin(), 0.0, &mass)
                    .unwrap()
                    .with_velocity(Vector2::zeros(), 0.5),
            );
            let mut joint =
                FixedDistanceJoint::new(&bodies, a, Point2::new(1.0, 0.0), Point2::new(3.0, 0.0))
                    .unwrap()
                    .with_length(1.0)
                    .with_frequency(frequency)
                    .with_damping_ratio(0.5);
            let before = *bodies.get(a).unwrap();

            joint.init_velocity_constraints(&mut bodies, &step);
            assert_eq!(joint.direction(), Vector2::x());
            assert_eq!(joint.effective_mass(), 0.0);
            assert_eq!(joint.gamma(), 0.0);
            assert_eq!(joint.bias(), 0.0);

            for _ in 0..4 {
                joint.solve_velocity_constraints(&mut bodies, &step);
            }
            assert_eq!(joint.impulse(), 0.0);
            assert_eq!(*bodies.get(a).unwrap(), before);

            joint.solve_position_constraints(&mut bodies, &step.tolerances);
            assert_eq!(*bodies.get(a).unwrap(), before);
        }
    }

    #[test]
    fn test_position_solve_with_exactly_coincident_anchors() {
        let mut bodies = BodySet::new();
        let a = unit_body(&mut bodies, Point2::origin());
        let mut joint =
            FixedDistanceJoint::new(&bodies, a, Point2::origin(), Point2::origin()).unwrap();
        joint.init_velocity_constraints(&mut bodies, &TimeStep::fixed(DT));

        let before = *bodies.get(a).unwrap();
        assert!(joint.solve_position_constraints(&mut bodies, &Tolerances::default()));
        assert_eq!(*bodies.get(a).unwrap(), before);
    }

    #[test]
    fn test_warm_start_disabled_resets_impulse() {
        let (mut bodies, _, joint) = stretched_rod();
        let mut joint = joint.with_frequency(2.0);
        let step = TimeStep::fixed(DT);

        joint.init_velocity_constraints(&mut bodies, &step);
        joint.solve_velocity_constraints(&mut bodies, &step);
        assert!(joint.impulse() != 0.0);

        joint.init_velocity_constraints(&mut bodies, &step.with_warm_starting(false));
        assert_eq!(joint.impulse(), 0.0);
    }

    #[test]
    fn test_warm_start_scales_by_dt_ratio() {
        let (mut bodies, a, joint) = stretched_rod();
        let mut joint = joint.with_frequency(2.0);
        let step = TimeStep::fixed(DT);

        joint.init_velocity_constraints(&mut bodies, &step);
        joint.solve_velocity_constraints(&mut bodies, &step);
        let cached = joint.impulse();

        let v_before = bodies.get(a).unwrap().linear_velocity;
        joint.init_velocity_constraints(&mut bodies, &step.with_dt_ratio(0.5));
        let v_after = bodies.get(a).unwrap().linear_velocity;

        assert_relative_eq!(joint.impulse(), 0.5 * cached, epsilon = 1e-15);
        let expected = -(0.5 * cached) * joint.direction();
        assert_relative_eq!(v_after - v_before, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_reaction_force() {
        let (mut bodies, _, joint) = stretched_rod();
        let mut joint = joint.with_frequency(2.0);
        let step = TimeStep::fixed(DT);

        joint.init_velocity_constraints(&mut bodies, &step);
        for _ in 0..4 {
            joint.solve_velocity_constraints(&mut bodies, &step);
        }

        let force = joint.reaction_force(step.inv_dt);
        assert_eq!(force, (step.inv_dt * joint.impulse()) * joint.direction());
        assert!(force.x < 0.0);
        assert_eq!(joint.reaction_torque(step.inv_dt), 0.0);
    }

    #[test]
    fn test_missing_body_is_inert() {
        let (_, _, mut joint) = stretched_rod();
        let mut empty = BodySet::new();
        let step = TimeStep::fixed(DT);

        joint.init_velocity_constraints(&mut empty, &step);
        joint.solve_velocity_constraints(&mut empty, &step);
        assert!(joint.solve_position_constraints(&mut empty, &Tolerances::default()));
        assert!(joint.anchor_a(&empty).is_none());
        assert_eq!(joint.impulse(), 0.0);
    }
}
