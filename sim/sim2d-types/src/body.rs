//! Planar rigid body state and the body arena.
//!
//! A body is described by the world position of its center of mass, an
//! orientation angle, linear and angular velocity, and inverse mass
//! properties. Constraint solvers mutate these fields in place.

use nalgebra::{Point2, UnitComplex, Vector2};

use crate::math::{cross, cross_sv};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unique identifier for a rigid body in a [`BodySet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyId(pub u64);

impl BodyId {
    /// Create a new body ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    fn index(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }
}

impl From<u64> for BodyId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for BodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Body({})", self.0)
    }
}

/// Mass properties of a planar rigid body.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MassProperties {
    /// Total mass in kg. Zero means immovable.
    pub mass: f64,
    /// Rotational inertia about the center of mass (kg·m²). Zero means the
    /// body cannot rotate.
    pub inertia: f64,
    /// Center of mass offset from the body origin, in local coordinates.
    pub local_center: Vector2<f64>,
}

impl MassProperties {
    /// Create mass properties with given values.
    #[must_use]
    pub const fn new(mass: f64, inertia: f64, local_center: Vector2<f64>) -> Self {
        Self {
            mass,
            inertia,
            local_center,
        }
    }

    /// A point mass at the origin. It translates but never rotates.
    #[must_use]
    pub fn point_mass(mass: f64) -> Self {
        Self::new(mass, 0.0, Vector2::zeros())
    }

    /// A uniform disk.
    ///
    /// I = (1/2) * m * r²
    #[must_use]
    pub fn disk(mass: f64, radius: f64) -> Self {
        Self::new(mass, 0.5 * mass * radius * radius, Vector2::zeros())
    }

    /// A uniform rectangle centered on the origin.
    ///
    /// I = (1/12) * m * (w² + h²)
    #[must_use]
    pub fn rectangle(mass: f64, half_extents: Vector2<f64>) -> Self {
        let w2 = 4.0 * half_extents.x * half_extents.x;
        let h2 = 4.0 * half_extents.y * half_extents.y;
        Self::new(mass, mass * (w2 + h2) / 12.0, Vector2::zeros())
    }

    /// Move the center of mass away from the body origin.
    #[must_use]
    pub fn with_local_center(mut self, local_center: Vector2<f64>) -> Self {
        self.local_center = local_center;
        self
    }

    /// Inverse mass (0 for zero mass).
    #[must_use]
    pub fn inverse_mass(&self) -> f64 {
        if self.mass > 0.0 {
            1.0 / self.mass
        } else {
            0.0
        }
    }

    /// Inverse rotational inertia (0 for zero inertia).
    #[must_use]
    pub fn inverse_inertia(&self) -> f64 {
        if self.inertia > 0.0 {
            1.0 / self.inertia
        } else {
            0.0
        }
    }

    /// Check if this represents an immovable body.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.mass <= 0.0 && self.inertia <= 0.0
    }

    /// Validate that the mass properties are physically valid.
    pub fn validate(&self) -> crate::Result<()> {
        if !self.mass.is_finite() {
            return Err(crate::SimError::invalid_mass("mass must be finite"));
        }

        if self.mass < 0.0 {
            return Err(crate::SimError::invalid_mass("mass cannot be negative"));
        }

        if !self.inertia.is_finite() || self.inertia < 0.0 {
            return Err(crate::SimError::invalid_mass(
                "inertia must be finite and non-negative",
            ));
        }

        if !self.local_center.iter().all(|x| x.is_finite()) {
            return Err(crate::SimError::invalid_mass(
                "center of mass must be finite",
            ));
        }

        Ok(())
    }
}

/// A planar rigid body.
///
/// The body is tracked by its center of mass rather than its origin, which
/// is what the constraint solvers operate on. [`RigidBody::origin`] recovers
/// the body origin when needed.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RigidBody {
    /// Center of mass in world coordinates.
    pub center: Point2<f64>,
    /// Orientation angle in radians (counter-clockwise).
    pub angle: f64,
    /// Linear velocity of the center of mass (m/s).
    pub linear_velocity: Vector2<f64>,
    /// Angular velocity (rad/s).
    pub angular_velocity: f64,
    /// Inverse mass (0 for immovable bodies).
    pub inv_mass: f64,
    /// Inverse rotational inertia (0 for bodies that cannot rotate).
    pub inv_inertia: f64,
    /// Center of mass offset from the body origin, in local coordinates.
    pub local_center: Vector2<f64>,
}

impl RigidBody {
    /// Create a dynamic body whose origin is at `origin`, rotated by `angle`.
    pub fn dynamic(origin: Point2<f64>, angle: f64, mass: &MassProperties) -> crate::Result<Self> {
        mass.validate()?;

        let rotation = UnitComplex::new(angle);
        Ok(Self {
            center: origin + rotation * mass.local_center,
            angle,
            linear_velocity: Vector2::zeros(),
            angular_velocity: 0.0,
            inv_mass: mass.inverse_mass(),
            inv_inertia: mass.inverse_inertia(),
            local_center: mass.local_center,
        })
    }

    /// Create an immovable body.
    #[must_use]
    pub fn fixed(origin: Point2<f64>, angle: f64) -> Self {
        Self {
            center: origin,
            angle,
            linear_velocity: Vector2::zeros(),
            angular_velocity: 0.0,
            inv_mass: 0.0,
            inv_inertia: 0.0,
            local_center: Vector2::zeros(),
        }
    }

    /// Set the initial velocity.
    #[must_use]
    pub fn with_velocity(mut self, linear: Vector2<f64>, angular: f64) -> Self {
        self.linear_velocity = linear;
        self.angular_velocity = angular;
        self
    }

    /// Current orientation as a rotation.
    #[must_use]
    pub fn rotation(&self) -> UnitComplex<f64> {
        UnitComplex::new(self.angle)
    }

    /// Body origin in world coordinates.
    #[must_use]
    pub fn origin(&self) -> Point2<f64> {
        self.center - self.rotation() * self.local_center
    }

    /// Transform a point from body-local to world coordinates.
    #[must_use]
    pub fn world_point(&self, local: &Point2<f64>) -> Point2<f64> {
        self.center + self.anchor_offset(local)
    }

    /// Transform a point from world to body-local coordinates.
    #[must_use]
    pub fn local_point(&self, world: &Point2<f64>) -> Point2<f64> {
        Point2::from(self.rotation().inverse() * (world - self.center) + self.local_center)
    }

    /// World-space offset of a local anchor from the center of mass.
    ///
    /// This is the lever arm used by constraint solvers.
    #[must_use]
    pub fn anchor_offset(&self, local_anchor: &Point2<f64>) -> Vector2<f64> {
        self.rotation() * (local_anchor.coords - self.local_center)
    }

    /// Velocity of a point at world offset `r` from the center of mass.
    #[must_use]
    pub fn velocity_at_offset(&self, r: &Vector2<f64>) -> Vector2<f64> {
        self.linear_velocity + cross_sv(self.angular_velocity, r)
    }

    /// Apply an impulse at world offset `r` from the center of mass.
    pub fn apply_impulse(&mut self, impulse: &Vector2<f64>, r: &Vector2<f64>) {
        self.linear_velocity += self.inv_mass * impulse;
        self.angular_velocity += self.inv_inertia * cross(r, impulse);
    }

    /// Apply a pseudo-impulse at world offset `r`, moving the body directly.
    ///
    /// Used by position correction; velocities are left untouched.
    pub fn apply_position_impulse(&mut self, impulse: &Vector2<f64>, r: &Vector2<f64>) {
        self.center += self.inv_mass * impulse;
        self.angle += self.inv_inertia * cross(r, impulse);
    }

    /// Advance velocities by `dt` under `gravity`, then apply damping.
    pub fn integrate_velocity(
        &mut self,
        dt: f64,
        gravity: &Vector2<f64>,
        linear_damping: f64,
        angular_damping: f64,
    ) {
        if self.is_static() {
            return;
        }

        if self.inv_mass > 0.0 {
            self.linear_velocity += dt * gravity;
        }

        // Pade approximation of exp(-c * dt), stable for any dt
        self.linear_velocity *= 1.0 / (1.0 + dt * linear_damping);
        self.angular_velocity *= 1.0 / (1.0 + dt * angular_damping);
    }

    /// Advance the center of mass and angle by `dt`.
    pub fn integrate_position(&mut self, dt: f64) {
        self.center += dt * self.linear_velocity;
        self.angle += dt * self.angular_velocity;
    }

    /// Check if this body can neither translate nor rotate.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.inv_mass == 0.0 && self.inv_inertia == 0.0
    }

    /// Check if the body contains `NaN` or `Inf` values.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.center.coords.iter().all(|x| x.is_finite())
            && self.angle.is_finite()
            && self.linear_velocity.iter().all(|x| x.is_finite())
            && self.angular_velocity.is_finite()
    }

    /// Kinetic energy given the body's inverse mass properties.
    #[must_use]
    pub fn kinetic_energy(&self) -> f64 {
        let linear = if self.inv_mass > 0.0 {
            0.5 * self.linear_velocity.norm_squared() / self.inv_mass
        } else {
            0.0
        };
        let angular = if self.inv_inertia > 0.0 {
            0.5 * self.angular_velocity * self.angular_velocity / self.inv_inertia
        } else {
            0.0
        };
        linear + angular
    }
}

/// Arena of rigid bodies, indexed by [`BodyId`].
///
/// Bodies are never removed, so ids stay stable for the lifetime of the set.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodySet {
    bodies: Vec<RigidBody>,
}

impl BodySet {
    /// Create an empty body set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a body and return its id.
    pub fn insert(&mut self, body: RigidBody) -> BodyId {
        let id = BodyId::new(self.bodies.len() as u64);
        self.bodies.push(body);
        id
    }

    /// Get a body by id.
    #[must_use]
    pub fn get(&self, id: BodyId) -> Option<&RigidBody> {
        self.bodies.get(id.index()?)
    }

    /// Get a body mutably by id.
    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> {
        let index = id.index()?;
        self.bodies.get_mut(index)
    }

    /// Check if `id` refers to a body in this set.
    #[must_use]
    pub fn contains(&self, id: BodyId) -> bool {
        self.get(id).is_some()
    }

    /// Number of bodies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Check if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Iterate over bodies with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &RigidBody)> {
        self.bodies
            .iter()
            .enumerate()
            .map(|(i, body)| (BodyId::new(i as u64), body))
    }

    /// Iterate mutably over bodies with their ids.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyId, &mut RigidBody)> {
        self.bodies
            .iter_mut()
            .enumerate()
            .map(|(i, body)| (BodyId::new(i as u64), body))
    }
}
