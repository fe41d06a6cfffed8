//! Planar cross products.
//!
//! In 2-D the cross product of two vectors is a scalar (the z component of
//! the 3-D cross product), and crossing a scalar with a vector treats the
//! scalar as a vector along z. Angular velocity and torque are scalars here.

use nalgebra::Vector2;

/// Cross product of two planar vectors: `a.x * b.y - a.y * b.x`.
#[must_use]
#[inline]
pub fn cross(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Cross product of a scalar (z axis) with a vector: `s × v`.
///
/// This is the velocity of a point at offset `v` on a body spinning at `s`.
#[must_use]
#[inline]
pub fn cross_sv(s: f64, v: &Vector2<f64>) -> Vector2<f64> {
    Vector2::new(-s * v.y, s * v.x)
}
