//! Core types for planar rigid-body simulation.
//!
//! This crate provides the foundational types shared by the planar solver
//! crates:
//!
//! - [`RigidBody`] - Center of mass, orientation, velocity, inverse mass
//! - [`BodySet`] - Arena of bodies indexed by [`BodyId`]
//! - [`MassProperties`] - Mass, inertia and center of mass offset
//! - [`TimeStep`] - Per-step timing, including the warm-start ratio
//! - [`SolverConfig`] / [`Tolerances`] - Iteration counts and thresholds
//!
//! # Design Philosophy
//!
//! These types are **pure data**. Bodies know how to transform points and
//! absorb impulses, but they do not solve anything. Constraint crates mutate
//! them through `&mut BodySet`, one call at a time.
//!
//! # Coordinate System
//!
//! - X: right
//! - Y: up
//! - Angles are counter-clockwise, in radians
//! - Angular velocity and torque are scalars (the z component)
//!
//! # Example
//!
//! ```
//! use sim2d_types::{BodySet, MassProperties, RigidBody};
//! use nalgebra::{Point2, Vector2};
//!
//! let mut bodies = BodySet::new();
//! let ball = RigidBody::dynamic(Point2::new(0.0, 1.0), 0.0, &MassProperties::disk(1.0, 0.25))?;
//! let id = bodies.insert(ball);
//!
//! let body = bodies.get(id).ok_or(sim2d_types::SimError::InvalidBodyId(id))?;
//! assert_eq!(body.center.y, 1.0);
//! assert!(body.linear_velocity.norm() < 1e-10);
//! # Ok::<(), sim2d_types::SimError>(())
//! ```

#![doc(html_root_url = "https://docs.rs/sim2d-types/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,          // mul_add style changes aren't always clearer
    clippy::cast_precision_loss,       // usize to f64 is fine for counts
    clippy::missing_errors_doc,        // Error docs added where non-obvious
)]

mod body;
mod config;
mod error;
pub mod math;
mod step;

pub use body::{BodyId, BodySet, MassProperties, RigidBody};
pub use config::{
    SolverConfig, Tolerances, DEFAULT_LINEAR_SLOP, DEFAULT_MAX_LINEAR_CORRECTION,
    STANDARD_GRAVITY,
};
pub use error::SimError;
pub use step::TimeStep;

// Re-export math types for convenience
pub use nalgebra::{Point2, UnitComplex, Vector2};

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;
