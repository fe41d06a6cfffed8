//! Sequential-impulse joint constraints for planar rigid bodies.
//!
//! Joints read and write body state in place through a [`BodySet`], one call
//! at a time. Later solves in the same pass see the corrections of earlier
//! ones (Gauss-Seidel), so results depend on joint order.
//!
//! # Joint Types
//!
//! - [`FixedDistanceJoint`]: keeps an anchor on a body at a fixed distance from
//!   a point in world space, rigidly or as a spring-damper
//!
//! # Per-Step Protocol
//!
//! Every [`Joint`] is driven through the same sequence each step:
//!
//! 1. `init_velocity_constraints` once, which also applies the warm-start impulse
//! 2. `solve_velocity_constraints` once per velocity iteration
//! 3. position integration, done by the caller
//! 4. `solve_position_constraints` once per position iteration, stopping early
//!    when every joint reports `true`
//!
//! [`IslandSolver`] implements that sequence, grouping joints into
//! [`ConstraintIslands`] first.
//!
//! # Example
//!
//! ```
//! use sim2d_constraint::{FixedDistanceJoint, IslandSolver};
//! use sim2d_types::{BodySet, MassProperties, RigidBody, SolverConfig};
//! use nalgebra::Point2;
//!
//! let mut bodies = BodySet::new();
//! let bob = bodies.insert(RigidBody::dynamic(
//!     Point2::new(1.0, 0.0),
//!     0.0,
//!     &MassProperties::disk(1.0, 0.1),
//! )?);
//!
//! // Pendulum of length 1 pivoting about the origin
//! let mut joints = vec![FixedDistanceJoint::new(&bodies, bob, Point2::origin(), Point2::origin())?];
//!
//! let mut solver = IslandSolver::new(SolverConfig::default())?;
//! for _ in 0..60 {
//!     solver.step(&mut bodies, &mut joints, 1.0 / 60.0)?;
//! }
//!
//! let length = joints[0].current_length(&bodies).unwrap_or_default();
//! assert!((length - 1.0).abs() < 0.01);
//! # Ok::<(), sim2d_types::SimError>(())
//! ```

#![doc(html_root_url = "https://docs.rs/sim2d-constraint/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,          // mul_add style changes aren't always clearer
    clippy::cast_precision_loss,       // usize to f64 is fine for counts
    clippy::missing_errors_doc,        // Error docs added where non-obvious
    clippy::module_name_repetitions,   // JointType in joint module is fine
)]

mod distance;
mod islands;
mod joint;
mod solver;

pub use distance::{FixedDistanceJoint, MIN_JOINT_LENGTH};
pub use islands::{ConstraintIslands, Island, IslandStatistics};
pub use joint::{Joint, JointType};
pub use solver::{IslandSolver, StepReport};

// Re-export the body and step types joints are driven with
pub use sim2d_types::{
    BodyId, BodySet, MassProperties, RigidBody, SimError, SolverConfig, TimeStep, Tolerances,
};
