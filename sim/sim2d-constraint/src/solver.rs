//! Reference step driver.
//!
//! [`IslandSolver`] runs the full per-step sequence over a body arena and a
//! slice of joints, one island at a time:
//!
//! ```text
//! integrate velocities
//! for each island: init joints, then velocity passes
//! integrate positions
//! for each island: position passes until every joint converges
//! ```

use sim2d_types::{BodySet, RigidBody, SimError, SolverConfig, TimeStep};
use tracing::{debug_span, trace};

use crate::{ConstraintIslands, Joint};

/// Steps bodies and joints forward in time.
///
/// Keeps the previous step's inverse duration so warm-start impulses are
/// rescaled when the step size changes.
#[derive(Debug, Clone)]
pub struct IslandSolver {
    config: SolverConfig,
    prev_inv_dt: f64,
}

impl Default for IslandSolver {
    fn default() -> Self {
        Self {
            config: SolverConfig::default(),
            prev_inv_dt: 0.0,
        }
    }
}

impl IslandSolver {
    /// Create a solver, rejecting an invalid configuration.
    pub fn new(config: SolverConfig) -> sim2d_types::Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            prev_inv_dt: 0.0,
        })
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Forget the previous step, so the next step starts without warm
    /// starting.
    pub fn reset(&mut self) {
        self.prev_inv_dt = 0.0;
    }

    /// Advance `bodies` by `dt` under the constraints in `joints`.
    ///
    /// Joints keep their relative order inside each island.
    ///
    /// # Errors
    ///
    /// - [`SimError::InvalidTimestep`] if `dt` is not positive and finite. The
    ///   bodies are left untouched.
    /// - [`SimError::Diverged`] if any body ends the step with a non-finite
    ///   value.
    pub fn step<J: Joint>(
        &mut self,
        bodies: &mut BodySet,
        joints: &mut [J],
        dt: f64,
    ) -> sim2d_types::Result<StepReport> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SimError::InvalidTimestep(dt));
        }

        let _span = debug_span!("island_step", dt, bodies = bodies.len(), joints = joints.len())
            .entered();

        let step = TimeStep::new(dt, self.prev_inv_dt, &self.config);
        self.prev_inv_dt = step.inv_dt;

        for (_, body) in bodies.iter_mut() {
            body.integrate_velocity(
                dt,
                &self.config.gravity,
                self.config.linear_damping,
                self.config.angular_damping,
            );
        }

        let islands = ConstraintIslands::build_with_static_info(joints, |id| {
            bodies.get(id).map_or(true, RigidBody::is_static)
        });

        for (_, island) in islands.active_islands() {
            for &idx in &island.constraint_indices {
                joints[idx].init_velocity_constraints(bodies, &step);
            }
            for _ in 0..step.velocity_iterations {
                for &idx in &island.constraint_indices {
                    joints[idx].solve_velocity_constraints(bodies, &step);
                }
            }
        }

        for (_, body) in bodies.iter_mut() {
            body.integrate_position(dt);
        }

        let mut report = StepReport {
            num_islands: islands.num_islands(),
            position_iterations: vec![0; islands.num_islands()],
            converged: true,
        };

        for (island_idx, island) in islands.active_islands() {
            let mut island_converged = false;
            for iteration in 0..step.position_iterations {
                let mut all_satisfied = true;
                for &idx in &island.constraint_indices {
                    all_satisfied &= joints[idx].solve_position_constraints(bodies, &step.tolerances);
                }

                report.position_iterations[island_idx] = iteration + 1;
                if all_satisfied {
                    island_converged = true;
                    break;
                }
            }

            trace!(
                island = island_idx,
                joints = island.num_constraints(),
                iterations = report.position_iterations[island_idx],
                converged = island_converged,
                "position correction finished"
            );
            report.converged &= island_converged;
        }

        if let Some((id, _)) = bodies.iter().find(|(_, body)| !body.is_finite()) {
            return Err(SimError::diverged(format!("{id} has non-finite state")));
        }

        Ok(report)
    }
}

/// Outcome of one [`IslandSolver::step`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Number of islands solved, including static ones.
    pub num_islands: usize,
    /// Position passes used by each island. Static islands report 0.
    pub position_iterations: Vec<usize>,
    /// Whether every active island finished within tolerance.
    pub converged: bool,
}

impl StepReport {
    /// Most position passes used by any island.
    #[must_use]
    pub fn max_position_iterations(&self) -> usize {
        self.position_iterations.iter().copied().max().unwrap_or(0)
    }
}
