//! Constraint islands.
//!
//! An island is a set of bodies connected through joints, together with the
//! joints that touch them. Islands share no bodies, so each one can be solved
//! on its own.
//!
//! Detection is a union-find over the bodies referenced by the joints. A side
//! anchored to the world (`body_b() == None`) links nothing: the world is
//! immovable, so two joints hanging from it stay independent.
//!
//! Within an island the joints keep the order they had in the input slice.
//! Gauss-Seidel results depend on that order, so it must not change between
//! steps.
//!
//! # Example
//!
//! ```
//! use sim2d_constraint::{ConstraintIslands, FixedDistanceJoint};
//! use sim2d_types::{BodySet, MassProperties, RigidBody};
//! use nalgebra::Point2;
//!
//! let mut bodies = BodySet::new();
//! let mass = MassProperties::disk(1.0, 0.1);
//! let a = bodies.insert(RigidBody::dynamic(Point2::new(0.0, -1.0), 0.0, &mass)?);
//! let b = bodies.insert(RigidBody::dynamic(Point2::new(3.0, -1.0), 0.0, &mass)?);
//!
//! let joints = vec![
//!     FixedDistanceJoint::new(&bodies, a, Point2::origin(), Point2::new(0.0, 0.0))?,
//!     FixedDistanceJoint::new(&bodies, b, Point2::origin(), Point2::new(3.0, 0.0))?,
//!     FixedDistanceJoint::new(&bodies, a, Point2::origin(), Point2::new(-1.0, 0.0))?,
//! ];
//!
//! let islands = ConstraintIslands::build(&joints);
//! assert_eq!(islands.num_islands(), 2);
//! assert_eq!(islands.islands()[0].constraint_indices, vec![0, 2]);
//! # Ok::<(), sim2d_types::SimError>(())
//! ```

use sim2d_types::BodyId;
use std::collections::HashMap;

use crate::Joint;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bodies connected through joints, plus the joints that connect them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Island {
    /// Bodies in this island, sorted by ID.
    pub bodies: Vec<BodyId>,

    /// Indices into the joint slice the islands were built from, ascending.
    pub constraint_indices: Vec<usize>,

    /// Whether every body in the island is immovable. Such islands have
    /// nothing to solve.
    pub is_static: bool,
}

impl Island {
    /// Number of bodies in this island.
    #[must_use]
    pub fn num_bodies(&self) -> usize {
        self.bodies.len()
    }

    /// Number of joints in this island.
    #[must_use]
    pub fn num_constraints(&self) -> usize {
        self.constraint_indices.len()
    }

    /// Check if this island contains a specific body.
    #[must_use]
    pub fn contains_body(&self, body: BodyId) -> bool {
        self.bodies.binary_search(&body).is_ok()
    }
}

/// Partition of a joint slice into independent islands.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConstraintIslands {
    islands: Vec<Island>,
    body_to_island: HashMap<BodyId, usize>,
    total_constraints: usize,
}

impl ConstraintIslands {
    /// Group `joints` into islands.
    ///
    /// Islands are numbered in the order their first joint appears.
    #[must_use]
    pub fn build<J: Joint>(joints: &[J]) -> Self {
        if joints.is_empty() {
            return Self::default();
        }

        // Dense index per body, in order of first reference
        let mut body_ids: Vec<BodyId> = Vec::new();
        let mut body_index: HashMap<BodyId, usize> = HashMap::new();
        let mut index_of = |id: BodyId| {
            *body_index.entry(id).or_insert_with(|| {
                body_ids.push(id);
                body_ids.len() - 1
            })
        };

        let joint_bodies: Vec<(usize, Option<usize>)> = joints
            .iter()
            .map(|joint| (index_of(joint.body_a()), joint.body_b().map(&mut index_of)))
            .collect();

        let mut uf = UnionFind::new(body_ids.len());
        for &(a, b) in &joint_bodies {
            if let Some(b) = b {
                uf.union(a, b);
            }
        }

        let mut root_to_island: HashMap<usize, usize> = HashMap::new();
        let mut islands: Vec<Island> = Vec::new();
        let mut body_to_island: HashMap<BodyId, usize> = HashMap::new();

        for (joint_idx, &(a, _)) in joint_bodies.iter().enumerate() {
            let root = uf.find(a);
            let island_idx = *root_to_island.entry(root).or_insert_with(|| {
                islands.push(Island::default());
                islands.len() - 1
            });
            islands[island_idx].constraint_indices.push(joint_idx);
        }

        for (idx, &id) in body_ids.iter().enumerate() {
            let root = uf.find(idx);
            // Every body is referenced by at least one joint, so its root has an island
            if let Some(&island_idx) = root_to_island.get(&root) {
                islands[island_idx].bodies.push(id);
                body_to_island.insert(id, island_idx);
            }
        }

        for island in &mut islands {
            island.bodies.sort_unstable();
        }

        Self {
            islands,
            body_to_island,
            total_constraints: joints.len(),
        }
    }

    /// Group `joints` into islands and flag islands whose bodies are all
    /// immovable.
    #[must_use]
    pub fn build_with_static_info<J, F>(joints: &[J], is_body_static: F) -> Self
    where
        J: Joint,
        F: Fn(BodyId) -> bool,
    {
        let mut islands = Self::build(joints);
        for island in &mut islands.islands {
            island.is_static = island.bodies.iter().all(|&id| is_body_static(id));
        }
        islands
    }

    /// Number of islands.
    #[must_use]
    pub fn num_islands(&self) -> usize {
        self.islands.len()
    }

    /// Number of distinct bodies referenced by the joints.
    #[must_use]
    pub fn total_bodies(&self) -> usize {
        self.body_to_island.len()
    }

    /// Number of joints the islands were built from.
    #[must_use]
    pub fn total_constraints(&self) -> usize {
        self.total_constraints
    }

    /// All islands.
    #[must_use]
    pub fn islands(&self) -> &[Island] {
        &self.islands
    }

    /// A specific island by index.
    #[must_use]
    pub fn get_island(&self, index: usize) -> Option<&Island> {
        self.islands.get(index)
    }

    /// Island index of a body, or `None` if no joint references it.
    #[must_use]
    pub fn island_for_body(&self, body: BodyId) -> Option<usize> {
        self.body_to_island.get(&body).copied()
    }

    /// Check if two bodies are in the same island.
    #[must_use]
    pub fn same_island(&self, body_a: BodyId, body_b: BodyId) -> bool {
        match (self.island_for_body(body_a), self.island_for_body(body_b)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Islands that have something to solve.
    pub fn active_islands(&self) -> impl Iterator<Item = (usize, &Island)> {
        self.islands.iter().enumerate().filter(|(_, i)| !i.is_static)
    }

    /// Summary of the island distribution.
    #[must_use]
    pub fn statistics(&self) -> IslandStatistics {
        if self.islands.is_empty() {
            return IslandStatistics::default();
        }

        let count = self.islands.len() as f64;
        IslandStatistics {
            num_islands: self.islands.len(),
            num_static_islands: self.islands.iter().filter(|i| i.is_static).count(),
            max_bodies_per_island: self.islands.iter().map(Island::num_bodies).max().unwrap_or(0),
            max_constraints_per_island: self
                .islands
                .iter()
                .map(Island::num_constraints)
                .max()
                .unwrap_or(0),
            avg_bodies_per_island: self.total_bodies() as f64 / count,
            avg_constraints_per_island: self.total_constraints as f64 / count,
        }
    }
}

/// Statistics about the island distribution.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IslandStatistics {
    /// Total number of islands.
    pub num_islands: usize,
    /// Number of islands with only immovable bodies.
    pub num_static_islands: usize,
    /// Most bodies in any island.
    pub max_bodies_per_island: usize,
    /// Most joints in any island.
    pub max_constraints_per_island: usize,
    /// Mean bodies per island.
    pub avg_bodies_per_island: f64,
    /// Mean joints per island.
    pub avg_constraints_per_island: f64,
}

/// Disjoint-set forest with path compression and union by rank.
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    fn union(&mut self, x: usize, y: usize) {
        let root_x = self.find(x);
        let root_y = self.find(y);
        if root_x == root_y {
            return;
        }

        match self.rank[root_x].cmp(&self.rank[root_y]) {
            std::cmp::Ordering::Less => self.parent[root_x] = root_y,
            std::cmp::Ordering::Greater => self.parent[root_y] = root_x,
            std::cmp::Ordering::Equal => {
                self.parent[root_y] = root_x;
                self.rank[root_x] = self.rank[root_x].saturating_add(1);
            }
        }
    }
}
