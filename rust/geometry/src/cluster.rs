// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Distance-threshold spatial clustering
//!
//! Two linkage rules are available:
//!
//! - [`Linkage::Seed`] (default) is a single pass that grows each cluster only
//!   around its seed. For every point `i` not yet assigned, a new cluster is
//!   started and every later unassigned point `j` with `distance(i, j) < d`
//!   joins it. Members are never used as seeds themselves, so a chain of
//!   nearby points is split once it leaves the seed's radius. This is
//!   O(n²) with no spatial index; callers bound `n` upstream.
//! - [`Linkage::Transitive`] computes true connected components at the same
//!   threshold, using a voxel hash grid for neighbour lookup. Results differ
//!   from `Seed` whenever chains extend past the seed radius.
//!
//! In both modes a cluster is kept only if its size exceeds `min_points`.

use crate::error::{Error, Result};
use roomscan_core::{ClusterPurpose, Point3D, PointCluster};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;

/// How cluster membership propagates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Linkage {
    /// Members must be within the threshold of the seed
    #[default]
    Seed,
    /// Members must be reachable through a chain of points within the threshold
    Transitive,
}

/// Clustering parameters for one purpose
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterParams {
    /// Distance threshold in meters (strict `<`)
    pub distance: f32,
    /// Clusters of this size or smaller are dropped
    pub min_points: usize,
    pub linkage: Linkage,
}

impl ClusterParams {
    /// Wall clustering defaults
    pub const WALL: ClusterParams = ClusterParams {
        distance: 0.15,
        min_points: 10,
        linkage: Linkage::Seed,
    };

    /// Furniture clustering defaults
    pub const FURNITURE: ClusterParams = ClusterParams {
        distance: 0.5,
        min_points: 5,
        linkage: Linkage::Seed,
    };

    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.distance.is_finite() || self.distance <= 0.0 {
            return Err(Error::InvalidClusterDistance(self.distance));
        }
        Ok(())
    }
}

/// Group points into clusters for the given purpose.
///
/// Points are consumed; each retained cluster owns its members.
pub fn cluster_points(
    points: Vec<Point3D>,
    purpose: ClusterPurpose,
    params: &ClusterParams,
) -> Vec<PointCluster> {
    if points.is_empty() {
        return Vec::new();
    }

    let groups = match params.linkage {
        Linkage::Seed => seed_groups(&points, params.distance),
        Linkage::Transitive => transitive_groups(&points, params.distance),
    };

    groups
        .into_iter()
        .filter(|members| members.len() > params.min_points)
        .map(|members| PointCluster::new(purpose, members.into_iter().map(|i| points[i]).collect()))
        .collect()
}

/// Seed-relative single pass. Returns member indices in discovery order.
fn seed_groups(points: &[Point3D], distance: f32) -> Vec<Vec<usize>> {
    let n = points.len();
    let threshold_sq = distance * distance;
    let mut assigned = vec![false; n];
    let mut groups = Vec::new();

    for i in 0..n {
        if assigned[i] {
            continue;
        }
        assigned[i] = true;
        let seed = points[i];
        let mut members = vec![i];

        // Every index below i is already assigned
        for j in (i + 1)..n {
            if !assigned[j] && seed.distance_squared(&points[j]) < threshold_sq {
                assigned[j] = true;
                members.push(j);
            }
        }

        groups.push(members);
    }

    groups
}

type VoxelKey = (i32, i32, i32);

#[inline]
fn voxel_key(p: &Point3D, cell: f32) -> VoxelKey {
    (
        (p.x / cell).floor() as i32,
        (p.y / cell).floor() as i32,
        (p.z / cell).floor() as i32,
    )
}

/// Connected components via breadth-first search over a voxel grid with
/// cell size equal to the threshold, so neighbours live in the 27 cells
/// around a point.
fn transitive_groups(points: &[Point3D], distance: f32) -> Vec<Vec<usize>> {
    let threshold_sq = distance * distance;

    let mut grid: FxHashMap<VoxelKey, Vec<usize>> = FxHashMap::default();
    for (i, p) in points.iter().enumerate() {
        grid.entry(voxel_key(p, distance)).or_default().push(i);
    }

    let mut assigned = vec![false; points.len()];
    let mut groups = Vec::new();
    let mut queue = VecDeque::new();

    for start in 0..points.len() {
        if assigned[start] {
            continue;
        }
        assigned[start] = true;
        queue.push_back(start);
        let mut members = Vec::new();

        while let Some(current) = queue.pop_front() {
            members.push(current);
            let p = points[current];
            let (cx, cy, cz) = voxel_key(&p, distance);

            for dx in -1..=1 {
                for dy in -1..=1 {
                    for dz in -1..=1 {
                        let key = (cx.saturating_add(dx), cy.saturating_add(dy), cz.saturating_add(dz));
                        let Some(bucket) = grid.get(&key) else {
                            continue;
                        };
                        for &j in bucket {
                            if !assigned[j] && p.distance_squared(&points[j]) < threshold_sq {
                                assigned[j] = true;
                                queue.push_back(j);
                            }
                        }
                    }
                }
            }
        }

        groups.push(members);
    }

    groups
}
