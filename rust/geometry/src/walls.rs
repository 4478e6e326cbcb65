// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall segments from wall clusters
//!
//! One segment per cluster, no merging of adjacent or colinear clusters.
//! Points stay in discovery order, and the segment length is the polyline
//! length through them in that order.

use nalgebra::{Matrix3, Vector3};
use roomscan_core::{PointCluster, Point3D, WallSegment};

/// Fallback normal when the cluster does not define a plane
pub const UP: [f32; 3] = [0.0, 1.0, 0.0];

/// Relative eigenvalue floor below which a direction counts as flat
const DEGENERATE_RATIO: f64 = 1e-9;

#[inline]
fn to_vector(p: &Point3D) -> Vector3<f64> {
    Vector3::new(p.x as f64, p.y as f64, p.z as f64)
}

/// Sum of distances between consecutive points
pub fn polyline_length(points: &[Point3D]) -> f32 {
    points
        .windows(2)
        .map(|pair| pair[0].distance_to(&pair[1]))
        .sum()
}

/// Plane normal from the covariance of the points.
///
/// Takes the eigenvector of the smallest eigenvalue and flips it so its
/// largest component is positive. Returns [`UP`] when there are fewer than
/// three points, the points are coincident or colinear, or the estimate is
/// not finite.
pub fn estimate_normal(points: &[Point3D]) -> [f32; 3] {
    let finite: Vec<Vector3<f64>> = points
        .iter()
        .filter(|p| p.is_finite())
        .map(to_vector)
        .collect();
    if finite.len() < 3 {
        return UP;
    }

    let n = finite.len() as f64;
    let mean = finite.iter().fold(Vector3::zeros(), |acc, v| acc + v) / n;
    let mut covariance = Matrix3::<f64>::zeros();
    for v in &finite {
        let d = v - mean;
        covariance += d * d.transpose();
    }
    covariance /= n;

    let eigen = covariance.symmetric_eigen();
    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| eigen.eigenvalues[a].total_cmp(&eigen.eigenvalues[b]));

    let largest = eigen.eigenvalues[order[2]];
    let middle = eigen.eigenvalues[order[1]];
    if largest <= 0.0 || middle <= largest * DEGENERATE_RATIO {
        return UP;
    }

    let mut normal: Vector3<f64> = eigen.eigenvectors.column(order[0]).into_owned();
    let norm = normal.norm();
    if !norm.is_finite() || norm == 0.0 {
        return UP;
    }
    normal /= norm;

    let dominant = normal.iamax();
    if normal[dominant] < 0.0 {
        normal = -normal;
    }

    [normal.x as f32, normal.y as f32, normal.z as f32]
}

/// Build one wall segment, consuming the cluster
pub fn build_wall_segment(cluster: PointCluster) -> WallSegment {
    let length = polyline_length(&cluster.points);
    let normal = estimate_normal(&cluster.points);
    WallSegment {
        points: cluster.points,
        normal,
        length,
    }
}

/// Build one segment per cluster, preserving order
pub fn build_wall_segments(clusters: Vec<PointCluster>) -> Vec<WallSegment> {
    clusters.into_iter().map(build_wall_segment).collect()
}
