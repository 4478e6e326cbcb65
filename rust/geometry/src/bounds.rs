// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bounding volumes for point clusters

use rayon::prelude::*;
use roomscan_core::{BoundingVolume, PointCluster, Point3D, ScanBounds};

/// Axis-aligned extents (max - min per axis) and mean centroid.
///
/// An empty slice gives [`BoundingVolume::EMPTY`] rather than an error.
/// Non-finite points do not contribute.
pub fn bounding_volume(points: &[Point3D]) -> BoundingVolume {
    ScanBounds::from_points(points).to_volume()
}

/// Bounding volume of every cluster, in cluster order
pub fn bounding_volumes(clusters: &[PointCluster]) -> Vec<BoundingVolume> {
    clusters
        .par_iter()
        .map(|cluster| bounding_volume(&cluster.points))
        .collect()
}
