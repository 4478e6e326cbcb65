// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Running bounds accumulator for point sets
//!
//! Tracks min/max per axis and the coordinate sums needed for the arithmetic
//! mean, all in f64 so long scans do not lose precision while accumulating
//! f32 sensor values.

use crate::{BoundingVolume, Dimensions, Point3D};

/// Axis-aligned bounds of the points seen so far
#[derive(Debug, Clone)]
pub struct ScanBounds {
    /// Minimum X coordinate found
    pub min_x: f64,
    /// Minimum Y coordinate found
    pub min_y: f64,
    /// Minimum Z coordinate found
    pub min_z: f64,
    /// Maximum X coordinate found
    pub max_x: f64,
    /// Maximum Y coordinate found
    pub max_y: f64,
    /// Maximum Z coordinate found
    pub max_z: f64,
    sum_x: f64,
    sum_y: f64,
    sum_z: f64,
    /// Number of points accepted
    pub sample_count: usize,
}

impl ScanBounds {
    /// Create new bounds initialized to invalid state
    pub fn new() -> Self {
        Self {
            min_x: f64::MAX,
            min_y: f64::MAX,
            min_z: f64::MAX,
            max_x: f64::MIN,
            max_y: f64::MIN,
            max_z: f64::MIN,
            sum_x: 0.0,
            sum_y: 0.0,
            sum_z: 0.0,
            sample_count: 0,
        }
    }

    /// Bounds of every finite point in `points`
    pub fn from_points(points: &[Point3D]) -> Self {
        let mut bounds = Self::new();
        for p in points {
            bounds.expand(p);
        }
        bounds
    }

    /// Check if bounds are valid (at least one point added)
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.sample_count > 0
    }

    /// Expand bounds to include a point. Non-finite points are ignored.
    #[inline]
    pub fn expand(&mut self, p: &Point3D) -> bool {
        if !p.is_finite() {
            return false;
        }
        let (x, y, z) = (p.x as f64, p.y as f64, p.z as f64);
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.min_z = self.min_z.min(z);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
        self.max_z = self.max_z.max(z);
        self.sum_x += x;
        self.sum_y += y;
        self.sum_z += z;
        self.sample_count += 1;
        true
    }

    /// Extents per axis (zero when empty)
    pub fn extents(&self) -> Dimensions {
        if !self.is_valid() {
            return Dimensions::ZERO;
        }
        Dimensions {
            width: (self.max_x - self.min_x) as f32,
            height: (self.max_y - self.min_y) as f32,
            depth: (self.max_z - self.min_z) as f32,
        }
    }

    /// Arithmetic mean of accepted points (origin when empty)
    pub fn mean(&self) -> Point3D {
        if !self.is_valid() {
            return Point3D::ORIGIN;
        }
        let n = self.sample_count as f64;
        Point3D::new(
            (self.sum_x / n) as f32,
            (self.sum_y / n) as f32,
            (self.sum_z / n) as f32,
        )
    }

    /// Extents and mean centroid
    pub fn to_volume(&self) -> BoundingVolume {
        BoundingVolume {
            dimensions: self.extents(),
            centroid: self.mean(),
        }
    }
}

impl Default for ScanBounds {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bounds_are_invalid_and_zero() {
        let bounds = ScanBounds::new();
        assert!(!bounds.is_valid());
        assert_eq!(bounds.extents(), Dimensions::ZERO);
        assert_eq!(bounds.mean(), Point3D::ORIGIN);
    }

    #[test]
    fn expand_tracks_min_max_and_mean() {
        let bounds = ScanBounds::from_points(&[
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(2.0, 1.0, 4.0),
            Point3D::new(1.0, 2.0, 2.0),
        ]);
        assert_eq!(bounds.sample_count, 3);
        assert_eq!(bounds.extents(), Dimensions::new(2.0, 2.0, 4.0));
        assert_eq!(bounds.mean(), Point3D::new(1.0, 1.0, 2.0));
    }

    #[test]
    fn non_finite_points_are_skipped() {
        let mut bounds = ScanBounds::new();
        assert!(!bounds.expand(&Point3D::new(f32::NAN, 0.0, 0.0)));
        assert!(bounds.expand(&Point3D::new(1.0, 1.0, 1.0)));
        assert_eq!(bounds.sample_count, 1);
        assert_eq!(bounds.extents(), Dimensions::ZERO);
    }
}
