// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raw sensor frames
//!
//! A frame is what the depth sensor hands over per capture: a flat array of
//! vertex coordinates with stride 3 plus a capture timestamp. Frames are never
//! rejected for being malformed. A trailing incomplete triple is simply not
//! turned into a point, and non-finite coordinates are left for the classifier
//! to discard.

use crate::Point3D;

/// One batch of vertices from the point source
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Frame {
    /// Flattened vertices (x, y, z, x, y, z, ...)
    pub vertices: Vec<f32>,
    /// Capture time reported by the sensor (seconds)
    #[cfg_attr(feature = "serde", serde(default))]
    pub frame_timestamp: f64,
}

impl Frame {
    pub fn new(vertices: Vec<f32>, frame_timestamp: f64) -> Self {
        Self {
            vertices,
            frame_timestamp,
        }
    }

    /// Build a frame from already-structured points
    pub fn from_points(points: &[Point3D], frame_timestamp: f64) -> Self {
        let mut vertices = Vec::with_capacity(points.len() * 3);
        for p in points {
            vertices.extend_from_slice(&[p.x, p.y, p.z]);
        }
        Self::new(vertices, frame_timestamp)
    }

    /// Number of complete vertex triples
    #[inline]
    pub fn point_count(&self) -> usize {
        self.vertices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }

    /// Iterate complete triples as points
    pub fn points(&self) -> impl Iterator<Item = Point3D> + '_ {
        self.vertices
            .chunks_exact(3)
            .map(|c| Point3D::new(c[0], c[1], c[2]))
    }
}
