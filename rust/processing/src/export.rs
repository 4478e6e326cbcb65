// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON export of a finished scan
//!
//! `points` is a flat `[x0, y0, z0, x1, ...]` array and `colors`, when present,
//! a flat RGB byte array of the same length. Coordinates are written as f32 so
//! decoding reproduces them bit for bit.

use crate::error::Result;
use crate::session::ScanResult;
use roomscan_core::{Dimensions, Point3D};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub point_count: usize,
    /// Completion time, milliseconds since the Unix epoch
    pub scan_time: u64,
    pub room_dimensions: Dimensions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub points: Vec<f32>,
    #[serde(default)]
    pub colors: Option<Vec<u8>>,
    pub metadata: ExportMetadata,
}

/// Height-ramp color used for point cloud previews.
///
/// Red rises and green falls with height; blue is constant.
pub fn height_color(y: f32) -> [u8; 3] {
    let r = ((y + 2.0) * 60.0).clamp(0.0, 255.0);
    let g = (150.0 - y * 30.0).clamp(0.0, 255.0);
    [r as u8, g as u8, 100]
}

impl ExportDocument {
    pub fn from_points(points: &[Point3D], scan_time: u64, room_dimensions: Dimensions) -> Self {
        let mut flat = Vec::with_capacity(points.len() * 3);
        let mut colors = Vec::with_capacity(points.len() * 3);
        for p in points {
            flat.extend_from_slice(&p.to_array());
            colors.extend_from_slice(&height_color(p.y));
        }
        Self {
            points: flat,
            colors: Some(colors),
            metadata: ExportMetadata {
                point_count: points.len(),
                scan_time,
                room_dimensions,
            },
        }
    }

    pub fn from_result(result: &ScanResult) -> Self {
        Self::from_points(
            &result.pass.points,
            result.completed_at_millis,
            result.pass.bounds.dimensions,
        )
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Points rebuilt from the flat array; a trailing partial triple is dropped
    pub fn to_points(&self) -> Vec<Point3D> {
        self.points
            .chunks_exact(3)
            .map(|c| Point3D::new(c[0], c[1], c[2]))
            .collect()
    }
}
