// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! One pass of the room-layout pipeline
//!
//! classify -> {cluster walls -> wall segments} || {cluster furniture ->
//! bounding volumes -> labels} -> layout. The two branches share nothing and
//! run in parallel on the rayon pool; results are merged in a fixed order so
//! a pass is deterministic for a given input.

use crate::config::PipelineConfig;
use crate::error::Result;
use roomscan_core::{
    BoundingVolume, ClusterPurpose, FurnitureObject, Point3D, RoomLayout, WallSegment,
};
use roomscan_geometry::{
    bounding_volume, build_wall_segments, classify_points, cluster_points, detect_furniture,
    synthesize_layout, ClassifiedPoints, ClusterParams, HeightBands,
};
use std::time::Instant;

/// Everything one pass derives from its input points
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassOutput {
    /// The points the pass ran over
    pub points: Vec<Point3D>,
    /// Bounds of every finite input point
    pub bounds: BoundingVolume,
    pub walls: Vec<WallSegment>,
    pub furniture: Vec<FurnitureObject>,
    pub layout: RoomLayout,
    /// Input points with NaN/infinite coordinates
    pub malformed: usize,
}

/// Validated pipeline parameters
#[derive(Debug, Clone)]
pub struct Pipeline {
    bands: HeightBands,
    wall: ClusterParams,
    furniture: ClusterParams,
}

impl Pipeline {
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            bands: config.height_bands(),
            wall: config.wall_params(),
            furniture: config.furniture_params(),
        })
    }

    /// Run a full pass over `points`
    pub fn run(&self, points: Vec<Point3D>) -> PassOutput {
        let start = Instant::now();
        let bounds = bounding_volume(&points);

        let ClassifiedPoints {
            wall,
            furniture,
            malformed,
            ..
        } = classify_points(&points, &self.bands);

        if wall.is_empty() && furniture.is_empty() {
            tracing::debug!(points = points.len(), malformed, "no points in any height band");
        }

        let (walls, furniture) = rayon::join(
            || build_wall_segments(cluster_points(wall, ClusterPurpose::Wall, &self.wall)),
            || {
                detect_furniture(cluster_points(
                    furniture,
                    ClusterPurpose::Furniture,
                    &self.furniture,
                ))
            },
        );

        let layout = synthesize_layout(&walls, &furniture, &bounds);

        tracing::debug!(
            points = points.len(),
            walls = walls.len(),
            furniture = furniture.len(),
            room_type = %layout.room_type,
            elapsed_us = start.elapsed().as_micros() as u64,
            "pipeline pass"
        );

        PassOutput {
            points,
            bounds,
            walls,
            furniture,
            layout,
            malformed,
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            bands: HeightBands::default(),
            wall: ClusterParams::WALL,
            furniture: ClusterParams::FURNITURE,
        }
    }
}
