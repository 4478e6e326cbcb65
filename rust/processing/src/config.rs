// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pipeline and session configuration

use crate::error::{Error, Result};
use roomscan_geometry::{ClusterParams, HeightBand, HeightBands, Linkage};
use serde::{Deserialize, Serialize};

/// Tunables for one pipeline pass. Defaults reproduce the stock heuristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Lower wall band edge in meters (exclusive)
    pub wall_band_min: f32,
    /// Upper wall band edge in meters (exclusive)
    pub wall_band_max: f32,
    /// Lower furniture band edge in meters (exclusive)
    pub furniture_band_min: f32,
    /// Upper furniture band edge in meters (exclusive)
    pub furniture_band_max: f32,
    /// Wall clustering distance threshold in meters
    pub wall_cluster_distance: f32,
    /// Wall clusters must have more members than this
    pub wall_min_points: usize,
    /// Furniture clustering distance threshold in meters
    pub furniture_cluster_distance: f32,
    /// Furniture clusters must have more members than this
    pub furniture_min_points: usize,
    /// Use connected components instead of seed-relative clustering
    pub transitive_linkage: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            wall_band_min: HeightBands::WALL.min,
            wall_band_max: HeightBands::WALL.max,
            furniture_band_min: HeightBands::FURNITURE.min,
            furniture_band_max: HeightBands::FURNITURE.max,
            wall_cluster_distance: ClusterParams::WALL.distance,
            wall_min_points: ClusterParams::WALL.min_points,
            furniture_cluster_distance: ClusterParams::FURNITURE.distance,
            furniture_min_points: ClusterParams::FURNITURE.min_points,
            transitive_linkage: false,
        }
    }
}

impl PipelineConfig {
    fn linkage(&self) -> Linkage {
        if self.transitive_linkage {
            Linkage::Transitive
        } else {
            Linkage::Seed
        }
    }

    pub fn height_bands(&self) -> HeightBands {
        HeightBands {
            wall: HeightBand::new(self.wall_band_min, self.wall_band_max),
            furniture: HeightBand::new(self.furniture_band_min, self.furniture_band_max),
        }
    }

    pub fn wall_params(&self) -> ClusterParams {
        ClusterParams {
            distance: self.wall_cluster_distance,
            min_points: self.wall_min_points,
            linkage: self.linkage(),
        }
    }

    pub fn furniture_params(&self) -> ClusterParams {
        ClusterParams {
            distance: self.furniture_cluster_distance,
            min_points: self.furniture_min_points,
            linkage: self.linkage(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.height_bands().validate()?;
        self.wall_params().validate()?;
        self.furniture_params().validate()?;
        Ok(())
    }
}

/// Settings for one scan session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    pub pipeline: PipelineConfig,
    /// Period between incremental passes, consumed by the driver
    pub tick_interval_ms: u64,
    /// Upper bound on points fed to one incremental pass
    pub max_tick_points: usize,
    /// Minimum decimation stride for incremental passes
    pub tick_stride: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig::default(),
            tick_interval_ms: 500,
            max_tick_points: 1000,
            tick_stride: 1,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<()> {
        self.pipeline.validate()?;
        if self.tick_interval_ms == 0 {
            return Err(Error::InvalidSetting {
                name: "tick_interval_ms",
                reason: "must be positive",
            });
        }
        if self.max_tick_points == 0 {
            return Err(Error::InvalidSetting {
                name: "max_tick_points",
                reason: "must be positive",
            });
        }
        if self.tick_stride == 0 {
            return Err(Error::InvalidSetting {
                name: "tick_stride",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}
