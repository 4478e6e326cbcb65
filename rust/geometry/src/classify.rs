// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Height-band point classification
//!
//! Points are tagged purely by their height (y). The wall band and the
//! furniture band overlap: furniture heights are nested inside the wall band,
//! so the two passes run independently and a point between 0.3 m and 1.2 m is
//! reported as both a wall candidate and a furniture candidate. Only points in
//! neither band are discarded.

use crate::error::{Error, Result};
use roomscan_core::Point3D;

/// Open height interval `(min, max)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightBand {
    pub min: f32,
    pub max: f32,
}

impl HeightBand {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Strict containment. NaN is never contained.
    #[inline]
    pub fn contains(&self, y: f32) -> bool {
        y > self.min && y < self.max
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min >= self.max {
            return Err(Error::InvalidHeightBand {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Wall and furniture height bands
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightBands {
    pub wall: HeightBand,
    pub furniture: HeightBand,
}

impl HeightBands {
    /// Wall candidates: 0.1 m < y < 2.5 m
    pub const WALL: HeightBand = HeightBand::new(0.1, 2.5);
    /// Furniture candidates: 0.3 m < y < 1.2 m
    pub const FURNITURE: HeightBand = HeightBand::new(0.3, 1.2);

    pub fn validate(&self) -> Result<()> {
        self.wall.validate()?;
        self.furniture.validate()
    }
}

impl Default for HeightBands {
    fn default() -> Self {
        Self {
            wall: Self::WALL,
            furniture: Self::FURNITURE,
        }
    }
}

/// Result of classifying one point set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedPoints {
    /// Points inside the wall band, input order
    pub wall: Vec<Point3D>,
    /// Points inside the furniture band, input order
    pub furniture: Vec<Point3D>,
    /// Points in neither band, including malformed ones
    pub discarded: Vec<Point3D>,
    /// How many of the discarded points had NaN/infinite coordinates
    pub malformed: usize,
}

impl ClassifiedPoints {
    /// True when neither pass produced a candidate
    pub fn is_empty(&self) -> bool {
        self.wall.is_empty() && self.furniture.is_empty()
    }

    fn push(&mut self, p: Point3D, bands: &HeightBands) {
        if !p.is_finite() {
            self.malformed += 1;
            self.discarded.push(p);
            return;
        }

        let is_wall = bands.wall.contains(p.y);
        let is_furniture = bands.furniture.contains(p.y);

        if is_wall {
            self.wall.push(p);
        }
        if is_furniture {
            self.furniture.push(p);
        }
        if !is_wall && !is_furniture {
            self.discarded.push(p);
        }
    }
}

/// Classify structured points
pub fn classify_points(points: &[Point3D], bands: &HeightBands) -> ClassifiedPoints {
    let mut out = ClassifiedPoints::default();
    for &p in points {
        out.push(p, bands);
    }
    out
}

/// Classify a flat vertex list (stride 3). A trailing partial triple is dropped.
pub fn classify_vertices(vertices: &[f32], bands: &HeightBands) -> ClassifiedPoints {
    let mut out = ClassifiedPoints::default();
    for c in vertices.chunks_exact(3) {
        out.push(Point3D::new(c[0], c[1], c[2]), bands);
    }
    out
}
