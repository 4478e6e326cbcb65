// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for clusters, furniture, walls and room layouts

use crate::Point3D;
use std::fmt;

/// What a clustering pass was looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ClusterPurpose {
    Wall,
    Furniture,
}

/// Spatially coherent group of points produced by one clustering pass
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointCluster {
    pub purpose: ClusterPurpose,
    /// Members in discovery order (seed first)
    pub points: Vec<Point3D>,
}

impl PointCluster {
    pub fn new(purpose: ClusterPurpose, points: Vec<Point3D>) -> Self {
        Self { purpose, points }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Extents along x (width), y (height) and z (depth)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Dimensions {
    pub const ZERO: Dimensions = Dimensions {
        width: 0.0,
        height: 0.0,
        depth: 0.0,
    };

    pub const fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    #[inline]
    pub fn volume(&self) -> f32 {
        self.width * self.height * self.depth
    }

    /// Largest horizontal extent, `max(width, depth)`
    #[inline]
    pub fn max_horizontal(&self) -> f32 {
        self.width.max(self.depth)
    }

    /// Planar footprint, `width * depth`
    #[inline]
    pub fn footprint(&self) -> f32 {
        self.width * self.depth
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.width, self.height, self.depth]
    }
}

/// Axis-aligned extents plus mean centroid of a point set
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingVolume {
    pub dimensions: Dimensions,
    pub centroid: Point3D,
}

impl BoundingVolume {
    /// Zero-size volume at the origin, used for empty inputs
    pub const EMPTY: BoundingVolume = BoundingVolume {
        dimensions: Dimensions::ZERO,
        centroid: Point3D::ORIGIN,
    };

    #[inline]
    pub fn volume(&self) -> f32 {
        self.dimensions.volume()
    }
}

/// Semantic furniture label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FurnitureType {
    Table,
    Bed,
    Wardrobe,
    Chair,
    Unknown,
}

impl FurnitureType {
    pub const ALL: [FurnitureType; 5] = [
        FurnitureType::Table,
        FurnitureType::Bed,
        FurnitureType::Wardrobe,
        FurnitureType::Chair,
        FurnitureType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FurnitureType::Table => "table",
            FurnitureType::Bed => "bed",
            FurnitureType::Wardrobe => "wardrobe",
            FurnitureType::Chair => "chair",
            FurnitureType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FurnitureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified furniture item from one cluster
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FurnitureObject {
    /// `furniture_<index>`, unique within one result
    pub id: String,
    pub furniture_type: FurnitureType,
    /// Cluster centroid
    pub position: Point3D,
    pub dimensions: Dimensions,
    /// Classification confidence (0.0 - 1.0)
    pub confidence: f32,
}

/// Wall built from one wall cluster
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WallSegment {
    /// Cluster members in discovery order (not geometrically sorted)
    pub points: Vec<Point3D>,
    /// Unit normal
    pub normal: [f32; 3],
    /// Polyline length through `points` in order
    pub length: f32,
}

/// Wall projected onto the floor plane
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloorPlanWall {
    /// `wall_<index>`
    pub id: String,
    /// `[x, z]` pairs
    pub points: Vec<[f32; 2]>,
    pub length: f32,
}

impl FloorPlanWall {
    /// Element kind reported to consumers
    pub const KIND: &'static str = "wall";
}

/// Room classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RoomType {
    Bedroom,
    LivingRoom,
    #[default]
    Room,
}

impl RoomType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Bedroom => "bedroom",
            RoomType::LivingRoom => "living_room",
            RoomType::Room => "room",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Floor plan summary, rebuilt on every pipeline pass
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomLayout {
    pub floor_plan: Vec<FloorPlanWall>,
    pub room_type: RoomType,
    /// Footprint of the overall scan bounds (width * depth), square meters
    pub total_area: f32,
    pub wall_count: usize,
    pub furniture_count: usize,
}
