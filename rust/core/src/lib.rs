// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Room Scan Core
//!
//! Data model shared by every stage of the room-layout inference pipeline.
//!
//! ## Overview
//!
//! A depth sensor delivers [`Frame`]s of flattened vertices. The pipeline turns
//! them into [`Point3D`] values, groups them into [`PointCluster`]s, measures
//! each cluster with a [`BoundingVolume`], and finally produces
//! [`WallSegment`]s, [`FurnitureObject`]s and a [`RoomLayout`].
//!
//! All types here are plain values. Stages hand them to each other by value and
//! nothing in this crate holds a reference back to upstream data.
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for the model types

pub mod bounds;
pub mod frame;
pub mod point;
pub mod types;

pub use bounds::ScanBounds;
pub use frame::Frame;
pub use point::Point3D;
pub use types::{
    BoundingVolume, ClusterPurpose, Dimensions, FloorPlanWall, FurnitureObject, FurnitureType,
    PointCluster, RoomLayout, RoomType, WallSegment,
};
