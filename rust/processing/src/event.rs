// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outbound scan events
//!
//! Field names and nesting are fixed by existing consumers: camelCase keys,
//! points as `[x, y, z]` arrays, walls as arrays of points, furniture `type`
//! as a lowercase label and floor plan points as `[x, z]`.

use crate::pipeline::PassOutput;
use crate::session::{ScanResult, ScanUpdate};
use roomscan_core::{Dimensions, FloorPlanWall, FurnitureObject, FurnitureType, RoomLayout, RoomType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    Scanning,
    Completed,
    /// Ended without a regular stop (sensor lost or aborted)
    Stopped,
    /// Legacy synonym of `Completed` still sent by some clients
    Success,
}

impl ScanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanStatus::Scanning => "scanning",
            ScanStatus::Completed => "completed",
            ScanStatus::Stopped => "stopped",
            ScanStatus::Success => "success",
        }
    }

    /// No further events follow
    pub fn is_final(&self) -> bool {
        !matches!(self, ScanStatus::Scanning)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnitureEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub furniture_type: FurnitureType,
    pub position: [f32; 3],
    /// `[width, height, depth]`
    pub dimensions: [f32; 3],
    pub confidence: f32,
}

impl From<&FurnitureObject> for FurnitureEvent {
    fn from(object: &FurnitureObject) -> Self {
        Self {
            id: object.id.clone(),
            furniture_type: object.furniture_type,
            position: object.position.to_array(),
            dimensions: object.dimensions.to_array(),
            confidence: object.confidence,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorPlanEntry {
    pub id: String,
    pub points: Vec<[f32; 2]>,
    pub length: f32,
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<&FloorPlanWall> for FloorPlanEntry {
    fn from(wall: &FloorPlanWall) -> Self {
        Self {
            id: wall.id.clone(),
            points: wall.points.clone(),
            length: wall.length,
            kind: FloorPlanWall::KIND.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomLayoutEvent {
    pub floor_plan: Vec<FloorPlanEntry>,
    pub room_type: RoomType,
    pub total_area: f32,
    pub wall_count: usize,
    pub furniture_count: usize,
}

impl From<&RoomLayout> for RoomLayoutEvent {
    fn from(layout: &RoomLayout) -> Self {
        Self {
            floor_plan: layout.floor_plan.iter().map(FloorPlanEntry::from).collect(),
            room_type: layout.room_type,
            total_area: layout.total_area,
            wall_count: layout.wall_count,
            furniture_count: layout.furniture_count,
        }
    }
}

/// One streaming update or final result, as sent to consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanEvent {
    pub points: Vec<[f32; 3]>,
    /// Number of entries in `points`
    pub point_count: usize,
    pub scan_time_millis: u64,
    pub room_dimensions: Dimensions,
    pub walls: Vec<Vec<[f32; 3]>>,
    pub furniture: Vec<FurnitureEvent>,
    pub room_layout: RoomLayoutEvent,
    pub status: ScanStatus,
}

impl ScanEvent {
    pub fn from_pass(pass: &PassOutput, scan_time_millis: u64, status: ScanStatus) -> Self {
        Self {
            points: pass.points.iter().map(|p| p.to_array()).collect(),
            point_count: pass.points.len(),
            scan_time_millis,
            room_dimensions: pass.bounds.dimensions,
            walls: pass
                .walls
                .iter()
                .map(|w| w.points.iter().map(|p| p.to_array()).collect())
                .collect(),
            furniture: pass.furniture.iter().map(FurnitureEvent::from).collect(),
            room_layout: RoomLayoutEvent::from(&pass.layout),
            status,
        }
    }

    /// Terminal event for an aborted scan
    pub fn aborted(scan_time_millis: u64) -> Self {
        Self::from_pass(&PassOutput::default(), scan_time_millis, ScanStatus::Stopped)
    }
}

impl From<&ScanUpdate> for ScanEvent {
    fn from(update: &ScanUpdate) -> Self {
        Self::from_pass(&update.pass, update.scan_time_millis, update.status)
    }
}

impl From<&ScanResult> for ScanEvent {
    fn from(result: &ScanResult) -> Self {
        Self::from_pass(&result.pass, result.scan_time_millis, result.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Pipeline;
    use roomscan_core::Point3D;
    use serde_json::Value;

    fn sample_pass() -> PassOutput {
        let mut points = Vec::new();
        for i in 0..4 {
            for j in 0..4 {
                points.push(Point3D::new(i as f32 * 0.03, 0.5 + j as f32 * 0.03, 1.0));
            }
        }
        Pipeline::default().run(points)
    }

    #[test]
    fn wire_field_names() {
        let event = ScanEvent::from_pass(&sample_pass(), 1500, ScanStatus::Scanning);
        let json = serde_json::to_value(&event).unwrap();

        for key in [
            "points",
            "pointCount",
            "scanTimeMillis",
            "roomDimensions",
            "walls",
            "furniture",
            "roomLayout",
            "status",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["pointCount"], 16);
        assert_eq!(json["status"], "scanning");
        assert!(json["roomDimensions"]["width"].is_number());
        assert_eq!(json["points"][0].as_array().unwrap().len(), 3);

        let furniture = &json["furniture"][0];
        assert_eq!(furniture["id"], "furniture_0");
        assert_eq!(furniture["type"], "chair");
        assert_eq!(furniture["dimensions"].as_array().unwrap().len(), 3);

        let layout = &json["roomLayout"];
        for key in ["floorPlan", "roomType", "totalArea", "wallCount", "furnitureCount"] {
            assert!(layout.get(key).is_some(), "missing roomLayout.{key}");
        }
        assert_eq!(layout["roomType"], "room");
        let wall = &layout["floorPlan"][0];
        assert_eq!(wall["id"], "wall_0");
        assert_eq!(wall["type"], "wall");
        assert_eq!(wall["points"][0], Value::from(vec![0.0f32, 1.0]));
    }

    #[test]
    fn point_count_matches_points() {
        let event = ScanEvent::from_pass(&sample_pass(), 0, ScanStatus::Completed);
        assert_eq!(event.point_count, event.points.len());
        assert_eq!(event.walls.len(), event.room_layout.wall_count);
    }

    #[test]
    fn statuses_round_trip_as_lowercase() {
        for (status, text) in [
            (ScanStatus::Scanning, "\"scanning\""),
            (ScanStatus::Completed, "\"completed\""),
            (ScanStatus::Stopped, "\"stopped\""),
            (ScanStatus::Success, "\"success\""),
        ] {
            assert_eq!(serde_json::to_string(&status).unwrap(), text);
            assert_eq!(serde_json::from_str::<ScanStatus>(text).unwrap(), status);
            assert_eq!(format!("\"{}\"", status.as_str()), text);
        }
        assert!(!ScanStatus::Scanning.is_final());
        assert!(ScanStatus::Success.is_final());
    }

    #[test]
    fn aborted_event_is_empty_and_final() {
        let event = ScanEvent::aborted(42);
        assert_eq!(event.point_count, 0);
        assert_eq!(event.status, ScanStatus::Stopped);
        assert_eq!(event.room_layout.total_area, 0.0);
    }
}
