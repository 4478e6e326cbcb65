// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room layout synthesis
//!
//! The layout is a pure projection of the current walls, furniture and overall
//! scan bounds. `total_area` is the planar footprint of the scan bounds
//! (width * depth), not the area enclosed by the wall outline, and is
//! independent of wall lengths.

use roomscan_core::{
    BoundingVolume, FloorPlanWall, FurnitureObject, FurnitureType, RoomLayout, RoomType,
    WallSegment,
};

/// Room label from the detected furniture.
///
/// Any bed makes a bedroom. Otherwise a table together with more than two
/// items in total makes a living room.
pub fn classify_room(furniture: &[FurnitureObject]) -> RoomType {
    let has = |kind: FurnitureType| furniture.iter().any(|f| f.furniture_type == kind);

    if has(FurnitureType::Bed) {
        RoomType::Bedroom
    } else if has(FurnitureType::Table) && furniture.len() > 2 {
        RoomType::LivingRoom
    } else {
        RoomType::Room
    }
}

/// Project walls onto the floor plane as `[x, z]` polylines, ids `wall_<index>`
pub fn project_floor_plan(walls: &[WallSegment]) -> Vec<FloorPlanWall> {
    walls
        .iter()
        .enumerate()
        .map(|(index, wall)| FloorPlanWall {
            id: format!("wall_{index}"),
            points: wall.points.iter().map(|p| p.to_plan()).collect(),
            length: wall.length,
        })
        .collect()
}

/// Compose the room layout for one pipeline pass
pub fn synthesize_layout(
    walls: &[WallSegment],
    furniture: &[FurnitureObject],
    bounds: &BoundingVolume,
) -> RoomLayout {
    RoomLayout {
        floor_plan: project_floor_plan(walls),
        room_type: classify_room(furniture),
        total_area: bounds.dimensions.footprint(),
        wall_count: walls.len(),
        furniture_count: furniture.len(),
    }
}
