// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end geometry runs over synthetic rooms.

use approx::assert_relative_eq;
use roomscan_core::{ClusterPurpose, FurnitureType, Point3D, RoomType};
use roomscan_geometry::{
    bounding_volume, build_wall_segments, classify_points, cluster_points, detect_furniture,
    synthesize_layout, ClusterParams, HeightBands, Linkage,
};

/// 75 points in a small vertical patch at height ~2.0, outside the furniture band
fn wall_patch(cx: f32) -> Vec<Point3D> {
    (0..75)
        .map(|i| {
            let col = (i % 9) as f32 - 4.0;
            let row = (i / 9) as f32 - 4.0;
            Point3D::new(cx + col * 0.008, 2.0 + row * 0.008, 0.0)
        })
        .collect()
}

/// 50 points spaced at least 0.18 m apart, all within 0.5 m of the first one
fn table_points(center: Point3D) -> Vec<Point3D> {
    let mut offsets = vec![[0.0f32, 0.0, 0.0]];
    for x in [-0.25f32, 0.0, 0.25] {
        for y in [-0.2f32, 0.0, 0.2] {
            for z in [-0.375f32, -0.1875, 0.0, 0.1875, 0.375] {
                if x == 0.0 && y == 0.0 && z == 0.0 {
                    continue;
                }
                offsets.push([x, y, z]);
            }
        }
    }
    offsets.extend([
        [0.125, 0.1, 0.28125],
        [-0.125, 0.1, 0.28125],
        [0.125, -0.1, 0.28125],
        [-0.125, -0.1, -0.28125],
        [0.125, 0.1, -0.28125],
    ]);

    offsets
        .into_iter()
        .map(|[x, y, z]| Point3D::new(center.x + x, center.y + y, center.z + z))
        .collect()
}

fn two_walls_and_a_table() -> Vec<Point3D> {
    let mut points = wall_patch(0.0);
    points.extend(wall_patch(4.0));
    points.extend(table_points(Point3D::new(2.0, 0.55, 2.0)));
    points
}

fn run(points: &[Point3D], linkage: Linkage) -> roomscan_core::RoomLayout {
    let classified = classify_points(points, &HeightBands::default());
    let walls = build_wall_segments(cluster_points(
        classified.wall,
        ClusterPurpose::Wall,
        &ClusterParams::WALL.with_linkage(linkage),
    ));
    let furniture = detect_furniture(cluster_points(
        classified.furniture,
        ClusterPurpose::Furniture,
        &ClusterParams::FURNITURE.with_linkage(linkage),
    ));
    synthesize_layout(&walls, &furniture, &bounding_volume(points))
}

#[test]
fn fixture_has_expected_shape() {
    let points = two_walls_and_a_table();
    assert_eq!(points.len(), 200);

    let table = table_points(Point3D::new(2.0, 0.55, 2.0));
    for (i, a) in table.iter().enumerate() {
        assert!(a.distance_to(&table[0]) < 0.5);
        for b in &table[i + 1..] {
            assert!(a.distance_to(b) > 0.15);
        }
    }
}

#[test]
fn two_walls_and_a_table_make_a_plain_room() {
    let points = two_walls_and_a_table();
    let classified = classify_points(&points, &HeightBands::default());
    // table points sit in both bands
    assert_eq!(classified.wall.len(), 200);
    assert_eq!(classified.furniture.len(), 50);

    let walls = build_wall_segments(cluster_points(
        classified.wall,
        ClusterPurpose::Wall,
        &ClusterParams::WALL,
    ));
    assert_eq!(walls.len(), 2);
    assert!(walls.iter().all(|w| w.points.len() == 75));
    for wall in &walls {
        assert_relative_eq!(wall.normal[2], 1.0, epsilon = 1e-4);
    }

    let furniture = detect_furniture(cluster_points(
        classified.furniture,
        ClusterPurpose::Furniture,
        &ClusterParams::FURNITURE,
    ));
    assert_eq!(furniture.len(), 1);
    let table = &furniture[0];
    assert_eq!(table.furniture_type, FurnitureType::Table);
    assert_relative_eq!(table.dimensions.width, 0.5, epsilon = 1e-4);
    assert_relative_eq!(table.dimensions.height, 0.4, epsilon = 1e-4);
    assert_relative_eq!(table.dimensions.depth, 0.75, epsilon = 1e-4);

    let bounds = bounding_volume(&points);
    let layout = synthesize_layout(&walls, &furniture, &bounds);
    assert_eq!(layout.wall_count, 2);
    assert_eq!(layout.furniture_count, 1);
    assert_eq!(layout.room_type, RoomType::Room);
    assert_eq!(layout.floor_plan[0].id, "wall_0");
    assert_eq!(layout.floor_plan[1].id, "wall_1");
    assert_eq!(
        layout.total_area,
        bounds.dimensions.width * bounds.dimensions.depth
    );
}

#[test]
fn transitive_linkage_agrees_on_compact_scene() {
    let points = two_walls_and_a_table();
    let seed = run(&points, Linkage::Seed);
    let transitive = run(&points, Linkage::Transitive);
    assert_eq!(seed.wall_count, transitive.wall_count);
    assert_eq!(seed.furniture_count, transitive.furniture_count);
    assert_eq!(seed.room_type, transitive.room_type);
}

#[test]
fn empty_scene_yields_empty_layout() {
    let layout = run(&[], Linkage::Seed);
    assert_eq!(layout.wall_count, 0);
    assert_eq!(layout.furniture_count, 0);
    assert_eq!(layout.total_area, 0.0);
    assert_eq!(layout.room_type, RoomType::Room);
}

#[test]
fn points_below_every_band_produce_nothing() {
    let floor: Vec<_> = (0..300)
        .map(|i| Point3D::new((i % 20) as f32 * 0.05, 0.02, (i / 20) as f32 * 0.05))
        .collect();
    let layout = run(&floor, Linkage::Seed);
    assert_eq!(layout.wall_count, 0);
    assert_eq!(layout.furniture_count, 0);
    // area still covers every finite point
    assert!(layout.total_area > 0.0);
}
