// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Heuristic furniture classification from bounding volumes
//!
//! Rules are checked in a fixed order and the first match wins:
//!
//! | Order | Rule | Label |
//! |---|---|---|
//! | 1 | height < 0.5 and volume > 0.1 | table |
//! | 2 | 0.8 < height < 1.5 and max(width, depth) > 1.5 | bed |
//! | 3 | height > 1.5 and volume > 0.5 | wardrobe |
//! | 4 | height < 0.6 and max(width, depth) < 0.8 | chair |
//! | 5 | anything else | unknown |
//!
//! Every object carries the same placeholder confidence; it is not derived
//! from how well the rule fits.

use crate::bounds::bounding_volumes;
use roomscan_core::{BoundingVolume, FurnitureObject, FurnitureType, PointCluster};

/// Confidence reported for every classified object
pub const FIXED_CONFIDENCE: f32 = 0.75;

/// Map a bounding volume to a furniture label. Total over all inputs.
pub fn classify_furniture(volume: &BoundingVolume) -> FurnitureType {
    let dims = volume.dimensions;
    let height = dims.height;
    let vol = dims.volume();
    let footprint_max = dims.max_horizontal();

    if height < 0.5 && vol > 0.1 {
        FurnitureType::Table
    } else if height > 0.8 && height < 1.5 && footprint_max > 1.5 {
        FurnitureType::Bed
    } else if height > 1.5 && vol > 0.5 {
        FurnitureType::Wardrobe
    } else if height < 0.6 && footprint_max < 0.8 {
        FurnitureType::Chair
    } else {
        FurnitureType::Unknown
    }
}

/// Classify every furniture cluster. Ids are `furniture_<index>` in cluster order.
pub fn detect_furniture(clusters: Vec<PointCluster>) -> Vec<FurnitureObject> {
    bounding_volumes(&clusters)
        .into_iter()
        .enumerate()
        .map(|(index, volume)| FurnitureObject {
            id: format!("furniture_{index}"),
            furniture_type: classify_furniture(&volume),
            position: volume.centroid,
            dimensions: volume.dimensions,
            confidence: FIXED_CONFIDENCE,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomscan_core::{ClusterPurpose, Dimensions, Point3D};

    fn volume(width: f32, height: f32, depth: f32) -> BoundingVolume {
        BoundingVolume {
            dimensions: Dimensions::new(width, height, depth),
            centroid: Point3D::ORIGIN,
        }
    }

    #[test]
    fn table_wins_over_later_rules() {
        // height < 0.5 and volume 0.144 > 0.1, even though depth 1.6 is bed-sized
        assert_eq!(classify_furniture(&volume(0.3, 0.3, 1.6)), FurnitureType::Table);
    }

    #[test]
    fn each_rule_in_order() {
        assert_eq!(classify_furniture(&volume(1.0, 0.4, 1.0)), FurnitureType::Table);
        assert_eq!(classify_furniture(&volume(2.0, 1.0, 1.4)), FurnitureType::Bed);
        assert_eq!(classify_furniture(&volume(1.0, 2.0, 0.6)), FurnitureType::Wardrobe);
        assert_eq!(classify_furniture(&volume(0.5, 0.55, 0.5)), FurnitureType::Chair);
        assert_eq!(classify_furniture(&volume(1.0, 1.0, 1.0)), FurnitureType::Unknown);
    }

    #[test]
    fn low_small_box_is_chair_not_table() {
        // volume 0.02 is too small for a table
        assert_eq!(classify_furniture(&volume(0.2, 0.4, 0.25)), FurnitureType::Chair);
    }

    #[test]
    fn zero_volume_is_chair() {
        assert_eq!(classify_furniture(&BoundingVolume::EMPTY), FurnitureType::Chair);
    }

    #[test]
    fn classification_is_total() {
        let steps = [0.0f32, 0.3, 0.55, 0.7, 0.9, 1.2, 1.5, 1.6, 2.0, 3.0];
        for &w in &steps {
            for &h in &steps {
                for &d in &steps {
                    let label = classify_furniture(&volume(w, h, d));
                    assert!(FurnitureType::ALL.contains(&label));
                }
            }
        }
    }

    #[test]
    fn detect_assigns_ids_and_fixed_confidence() {
        let table = PointCluster::new(
            ClusterPurpose::Furniture,
            vec![Point3D::new(0.0, 0.4, 0.0), Point3D::new(1.0, 0.8, 1.0)],
        );
        let tall = PointCluster::new(
            ClusterPurpose::Furniture,
            vec![Point3D::new(3.0, 0.0, 0.0), Point3D::new(3.5, 2.0, 1.0)],
        );
        let objects = detect_furniture(vec![table, tall]);

        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].id, "furniture_0");
        assert_eq!(objects[0].furniture_type, FurnitureType::Table);
        assert_eq!(objects[0].position, Point3D::new(0.5, 0.6, 0.5));
        assert_eq!(objects[1].id, "furniture_1");
        assert_eq!(objects[1].furniture_type, FurnitureType::Wardrobe);
        assert!(objects.iter().all(|o| o.confidence == FIXED_CONFIDENCE));
    }
}
