//! Room Scan Geometry
//!
//! The geometric stages of the room-layout pipeline: height-band point
//! classification, distance-threshold clustering, bounding volumes, furniture
//! classification, wall segments and room layout synthesis. Every stage is a
//! pure function that takes its input by value or slice and returns fresh
//! output; nothing here logs, blocks or keeps state between calls.

pub mod bounds;
pub mod classify;
pub mod cluster;
pub mod error;
pub mod furniture;
pub mod layout;
pub mod walls;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};

pub use bounds::{bounding_volume, bounding_volumes};
pub use classify::{classify_points, classify_vertices, ClassifiedPoints, HeightBand, HeightBands};
pub use cluster::{cluster_points, ClusterParams, Linkage};
pub use error::{Error, Result};
pub use furniture::{classify_furniture, detect_furniture, FIXED_CONFIDENCE};
pub use layout::{classify_room, project_floor_plan, synthesize_layout};
pub use walls::{build_wall_segment, build_wall_segments, estimate_normal, polyline_length, UP};
