// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 3D point type in scanner-local meters

/// A single sampled point (y is up)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3D {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// The origin
    pub const ORIGIN: Point3D = Point3D::new(0.0, 0.0, 0.0);

    /// False if any coordinate is NaN or infinite
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    #[inline]
    pub fn distance_squared(&self, other: &Point3D) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        dx * dx + dy * dy + dz * dz
    }

    #[inline]
    pub fn distance_to(&self, other: &Point3D) -> f32 {
        self.distance_squared(other).sqrt()
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    #[inline]
    pub fn from_array(xyz: [f32; 3]) -> Self {
        Self::new(xyz[0], xyz[1], xyz[2])
    }

    /// Top-down projection `[x, z]`
    #[inline]
    pub fn to_plan(self) -> [f32; 2] {
        [self.x, self.z]
    }
}

impl From<[f32; 3]> for Point3D {
    fn from(xyz: [f32; 3]) -> Self {
        Self::from_array(xyz)
    }
}
