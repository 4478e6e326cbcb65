// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Append-only point buffer with cheap immutable snapshots
//!
//! Snapshots share the backing vector through an `Arc`. Appending while a
//! snapshot is alive copies the vector once (`Arc::make_mut`) so readers never
//! observe a partially written set. Every append that adds at least one point
//! bumps the version.

use roomscan_core::Point3D;
use std::ops::Deref;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct PointBuffer {
    points: Arc<Vec<Point3D>>,
    version: u64,
    rejected: usize,
}

/// Immutable view of the buffer at one version
#[derive(Debug, Clone)]
pub struct BufferSnapshot {
    points: Arc<Vec<Point3D>>,
    pub version: u64,
}

impl PointBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Non-finite points dropped so far
    #[inline]
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Append finite points; returns how many were accepted.
    pub fn extend<I>(&mut self, points: I) -> usize
    where
        I: IntoIterator<Item = Point3D>,
    {
        let mut accepted = 0;
        let mut rejected = 0;
        let target = Arc::make_mut(&mut self.points);
        for p in points {
            if p.is_finite() {
                target.push(p);
                accepted += 1;
            } else {
                rejected += 1;
            }
        }

        self.rejected += rejected;
        if accepted > 0 {
            self.version += 1;
        }
        accepted
    }

    pub fn snapshot(&self) -> BufferSnapshot {
        BufferSnapshot {
            points: Arc::clone(&self.points),
            version: self.version,
        }
    }

    /// Drop every point. The version keeps increasing so stale snapshots
    /// are never mistaken for current ones.
    pub fn clear(&mut self) {
        self.points = Arc::new(Vec::new());
        self.version += 1;
        self.rejected = 0;
    }
}

impl BufferSnapshot {
    /// Owned copy of the points
    pub fn to_vec(&self) -> Vec<Point3D> {
        self.points.as_ref().clone()
    }
}

impl Deref for BufferSnapshot {
    type Target = [Point3D];

    fn deref(&self) -> &[Point3D] {
        &self.points
    }
}
