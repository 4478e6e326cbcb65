// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stride decimation for incremental passes
//!
//! Clustering is quadratic, so incremental passes look at a bounded sample.
//! The stride grows with the buffer so that a pass never sees more than
//! `max_points` points; final passes skip decimation entirely.

use roomscan_core::Point3D;

/// `max(configured, ceil(len / max_points))`, never below 1.
pub fn effective_stride(len: usize, configured: usize, max_points: usize) -> usize {
    let configured = configured.max(1);
    if max_points == 0 {
        return configured;
    }
    configured.max(len.div_ceil(max_points))
}

/// Every `stride`-th point starting with the first, at most `max_points` of them
pub fn decimate(points: &[Point3D], stride: usize, max_points: usize) -> Vec<Point3D> {
    points
        .iter()
        .step_by(stride.max(1))
        .take(max_points)
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Vec<Point3D> {
        (0..n).map(|i| Point3D::new(i as f32, 1.0, 0.0)).collect()
    }

    #[test]
    fn small_buffers_use_configured_stride() {
        assert_eq!(effective_stride(500, 1, 1000), 1);
        assert_eq!(effective_stride(500, 3, 1000), 3);
        assert_eq!(effective_stride(0, 0, 1000), 1);
    }

    #[test]
    fn stride_grows_with_buffer() {
        assert_eq!(effective_stride(1000, 1, 1000), 1);
        assert_eq!(effective_stride(1001, 1, 1000), 2);
        assert_eq!(effective_stride(25_000, 1, 1000), 25);
    }

    #[test]
    fn output_never_exceeds_cap() {
        for len in [0usize, 1, 999, 1000, 1001, 4321, 20_000] {
            let points = line(len);
            let stride = effective_stride(len, 1, 1000);
            let sample = decimate(&points, stride, 1000);
            assert!(sample.len() <= 1000, "{len} -> {}", sample.len());
            assert!(sample.len() <= len);
            if len > 0 {
                assert_eq!(sample[0], points[0]);
            }
        }
    }

    #[test]
    fn picks_every_nth_point() {
        let sample = decimate(&line(10), 3, 100);
        let xs: Vec<_> = sample.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 3.0, 6.0, 9.0]);
    }
}
