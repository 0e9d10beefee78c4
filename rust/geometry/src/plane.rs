// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use nalgebra::{Point3, Vector3};

/// Plane definition for clipping
///
/// The half-space the normal points into is the "front". Points with a
/// strictly positive signed distance are in front; points on the plane belong
/// to the back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Point on the plane
    pub point: Point3<f64>,
    /// Normal vector (normalized)
    pub normal: Vector3<f64>,
}

impl Plane {
    /// Create a new plane
    pub fn new(point: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            point,
            normal: normal.normalize(),
        }
    }

    /// Calculate signed distance from point to plane
    /// Positive = in front, Negative = behind
    #[inline]
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        (point - self.point).dot(&self.normal)
    }

    /// Check if point is strictly in front of plane
    #[inline]
    pub fn is_front(&self, point: &Point3<f64>) -> bool {
        self.signed_distance(point) > 0.0
    }

    /// Intersection of the ray from `from` toward `to` with the plane
    ///
    /// `from` must be in front and `to` behind or on the plane. When `to` is
    /// exactly on the plane it is returned unchanged.
    pub fn intersect_edge(&self, from: &Point3<f64>, to: &Point3<f64>) -> Point3<f64> {
        let d_from = self.signed_distance(from);
        let d_to = self.signed_distance(to);
        if d_to == 0.0 {
            return *to;
        }
        let t = d_from / (d_from - d_to);
        from + (to - from) * t
    }
}
