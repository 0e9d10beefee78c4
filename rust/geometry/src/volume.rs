// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Oriented decal volume and axis-aligned bounds

use crate::error::{Error, Result};
use crate::plane::Plane;
use nalgebra::{Matrix4, Point3, Vector3};

/// Number of bounding planes of a volume
pub const SIDE_COUNT: usize = 6;

/// Local axis and sign of each side: +X, -X, +Y, -Y, +Z, -Z
const SIDES: [(usize, f64); SIDE_COUNT] = [
    (0, 1.0),
    (0, -1.0),
    (1, 1.0),
    (1, -1.0),
    (2, 1.0),
    (2, -1.0),
];

/// Axis-aligned bounding box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Aabb {
    /// Create a new box from its corners
    #[inline]
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// Tight bounds of a point set, `None` when empty
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3<f64>>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bounds = Self::new(first, first);
        for p in iter {
            bounds.min = bounds.min.inf(p);
            bounds.max = bounds.max.sup(p);
        }
        Some(bounds)
    }

    #[inline]
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    #[inline]
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Overlap test, touching boxes intersect
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        (0..3).all(|axis| self.min[axis] <= other.max[axis] && other.min[axis] <= self.max[axis])
    }
}

/// Oriented box: a local-space center and full size, placed by a
/// local-to-world transform
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    origin: Point3<f64>,
    size: Vector3<f64>,
    transform: Matrix4<f64>,
    inverse: Matrix4<f64>,
}

impl Volume {
    /// Create a volume with an identity transform
    ///
    /// Fails when a size component is negative or any value is not finite.
    pub fn new(origin: Point3<f64>, size: Vector3<f64>) -> Result<Self> {
        if !origin.iter().all(|c| c.is_finite()) {
            return Err(Error::InvalidVolume(format!("origin {} is not finite", origin)));
        }
        if !size.iter().all(|c| c.is_finite() && *c >= 0.0) {
            return Err(Error::InvalidVolume(format!(
                "size ({}, {}, {}) must be finite and non-negative",
                size.x, size.y, size.z
            )));
        }
        Ok(Self {
            origin,
            size,
            transform: Matrix4::identity(),
            inverse: Matrix4::identity(),
        })
    }

    /// Unit cube centered on the local origin
    pub fn unit() -> Self {
        Self {
            origin: Point3::origin(),
            size: Vector3::repeat(1.0),
            transform: Matrix4::identity(),
            inverse: Matrix4::identity(),
        }
    }

    /// Place the volume with a local-to-world transform
    pub fn with_transform(mut self, transform: Matrix4<f64>) -> Result<Self> {
        self.set_transform(transform)?;
        Ok(self)
    }

    /// Replace the local-to-world transform
    pub fn set_transform(&mut self, transform: Matrix4<f64>) -> Result<()> {
        let inverse = transform
            .try_inverse()
            .ok_or_else(|| Error::InvalidVolume("transform is not invertible".to_string()))?;
        self.transform = transform;
        self.inverse = inverse;
        Ok(())
    }

    #[inline]
    pub fn origin(&self) -> Point3<f64> {
        self.origin
    }

    #[inline]
    pub fn size(&self) -> Vector3<f64> {
        self.size
    }

    /// Local-to-world transform
    #[inline]
    pub fn transform(&self) -> &Matrix4<f64> {
        &self.transform
    }

    /// World-to-local transform
    #[inline]
    pub fn inverse_transform(&self) -> &Matrix4<f64> {
        &self.inverse
    }

    /// Restore the unit shape (origin 0, size 1), keeping the transform
    pub fn reset_shape(&mut self) {
        self.origin = Point3::origin();
        self.size = Vector3::repeat(1.0);
    }

    /// True when any extent is zero; such a volume clips everything away
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.iter().any(|c| *c == 0.0)
    }

    #[inline]
    pub fn to_local(&self, point: &Point3<f64>) -> Point3<f64> {
        self.inverse.transform_point(point)
    }

    #[inline]
    pub fn to_world(&self, point: &Point3<f64>) -> Point3<f64> {
        self.transform.transform_point(point)
    }

    /// World-space direction of the local +Y axis
    #[inline]
    pub fn up(&self) -> Vector3<f64> {
        self.transform.transform_vector(&Vector3::y()).normalize()
    }

    /// Outward world-space normal of side `side`
    ///
    /// # Panics
    ///
    /// Panics if `side >= SIDE_COUNT`.
    pub fn side_normal(&self, side: usize) -> Vector3<f64> {
        let (axis, sign) = SIDES[side];
        let mut local = Vector3::zeros();
        local[axis] = sign;
        // Inverse-transpose keeps normals perpendicular under non-uniform scale
        self.inverse
            .transpose()
            .transform_vector(&local)
            .normalize()
    }

    /// World-space center of side `side`
    ///
    /// # Panics
    ///
    /// Panics if `side >= SIDE_COUNT`.
    pub fn side_point(&self, side: usize) -> Point3<f64> {
        let (axis, sign) = SIDES[side];
        let mut local = self.origin;
        local[axis] += sign * self.size[axis] * 0.5;
        self.to_world(&local)
    }

    /// Bounding plane of side `side`, normal pointing out of the box
    #[inline]
    pub fn side_plane(&self, side: usize) -> Plane {
        Plane::new(self.side_point(side), self.side_normal(side))
    }

    /// All six bounding planes
    pub fn side_planes(&self) -> [Plane; SIDE_COUNT] {
        std::array::from_fn(|side| self.side_plane(side))
    }

    /// Check whether any vertex lies on or beyond the box border
    pub fn touches_border(&self, vertices: &[Point3<f64>]) -> bool {
        vertices.iter().any(|v| {
            let offset = self.to_local(v) - self.origin;
            (0..3).any(|axis| offset[axis].abs() >= self.size[axis] * 0.5)
        })
    }

    /// Conservative overlap test for a vertex set
    ///
    /// Returns `false` only when all vertices lie strictly beyond the same
    /// face, which proves the convex hull of the vertices misses the box.
    pub fn overlaps(&self, vertices: &[Point3<f64>]) -> bool {
        if vertices.is_empty() {
            return false;
        }
        let offsets: Vec<Vector3<f64>> = vertices
            .iter()
            .map(|v| self.to_local(v) - self.origin)
            .collect();
        (0..3).all(|axis| {
            let half = self.size[axis] * 0.5;
            let all_above = offsets.iter().all(|o| o[axis] > half);
            let all_below = offsets.iter().all(|o| o[axis] < -half);
            !all_above && !all_below
        })
    }

    /// World-space bounds of the transformed box
    pub fn world_bounds(&self) -> Aabb {
        let half = self.size * 0.5;
        let corners: Vec<Point3<f64>> = (0..8)
            .map(|i| {
                let sign = Vector3::new(
                    if i & 1 == 0 { -1.0 } else { 1.0 },
                    if i & 2 == 0 { -1.0 } else { 1.0 },
                    if i & 4 == 0 { -1.0 } else { 1.0 },
                );
                self.to_world(&(self.origin + half.component_mul(&sign)))
            })
            .collect();
        // Eight corners always exist
        Aabb::from_points(&corners).unwrap_or_else(|| Aabb::new(self.origin, self.origin))
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::unit()
    }
}
