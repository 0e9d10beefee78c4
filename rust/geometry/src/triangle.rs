// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Triangle value type
//!
//! Triangles are immutable value records. Centroid, face direction and area
//! are derived on access from the three ordered vertices.

use nalgebra::{Point3, Vector3};

/// Squared sine of the smallest corner angle a usable triangle may have
///
/// Compared against `|e1 x e2|^2 / (|e1|^2 |e2|^2)`, so the test does not
/// depend on the triangle's scale.
const DEGENERATE_EPSILON: f64 = 1e-20;

/// Triangle definition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub v0: Point3<f64>,
    pub v1: Point3<f64>,
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Create a new triangle
    #[inline]
    pub fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Create a triangle whose face direction agrees with `reference`
    ///
    /// The winding is reversed when the direction of `(v0, v1, v2)` opposes
    /// `reference`. Returns `None` for degenerate input.
    pub fn oriented(
        v0: Point3<f64>,
        v1: Point3<f64>,
        v2: Point3<f64>,
        reference: &Vector3<f64>,
    ) -> Option<Self> {
        let triangle = Self::new(v0, v1, v2);
        let direction = triangle.direction()?;
        if direction.dot(reference) < 0.0 {
            Some(triangle.flipped())
        } else {
            Some(triangle)
        }
    }

    /// Vertices in winding order
    #[inline]
    pub fn vertices(&self) -> [Point3<f64>; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// Centroid
    #[inline]
    pub fn origin(&self) -> Point3<f64> {
        Point3::from((self.v0.coords + self.v1.coords + self.v2.coords) / 3.0)
    }

    /// Unnormalized face normal (twice the area, oriented by winding)
    #[inline]
    pub fn cross(&self) -> Vector3<f64> {
        (self.v1 - self.v0).cross(&(self.v2 - self.v0))
    }

    /// Unit face normal, or `None` for collinear/zero-area triangles
    #[inline]
    pub fn direction(&self) -> Option<Vector3<f64>> {
        let e1 = self.v1 - self.v0;
        let e2 = self.v2 - self.v0;
        let cross = e1.cross(&e2);
        let scale = e1.norm_squared() * e2.norm_squared();
        if !cross.iter().all(|c| c.is_finite())
            || cross.norm_squared() <= DEGENERATE_EPSILON * scale
        {
            return None;
        }
        Some(cross.normalize())
    }

    /// Check whether the triangle has no usable face direction
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.direction().is_none()
    }

    /// Calculate triangle area
    #[inline]
    pub fn area(&self) -> f64 {
        self.cross().norm() * 0.5
    }

    /// Same triangle with reversed winding
    #[inline]
    pub fn flipped(&self) -> Self {
        Self::new(self.v2, self.v1, self.v0)
    }

    /// Check whether a point coplanar with the triangle lies inside it
    ///
    /// Points on an edge or vertex count as inside.
    pub fn contains_point(&self, point: &Point3<f64>) -> bool {
        same_side(point, &self.v0, &self.v1, &self.v2)
            && same_side(point, &self.v1, &self.v0, &self.v2)
            && same_side(point, &self.v2, &self.v0, &self.v1)
    }
}

/// True when `p1` and `p2` lie on the same side of the line through `a` and `b`
#[inline]
fn same_side(p1: &Point3<f64>, p2: &Point3<f64>, a: &Point3<f64>, b: &Point3<f64>) -> bool {
    let edge = b - a;
    let cp1 = edge.cross(&(p1 - a));
    let cp2 = edge.cross(&(p2 - a));
    cp1.dot(&cp2) >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_xz() -> Triangle {
        Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 0.0),
        )
    }

    #[test]
    fn test_triangle_direction() {
        let direction = unit_xz().direction().unwrap();
        assert_relative_eq!(direction, Vector3::y(), epsilon = 1e-12);
        let flipped = unit_xz().flipped().direction().unwrap();
        assert_relative_eq!(flipped, -Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_has_no_direction() {
        let collinear = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(2.0, 2.0, 2.0),
        );
        assert!(collinear.direction().is_none());
        assert!(collinear.is_degenerate());
        assert_eq!(collinear.area(), 0.0);
    }

    #[test]
    fn test_degeneracy_is_scale_independent() {
        // Area 5e-15, well below any absolute threshold on the cross product
        let tiny = Triangle::new(
            Point3::new(1e-7, 0.0, 0.0),
            Point3::new(1e-7, 0.0, 1e-7),
            Point3::new(2e-7, 0.0, 0.0),
        );
        assert_relative_eq!(tiny.direction().unwrap(), Vector3::y(), epsilon = 1e-9);

        let sliver = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1000.0, 0.0, 0.0),
            Point3::new(2000.0, 0.0, 1e-12),
        );
        assert!(sliver.is_degenerate());

        let coincident =
            Triangle::new(Point3::origin(), Point3::origin(), Point3::new(1.0, 0.0, 0.0));
        assert!(coincident.is_degenerate());
    }

    #[test]
    fn test_origin_and_area() {
        let triangle = unit_xz();
        assert_relative_eq!(triangle.origin(), Point3::new(1.0 / 3.0, 0.0, 1.0 / 3.0));
        assert!((triangle.area() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_oriented_flips_against_reference() {
        let t = unit_xz();
        let down = -Vector3::y();
        let oriented = Triangle::oriented(t.v0, t.v1, t.v2, &down).unwrap();
        assert_eq!(oriented, t.flipped());

        let kept = Triangle::oriented(t.v0, t.v1, t.v2, &Vector3::y()).unwrap();
        assert_eq!(kept, t);
    }

    #[test]
    fn test_contains_point() {
        let triangle = unit_xz();
        assert!(triangle.contains_point(&Point3::new(0.25, 0.0, 0.25)));
        assert!(triangle.contains_point(&Point3::new(0.5, 0.0, 0.0)));
        assert!(!triangle.contains_point(&Point3::new(0.75, 0.0, 0.75)));
        assert!(!triangle.contains_point(&Point3::new(-0.1, 0.0, 0.5)));
    }
}
