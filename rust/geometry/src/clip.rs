// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Triangle–plane clipping
//!
//! Keeps the part of a triangle that lies behind (or on) a plane and
//! re-triangulates the remainder while preserving the input winding.

use crate::plane::Plane;
use crate::triangle::Triangle;
use nalgebra::{Point3, Vector3};
use smallvec::SmallVec;

/// Fraction of the way from the fourth quad point toward a candidate corner
/// at which the diagonal probe is taken.
const QUAD_PROBE_FACTOR: f64 = 0.999;

/// Clip output: at most two triangles
pub type ClippedTriangles = SmallVec<[Triangle; 2]>;

/// Collected clip polygon: explicit length, capacity for a quad
type ClipPoints = SmallVec<[Point3<f64>; 4]>;

/// Triangle clipping result
#[derive(Debug, Clone, PartialEq)]
pub enum ClipResult {
    /// Triangle is completely behind or on the plane (keep it unchanged)
    Kept(Triangle),
    /// Triangle is completely in front (discard it)
    Discarded,
    /// Triangle intersects plane - returns the kept fragments
    Split(ClippedTriangles),
}

impl ClipResult {
    /// Flatten into the kept triangles
    pub fn into_triangles(self) -> ClippedTriangles {
        match self {
            ClipResult::Kept(triangle) => smallvec::smallvec![triangle],
            ClipResult::Discarded => SmallVec::new(),
            ClipResult::Split(triangles) => triangles,
        }
    }
}

/// Clip a triangle against a plane, keeping the back half-space
pub fn clip_triangle(triangle: &Triangle, plane: &Plane) -> ClipResult {
    let vertices = triangle.vertices();
    let in_front = vertices.map(|v| plane.is_front(&v));

    if !in_front.contains(&true) {
        return ClipResult::Kept(*triangle);
    }
    if !in_front.contains(&false) {
        return ClipResult::Discarded;
    }

    // A straddling triangle without a face direction cannot be re-oriented
    let Some(direction) = triangle.direction() else {
        return ClipResult::Discarded;
    };

    let mut points = ClipPoints::new();
    for i in 0..3 {
        if in_front[i] {
            for k in 0..3 {
                if k == i || in_front[k] {
                    continue;
                }
                push_unique(&mut points, plane.intersect_edge(&vertices[i], &vertices[k]));
            }
        } else {
            push_unique(&mut points, vertices[i]);
        }
    }

    ClipResult::Split(divide_face(&points, &direction))
}

/// Triangulate a clip polygon of up to four points
///
/// Three points become one triangle. Four points are split along the
/// diagonal found by probing from the fourth point toward each of the first
/// three: the two corners whose probe falls outside the first triangle form
/// the second triangle with the fourth point. Every output triangle is
/// oriented along `direction`.
pub fn divide_face(points: &[Point3<f64>], direction: &Vector3<f64>) -> ClippedTriangles {
    let mut triangles = ClippedTriangles::new();
    if points.len() < 3 {
        return triangles;
    }

    let Some(first) = Triangle::oriented(points[0], points[1], points[2], direction) else {
        // First three collinear: a quad remainder is then itself a triangle
        if points.len() == 4 {
            if let Some(t) = Triangle::oriented(points[0], points[2], points[3], direction)
                .or_else(|| Triangle::oriented(points[1], points[2], points[3], direction))
            {
                triangles.push(t);
            }
        }
        return triangles;
    };
    triangles.push(first);

    if points.len() == 3 {
        return triangles;
    }

    let apex = points[3];
    let mut outside: SmallVec<[Point3<f64>; 2]> = SmallVec::new();
    for corner in &points[..3] {
        let probe = apex + (corner - apex) * QUAD_PROBE_FACTOR;
        if first.contains_point(&probe) {
            continue;
        }
        outside.push(*corner);
        if outside.len() == 2 {
            break;
        }
    }

    match outside.as_slice() {
        [a, b] => {
            if let Some(second) = Triangle::oriented(apex, *a, *b, direction) {
                triangles.push(second);
            }
        }
        _ => {
            tracing::debug!(
                outside = outside.len(),
                "ambiguous quad remainder, dropping second triangle"
            );
        }
    }

    triangles
}

/// Append a point unless a bit-identical one was already collected
#[inline]
fn push_unique(points: &mut ClipPoints, point: Point3<f64>) {
    if !points.contains(&point) {
        points.push(point);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn floor_plane_at(y: f64) -> Plane {
        Plane::new(Point3::new(0.0, y, 0.0), Vector3::y())
    }

    fn wall_plane_at(x: f64) -> Plane {
        Plane::new(Point3::new(x, 0.0, 0.0), Vector3::x())
    }

    fn upward() -> Triangle {
        Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 2.0),
            Point3::new(2.0, 0.0, 0.0),
        )
    }

    fn total_area(triangles: &[Triangle]) -> f64 {
        triangles.iter().map(Triangle::area).sum()
    }

    #[test]
    fn test_clip_triangle_all_kept() {
        let triangle = upward();
        match clip_triangle(&triangle, &floor_plane_at(1.0)) {
            ClipResult::Kept(kept) => assert_eq!(kept, triangle),
            other => panic!("Expected Kept, got {:?}", other),
        }
    }

    #[test]
    fn test_clip_triangle_all_discarded() {
        match clip_triangle(&upward(), &floor_plane_at(-1.0)) {
            ClipResult::Discarded => {}
            other => panic!("Expected Discarded, got {:?}", other),
        }
    }

    #[test]
    fn test_clip_triangle_on_plane_is_kept() {
        let triangle = upward();
        assert_eq!(clip_triangle(&triangle, &floor_plane_at(0.0)), ClipResult::Kept(triangle));
    }

    #[test]
    fn test_clip_triangle_one_corner_kept() {
        // Only the corner at x = -1 is behind x = 1
        let triangle = Triangle::new(
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 4.0),
            Point3::new(3.0, 0.0, 0.0),
        );
        let result = clip_triangle(&triangle, &wall_plane_at(1.0)).into_triangles();
        assert_eq!(result.len(), 1);
        // Kept fragment: (-1,0,0), (1,0,2), (1,0,0)
        assert!((total_area(&result) - 2.0).abs() < 1e-9);
        assert_relative_eq!(
            result[0].direction().unwrap(),
            triangle.direction().unwrap(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_clip_triangle_quad_remainder() {
        // Cut the corner at (2, 0, 0) off at x = 1
        let triangle = upward();
        let result = clip_triangle(&triangle, &wall_plane_at(1.0)).into_triangles();
        assert_eq!(result.len(), 2);
        // Total 2.0, cut-off corner 0.5
        assert!((total_area(&result) - 1.5).abs() < 1e-9);
        for t in &result {
            assert_relative_eq!(t.direction().unwrap(), Vector3::y(), epsilon = 1e-12);
            for v in t.vertices() {
                assert!(v.x <= 1.0 + 1e-12);
            }
        }
    }

    #[test]
    fn test_quad_remainder_for_each_discarded_corner() {
        // Rotate which vertex is cut off so every classification order is exercised
        let base = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 2.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        let plane = wall_plane_at(1.0);
        for shift in 0..3 {
            let triangle =
                Triangle::new(base[shift % 3], base[(shift + 1) % 3], base[(shift + 2) % 3]);
            let result = clip_triangle(&triangle, &plane).into_triangles();
            assert_eq!(result.len(), 2, "rotation {}", shift);
            assert!((total_area(&result) - 1.5).abs() < 1e-9, "rotation {}", shift);
            // Fragments must not overlap: their areas sum to the kept area and
            // both centroids sit inside the kept region
            for t in &result {
                assert!(t.origin().x < 1.0);
                assert!(t.direction().unwrap().y > 0.0);
            }
        }
    }

    #[test]
    fn test_clip_keeps_vertex_at_world_origin() {
        // The kept corner is exactly (0, 0, 0) and must not be mistaken for an empty slot
        let triangle = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 4.0),
            Point3::new(4.0, 0.0, 0.0),
        );
        let result = clip_triangle(&triangle, &wall_plane_at(2.0)).into_triangles();
        assert_eq!(result.len(), 2);
        assert!(result.iter().any(|t| t.vertices().contains(&Point3::origin())));
        assert!((total_area(&result) - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_clip_point_at_world_origin() {
        // Both intersection points lie on x = 0; one of them is the world origin
        let triangle = Triangle::new(
            Point3::new(-1.0, 0.0, -1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, -1.0),
        );
        let result = clip_triangle(&triangle, &Plane::new(Point3::origin(), -Vector3::x()))
            .into_triangles();
        assert!(!result.is_empty());
        assert!((total_area(&result) - 1.5).abs() < 1e-9);
        assert!(result.iter().any(|t| t.vertices().contains(&Point3::origin())));
    }

    #[test]
    fn test_clip_with_kept_vertex_on_plane() {
        // v1 lies exactly on the plane, v0 is discarded, v2 is kept
        let triangle = Triangle::new(
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 2.0),
            Point3::new(0.0, 0.0, 0.0),
        );
        let result = clip_triangle(&triangle, &wall_plane_at(1.0)).into_triangles();
        assert_eq!(result.len(), 1);
        assert!(result.iter().all(|t| !t.is_degenerate()));
        // Kept part: (1,0,0), (1,0,2), (0,0,0)
        assert!((total_area(&result) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_clip_touching_at_single_point_keeps_nothing() {
        // Only v2 reaches the plane; everything else is in front
        let triangle = Triangle::new(
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 2.0),
            Point3::new(1.0, 0.0, 1.0),
        );
        let result = clip_triangle(&triangle, &wall_plane_at(1.0)).into_triangles();
        assert!(result.is_empty());
    }

    #[test]
    fn test_clip_preserves_downward_orientation() {
        let triangle = upward().flipped();
        let result = clip_triangle(&triangle, &wall_plane_at(1.0)).into_triangles();
        assert_eq!(result.len(), 2);
        for t in &result {
            assert!(t.direction().unwrap().y < 0.0);
        }
    }

    #[test]
    fn test_degenerate_straddling_triangle_discarded() {
        let triangle = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        );
        assert_eq!(clip_triangle(&triangle, &wall_plane_at(0.5)), ClipResult::Discarded);
    }

    #[test]
    fn test_divide_face_too_few_points() {
        let points = [Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
        assert!(divide_face(&points, &Vector3::y()).is_empty());
    }
}
