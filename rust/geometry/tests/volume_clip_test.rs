// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Clipping, tessellation and assembly working together on whole surfaces.

use approx::assert_relative_eq;
use decal_mesh_geometry::{
    apply_heights, assemble, clip_against_volume, project_uvs, tessellate_footprint, Matrix4,
    Point3, Triangle, UvRect, Vector3, Volume,
};

/// Two-triangle floor quad at height `y` covering `[-half, half]` on X and Z
fn floor_quad(y: f64, half: f64) -> Vec<Triangle> {
    let a = Point3::new(-half, y, -half);
    let b = Point3::new(-half, y, half);
    let c = Point3::new(half, y, half);
    let d = Point3::new(half, y, -half);
    vec![Triangle::new(a, b, c), Triangle::new(c, d, a)]
}

fn total_area(triangles: &[Triangle]) -> f64 {
    triangles.iter().map(Triangle::area).sum()
}

#[test]
fn test_large_floor_clipped_to_volume_footprint() {
    let volume = Volume::new(Point3::new(0.5, 0.0, 0.0), Vector3::new(2.0, 1.0, 3.0)).unwrap();
    let clipped = clip_against_volume(&floor_quad(0.0, 10.0), &volume, 90.0);

    assert!(!clipped.is_empty());
    assert_relative_eq!(total_area(&clipped), 6.0, epsilon = 1e-9);
    for t in &clipped {
        assert!(t.direction().unwrap().y > 0.0);
        for v in t.vertices() {
            assert!((v.x - 0.5).abs() <= 1.0 + 1e-9);
            assert!(v.z.abs() <= 1.5 + 1e-9);
        }
    }
}

#[test]
fn test_rotated_volume_clips_in_its_own_frame() {
    // Quarter turn about Y: local X runs along world -Z
    let transform = Matrix4::from_axis_angle(&Vector3::y_axis(), std::f64::consts::FRAC_PI_2);
    let volume = Volume::new(Point3::origin(), Vector3::new(4.0, 1.0, 1.0))
        .unwrap()
        .with_transform(transform)
        .unwrap();
    let clipped = clip_against_volume(&floor_quad(0.0, 5.0), &volume, 90.0);

    assert_relative_eq!(total_area(&clipped), 4.0, epsilon = 1e-9);
    let (mut max_x, mut max_z) = (0.0f64, 0.0f64);
    for t in &clipped {
        for v in t.vertices() {
            max_x = max_x.max(v.x.abs());
            max_z = max_z.max(v.z.abs());
        }
    }
    assert_relative_eq!(max_x, 0.5, epsilon = 1e-9);
    assert_relative_eq!(max_z, 2.0, epsilon = 1e-9);
}

#[test]
fn test_clipped_floor_welds_along_cuts() {
    let volume = Volume::new(Point3::origin(), Vector3::new(2.0, 1.0, 2.0)).unwrap();
    let clipped = clip_against_volume(&floor_quad(0.0, 3.0), &volume, 90.0);
    let welded = assemble(&clipped, true).unwrap();
    let loose = assemble(&clipped, false).unwrap();

    assert_eq!(welded.triangle_count(), loose.triangle_count());
    assert!(welded.vertex_count() < loose.vertex_count());
    assert!(welded.validate().is_ok());
}

#[test]
fn test_wall_and_ceiling_filtering() {
    let volume = Volume::new(Point3::origin(), Vector3::new(2.0, 2.0, 2.0)).unwrap();
    let ceiling: Vec<Triangle> = floor_quad(0.5, 0.5).iter().map(Triangle::flipped).collect();
    let wall = vec![Triangle::new(
        Point3::new(0.0, -0.5, -0.5),
        Point3::new(0.0, 0.5, -0.5),
        Point3::new(0.0, -0.5, 0.5),
    )];

    assert!(clip_against_volume(&ceiling, &volume, 90.0).is_empty());
    assert_eq!(clip_against_volume(&wall, &volume, 45.0).len(), 1);
    assert!(clip_against_volume(&wall, &volume, 120.0).is_empty());
}

#[test]
fn test_terrain_patch_end_to_end() {
    let volume = Volume::new(Point3::new(5.0, 0.0, 5.0), Vector3::new(2.0, 4.0, 2.0)).unwrap();
    let bounds = volume.world_bounds();
    let mut cells = tessellate_footprint(
        &Point3::origin(),
        0.5,
        &bounds.min,
        &bounds.max,
        &Vector3::new(10.0, 0.0, 10.0),
    )
    .unwrap();
    apply_heights(&mut cells, 0.0, |x, _z| 0.1 * x);

    let clipped = clip_against_volume(&cells, &volume, 90.0);
    let mut mesh = assemble(&clipped, true).unwrap();
    project_uvs(&mut mesh, &volume, &UvRect::DEFAULT);

    assert!(!mesh.is_empty());
    // Sloped plane y = 0.1x over a 2x2 footprint
    let area: f64 = mesh.triangles().iter().map(Triangle::area).sum();
    assert_relative_eq!(area, 4.0 * (1.0f64 + 0.01).sqrt(), epsilon = 1e-4);
    for i in 0..mesh.vertex_count() {
        let p = mesh.position(i);
        assert_relative_eq!(p.y, 0.1 * p.x, epsilon = 1e-5);
    }
    for &uv in &mesh.uvs {
        assert!(uv >= -1e-5 && uv <= 1.0 + 1e-5);
    }
}
