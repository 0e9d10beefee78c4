// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory scene

use crate::scene::{LayerMask, SceneQuery, SurfaceRef, Terrain};
use decal_mesh_geometry::Aabb;
use nalgebra::{Matrix4, Point3};

/// Mesh-bearing object stored in a [`StaticScene`]
#[derive(Debug, Clone)]
pub struct SceneSurface {
    pub name: String,
    pub vertices: Vec<Point3<f64>>,
    pub indices: Vec<u32>,
    pub transform: Matrix4<f64>,
    pub layer: u8,
}

impl SceneSurface {
    /// Surface on layer 0 with an identity transform
    pub fn new(name: impl Into<String>, vertices: Vec<Point3<f64>>, indices: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            vertices,
            indices,
            transform: Matrix4::identity(),
            layer: 0,
        }
    }

    pub fn with_transform(mut self, transform: Matrix4<f64>) -> Self {
        self.transform = transform;
        self
    }

    pub fn on_layer(mut self, layer: u8) -> Self {
        self.layer = layer;
        self
    }

    /// World-space bounds of the transformed vertices
    pub fn world_bounds(&self) -> Option<Aabb> {
        let world: Vec<Point3<f64>> = self
            .vertices
            .iter()
            .map(|v| self.transform.transform_point(v))
            .collect();
        Aabb::from_points(&world)
    }
}

struct SceneTerrain {
    terrain: Box<dyn Terrain>,
    layer: u8,
}

/// Scene holding surfaces and terrains in plain vectors
///
/// Queries scan every object; hosts with large scenes provide their own
/// [`SceneQuery`] backed by a spatial index.
#[derive(Default)]
pub struct StaticScene {
    surfaces: Vec<SceneSurface>,
    terrains: Vec<SceneTerrain>,
}

impl StaticScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_surface(&mut self, surface: SceneSurface) {
        self.surfaces.push(surface);
    }

    pub fn add_terrain<T: Terrain + 'static>(&mut self, terrain: T, layer: u8) {
        self.terrains.push(SceneTerrain {
            terrain: Box::new(terrain),
            layer,
        });
    }

    pub fn surfaces(&self) -> &[SceneSurface] {
        &self.surfaces
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    pub fn terrain_count(&self) -> usize {
        self.terrains.len()
    }
}

impl SceneQuery for StaticScene {
    fn find_surfaces(&self, bounds: &Aabb, mask: LayerMask) -> Vec<SurfaceRef<'_>> {
        self.surfaces
            .iter()
            .filter(|s| mask.includes(s.layer))
            .filter(|s| s.world_bounds().is_some_and(|b| b.intersects(bounds)))
            .map(|s| SurfaceRef::new(&s.vertices, &s.indices, s.transform))
            .collect()
    }

    fn find_intersecting_terrains(&self, bounds: &Aabb, mask: LayerMask) -> Vec<&dyn Terrain> {
        self.terrains
            .iter()
            .filter(|t| mask.includes(t.layer))
            .filter(|t| t.terrain.bounds().intersects(bounds))
            .map(|t| t.terrain.as_ref())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heightfield::Heightfield;
    use nalgebra::Vector3;

    fn unit_triangle(name: &str) -> SceneSurface {
        SceneSurface::new(
            name,
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.0, 0.0, 1.0),
                Point3::new(1.0, 0.0, 0.0),
            ],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn test_find_surfaces_filters_layer_and_bounds() {
        let mut scene = StaticScene::new();
        scene.add_surface(unit_triangle("near"));
        scene.add_surface(unit_triangle("other layer").on_layer(3));
        let far = Matrix4::new_translation(&Vector3::new(50.0, 0.0, 0.0));
        scene.add_surface(unit_triangle("far").with_transform(far));

        let bounds = Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
        assert_eq!(scene.find_surfaces(&bounds, LayerMask::default()).len(), 1);
        assert_eq!(scene.find_surfaces(&bounds, LayerMask(0b1001)).len(), 2);
        assert!(scene.find_surfaces(&bounds, LayerMask::NONE).is_empty());
    }

    #[test]
    fn test_find_terrains() {
        let mut scene = StaticScene::new();
        let field =
            Heightfield::flat(Point3::origin(), Vector3::new(10.0, 1.0, 10.0), 11, 0.0).unwrap();
        scene.add_terrain(field, 0);

        let inside = Aabb::new(Point3::new(2.0, -1.0, 2.0), Point3::new(3.0, 1.0, 3.0));
        let outside = Aabb::new(Point3::new(20.0, -1.0, 2.0), Point3::new(21.0, 1.0, 3.0));
        assert_eq!(scene.find_intersecting_terrains(&inside, LayerMask::default()).len(), 1);
        assert!(scene.find_intersecting_terrains(&outside, LayerMask::default()).is_empty());
        assert!(scene.find_intersecting_terrains(&inside, LayerMask::layer(2)).is_empty());
    }
}
