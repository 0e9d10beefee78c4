// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decal mesh generation
//!
//! One synchronous pass per decal: gather candidates (terrains first, then
//! mesh surfaces), clip, weld, move into
//! the volume's local frame, push off the surface and project UVs. Any error
//! aborts the pass before a mesh is produced.

use crate::error::Result;
use crate::scene::{SceneQuery, Terrain};
use crate::settings::DecalSettings;
use decal_mesh_geometry::{
    apply_heights, project_uvs, push_along_normals, Aabb, ClipStats, FootprintGrid, Mesh,
    MeshAssembler, Triangle, Volume, VolumeClipper,
};

/// Name given to generated meshes
pub const DECAL_MESH_NAME: &str = "Decal Mesh";

/// Statistics of one generation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    pub surfaces: usize,
    pub terrains: usize,
    pub terrain_cells: usize,
    pub clip: ClipStats,
}

/// Builds the decal mesh for one volume against a scene
pub struct DecalMeshBuilder<'a> {
    volume: &'a Volume,
    settings: &'a DecalSettings,
}

impl<'a> DecalMeshBuilder<'a> {
    pub fn new(volume: &'a Volume, settings: &'a DecalSettings) -> Self {
        Self { volume, settings }
    }

    /// Run the full pass and return the finished mesh
    pub fn build(&self, scene: &dyn SceneQuery) -> Result<Mesh> {
        self.build_with_stats(scene).map(|(mesh, _)| mesh)
    }

    /// Run the full pass, also returning the pass statistics
    pub fn build_with_stats(&self, scene: &dyn SceneQuery) -> Result<(Mesh, GenerationStats)> {
        let _span = tracing::info_span!("decal_mesh").entered();

        self.settings.validate()?;
        let uv_rect = self.settings.uv_rect()?;

        let mut stats = GenerationStats::default();
        let mut kept: Vec<Triangle> = Vec::new();
        let clipper = VolumeClipper::new(self.volume, self.settings.surface_max_angle);
        let bounds = self.volume.world_bounds();
        let mask = self.settings.layer_mask;

        for terrain in scene.find_intersecting_terrains(&bounds, mask) {
            let triangles = terrain_triangles(terrain, &bounds)?;
            let pass = clipper.clip_into(&triangles, &mut kept);
            tracing::debug!(
                cells = triangles.len() / 2,
                emitted = pass.emitted,
                "Clipped terrain"
            );
            stats.terrains += 1;
            stats.terrain_cells += triangles.len() / 2;
            stats.clip.accumulate(&pass);
        }

        for surface in scene.find_surfaces(&bounds, mask) {
            let triangles = surface.world_triangles()?;
            let pass = clipper.clip_into(&triangles, &mut kept);
            tracing::debug!(
                candidates = triangles.len(),
                rejected_bounds = pass.rejected_bounds,
                rejected_angle = pass.rejected_angle,
                degenerate = pass.degenerate,
                kept_whole = pass.kept_whole,
                clipped = pass.clipped,
                emitted = pass.emitted,
                "Clipped surface"
            );
            stats.surfaces += 1;
            stats.clip.accumulate(&pass);
        }

        let mut mesh = MeshAssembler::new(true)
            .with_transform(*self.volume.inverse_transform())
            .assemble(&kept)?;

        push_along_normals(&mut mesh, self.settings.surface_distance);
        project_uvs(&mut mesh, self.volume, &uv_rect);
        mesh.recalculate_normals();
        mesh.validate()?;
        mesh.name = DECAL_MESH_NAME.to_string();

        tracing::info!(
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            surfaces = stats.surfaces,
            terrains = stats.terrains,
            "Decal mesh generated"
        );

        Ok((mesh, stats))
    }
}

/// Height-sampled grid triangles of a terrain inside `bounds`
pub fn terrain_triangles(terrain: &dyn Terrain, bounds: &Aabb) -> Result<Vec<Triangle>> {
    let origin = terrain.origin();
    let grid = FootprintGrid::new(origin, terrain.cell_spacing(), terrain.footprint_size())?;
    let mut triangles = grid.tessellate(&bounds.min, &bounds.max);
    apply_heights(&mut triangles, origin.y, |x, z| terrain.sample_height(x, z));
    tracing::debug!(cells = triangles.len() / 2, "Tessellated terrain footprint");
    Ok(triangles)
}

/// Generate the decal mesh for a volume
pub fn build_decal_mesh(
    volume: &Volume,
    settings: &DecalSettings,
    scene: &dyn SceneQuery,
) -> Result<Mesh> {
    DecalMeshBuilder::new(volume, settings).build(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heightfield::Heightfield;
    use crate::static_scene::{SceneSurface, StaticScene};
    use nalgebra::{Point3, Vector3};

    #[test]
    fn test_empty_scene_gives_empty_mesh() {
        let scene = StaticScene::new();
        let mesh = build_decal_mesh(&Volume::unit(), &DecalSettings::default(), &scene).unwrap();
        assert!(mesh.is_empty());
        assert_eq!(mesh.triangle_count(), 0);
        assert_eq!(mesh.name, DECAL_MESH_NAME);
    }

    #[test]
    fn test_invalid_settings_abort() {
        let scene = StaticScene::new();
        let settings = DecalSettings {
            surface_max_angle: 500.0,
            ..Default::default()
        };
        assert!(build_decal_mesh(&Volume::unit(), &settings, &scene).is_err());
    }

    #[test]
    fn test_terrain_triangles_follow_height() {
        let field =
            Heightfield::flat(Point3::new(0.0, 1.0, 0.0), Vector3::new(8.0, 2.0, 8.0), 9, 0.5)
                .unwrap();
        let bounds = Aabb::new(Point3::new(1.0, 0.0, 1.0), Point3::new(3.0, 3.0, 3.0));
        let triangles = terrain_triangles(&field, &bounds).unwrap();
        // Cells 1..=3 on both axes
        assert_eq!(triangles.len(), 2 * 9);
        for t in &triangles {
            for v in t.vertices() {
                assert_eq!(v.y, 2.0);
            }
        }
    }

    #[test]
    fn test_stats_count_sources() {
        let mut scene = StaticScene::new();
        scene.add_surface(SceneSurface::new(
            "floor",
            vec![
                Point3::new(-0.25, 0.0, -0.25),
                Point3::new(-0.25, 0.0, 0.25),
                Point3::new(0.25, 0.0, -0.25),
            ],
            vec![0, 1, 2],
        ));
        let volume = Volume::unit();
        let settings = DecalSettings::default();
        let (mesh, stats) = DecalMeshBuilder::new(&volume, &settings)
            .build_with_stats(&scene)
            .unwrap();
        assert_eq!(stats.surfaces, 1);
        assert_eq!(stats.terrains, 0);
        assert_eq!(stats.clip.kept_whole, 1);
        assert_eq!(mesh.triangle_count(), 1);
    }
}
