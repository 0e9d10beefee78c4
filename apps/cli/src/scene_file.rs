// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON scene description.
//!
//! ```json
//! {
//!   "surfaces": [
//!     { "name": "floor", "vertices": [[0,0,0], [0,0,1], [1,0,0]], "indices": [0,1,2],
//!       "transform": { "translation": [0,0,0], "rotation": [0,0,0], "scale": [1,1,1] },
//!       "layer": 0 }
//!   ],
//!   "terrains": [
//!     { "origin": [-8,0,-8], "size": [16,2,16], "resolution": 17, "heights": [...], "layer": 0 }
//!   ],
//!   "decals": [
//!     { "name": "puddle", "origin": [0,0,0], "size": [1,1,1],
//!       "transform": { "translation": [2,0,3] },
//!       "settings": { "surface_max_angle": 90, "surface_distance": 0.01 } }
//!   ]
//! }
//! ```
//!
//! Rotations are Euler angles in degrees (roll, pitch, yaw about X, Y, Z).
//! Every transform field is optional.

use decal_mesh_geometry::Volume;
use decal_mesh_processing::{DecalSettings, DecalVolume, Heightfield, SceneSurface, StaticScene};
use nalgebra::{Matrix4, Point3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

/// Translation, Euler rotation (degrees) and scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformDesc {
    pub translation: [f64; 3],
    pub rotation: [f64; 3],
    pub scale: [f64; 3],
}

impl Default for TransformDesc {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

impl TransformDesc {
    /// Local-to-world matrix: translation * rotation * scale.
    pub fn to_matrix(&self) -> Matrix4<f64> {
        let [rx, ry, rz] = self.rotation.map(f64::to_radians);
        Matrix4::new_translation(&Vector3::from(self.translation))
            * Rotation3::from_euler_angles(rx, ry, rz).to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&Vector3::from(self.scale))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceDesc {
    #[serde(default)]
    pub name: String,
    pub vertices: Vec<[f64; 3]>,
    pub indices: Vec<u32>,
    #[serde(default)]
    pub transform: TransformDesc,
    #[serde(default)]
    pub layer: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainDesc {
    pub origin: [f64; 3],
    pub size: [f64; 3],
    pub resolution: usize,
    /// Row-major normalized heights, rows along Z.
    pub heights: Vec<f64>,
    #[serde(default)]
    pub layer: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecalDesc {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub origin: [f64; 3],
    #[serde(default = "unit_size")]
    pub size: [f64; 3],
    #[serde(default)]
    pub transform: TransformDesc,
    #[serde(default)]
    pub settings: DecalSettings,
}

fn unit_size() -> [f64; 3] {
    [1.0; 3]
}

/// Whole scene file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneFile {
    pub surfaces: Vec<SurfaceDesc>,
    pub terrains: Vec<TerrainDesc>,
    pub decals: Vec<DecalDesc>,
}

impl SceneFile {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Build the in-memory scene and the decal entities.
    pub fn into_scene(self) -> decal_mesh_processing::Result<(StaticScene, Vec<DecalVolume>)> {
        let mut scene = StaticScene::new();

        for surface in self.surfaces {
            scene.add_surface(
                SceneSurface::new(
                    surface.name,
                    surface.vertices.into_iter().map(Point3::from).collect(),
                    surface.indices,
                )
                .with_transform(surface.transform.to_matrix())
                .on_layer(surface.layer),
            );
        }

        for terrain in self.terrains {
            let field = Heightfield::new(
                Point3::from(terrain.origin),
                Vector3::from(terrain.size),
                terrain.resolution,
                terrain.heights,
            )?;
            scene.add_terrain(field, terrain.layer);
        }

        let mut decals = Vec::with_capacity(self.decals.len());
        for (i, decal) in self.decals.into_iter().enumerate() {
            let volume = Volume::new(Point3::from(decal.origin), Vector3::from(decal.size))?
                .with_transform(decal.transform.to_matrix())?;
            let name = if decal.name.is_empty() {
                format!("decal-{}", i)
            } else {
                decal.name
            };
            decals.push(DecalVolume::new(name, volume, decal.settings));
        }

        Ok((scene, decals))
    }
}
