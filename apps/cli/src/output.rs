// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Output types for serialization.

use decal_mesh_geometry::Mesh;
use decal_mesh_processing::{DecalVolume, RebuildSummary};
use serde::{Deserialize, Serialize};

/// Generated mesh buffers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshData {
    /// Mesh asset name.
    pub name: String,
    /// Vertex positions (x, y, z triplets) in the decal's local frame.
    pub positions: Vec<f32>,
    /// Vertex normals (x, y, z triplets).
    pub normals: Vec<f32>,
    /// Texture coordinates (u, v pairs).
    pub uvs: Vec<f32>,
    /// Triangle indices.
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Get the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

impl From<&Mesh> for MeshData {
    fn from(mesh: &Mesh) -> Self {
        Self {
            name: mesh.name.clone(),
            positions: mesh.positions.clone(),
            normals: mesh.normals.clone(),
            uvs: mesh.uvs.clone(),
            indices: mesh.indices.clone(),
        }
    }
}

/// One decal's result; `mesh` is absent when its rebuild failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecalOutput {
    pub decal: String,
    pub mesh: Option<MeshData>,
}

/// Whole output document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputFile {
    pub rebuilt: usize,
    pub failed: usize,
    pub decals: Vec<DecalOutput>,
}

impl OutputFile {
    pub fn collect(decals: &[DecalVolume], summary: RebuildSummary) -> Self {
        Self {
            rebuilt: summary.rebuilt,
            failed: summary.failed,
            decals: decals
                .iter()
                .map(|d| DecalOutput {
                    decal: d.name().to_string(),
                    mesh: d.mesh().map(MeshData::from),
                })
                .collect(),
        }
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
