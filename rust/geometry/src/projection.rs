// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar UV projection and surface offset
//!
//! Both operate on a mesh whose positions are already in the volume's local
//! frame.

use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::volume::Volume;
use nalgebra::Point3;

/// Scale between the normalized volume span and the UV rectangle
///
/// The full volume size covers two rectangle widths, so the default
/// `(0, 0, 0.5, 0.5)` rectangle spans the whole texture.
pub const UV_RECT_SCALE: f64 = 2.0;

/// Sub-rectangle of a texture in normalized coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl UvRect {
    /// Rectangle used when no sprite is assigned
    pub const DEFAULT: UvRect = UvRect {
        x: 0.0,
        y: 0.0,
        width: 0.5,
        height: 0.5,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Normalize a pixel-space sprite rectangle by its texture size
    pub fn from_sprite(
        pixel_x: f64,
        pixel_y: f64,
        pixel_width: f64,
        pixel_height: f64,
        texture_width: f64,
        texture_height: f64,
    ) -> Result<Self> {
        if !(texture_width > 0.0 && texture_height > 0.0)
            || !texture_width.is_finite()
            || !texture_height.is_finite()
        {
            return Err(Error::InvalidUvRect(format!(
                "texture size {}x{} must be positive",
                texture_width, texture_height
            )));
        }
        let rect = Self::new(
            pixel_x / texture_width,
            pixel_y / texture_height,
            pixel_width / texture_width,
            pixel_height / texture_height,
        );
        if ![rect.x, rect.y, rect.width, rect.height].iter().all(|c| c.is_finite()) {
            return Err(Error::InvalidUvRect(format!("sprite rect {:?} is not finite", rect)));
        }
        Ok(rect)
    }
}

impl Default for UvRect {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Normalized position on one axis, center at 0.5
#[inline]
fn normalized(offset: f64, size: f64) -> f64 {
    if size == 0.0 {
        0.5
    } else {
        offset / size + 0.5
    }
}

/// UV of a local-frame position projected along the volume's Y axis
pub fn project_uv(local: &Point3<f64>, volume: &Volume, rect: &UvRect) -> [f64; 2] {
    let offset = local - volume.origin();
    let size = volume.size();
    let u = normalized(offset.x, size.x);
    let v = normalized(offset.z, size.z);
    [
        rect.x * UV_RECT_SCALE + u * rect.width * UV_RECT_SCALE,
        rect.y * UV_RECT_SCALE + v * rect.height * UV_RECT_SCALE,
    ]
}

/// Replace the mesh's UVs with the planar projection of its positions
pub fn project_uvs(mesh: &mut Mesh, volume: &Volume, rect: &UvRect) {
    let mut uvs = Vec::with_capacity(mesh.vertex_count() * 2);
    for i in 0..mesh.vertex_count() {
        let [u, v] = project_uv(&mesh.position(i), volume, rect);
        uvs.push(u as f32);
        uvs.push(v as f32);
    }
    mesh.uvs = uvs;
}

/// Move every vertex `distance` along its own normal
pub fn push_along_normals(mesh: &mut Mesh, distance: f64) {
    if distance == 0.0 || mesh.normals.len() != mesh.positions.len() {
        return;
    }
    for i in 0..mesh.vertex_count() {
        let pushed = mesh.position(i) + mesh.normal(i) * distance;
        mesh.set_position(i, pushed);
    }
}
