// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene collaborators
//!
//! The pipeline never enumerates the host scene itself. Candidate surfaces
//! and terrains are requested through [`SceneQuery`], which hosts implement
//! over their own scene graph. [`crate::StaticScene`] is an in-memory
//! implementation.

use decal_mesh_geometry::{triangles_from_buffers, Aabb, Triangle};
use nalgebra::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Layer filter: an object on layer `l` is eligible when bit `l` is set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    /// Mask selecting a single layer
    #[inline]
    pub fn layer(layer: u8) -> Self {
        Self(1u32.checked_shl(layer as u32).unwrap_or(0))
    }

    /// Check whether objects on `layer` pass the filter
    #[inline]
    pub fn includes(self, layer: u8) -> bool {
        self.0 & Self::layer(layer).0 != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self(1)
    }
}

/// Borrowed mesh surface returned by a scene query
#[derive(Debug, Clone, Copy)]
pub struct SurfaceRef<'a> {
    /// Object-space vertex positions
    pub vertices: &'a [Point3<f64>],
    /// Triangle list indices into `vertices`
    pub indices: &'a [u32],
    /// Object-to-world transform
    pub transform: Matrix4<f64>,
}

impl<'a> SurfaceRef<'a> {
    pub fn new(vertices: &'a [Point3<f64>], indices: &'a [u32], transform: Matrix4<f64>) -> Self {
        Self {
            vertices,
            indices,
            transform,
        }
    }

    /// World-space triangles, failing on a malformed index buffer
    pub fn world_triangles(&self) -> decal_mesh_geometry::Result<Vec<Triangle>> {
        triangles_from_buffers(self.vertices, self.indices, &self.transform)
    }
}

/// Heightmap terrain handle
pub trait Terrain {
    /// World position of the footprint's minimum corner
    fn origin(&self) -> Point3<f64>;

    /// Footprint extents; `y` is the height range
    fn footprint_size(&self) -> Vector3<f64>;

    /// Distance between neighboring height samples on X and Z
    fn cell_spacing(&self) -> f64;

    /// Height above `origin.y` at world `(x, z)`
    fn sample_height(&self, x: f64, z: f64) -> f64;

    /// World-space bounds of the footprint
    fn bounds(&self) -> Aabb {
        let origin = self.origin();
        Aabb::new(origin, origin + self.footprint_size())
    }
}

/// Spatial query over a host scene
pub trait SceneQuery {
    /// Mesh surfaces on an eligible layer whose bounds intersect `bounds`
    fn find_surfaces(&self, bounds: &Aabb, mask: LayerMask) -> Vec<SurfaceRef<'_>>;

    /// Terrains on an eligible layer whose footprint intersects `bounds`
    fn find_intersecting_terrains(&self, bounds: &Aabb, mask: LayerMask) -> Vec<&dyn Terrain>;
}
