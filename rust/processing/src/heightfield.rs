// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory heightmap terrain

use crate::scene::Terrain;
use decal_mesh_geometry::{cell_spacing_for_resolution, Error as GeometryError};
use nalgebra::{Point3, Vector3};

/// Square grid of normalized height samples
///
/// Samples are row-major with rows along Z. A sample value of 1 maps to
/// `size.y` above the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Heightfield {
    origin: Point3<f64>,
    size: Vector3<f64>,
    resolution: usize,
    heights: Vec<f64>,
}

impl Heightfield {
    pub fn new(
        origin: Point3<f64>,
        size: Vector3<f64>,
        resolution: usize,
        heights: Vec<f64>,
    ) -> decal_mesh_geometry::Result<Self> {
        if resolution < 2 {
            return Err(GeometryError::InvalidGrid(format!(
                "heightmap resolution {} is below 2",
                resolution
            )));
        }
        if heights.len() != resolution * resolution {
            return Err(GeometryError::InvalidGrid(format!(
                "expected {} height samples, got {}",
                resolution * resolution,
                heights.len()
            )));
        }
        if !heights.iter().all(|h| h.is_finite()) {
            return Err(GeometryError::InvalidGrid("height samples must be finite".into()));
        }
        if !(size.x > 0.0 && size.z > 0.0) || !size.iter().all(|c| c.is_finite()) {
            return Err(GeometryError::InvalidGrid(format!(
                "footprint ({}, {}, {}) must be finite with positive X and Z",
                size.x, size.y, size.z
            )));
        }
        Ok(Self {
            origin,
            size,
            resolution,
            heights,
        })
    }

    /// Heightfield with every sample at the same normalized height
    pub fn flat(
        origin: Point3<f64>,
        size: Vector3<f64>,
        resolution: usize,
        height: f64,
    ) -> decal_mesh_geometry::Result<Self> {
        Self::new(origin, size, resolution, vec![height; resolution * resolution])
    }

    /// Heightfield sampled from `f(column, row)`
    pub fn from_fn<F>(
        origin: Point3<f64>,
        size: Vector3<f64>,
        resolution: usize,
        f: F,
    ) -> decal_mesh_geometry::Result<Self>
    where
        F: Fn(usize, usize) -> f64,
    {
        let mut heights = Vec::with_capacity(resolution * resolution);
        for row in 0..resolution {
            for column in 0..resolution {
                heights.push(f(column, row));
            }
        }
        Self::new(origin, size, resolution, heights)
    }

    #[inline]
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    #[inline]
    fn sample(&self, column: usize, row: usize) -> f64 {
        self.heights[row * self.resolution + column]
    }

    /// Fractional grid coordinate along one axis, clamped to the grid
    #[inline]
    fn grid_coord(&self, offset: f64, extent: f64) -> (usize, f64) {
        let last = (self.resolution - 1) as f64;
        let t = (offset / extent * last).clamp(0.0, last);
        let cell = (t.floor() as usize).min(self.resolution - 2);
        (cell, t - cell as f64)
    }
}

impl Terrain for Heightfield {
    fn origin(&self) -> Point3<f64> {
        self.origin
    }

    fn footprint_size(&self) -> Vector3<f64> {
        self.size
    }

    fn cell_spacing(&self) -> f64 {
        cell_spacing_for_resolution(self.size.x, self.resolution).unwrap_or(self.size.x)
    }

    fn sample_height(&self, x: f64, z: f64) -> f64 {
        let (c, fx) = self.grid_coord(x - self.origin.x, self.size.x);
        let (r, fz) = self.grid_coord(z - self.origin.z, self.size.z);

        let h00 = self.sample(c, r);
        let h10 = self.sample(c + 1, r);
        let h01 = self.sample(c, r + 1);
        let h11 = self.sample(c + 1, r + 1);

        let near = h00 + (h10 - h00) * fx;
        let far = h01 + (h11 - h01) * fx;
        (near + (far - near) * fz) * self.size.y
    }
}
