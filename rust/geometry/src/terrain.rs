// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Terrain footprint tessellation
//!
//! Heightmap terrains have no triangle buffers of their own. A grid of quads
//! aligned to the heightmap's sample spacing is generated over the requested
//! region and then lifted to the sampled height.
//!
//! Cells are addressed by integer indices, so repeated calls over overlapping
//! regions produce bit-identical cells where they overlap.

use crate::error::{Error, Result};
use crate::triangle::Triangle;
use nalgebra::{Point3, Vector3};

/// Grid of heightmap cells over a terrain footprint (XZ plane)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FootprintGrid {
    origin: Point3<f64>,
    spacing: f64,
    size: Vector3<f64>,
}

impl FootprintGrid {
    /// Create a grid for a terrain at `origin` covering `size` on X and Z
    pub fn new(origin: Point3<f64>, spacing: f64, size: Vector3<f64>) -> Result<Self> {
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(Error::InvalidGrid(format!(
                "cell spacing {} must be finite and positive",
                spacing
            )));
        }
        if !size.x.is_finite() || !size.z.is_finite() || size.x < 0.0 || size.z < 0.0 {
            return Err(Error::InvalidGrid(format!(
                "footprint ({}, {}) must be finite and non-negative",
                size.x, size.z
            )));
        }
        Ok(Self { origin, spacing, size })
    }

    #[inline]
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Index of the cell containing `value` along one axis
    #[inline]
    fn index_along(&self, value: f64, origin: f64) -> i64 {
        ((value - origin) / self.spacing).floor() as i64
    }

    /// Center of cell `(i, j)` at the terrain's base height
    pub fn cell_center(&self, i: i64, j: i64) -> Point3<f64> {
        Point3::new(
            self.origin.x + (i as f64 + 0.5) * self.spacing,
            self.origin.y,
            self.origin.z + (j as f64 + 0.5) * self.spacing,
        )
    }

    /// Grid line intersection `(i, j)` at the terrain's base height
    ///
    /// Neighbouring cells evaluate shared corners through this one expression,
    /// so their coordinates are bit-identical and weld.
    #[inline]
    pub fn grid_point(&self, i: i64, j: i64) -> Point3<f64> {
        Point3::new(
            self.origin.x + i as f64 * self.spacing,
            self.origin.y,
            self.origin.z + j as f64 * self.spacing,
        )
    }

    /// Check whether a point lies strictly inside the footprint on X and Z
    #[inline]
    pub fn footprint_contains(&self, point: &Point3<f64>) -> bool {
        point.x > self.origin.x
            && point.x < self.origin.x + self.size.x
            && point.z > self.origin.z
            && point.z < self.origin.z + self.size.z
    }

    /// Inclusive index range along one axis, clamped to the footprint
    fn index_range(&self, start: f64, end: f64, origin: f64, extent: f64) -> (i64, i64) {
        let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
        let cells = (extent / self.spacing).ceil() as i64;
        let first = self.index_along(lo, origin).max(0);
        let last = self.index_along(hi, origin).min(cells - 1);
        (first, last)
    }

    /// Cells whose centers lie inside the footprint and the region
    pub fn cells_in_region(
        &self,
        region_start: &Point3<f64>,
        region_end: &Point3<f64>,
    ) -> Vec<(i64, i64)> {
        let (i0, i1) = self.index_range(region_start.x, region_end.x, self.origin.x, self.size.x);
        let (j0, j1) = self.index_range(region_start.z, region_end.z, self.origin.z, self.size.z);

        let mut cells = Vec::new();
        for i in i0..=i1 {
            for j in j0..=j1 {
                if self.footprint_contains(&self.cell_center(i, j)) {
                    cells.push((i, j));
                }
            }
        }
        cells
    }

    /// Flat triangles for one cell, both facing +Y
    pub fn cell_triangles(&self, i: i64, j: i64) -> [Triangle; 2] {
        let c0 = self.grid_point(i, j);
        let c1 = self.grid_point(i, j + 1);
        let c2 = self.grid_point(i + 1, j + 1);
        let c3 = self.grid_point(i + 1, j);

        [Triangle::new(c0, c1, c2), Triangle::new(c2, c3, c0)]
    }

    /// Flat triangles for every cell in the region
    pub fn tessellate(
        &self,
        region_start: &Point3<f64>,
        region_end: &Point3<f64>,
    ) -> Vec<Triangle> {
        let cells = self.cells_in_region(region_start, region_end);
        let mut triangles = Vec::with_capacity(cells.len() * 2);
        for (i, j) in cells {
            triangles.extend(self.cell_triangles(i, j));
        }
        triangles
    }
}

/// Generate flat grid triangles over the part of a terrain footprint that
/// falls inside `[region_start, region_end]`
pub fn tessellate_footprint(
    terrain_origin: &Point3<f64>,
    grid_spacing: f64,
    region_start: &Point3<f64>,
    region_end: &Point3<f64>,
    footprint_size: &Vector3<f64>,
) -> Result<Vec<Triangle>> {
    let grid = FootprintGrid::new(*terrain_origin, grid_spacing, *footprint_size)?;
    Ok(grid.tessellate(region_start, region_end))
}

/// Set every vertex height to `base_y + sample(x, z)`
pub fn apply_heights<F>(triangles: &mut [Triangle], base_y: f64, sample: F)
where
    F: Fn(f64, f64) -> f64,
{
    for triangle in triangles.iter_mut() {
        for v in [&mut triangle.v0, &mut triangle.v1, &mut triangle.v2] {
            v.y = base_y + sample(v.x, v.z);
        }
    }
}

/// Cell spacing of a heightmap with `resolution` samples across `size_x`
pub fn cell_spacing_for_resolution(size_x: f64, resolution: usize) -> Option<f64> {
    if resolution < 2 {
        return None;
    }
    Some(size_x / (resolution - 1) as f64)
}
