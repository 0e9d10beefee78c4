// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Volume clipping
//!
//! Filters candidate triangles by bounds and facing angle, then clips the
//! survivors against the six bounding planes of a decal volume.

use crate::clip::clip_triangle;
use crate::plane::Plane;
use crate::triangle::Triangle;
use crate::volume::{Volume, SIDE_COUNT};
use nalgebra::Vector3;

/// Counters collected during one clipping pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClipStats {
    /// Candidates that provably miss the volume
    pub rejected_bounds: usize,
    /// Candidates facing too far toward the volume's down direction
    pub rejected_angle: usize,
    /// Zero-area candidates
    pub degenerate: usize,
    /// Candidates strictly inside the volume, kept as-is
    pub kept_whole: usize,
    /// Candidates that touched the border and went through plane clipping
    pub clipped: usize,
    /// Triangles produced in total
    pub emitted: usize,
}

impl ClipStats {
    /// Add another pass's counters
    pub fn accumulate(&mut self, other: &ClipStats) {
        self.rejected_bounds += other.rejected_bounds;
        self.rejected_angle += other.rejected_angle;
        self.degenerate += other.degenerate;
        self.kept_whole += other.kept_whole;
        self.clipped += other.clipped;
        self.emitted += other.emitted;
    }
}

/// Clips triangles to the inside of a volume
pub struct VolumeClipper<'a> {
    volume: &'a Volume,
    planes: [Plane; SIDE_COUNT],
    down: Vector3<f64>,
    /// Minimum angle in degrees between a face and the volume's down direction
    surface_max_angle: f64,
}

impl<'a> VolumeClipper<'a> {
    /// Create a clipper for a volume and facing threshold (degrees)
    pub fn new(volume: &'a Volume, surface_max_angle: f64) -> Self {
        Self {
            volume,
            planes: volume.side_planes(),
            down: -volume.up(),
            surface_max_angle,
        }
    }

    /// Check the facing test: `angle(-up, direction) >= surface_max_angle`
    #[inline]
    pub fn accepts_direction(&self, direction: &Vector3<f64>) -> bool {
        self.down.angle(direction).to_degrees() >= self.surface_max_angle
    }

    /// Clip a set of triangles, appending kept fragments to `out`
    pub fn clip_into(&self, triangles: &[Triangle], out: &mut Vec<Triangle>) -> ClipStats {
        let mut stats = ClipStats::default();
        if self.volume.is_empty() {
            stats.rejected_bounds = triangles.len();
            return stats;
        }

        let start = out.len();
        for triangle in triangles {
            let vertices = triangle.vertices();
            if !self.volume.overlaps(&vertices) {
                stats.rejected_bounds += 1;
                continue;
            }
            let Some(direction) = triangle.direction() else {
                stats.degenerate += 1;
                continue;
            };
            if !self.accepts_direction(&direction) {
                stats.rejected_angle += 1;
                continue;
            }
            if !self.volume.touches_border(&vertices) {
                stats.kept_whole += 1;
                out.push(*triangle);
                continue;
            }

            stats.clipped += 1;
            self.clip_to_planes(triangle, out);
        }
        stats.emitted = out.len() - start;
        stats
    }

    /// Clip a set of triangles
    pub fn clip(&self, triangles: &[Triangle]) -> Vec<Triangle> {
        let mut out = Vec::new();
        self.clip_into(triangles, &mut out);
        out
    }

    /// Run one triangle through all six planes, feeding each plane's output
    /// into the next
    fn clip_to_planes(&self, triangle: &Triangle, out: &mut Vec<Triangle>) {
        let mut to_cut = vec![*triangle];
        for plane in &self.planes {
            let mut cut = Vec::with_capacity(to_cut.len() * 2);
            for t in &to_cut {
                cut.extend(clip_triangle(t, plane).into_triangles());
            }
            to_cut = cut;
            if to_cut.is_empty() {
                return;
            }
        }
        out.extend(to_cut);
    }
}

/// Clip triangles against a volume with a facing threshold in degrees
pub fn clip_against_volume(
    triangles: &[Triangle],
    volume: &Volume,
    surface_max_angle: f64,
) -> Vec<Triangle> {
    VolumeClipper::new(volume, surface_max_angle).clip(triangles)
}
