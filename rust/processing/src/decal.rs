// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decal entity
//!
//! Owns a volume, its settings and the last generated mesh. Any edit clears
//! the mesh, so hosts can tell which decals need a rebuild.

use crate::error::Result;
use crate::pipeline::build_decal_mesh;
use crate::scene::SceneQuery;
use crate::settings::{DecalSettings, DEFAULT_SURFACE_DISTANCE, DEFAULT_SURFACE_MAX_ANGLE};
use decal_mesh_geometry::{Matrix4, Mesh, Volume};

/// A decal volume placed in a scene
#[derive(Debug, Clone, Default)]
pub struct DecalVolume {
    name: String,
    volume: Volume,
    settings: DecalSettings,
    mesh: Option<Mesh>,
}

impl DecalVolume {
    pub fn new(name: impl Into<String>, volume: Volume, settings: DecalSettings) -> Self {
        Self {
            name: name.into(),
            volume,
            settings,
            mesh: None,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    #[inline]
    pub fn settings(&self) -> &DecalSettings {
        &self.settings
    }

    /// Last generated mesh, if any
    #[inline]
    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    #[inline]
    pub fn has_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    pub fn set_volume(&mut self, volume: Volume) {
        self.volume = volume;
        self.mesh = None;
    }

    /// Move the volume; a singular transform leaves everything unchanged
    pub fn set_transform(&mut self, transform: Matrix4<f64>) -> Result<()> {
        self.volume.set_transform(transform)?;
        self.mesh = None;
        Ok(())
    }

    pub fn set_settings(&mut self, settings: DecalSettings) {
        self.settings = settings;
        self.mesh = None;
    }

    /// Restore the unit volume shape, the default facing angle and the
    /// default surface distance
    ///
    /// The transform, layer mask and sprite are kept.
    pub fn reset_settings(&mut self) {
        self.volume.reset_shape();
        self.settings.surface_max_angle = DEFAULT_SURFACE_MAX_ANGLE;
        self.settings.surface_distance = DEFAULT_SURFACE_DISTANCE;
        self.mesh = None;
    }

    /// Regenerate the mesh
    ///
    /// On failure the previous mesh (or none) stays in place.
    pub fn rebuild(&mut self, scene: &dyn SceneQuery) -> Result<&Mesh> {
        let mesh = build_decal_mesh(&self.volume, &self.settings, scene)?;
        Ok(self.mesh.insert(mesh))
    }

    /// Drop the generated mesh
    pub fn clear(&mut self) {
        self.mesh = None;
    }
}

/// Outcome of [`rebuild_all`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RebuildSummary {
    pub rebuilt: usize,
    pub failed: usize,
}

/// Regenerate every decal; failures are logged and do not stop the others
pub fn rebuild_all(decals: &mut [DecalVolume], scene: &dyn SceneQuery) -> RebuildSummary {
    let mut summary = RebuildSummary::default();
    for decal in decals.iter_mut() {
        let result = decal.rebuild(scene).map(|_| ());
        match result {
            Ok(()) => summary.rebuilt += 1,
            Err(e) => {
                tracing::warn!(decal = %decal.name, error = %e, "Decal rebuild failed");
                summary.failed += 1;
            }
        }
    }
    tracing::info!(rebuilt = summary.rebuilt, failed = summary.failed, "Rebuilt decals");
    summary
}
