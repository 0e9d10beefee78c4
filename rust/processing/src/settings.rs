// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-decal settings

use crate::error::{Error, Result};
use crate::scene::LayerMask;
use decal_mesh_geometry::UvRect;
use serde::{Deserialize, Serialize};

/// Default facing threshold in degrees
pub const DEFAULT_SURFACE_MAX_ANGLE: f64 = 90.0;

/// Default push along the vertex normals
pub const DEFAULT_SURFACE_DISTANCE: f64 = 0.01;

/// Sprite rectangle in texture pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub texture_width: f64,
    pub texture_height: f64,
}

impl SpriteRect {
    /// Rectangle in normalized texture space
    pub fn uv_rect(&self) -> Result<UvRect> {
        Ok(UvRect::from_sprite(
            self.x,
            self.y,
            self.width,
            self.height,
            self.texture_width,
            self.texture_height,
        )?)
    }
}

/// Settings controlling how a decal volume is turned into a mesh
///
/// Missing JSON fields take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecalSettings {
    /// Minimum angle in degrees between a face normal and the volume's
    /// down direction; 90 keeps floors and walls, 180 only floors
    pub surface_max_angle: f64,
    /// Offset along the vertex normals
    pub surface_distance: f64,
    /// Layers whose objects receive the decal
    pub layer_mask: LayerMask,
    /// Atlas sprite; `None` maps the full texture
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprite: Option<SpriteRect>,
}

impl Default for DecalSettings {
    fn default() -> Self {
        Self {
            surface_max_angle: DEFAULT_SURFACE_MAX_ANGLE,
            surface_distance: DEFAULT_SURFACE_DISTANCE,
            layer_mask: LayerMask::default(),
            sprite: None,
        }
    }
}

impl DecalSettings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: DecalSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=180.0).contains(&self.surface_max_angle) {
            return Err(Error::InvalidSettings(format!(
                "surface_max_angle {} must be within 0..=180 degrees",
                self.surface_max_angle
            )));
        }
        if !self.surface_distance.is_finite() {
            return Err(Error::InvalidSettings(format!(
                "surface_distance {} must be finite",
                self.surface_distance
            )));
        }
        if let Some(sprite) = &self.sprite {
            let values = [sprite.x, sprite.y, sprite.width, sprite.height];
            if !values.iter().all(|v| v.is_finite()) {
                return Err(Error::InvalidSettings(format!(
                    "sprite rect {:?} must be finite",
                    sprite
                )));
            }
        }
        Ok(())
    }

    /// UV rectangle for the assigned sprite, or the default rectangle
    pub fn uv_rect(&self) -> Result<UvRect> {
        match &self.sprite {
            Some(sprite) => sprite.uv_rect(),
            None => Ok(UvRect::DEFAULT),
        }
    }
}
