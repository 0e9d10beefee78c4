// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI configuration loaded from environment variables.

use std::path::PathBuf;

/// CLI configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Scene description to read.
    pub scene_path: PathBuf,
    /// File the generated meshes are written to.
    pub output_path: PathBuf,
    /// Pretty-print the output JSON.
    pub pretty: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            scene_path: std::env::var("DECAL_SCENE")
                .unwrap_or_else(|_| "scene.json".into())
                .into(),
            output_path: std::env::var("DECAL_OUTPUT")
                .unwrap_or_else(|_| "decals.json".into())
                .into(),
            pretty: std::env::var("DECAL_PRETTY")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        }
    }

    /// Override the paths with positional arguments: `[scene] [output]`.
    pub fn with_args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        if let Some(scene) = args.next() {
            self.scene_path = scene.into();
        }
        if let Some(output) = args.next() {
            self.output_path = output.into();
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
