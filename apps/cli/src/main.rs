// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decal Mesh CLI - regenerates every decal in a scene file.
//!
//! ```text
//! decal-mesh [scene.json] [decals.json]
//! ```
//!
//! Paths default to `DECAL_SCENE` / `DECAL_OUTPUT`. Set `DECAL_PRETTY=1`
//! for indented output and `RUST_LOG` to adjust logging.

use anyhow::Context;
use decal_mesh_processing::rebuild_all;

mod config;
mod output;
mod scene_file;

use config::Config;
use output::OutputFile;
use scene_file::SceneFile;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,decal_mesh_processing=debug".into()),
        )
        .init();

    let config = Config::from_env().with_args(std::env::args().skip(1));
    tracing::info!(
        scene = %config.scene_path.display(),
        output = %config.output_path.display(),
        "Starting decal rebuild"
    );

    let text = std::fs::read_to_string(&config.scene_path)
        .with_context(|| format!("failed to read scene {}", config.scene_path.display()))?;
    let file = SceneFile::from_json(&text)
        .with_context(|| format!("failed to parse scene {}", config.scene_path.display()))?;
    let (scene, mut decals) = file.into_scene().context("invalid scene")?;

    let summary = rebuild_all(&mut decals, &scene);
    let output = OutputFile::collect(&decals, summary);
    let (vertices, triangles) = output
        .decals
        .iter()
        .filter_map(|d| d.mesh.as_ref())
        .fold((0, 0), |(v, t), m| (v + m.vertex_count(), t + m.triangle_count()));
    let json = output.to_json(config.pretty).context("failed to serialize meshes")?;

    std::fs::write(&config.output_path, json)
        .with_context(|| format!("failed to write {}", config.output_path.display()))?;

    tracing::info!(
        rebuilt = summary.rebuilt,
        failed = summary.failed,
        vertices,
        triangles,
        output = %config.output_path.display(),
        "Wrote decal meshes"
    );
    Ok(())
}
