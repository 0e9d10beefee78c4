//! Decal Mesh Processing
//!
//! Pipeline that turns a decal volume into a surface-conforming mesh, the
//! decal entity that owns the result, per-decal settings, and the scene
//! collaborator traits with in-memory implementations.
//!
//! ```no_run
//! use decal_mesh_processing::{DecalSettings, DecalVolume, StaticScene};
//!
//! let scene = StaticScene::new();
//! let mut decal = DecalVolume::default();
//! decal.set_settings(DecalSettings::from_json(r#"{"surface_max_angle": 120}"#).unwrap());
//! let mesh = decal.rebuild(&scene).unwrap();
//! println!("{} triangles", mesh.triangle_count());
//! ```

pub mod decal;
pub mod error;
pub mod heightfield;
pub mod pipeline;
pub mod scene;
pub mod settings;
pub mod static_scene;

pub use decal::{rebuild_all, DecalVolume, RebuildSummary};
pub use error::{Error, Result};
pub use heightfield::Heightfield;
pub use pipeline::{
    build_decal_mesh, terrain_triangles, DecalMeshBuilder, GenerationStats, DECAL_MESH_NAME,
};
pub use scene::{LayerMask, SceneQuery, SurfaceRef, Terrain};
pub use settings::{DecalSettings, SpriteRect, DEFAULT_SURFACE_DISTANCE, DEFAULT_SURFACE_MAX_ANGLE};
pub use static_scene::{SceneSurface, StaticScene};
