//! Decal Mesh Geometry
//!
//! Geometry engine for surface-conforming decal meshes: exact triangle/plane
//! clipping, oriented-box clipping, heightmap footprint tessellation, welded
//! mesh assembly and planar UV projection. Uses nalgebra for transformations.

pub mod clip;
pub mod error;
pub mod mesh;
pub mod plane;
pub mod projection;
pub mod terrain;
pub mod triangle;
pub mod volume;
pub mod volume_clip;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point3, Vector3};

pub use clip::{clip_triangle, divide_face, ClipResult, ClippedTriangles};
pub use error::{Error, Result};
pub use mesh::{assemble, triangles_from_buffers, validate_indices, Mesh, MeshAssembler};
pub use plane::Plane;
pub use projection::{project_uv, project_uvs, push_along_normals, UvRect, UV_RECT_SCALE};
pub use terrain::{apply_heights, cell_spacing_for_resolution, tessellate_footprint, FootprintGrid};
pub use triangle::Triangle;
pub use volume::{Aabb, Volume, SIDE_COUNT};
pub use volume_clip::{clip_against_volume, ClipStats, VolumeClipper};
