// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data structures and assembly

use crate::error::{Error, Result};
use crate::triangle::Triangle;
use crate::volume::Aabb;
use nalgebra::{Matrix4, Point3, Vector3};
use rustc_hash::FxHashMap;

/// Triangle mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Mesh asset name
    pub name: String,
    /// Vertex positions (x, y, z)
    pub positions: Vec<f32>,
    /// Vertex normals (nx, ny, nz)
    pub normals: Vec<f32>,
    /// Texture coordinates (u, v), empty until projected
    pub uvs: Vec<f32>,
    /// Triangle indices (i0, i1, i2)
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            name: String::new(),
            positions: Vec::with_capacity(vertex_count * 3),
            normals: Vec::with_capacity(vertex_count * 3),
            uvs: Vec::new(),
            indices: Vec::with_capacity(index_count),
        }
    }

    /// Add a vertex with normal
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>, normal: Vector3<f64>) {
        self.positions.push(position.x as f32);
        self.positions.push(position.y as f32);
        self.positions.push(position.z as f32);

        self.normals.push(normal.x as f32);
        self.normals.push(normal.y as f32);
        self.normals.push(normal.z as f32);
    }

    /// Add a triangle
    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of vertex `index` in f64
    #[inline]
    pub fn position(&self, index: usize) -> Point3<f64> {
        let p = &self.positions[index * 3..index * 3 + 3];
        Point3::new(p[0] as f64, p[1] as f64, p[2] as f64)
    }

    /// Normal of vertex `index` in f64
    #[inline]
    pub fn normal(&self, index: usize) -> Vector3<f64> {
        let n = &self.normals[index * 3..index * 3 + 3];
        Vector3::new(n[0] as f64, n[1] as f64, n[2] as f64)
    }

    /// Overwrite the position of vertex `index`
    #[inline]
    pub fn set_position(&mut self, index: usize, position: Point3<f64>) {
        let p = &mut self.positions[index * 3..index * 3 + 3];
        p[0] = position.x as f32;
        p[1] = position.y as f32;
        p[2] = position.z as f32;
    }

    /// Calculate bounds from the current positions, `None` when empty
    pub fn bounds(&self) -> Option<Aabb> {
        if self.is_empty() {
            return None;
        }

        let mut min = Point3::new(f64::MAX, f64::MAX, f64::MAX);
        let mut max = Point3::new(f64::MIN, f64::MIN, f64::MIN);

        self.positions.chunks_exact(3).for_each(|chunk| {
            let p = Point3::new(chunk[0] as f64, chunk[1] as f64, chunk[2] as f64);
            min = min.inf(&p);
            max = max.sup(&p);
        });

        Some(Aabb::new(min, max))
    }

    /// Check buffer shapes and index ranges
    pub fn validate(&self) -> Result<()> {
        if self.positions.len() % 3 != 0 {
            return Err(Error::InvalidVertexBuffer {
                len: self.positions.len(),
            });
        }
        let vertex_count = self.vertex_count();
        if self.normals.len() != self.positions.len() {
            return Err(Error::AttributeMismatch {
                attribute: "normal",
                len: self.normals.len(),
                expected: self.positions.len(),
            });
        }
        if !self.uvs.is_empty() && self.uvs.len() != vertex_count * 2 {
            return Err(Error::AttributeMismatch {
                attribute: "uv",
                len: self.uvs.len(),
                expected: vertex_count * 2,
            });
        }
        validate_indices(&self.indices, vertex_count)
    }

    /// Recompute per-vertex normals from the triangle list
    ///
    /// Face cross products are summed unnormalized, so larger faces weigh
    /// more. A vertex whose sum is zero gets a zero normal.
    pub fn recalculate_normals(&mut self) {
        let vertex_count = self.vertex_count();
        let mut normals = vec![Vector3::<f64>::zeros(); vertex_count];

        for tri in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
                continue;
            }
            let face = Triangle::new(self.position(i0), self.position(i1), self.position(i2));
            let normal = face.cross();

            normals[i0] += normal;
            normals[i1] += normal;
            normals[i2] += normal;
        }

        self.normals.clear();
        self.normals.reserve(vertex_count * 3);
        for normal in normals {
            let normalized = normal.try_normalize(0.0).unwrap_or_else(Vector3::zeros);
            self.normals.push(normalized.x as f32);
            self.normals.push(normalized.y as f32);
            self.normals.push(normalized.z as f32);
        }
    }

    /// Rebuild the triangle list from the indexed buffers
    pub fn triangles(&self) -> Vec<Triangle> {
        let vertex_count = self.vertex_count();
        self.indices
            .chunks_exact(3)
            .filter(|tri| tri.iter().all(|&i| (i as usize) < vertex_count))
            .map(|tri| {
                Triangle::new(
                    self.position(tri[0] as usize),
                    self.position(tri[1] as usize),
                    self.position(tri[2] as usize),
                )
            })
            .collect()
    }
}

/// Check that an index buffer holds whole triangles within `vertex_count`
pub fn validate_indices(indices: &[u32], vertex_count: usize) -> Result<()> {
    if indices.len() % 3 != 0 {
        return Err(Error::InvalidIndexBuffer { len: indices.len() });
    }
    if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
        return Err(Error::IndexOutOfRange { index, vertex_count });
    }
    Ok(())
}

/// Expand an indexed vertex buffer into world-space triangles
pub fn triangles_from_buffers(
    vertices: &[Point3<f64>],
    indices: &[u32],
    transform: &Matrix4<f64>,
) -> Result<Vec<Triangle>> {
    validate_indices(indices, vertices.len())?;
    let world: Vec<Point3<f64>> = vertices.iter().map(|v| transform.transform_point(v)).collect();
    Ok(indices
        .chunks_exact(3)
        .map(|tri| {
            Triangle::new(
                world[tri[0] as usize],
                world[tri[1] as usize],
                world[tri[2] as usize],
            )
        })
        .collect())
}

/// Weld key: exact f64 bit pattern per component, `-0.0` folded into `0.0`
type WeldKey = [u64; 3];

#[inline]
fn weld_key(point: &Point3<f64>) -> WeldKey {
    #[inline]
    fn bits(c: f64) -> u64 {
        if c == 0.0 {
            0
        } else {
            c.to_bits()
        }
    }
    [bits(point.x), bits(point.y), bits(point.z)]
}

/// Builds an indexed mesh from a triangle list
///
/// Welding compares positions before `transform` is applied, in full f64
/// precision. The optional transform is applied in f64 before the f32
/// conversion.
#[derive(Debug, Clone)]
pub struct MeshAssembler {
    weld: bool,
    transform: Option<Matrix4<f64>>,
}

impl MeshAssembler {
    pub fn new(weld: bool) -> Self {
        Self { weld, transform: None }
    }

    /// Transform applied to every emitted vertex
    pub fn with_transform(mut self, transform: Matrix4<f64>) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Assemble triangles into a validated mesh with recomputed normals
    pub fn assemble(&self, triangles: &[Triangle]) -> Result<Mesh> {
        let corner_count = triangles.len() * 3;
        let mut mesh = Mesh::with_capacity(corner_count, corner_count);
        let mut welded: FxHashMap<WeldKey, u32> = FxHashMap::default();

        for triangle in triangles {
            let mut tri = [0u32; 3];
            for (slot, vertex) in tri.iter_mut().zip(triangle.vertices()) {
                *slot = if self.weld {
                    let key = weld_key(&vertex);
                    match welded.get(&key) {
                        Some(&index) => index,
                        None => {
                            let index = self.push_vertex(&mut mesh, &vertex)?;
                            welded.insert(key, index);
                            index
                        }
                    }
                } else {
                    self.push_vertex(&mut mesh, &vertex)?
                };
            }
            mesh.add_triangle(tri[0], tri[1], tri[2]);
        }

        mesh.recalculate_normals();
        mesh.validate()?;
        Ok(mesh)
    }

    fn push_vertex(&self, mesh: &mut Mesh, vertex: &Point3<f64>) -> Result<u32> {
        let count = mesh.vertex_count();
        let index = u32::try_from(count).map_err(|_| Error::MeshTooLarge(count + 1))?;
        let position = match &self.transform {
            Some(transform) => transform.transform_point(vertex),
            None => *vertex,
        };
        mesh.add_vertex(position, Vector3::zeros());
        Ok(index)
    }
}

/// Assemble triangles into an indexed mesh
pub fn assemble(triangles: &[Triangle], weld: bool) -> Result<Mesh> {
    MeshAssembler::new(weld).assemble(triangles)
}
