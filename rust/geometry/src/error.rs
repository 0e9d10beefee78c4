// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during decal geometry processing
///
/// Degenerate input (zero-area triangles, zero-size volumes) is not an error:
/// it is skipped silently by the clippers. These variants cover states that
/// must abort a regeneration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid volume: {0}")]
    InvalidVolume(String),

    #[error("Invalid vertex buffer: length {len} is not a multiple of 3")]
    InvalidVertexBuffer { len: usize },

    #[error("Mismatched {attribute} buffer: length {len}, expected {expected}")]
    AttributeMismatch {
        attribute: &'static str,
        len: usize,
        expected: usize,
    },

    #[error("Invalid index buffer: length {len} is not a multiple of 3")]
    InvalidIndexBuffer { len: usize },

    #[error("Index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("Invalid terrain grid: {0}")]
    InvalidGrid(String),

    #[error("Invalid UV rectangle: {0}")]
    InvalidUvRect(String),

    #[error("Mesh too large: {0} vertices do not fit 32-bit indices")]
    MeshTooLarge(usize),
}
