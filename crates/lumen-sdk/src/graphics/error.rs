// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Errors reported by the pipeline wrappers.

use super::texture::TextureState;
use lumen_core::renderer::ResourceError;
use lumen_io::image_decoder::ImageError;
use lumen_io::ImportError;
use std::path::PathBuf;
use thiserror::Error;

/// An error raised while creating or filling a [`Texture`](super::Texture).
#[derive(Debug, Error)]
pub enum TextureError {
    /// The image could not be decoded. The texture is left `Failed`.
    #[error(transparent)]
    Decode(#[from] ImageError),
    /// The decoded image has a channel count with no upload format.
    #[error("Unsupported channel count {0}")]
    UnsupportedChannels(u8),
    /// The pixel buffer does not match the given dimensions.
    #[error("Expected {expected} bytes of pixel data, got {actual}")]
    SizeMismatch {
        /// `width * height * channels`.
        expected: usize,
        /// Length of the buffer provided.
        actual: usize,
    },
    /// Only an empty texture can be loaded.
    #[error("Texture cannot be loaded in state {0:?}")]
    InvalidState(TextureState),
    /// The device rejected an operation.
    #[error(transparent)]
    Resource(#[from] ResourceError),
}

/// An error raised while building or drawing a [`Mesh`](super::Mesh).
#[derive(Debug, Error)]
pub enum MeshError {
    /// Interleaved vertex data is not a whole number of records.
    #[error("{len} floats do not form whole vertices of {per_vertex} floats")]
    MalformedVertices {
        /// Number of floats provided.
        len: usize,
        /// Floats per vertex record.
        per_vertex: usize,
    },
    /// An index refers past the last vertex.
    #[error("Index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// The offending index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },
    /// The mesh has more textures than the device has units.
    #[error("Mesh uses {count} textures but the device has {max} texture units")]
    TooManyTextures {
        /// Textures attached to the mesh.
        count: usize,
        /// Units available per draw.
        max: u32,
    },
    /// The index buffer holds more indices than one draw can submit.
    #[error("{count} indices exceed the per-draw limit of {}", u32::MAX)]
    TooManyIndices {
        /// Indices in the buffer.
        count: usize,
    },
    /// The device rejected an operation.
    #[error(transparent)]
    Resource(#[from] ResourceError),
}

/// An error raised while loading a [`Model`](super::Model).
#[derive(Debug, Error)]
pub enum ModelError {
    /// The path has no file name component. Nothing was read.
    #[error("'{}' does not name a file", .0.display())]
    InvalidPath(PathBuf),
    /// The scene importer failed.
    #[error("Failed to import model: {0}")]
    Import(#[from] ImportError),
    /// The importer flagged the scene as incomplete.
    #[error("Scene '{}' is incomplete", .0.display())]
    IncompleteScene(PathBuf),
    /// The scene has no root node.
    #[error("Scene '{}' has no root node", .0.display())]
    MissingRoot(PathBuf),
    /// A node references a mesh the scene does not contain.
    #[error("Node '{node}' references mesh {index} but the scene has {count}")]
    InvalidMeshIndex {
        /// Name of the referencing node.
        node: String,
        /// The referenced index.
        index: usize,
        /// Number of meshes in the scene.
        count: usize,
    },
    /// A material texture could not be loaded.
    #[error("Failed to load texture '{source_name}': {error}")]
    Texture {
        /// The file path, or `embedded #n`.
        source_name: String,
        /// The underlying failure.
        #[source]
        error: TextureError,
    },
    /// A mesh could not be built.
    #[error("Failed to build mesh '{name}': {error}")]
    Mesh {
        /// Name of the scene mesh.
        name: String,
        /// The underlying failure.
        #[source]
        error: MeshError,
    },
}
