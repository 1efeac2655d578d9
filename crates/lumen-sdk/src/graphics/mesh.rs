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

use super::{IndexBuffer, MeshError, Shader, Texture, VertexArray, VertexBuffer};
use lumen_core::renderer::api::{BufferUsage, PrimitiveTopology, TextureKind, Vertex};
use lumen_core::renderer::GraphicsDevice;
use std::rc::Rc;

/// One drawable piece of geometry: vertices, indices, and the textures its
/// material samples.
///
/// Vertices always follow [`Vertex::layout`]. The mesh owns its buffers and
/// vertex array exclusively and shares its textures.
#[derive(Debug)]
pub struct Mesh {
    vertex_buffer: VertexBuffer,
    index_buffer: IndexBuffer,
    vertex_array: VertexArray,
    textures: Vec<Rc<Texture>>,
}

impl Mesh {
    /// Uploads the geometry and records the attribute layout.
    ///
    /// ## Errors
    /// * `MeshError::IndexOutOfRange` - If an index refers past the last vertex.
    /// * `MeshError::Resource` - If the device rejects an allocation or upload.
    pub fn new(
        device: Rc<dyn GraphicsDevice>,
        vertices: &[Vertex],
        indices: &[u32],
        textures: Vec<Rc<Texture>>,
    ) -> Result<Self, MeshError> {
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count: vertices.len(),
            });
        }

        let mut vertex_buffer = VertexBuffer::new(Rc::clone(&device), Vertex::layout())?;
        vertex_buffer.load_vertices(vertices, BufferUsage::StaticDraw)?;
        let index_buffer =
            IndexBuffer::with_indices(Rc::clone(&device), indices, BufferUsage::StaticDraw)?;

        let mut vertex_array = VertexArray::new(device)?;
        vertex_array.use_vertex_buffer(&vertex_buffer)?;
        vertex_array.set_index_buffer(&index_buffer)?;

        Ok(Self {
            vertex_buffer,
            index_buffer,
            vertex_array,
            textures,
        })
    }

    /// Builds a mesh from flat records of [`Vertex::FLOATS`] floats
    /// (position, normal, texture coordinates).
    pub fn from_interleaved(
        device: Rc<dyn GraphicsDevice>,
        vertices: &[f32],
        indices: &[u32],
        textures: Vec<Rc<Texture>>,
    ) -> Result<Self, MeshError> {
        let malformed = || MeshError::MalformedVertices {
            len: vertices.len(),
            per_vertex: Vertex::FLOATS,
        };
        if vertices.len() % Vertex::FLOATS != 0 {
            return Err(malformed());
        }
        let records: &[Vertex] = bytemuck::try_cast_slice(vertices).map_err(|_| malformed())?;
        Self::new(device, records, indices, textures)
    }

    /// Binds the textures, then issues one indexed triangle draw.
    ///
    /// Texture `i` goes to unit `i`. Its sampler uniform is
    /// `material.<role><n>` where `n` counts textures of the same role
    /// from 1. The active unit is reset to 0 before the draw.
    ///
    /// ## Errors
    /// * `MeshError::TooManyTextures` - If there are more textures than units.
    /// * `MeshError::TooManyIndices` - If the index count does not fit a `u32`.
    ///
    /// Nothing is issued in either case.
    pub fn draw(&self, shader: &Shader) -> Result<(), MeshError> {
        let device = self.vertex_buffer.device();
        let max = device.max_texture_units();
        if self.textures.len() > max as usize {
            return Err(MeshError::TooManyTextures {
                count: self.textures.len(),
                max,
            });
        }
        let index_count = draw_count(self.index_buffer.count())?;

        shader.bind();
        let mut role_counters = [0u32; TextureKind::ALL.len()];
        for (unit, texture) in (0u32..).zip(&self.textures) {
            let kind = texture.kind();
            let counter = &mut role_counters[kind as usize];
            *counter += 1;
            shader.set_int(&kind.uniform_name(*counter), unit as i32);
            texture.bind_unit(unit);
        }
        device.set_active_texture_unit(0);

        self.vertex_array.bind();
        self.vertex_buffer.bind();
        self.index_buffer.bind();
        device.draw_elements(
            PrimitiveTopology::TriangleList,
            index_count,
            IndexBuffer::FORMAT,
            0,
        );
        Ok(())
    }

    /// Moves every resource into a new mesh, leaving this one empty.
    pub fn take(&mut self) -> Self {
        Self {
            vertex_buffer: self.vertex_buffer.take(),
            index_buffer: self.index_buffer.take(),
            vertex_array: self.vertex_array.take(),
            textures: std::mem::take(&mut self.textures),
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertex_buffer.count()
    }

    /// Number of indices.
    pub fn index_count(&self) -> usize {
        self.index_buffer.count()
    }

    /// Number of attached textures.
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// The attached textures, in binding order.
    pub fn textures(&self) -> &[Rc<Texture>] {
        &self.textures
    }

    /// The vertex buffer.
    pub fn vertex_buffer(&self) -> &VertexBuffer {
        &self.vertex_buffer
    }

    /// The index buffer.
    pub fn index_buffer(&self) -> &IndexBuffer {
        &self.index_buffer
    }

    /// The vertex array.
    pub fn vertex_array(&self) -> &VertexArray {
        &self.vertex_array
    }

    /// Returns `true` once every resource was moved out.
    pub fn is_empty(&self) -> bool {
        self.vertex_buffer.is_empty() && self.index_buffer.is_empty() && self.vertex_array.is_empty()
    }
}

/// Index count of one indexed draw, which the device takes as a `u32`.
fn draw_count(count: usize) -> Result<u32, MeshError> {
    u32::try_from(count).map_err(|_| MeshError::TooManyIndices { count })
}
