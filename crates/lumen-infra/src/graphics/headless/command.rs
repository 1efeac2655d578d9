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

use lumen_core::math::LinearRgba;
use lumen_core::renderer::api::{
    BlendState, BufferId, BufferTarget, BufferUsage, ClearFlags, IndexFormat, PolygonMode,
    PrimitiveTopology, ProgramId, TextureFormat, TextureId, UniformValue, VertexArrayId,
    VertexAttributePointer, Viewport,
};

/// One call received by a [`HeadlessDevice`](super::HeadlessDevice).
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum DeviceCommand {
    CreateBuffer(BufferId),
    DestroyBuffer(BufferId),
    WriteBuffer {
        target: BufferTarget,
        id: BufferId,
        len: usize,
        usage: BufferUsage,
    },
    BindBuffer {
        target: BufferTarget,
        id: BufferId,
    },
    CreateVertexArray(VertexArrayId),
    DestroyVertexArray(VertexArrayId),
    BindVertexArray(VertexArrayId),
    SetVertexAttribute {
        vertex_array: VertexArrayId,
        buffer: BufferId,
        pointer: VertexAttributePointer,
    },
    SetIndexBuffer {
        vertex_array: VertexArrayId,
        buffer: BufferId,
    },
    CreateTexture(TextureId),
    DestroyTexture(TextureId),
    UploadTexture {
        id: TextureId,
        width: u32,
        height: u32,
        format: TextureFormat,
        generate_mipmaps: bool,
    },
    BindTextureUnit {
        unit: u32,
        id: TextureId,
    },
    SetActiveTextureUnit(u32),
    CreateProgram(ProgramId),
    DestroyProgram(ProgramId),
    UseProgram(ProgramId),
    SetUniform {
        program: ProgramId,
        name: String,
        value: UniformValue,
    },
    DrawElements(DrawCall),
    SetDepthTest(bool),
    SetBlendState(Option<BlendState>),
    SetPolygonMode(PolygonMode),
    SetClearColor(LinearRgba),
    Clear(ClearFlags),
    SetViewport(Viewport),
}

/// A snapshot of the state a draw call was issued with.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    /// How indices form primitives.
    pub topology: PrimitiveTopology,
    /// Number of indices read.
    pub count: u32,
    /// Type of the stored indices.
    pub format: IndexFormat,
    /// Byte offset of the first index.
    pub offset: u32,
    /// The program in use.
    pub program: ProgramId,
    /// The vertex array bound at draw time.
    pub vertex_array: VertexArrayId,
    /// The element buffer attached to that vertex array.
    pub index_buffer: BufferId,
    /// The buffer bound to the vertex target at draw time.
    pub vertex_buffer: BufferId,
    /// Every texture unit holding a texture, sorted by unit.
    pub textures: Vec<(u32, TextureId)>,
    /// The active texture unit at draw time.
    pub active_unit: u32,
}
