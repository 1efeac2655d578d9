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

use crate::math::LinearRgba;
use crate::renderer::api::*;
use crate::renderer::error::{ResourceError, ShaderError};
use std::fmt::Debug;

/// The driver boundary of the pipeline.
///
/// Every method takes `&self`: a device is shared by every resource wrapper
/// created from it and implementations keep their bookkeeping behind interior
/// mutability. A device is bound to the thread owning the GPU context, so the
/// trait does not require `Send` or `Sync`.
///
/// Operations that depend on a binding point receive the resource explicitly.
/// Implementations perform the bind-then-act pair internally, so no call ever
/// relies on what a previous call left bound.
pub trait GraphicsDevice: Debug + 'static {
    /// Allocates a new, empty buffer object.
    /// ## Returns
    /// The id of the new buffer. It is never [`BufferId::NONE`].
    /// ## Errors
    /// * `ResourceError::AllocationFailed` - If the driver refuses to create the object.
    fn create_buffer(&self) -> Result<BufferId, ResourceError>;

    /// Releases a buffer object. Destroying [`BufferId::NONE`] is a no-op.
    fn destroy_buffer(&self, id: BufferId);

    /// Replaces the whole content of a buffer.
    /// ## Arguments
    /// * `target` - The binding point the buffer is uploaded through.
    /// * `id` - The buffer to fill.
    /// * `data` - The new content; the previous storage is discarded.
    /// * `usage` - A hint describing how often the content changes.
    /// ## Errors
    /// * `ResourceError::InvalidHandle` - If `id` is the sentinel or unknown.
    fn write_buffer(
        &self,
        target: BufferTarget,
        id: BufferId,
        data: &[u8],
        usage: BufferUsage,
    ) -> Result<(), ResourceError>;

    /// Makes `id` the current buffer of `target`. [`BufferId::NONE`] unbinds.
    fn bind_buffer(&self, target: BufferTarget, id: BufferId);

    /// Allocates a new vertex-array object with no attributes enabled.
    /// ## Errors
    /// * `ResourceError::AllocationFailed` - If the driver refuses to create the object.
    fn create_vertex_array(&self) -> Result<VertexArrayId, ResourceError>;

    /// Releases a vertex-array object. Destroying [`VertexArrayId::NONE`] is a no-op.
    fn destroy_vertex_array(&self, id: VertexArrayId);

    /// Makes `id` the current vertex array. [`VertexArrayId::NONE`] unbinds.
    fn bind_vertex_array(&self, id: VertexArrayId);

    /// Enables one shader input slot of `vertex_array` and points it at `buffer`.
    /// ## Arguments
    /// * `vertex_array` - The vertex array recording the association.
    /// * `buffer` - The vertex buffer the slot reads from.
    /// * `pointer` - Slot index, component count and type, stride and offset.
    /// ## Errors
    /// * `ResourceError::InvalidHandle` - If either id is the sentinel or unknown.
    fn set_vertex_attribute(
        &self,
        vertex_array: VertexArrayId,
        buffer: BufferId,
        pointer: &VertexAttributePointer,
    ) -> Result<(), ResourceError>;

    /// Attaches an element buffer to `vertex_array`.
    /// ## Errors
    /// * `ResourceError::InvalidHandle` - If either id is the sentinel or unknown.
    fn set_index_buffer(
        &self,
        vertex_array: VertexArrayId,
        buffer: BufferId,
    ) -> Result<(), ResourceError>;

    /// Allocates a new 2D texture object with no storage.
    /// ## Errors
    /// * `ResourceError::AllocationFailed` - If the driver refuses to create the object.
    fn create_texture(&self) -> Result<TextureId, ResourceError>;

    /// Releases a texture object. Destroying [`TextureId::NONE`] is a no-op.
    fn destroy_texture(&self, id: TextureId);

    /// Uploads a full image into `id`, sets its sampling state and optionally
    /// builds the mip chain.
    /// ## Errors
    /// * `ResourceError::InvalidHandle` - If `id` is the sentinel or unknown.
    /// * `ResourceError::InvalidUpload` - If the pixel data does not match the dimensions.
    fn upload_texture(&self, id: TextureId, upload: &TextureUpload<'_>)
        -> Result<(), ResourceError>;

    /// Activates texture unit `unit` and binds `id` to it.
    fn bind_texture_unit(&self, unit: u32, id: TextureId);

    /// Activates texture unit `unit` without changing any binding.
    fn set_active_texture_unit(&self, unit: u32);

    /// Number of texture units a fragment shader can sample from in one draw.
    fn max_texture_units(&self) -> u32;

    /// Compiles both stages and links them into a program.
    /// ## Errors
    /// * `ShaderError::CompilationError` - If a stage fails to compile.
    /// * `ShaderError::LinkError` - If the stages fail to link.
    fn create_program(
        &self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ProgramId, ShaderError>;

    /// Releases a program. Destroying [`ProgramId::NONE`] is a no-op.
    fn destroy_program(&self, id: ProgramId);

    /// Makes `id` the current program.
    fn use_program(&self, id: ProgramId);

    /// Writes a uniform of `program`.
    ///
    /// Returns `false` when the program has no active uniform called `name`;
    /// the write is then dropped, exactly like the driver would.
    fn set_uniform(&self, program: ProgramId, name: &str, value: UniformValue) -> bool;

    /// Issues one indexed draw from the currently bound vertex array.
    /// ## Arguments
    /// * `topology` - How consecutive indices form primitives.
    /// * `count` - Number of indices to read.
    /// * `format` - Type of the stored indices.
    /// * `offset` - Byte offset of the first index in the element buffer.
    fn draw_elements(
        &self,
        topology: PrimitiveTopology,
        count: u32,
        format: IndexFormat,
        offset: u32,
    );

    /// Enables or disables depth testing.
    fn set_depth_test(&self, enabled: bool);

    /// Sets the blend equation, or disables blending with `None`.
    fn set_blend_state(&self, state: Option<BlendState>);

    /// Selects fill or wireframe rasterization for both faces.
    fn set_polygon_mode(&self, mode: PolygonMode);

    /// Sets the color used by [`GraphicsDevice::clear`].
    fn set_clear_color(&self, color: LinearRgba);

    /// Clears the selected framebuffer planes.
    fn clear(&self, flags: ClearFlags);

    /// Sets the viewport transform.
    fn set_viewport(&self, viewport: Viewport);

    /// Get the adapter information of the rendering system.
    fn adapter_info(&self) -> RendererAdapterInfo;
}
