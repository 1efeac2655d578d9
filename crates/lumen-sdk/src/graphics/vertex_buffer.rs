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

use super::buffer::BufferHandle;
use bytemuck::Pod;
use lumen_core::renderer::api::{BufferId, BufferLayout, BufferTarget, BufferUsage};
use lumen_core::renderer::{GraphicsDevice, ResourceError};
use std::rc::Rc;

/// A buffer of interleaved vertex records described by a [`BufferLayout`].
///
/// The wrapper is move-only. [`VertexBuffer::take`] moves the buffer object
/// into a new wrapper and leaves this one empty; an empty wrapper keeps its
/// layout and allocates a fresh object on its next non-empty [`load`](Self::load).
#[derive(Debug)]
pub struct VertexBuffer {
    buffer: BufferHandle,
    layout: BufferLayout,
}

impl VertexBuffer {
    /// Allocates an empty buffer whose records follow `layout`.
    pub fn new(device: Rc<dyn GraphicsDevice>, layout: BufferLayout) -> Result<Self, ResourceError> {
        Ok(Self {
            buffer: BufferHandle::new(device, BufferTarget::Vertex)?,
            layout,
        })
    }

    /// Allocates a buffer and uploads `data` into it.
    pub fn with_data(
        device: Rc<dyn GraphicsDevice>,
        layout: BufferLayout,
        data: &[u8],
        usage: BufferUsage,
    ) -> Result<Self, ResourceError> {
        let mut buffer = Self::new(device, layout)?;
        buffer.load(data, usage)?;
        Ok(buffer)
    }

    /// Replaces the whole content with `data`.
    ///
    /// Empty input is a no-op and keeps the previous content. Keeping `data`
    /// a whole number of records is up to the caller.
    pub fn load(&mut self, data: &[u8], usage: BufferUsage) -> Result<(), ResourceError> {
        self.buffer.load(data, usage)
    }

    /// Uploads a slice of plain records, e.g. [`Vertex`](lumen_core::renderer::api::Vertex).
    pub fn load_vertices<T: Pod>(
        &mut self,
        vertices: &[T],
        usage: BufferUsage,
    ) -> Result<(), ResourceError> {
        self.load(bytemuck::cast_slice(vertices), usage)
    }

    /// Number of whole records held, `size / stride`. Zero for an empty layout.
    pub fn count(&self) -> usize {
        match self.layout.stride() {
            0 => 0,
            stride => self.buffer.size() / stride as usize,
        }
    }

    /// Makes this buffer the current vertex buffer.
    pub fn bind(&self) {
        self.buffer.bind();
    }

    /// Clears the vertex buffer binding.
    pub fn unbind(device: &dyn GraphicsDevice) {
        device.bind_buffer(BufferTarget::Vertex, BufferId::NONE);
    }

    /// Moves the buffer object and content into a new wrapper.
    pub fn take(&mut self) -> Self {
        Self {
            buffer: self.buffer.take(),
            layout: self.layout.clone(),
        }
    }

    /// The layout of one record.
    pub fn layout(&self) -> &BufferLayout {
        &self.layout
    }

    /// The driver handle, [`BufferId::NONE`] when empty.
    pub fn id(&self) -> BufferId {
        self.buffer.id()
    }

    /// Size of the uploaded content in bytes.
    pub fn size(&self) -> usize {
        self.buffer.size()
    }

    /// Returns `true` if the wrapper owns no buffer object.
    pub fn is_empty(&self) -> bool {
        self.buffer.id().is_none()
    }

    pub(crate) fn device(&self) -> &Rc<dyn GraphicsDevice> {
        self.buffer.device()
    }
}
