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
use lumen_core::renderer::api::{BufferId, BufferTarget, BufferUsage, IndexFormat};
use lumen_core::renderer::{GraphicsDevice, ResourceError};
use std::rc::Rc;

/// A buffer of 32-bit vertex indices.
///
/// Same ownership discipline as [`VertexBuffer`](super::VertexBuffer).
#[derive(Debug)]
pub struct IndexBuffer {
    buffer: BufferHandle,
}

impl IndexBuffer {
    /// The format of every index held.
    pub const FORMAT: IndexFormat = IndexFormat::Uint32;

    /// Allocates an empty index buffer.
    pub fn new(device: Rc<dyn GraphicsDevice>) -> Result<Self, ResourceError> {
        Ok(Self {
            buffer: BufferHandle::new(device, BufferTarget::Index)?,
        })
    }

    /// Allocates an index buffer holding `indices`.
    pub fn with_indices(
        device: Rc<dyn GraphicsDevice>,
        indices: &[u32],
        usage: BufferUsage,
    ) -> Result<Self, ResourceError> {
        let mut buffer = Self::new(device)?;
        buffer.load(indices, usage)?;
        Ok(buffer)
    }

    /// Replaces the whole content. Empty input is a no-op.
    pub fn load(&mut self, indices: &[u32], usage: BufferUsage) -> Result<(), ResourceError> {
        self.buffer.load(bytemuck::cast_slice(indices), usage)
    }

    /// Number of indices held.
    pub fn count(&self) -> usize {
        self.buffer.size() / Self::FORMAT.size() as usize
    }

    /// Binds the buffer to the index target. While a vertex array is bound,
    /// this attaches the buffer to it.
    pub fn bind(&self) {
        self.buffer.bind();
    }

    /// Clears the index buffer binding.
    pub fn unbind(device: &dyn GraphicsDevice) {
        device.bind_buffer(BufferTarget::Index, BufferId::NONE);
    }

    /// Moves the buffer object and content into a new wrapper.
    pub fn take(&mut self) -> Self {
        Self {
            buffer: self.buffer.take(),
        }
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
}
