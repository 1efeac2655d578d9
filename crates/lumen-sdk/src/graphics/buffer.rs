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

use lumen_core::renderer::api::{BufferId, BufferTarget, BufferUsage};
use lumen_core::renderer::{GraphicsDevice, ResourceError};
use std::fmt;
use std::rc::Rc;

/// Exclusive owner of one buffer object, shared by the vertex and index wrappers.
///
/// A handle equal to [`BufferId::NONE`] owns nothing. Dropping a handle
/// releases the buffer only when it owns one.
pub(crate) struct BufferHandle {
    device: Rc<dyn GraphicsDevice>,
    target: BufferTarget,
    id: BufferId,
    size: usize,
}

impl BufferHandle {
    pub(crate) fn new(
        device: Rc<dyn GraphicsDevice>,
        target: BufferTarget,
    ) -> Result<Self, ResourceError> {
        let id = device.create_buffer()?;
        log::trace!("Created {target:?} buffer {}", id.0);
        Ok(Self {
            device,
            target,
            id,
            size: 0,
        })
    }

    /// Uploads `data`, replacing the previous content. Empty input is ignored.
    pub(crate) fn load(&mut self, data: &[u8], usage: BufferUsage) -> Result<(), ResourceError> {
        if data.is_empty() {
            return Ok(());
        }
        if self.id.is_none() {
            self.id = self.device.create_buffer()?;
            log::trace!("Re-created {:?} buffer {}", self.target, self.id.0);
        }
        self.device
            .write_buffer(self.target, self.id, data, usage)?;
        self.size = data.len();
        Ok(())
    }

    pub(crate) fn bind(&self) {
        self.device.bind_buffer(self.target, self.id);
    }

    /// Moves the owned buffer out, leaving `self` empty.
    pub(crate) fn take(&mut self) -> Self {
        Self {
            device: Rc::clone(&self.device),
            target: self.target,
            id: std::mem::take(&mut self.id),
            size: std::mem::take(&mut self.size),
        }
    }

    pub(crate) fn device(&self) -> &Rc<dyn GraphicsDevice> {
        &self.device
    }

    pub(crate) fn id(&self) -> BufferId {
        self.id
    }

    pub(crate) fn size(&self) -> usize {
        self.size
    }
}

impl fmt::Debug for BufferHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferHandle")
            .field("target", &self.target)
            .field("id", &self.id)
            .field("size", &self.size)
            .finish()
    }
}

impl Drop for BufferHandle {
    fn drop(&mut self) {
        if !self.id.is_none() {
            log::trace!("Releasing {:?} buffer {}", self.target, self.id.0);
            self.device.destroy_buffer(self.id);
        }
    }
}
