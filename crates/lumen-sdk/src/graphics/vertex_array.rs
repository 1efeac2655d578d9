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

use super::{IndexBuffer, VertexBuffer};
use lumen_core::renderer::api::{VertexArrayId, VertexAttributePointer};
use lumen_core::renderer::{GraphicsDevice, ResourceError};
use std::fmt;
use std::rc::Rc;

/// Records which vertex buffer feeds which shader input slot, and which
/// element buffer the draw reads indices from.
///
/// Slots are handed out sequentially: the first element of the first layout
/// goes to slot 0, matrices take one slot per column. The shader must declare
/// its inputs in the same order; nothing checks it.
pub struct VertexArray {
    device: Rc<dyn GraphicsDevice>,
    id: VertexArrayId,
    next_location: u32,
}

impl VertexArray {
    /// Allocates a vertex array with no slot enabled.
    pub fn new(device: Rc<dyn GraphicsDevice>) -> Result<Self, ResourceError> {
        let id = device.create_vertex_array()?;
        log::trace!("Created vertex array {}", id.0);
        Ok(Self {
            device,
            id,
            next_location: 0,
        })
    }

    /// Enables one slot per layout element of `buffer`, starting at the next
    /// free slot, each pointing at the element inside `buffer`'s records.
    ///
    /// ## Errors
    /// * `ResourceError::InvalidHandle` - If `buffer` is empty.
    pub fn use_vertex_buffer(&mut self, buffer: &VertexBuffer) -> Result<(), ResourceError> {
        if buffer.is_empty() {
            return Err(ResourceError::InvalidHandle);
        }
        self.ensure_allocated()?;
        self.bind();
        buffer.bind();

        let layout = buffer.layout();
        let stride = layout.stride();
        for element in layout {
            for pointer in VertexAttributePointer::for_element(element, self.next_location, stride)
            {
                self.device
                    .set_vertex_attribute(self.id, buffer.id(), &pointer)?;
            }
            self.next_location += element.data_type.slot_count();
        }
        log::trace!(
            "Vertex array {}: {} slot(s) in use after buffer {}",
            self.id.0,
            self.next_location,
            buffer.id().0
        );
        Ok(())
    }

    /// Attaches `buffer` as the element buffer.
    pub fn set_index_buffer(&mut self, buffer: &IndexBuffer) -> Result<(), ResourceError> {
        self.ensure_allocated()?;
        self.device.set_index_buffer(self.id, buffer.id())
    }

    /// Makes this vertex array current.
    pub fn bind(&self) {
        self.device.bind_vertex_array(self.id);
    }

    /// Clears the vertex array binding.
    pub fn unbind(device: &dyn GraphicsDevice) {
        device.bind_vertex_array(VertexArrayId::NONE);
    }

    /// Number of slots enabled so far.
    pub fn slot_count(&self) -> u32 {
        self.next_location
    }

    /// Moves the vertex array into a new wrapper, leaving this one empty.
    pub fn take(&mut self) -> Self {
        Self {
            device: Rc::clone(&self.device),
            id: std::mem::take(&mut self.id),
            next_location: std::mem::take(&mut self.next_location),
        }
    }

    /// The driver handle, [`VertexArrayId::NONE`] when empty.
    pub fn id(&self) -> VertexArrayId {
        self.id
    }

    /// Returns `true` if the wrapper owns no vertex array.
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
    }

    fn ensure_allocated(&mut self) -> Result<(), ResourceError> {
        if self.id.is_none() {
            self.id = self.device.create_vertex_array()?;
            self.next_location = 0;
        }
        Ok(())
    }
}

impl fmt::Debug for VertexArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VertexArray")
            .field("id", &self.id)
            .field("slots", &self.next_location)
            .finish()
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        if !self.id.is_none() {
            self.device.destroy_vertex_array(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::testing::headless;
    use lumen_core::renderer::api::{
        AttributeKind, BufferElement, BufferLayout, BufferTarget, BufferUsage, ShaderDataType,
        Vertex,
    };
    use lumen_infra::DeviceCommand;

    #[test]
    fn test_vertex_layout_fills_three_slots() {
        let (device, shared) = headless();
        let buffer =
            VertexBuffer::with_data(shared.clone(), Vertex::layout(), &[0; 96], BufferUsage::StaticDraw)
                .unwrap();
        let mut vao = VertexArray::new(shared).unwrap();
        vao.use_vertex_buffer(&buffer).unwrap();

        let attributes = device.vertex_attributes(vao.id());
        let summary: Vec<(u32, u32, u32, u32)> = attributes
            .iter()
            .map(|(_, p)| (p.location, p.components, p.stride, p.offset))
            .collect();
        assert_eq!(summary, vec![(0, 3, 32, 0), (1, 3, 32, 12), (2, 2, 32, 24)]);
        assert!(attributes.iter().all(|(id, _)| *id == buffer.id()));
        assert_eq!(vao.slot_count(), 3);
    }

    #[test]
    fn test_binds_before_registering_pointers() {
        let (device, shared) = headless();
        let buffer =
            VertexBuffer::with_data(shared.clone(), Vertex::layout(), &[0; 32], BufferUsage::StaticDraw)
                .unwrap();
        let mut vao = VertexArray::new(shared).unwrap();
        device.clear_commands();
        vao.use_vertex_buffer(&buffer).unwrap();

        let commands = device.commands();
        assert_eq!(commands[0], DeviceCommand::BindVertexArray(vao.id()));
        assert_eq!(
            commands[1],
            DeviceCommand::BindBuffer {
                target: BufferTarget::Vertex,
                id: buffer.id(),
            }
        );
        assert!(commands[2..]
            .iter()
            .all(|c| matches!(c, DeviceCommand::SetVertexAttribute { .. })));
        assert_eq!(commands.len(), 5);
    }

    #[test]
    fn test_matrix_and_integer_elements() {
        let (device, shared) = headless();
        let layout = BufferLayout::new(vec![
            BufferElement::new(ShaderDataType::Float3, "a_Position"),
            BufferElement::new(ShaderDataType::Mat4, "a_Model"),
            BufferElement::new(ShaderDataType::Int, "a_EntityId"),
        ]);
        let stride = layout.stride() as usize;
        let buffer =
            VertexBuffer::with_data(shared.clone(), layout, &vec![0; stride], BufferUsage::StaticDraw)
                .unwrap();
        let mut vao = VertexArray::new(shared).unwrap();
        vao.use_vertex_buffer(&buffer).unwrap();

        let pointers: Vec<VertexAttributePointer> = device
            .vertex_attributes(vao.id())
            .into_iter()
            .map(|(_, p)| p)
            .collect();
        assert_eq!(pointers.len(), 6);
        let offsets: Vec<u32> = pointers.iter().map(|p| p.offset).collect();
        assert_eq!(offsets, vec![0, 12, 28, 44, 60, 76]);
        assert_eq!(pointers[5].kind, AttributeKind::Int);
        assert!(pointers[..5].iter().all(|p| p.kind == AttributeKind::Float));
    }

    #[test]
    fn test_second_buffer_continues_after_first() {
        let (device, shared) = headless();
        let positions = VertexBuffer::with_data(
            shared.clone(),
            BufferLayout::new(vec![BufferElement::new(ShaderDataType::Float3, "a_Position")]),
            &[0; 12],
            BufferUsage::StaticDraw,
        )
        .unwrap();
        let colors = VertexBuffer::with_data(
            shared.clone(),
            BufferLayout::new(vec![BufferElement::new(ShaderDataType::Float4, "a_Color").normalized()]),
            &[0; 16],
            BufferUsage::StaticDraw,
        )
        .unwrap();
        let mut vao = VertexArray::new(shared).unwrap();
        vao.use_vertex_buffer(&positions).unwrap();
        vao.use_vertex_buffer(&colors).unwrap();

        let attributes = device.vertex_attributes(vao.id());
        assert_eq!(attributes.len(), 2);
        assert_eq!(attributes[1].0, colors.id());
        assert_eq!(attributes[1].1.location, 1);
        assert!(attributes[1].1.normalized);
        assert_eq!(attributes[1].1.stride, 16);
    }

    #[test]
    fn test_empty_buffer_is_rejected() {
        let (_device, shared) = headless();
        let mut buffer = VertexBuffer::new(shared.clone(), Vertex::layout()).unwrap();
        let _moved = buffer.take();
        let mut vao = VertexArray::new(shared).unwrap();
        assert!(matches!(
            vao.use_vertex_buffer(&buffer),
            Err(ResourceError::InvalidHandle)
        ));
    }

    #[test]
    fn test_index_buffer_attachment() {
        let (device, shared) = headless();
        let indices =
            IndexBuffer::with_indices(shared.clone(), &[0, 1, 2], BufferUsage::StaticDraw).unwrap();
        let mut vao = VertexArray::new(shared).unwrap();
        vao.set_index_buffer(&indices).unwrap();
        assert_eq!(device.index_buffer_of(vao.id()), Some(indices.id()));
    }

    #[test]
    fn test_take_and_drop() {
        let (device, shared) = headless();
        let mut vao = VertexArray::new(shared).unwrap();
        let moved = vao.take();
        assert!(vao.is_empty());
        drop(vao);
        assert_eq!(device.live_vertex_arrays(), 1);
        drop(moved);
        assert_eq!(device.live_vertex_arrays(), 0);
        assert_eq!(device.invalid_releases(), 0);
    }
}
