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

//! The interleaved vertex record used by imported meshes.

use super::layout::{BufferElement, BufferLayout, ShaderDataType};
use bytemuck::{Pod, Zeroable};

/// One interleaved vertex: position, normal, first texture coordinate set.
///
/// `#[repr(C)]` with only `f32` fields guarantees the 32-byte, padding-free
/// layout described by [`Vertex::layout`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Object-space normal, zero when the source had none.
    pub normal: [f32; 3],
    /// Texture coordinates, zero when the source had none.
    pub tex_coords: [f32; 2],
}

impl Vertex {
    /// Number of `f32`s in one record.
    pub const FLOATS: usize = 8;

    /// Creates a vertex from its three attributes.
    pub const fn new(position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coords,
        }
    }

    /// The layout matching this struct: `a_Position` (float3), `a_Normal`
    /// (float3), `a_TexCoords` (float2), bound to slots 0, 1 and 2.
    pub fn layout() -> BufferLayout {
        BufferLayout::new(vec![
            BufferElement::new(ShaderDataType::Float3, "a_Position"),
            BufferElement::new(ShaderDataType::Float3, "a_Normal"),
            BufferElement::new(ShaderDataType::Float2, "a_TexCoords"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_matches_struct() {
        let layout = Vertex::layout();
        assert_eq!(layout.stride() as usize, std::mem::size_of::<Vertex>());
        assert_eq!(
            layout.elements()[1].offset as usize,
            std::mem::offset_of!(Vertex, normal)
        );
        assert_eq!(
            layout.elements()[2].offset as usize,
            std::mem::offset_of!(Vertex, tex_coords)
        );
        assert_eq!(std::mem::size_of::<Vertex>(), Vertex::FLOATS * 4);
    }

    #[test]
    fn test_cast_from_flat_floats() {
        let floats = [1.0_f32, 2.0, 3.0, 0.0, 1.0, 0.0, 0.5, 0.25];
        let vertices: &[Vertex] = bytemuck::cast_slice(&floats);
        assert_eq!(vertices.len(), 1);
        assert_eq!(vertices[0].position, [1.0, 2.0, 3.0]);
        assert_eq!(vertices[0].tex_coords, [0.5, 0.25]);
    }
}
