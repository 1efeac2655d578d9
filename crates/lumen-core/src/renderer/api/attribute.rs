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

//! Vertex-array objects and the attribute pointers registered on them.

use super::layout::{BufferElement, ShaderDataType};

/// An opaque handle to a vertex-array object, the driver-side record of which
/// buffer feeds which shader input slot. `0` means "no vertex array".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VertexArrayId(pub u32);

impl VertexArrayId {
    /// The sentinel id that refers to no vertex array.
    pub const NONE: Self = Self(0);

    /// Returns `true` if this is the sentinel id.
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

/// How the shader reads the components of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    /// 32-bit floats (`glVertexAttribPointer` with `GL_FLOAT`).
    Float,
    /// 32-bit signed integers (`glVertexAttribIPointer` with `GL_INT`).
    Int,
    /// Unsigned bytes read as integers (`glVertexAttribIPointer` with `GL_UNSIGNED_BYTE`).
    Bool,
}

impl From<ShaderDataType> for AttributeKind {
    fn from(ty: ShaderDataType) -> Self {
        match ty {
            ShaderDataType::Bool => AttributeKind::Bool,
            ty if ty.is_integer() => AttributeKind::Int,
            _ => AttributeKind::Float,
        }
    }
}

/// Everything the driver needs to fetch one shader input slot from a bound
/// vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexAttributePointer {
    /// The shader input slot (`layout(location = N)`).
    pub location: u32,
    /// Number of components read per vertex (1 to 4).
    pub components: u32,
    /// Component interpretation.
    pub kind: AttributeKind,
    /// Whether integer data is normalized when read as float.
    pub normalized: bool,
    /// Distance in bytes between two consecutive vertex records.
    pub stride: u32,
    /// Byte offset of this slot inside a vertex record.
    pub offset: u32,
}

impl VertexAttributePointer {
    /// Expands one layout element into the pointers it needs, starting at
    /// `first_location`. Matrices yield one pointer per column.
    pub fn for_element(
        element: &BufferElement,
        first_location: u32,
        stride: u32,
    ) -> impl Iterator<Item = VertexAttributePointer> {
        let data_type = element.data_type;
        let column_size = data_type.size() / data_type.slot_count();
        let base_offset = element.offset;
        let normalized = element.normalized;
        (0..data_type.slot_count()).map(move |column| VertexAttributePointer {
            location: first_location + column,
            components: data_type.component_count(),
            kind: data_type.into(),
            normalized,
            stride,
            offset: base_offset + column * column_size,
        })
    }
}
