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

//! Describes how one interleaved vertex record is laid out in memory.
//!
//! A [`BufferLayout`] is an ordered list of [`BufferElement`]s. Offsets are
//! computed once, at construction: element `i` starts where element `i - 1`
//! ends, and the stride is the sum of all element sizes. There is no padding.
//!
//! ```
//! use lumen_core::renderer::api::layout::{BufferElement, BufferLayout, ShaderDataType};
//!
//! let layout = BufferLayout::new(vec![
//!     BufferElement::new(ShaderDataType::Float3, "a_Position"),
//!     BufferElement::new(ShaderDataType::Float3, "a_Normal"),
//!     BufferElement::new(ShaderDataType::Float2, "a_TexCoords"),
//! ]);
//! assert_eq!(layout.stride(), 32);
//! assert_eq!(layout.elements()[2].offset, 24);
//! ```

use crate::renderer::error::LayoutError;
use std::fmt;
use std::str::FromStr;

/// The semantic type of one vertex attribute, as declared by the shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderDataType {
    /// One 32-bit float.
    Float,
    /// Two 32-bit floats.
    Float2,
    /// Three 32-bit floats.
    Float3,
    /// Four 32-bit floats.
    Float4,
    /// A 3x3 float matrix, stored column-major.
    Mat3,
    /// A 4x4 float matrix, stored column-major.
    Mat4,
    /// One 32-bit signed integer.
    Int,
    /// Two 32-bit signed integers.
    Int2,
    /// Three 32-bit signed integers.
    Int3,
    /// Four 32-bit signed integers.
    Int4,
    /// A single byte interpreted as a boolean.
    Bool,
}

impl ShaderDataType {
    /// Every known data type, in declaration order.
    pub const ALL: [ShaderDataType; 11] = [
        ShaderDataType::Float,
        ShaderDataType::Float2,
        ShaderDataType::Float3,
        ShaderDataType::Float4,
        ShaderDataType::Mat3,
        ShaderDataType::Mat4,
        ShaderDataType::Int,
        ShaderDataType::Int2,
        ShaderDataType::Int3,
        ShaderDataType::Int4,
        ShaderDataType::Bool,
    ];

    /// Size in bytes of one value of this type.
    pub const fn size(self) -> u32 {
        match self {
            ShaderDataType::Float => 4,
            ShaderDataType::Float2 => 4 * 2,
            ShaderDataType::Float3 => 4 * 3,
            ShaderDataType::Float4 => 4 * 4,
            ShaderDataType::Mat3 => 4 * 3 * 3,
            ShaderDataType::Mat4 => 4 * 4 * 4,
            ShaderDataType::Int => 4,
            ShaderDataType::Int2 => 4 * 2,
            ShaderDataType::Int3 => 4 * 3,
            ShaderDataType::Int4 => 4 * 4,
            ShaderDataType::Bool => 1,
        }
    }

    /// Number of scalar components in one shader input slot.
    ///
    /// For matrices this is the size of one column.
    pub const fn component_count(self) -> u32 {
        match self {
            ShaderDataType::Float | ShaderDataType::Int | ShaderDataType::Bool => 1,
            ShaderDataType::Float2 | ShaderDataType::Int2 => 2,
            ShaderDataType::Float3 | ShaderDataType::Int3 | ShaderDataType::Mat3 => 3,
            ShaderDataType::Float4 | ShaderDataType::Int4 | ShaderDataType::Mat4 => 4,
        }
    }

    /// Number of consecutive shader input slots the type occupies.
    pub const fn slot_count(self) -> u32 {
        match self {
            ShaderDataType::Mat3 => 3,
            ShaderDataType::Mat4 => 4,
            _ => 1,
        }
    }

    /// Returns `true` for types the shader reads as integers.
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            ShaderDataType::Int
                | ShaderDataType::Int2
                | ShaderDataType::Int3
                | ShaderDataType::Int4
                | ShaderDataType::Bool
        )
    }

    /// The lower-case name used in layout declarations, e.g. `"float3"`.
    pub const fn name(self) -> &'static str {
        match self {
            ShaderDataType::Float => "float",
            ShaderDataType::Float2 => "float2",
            ShaderDataType::Float3 => "float3",
            ShaderDataType::Float4 => "float4",
            ShaderDataType::Mat3 => "mat3",
            ShaderDataType::Mat4 => "mat4",
            ShaderDataType::Int => "int",
            ShaderDataType::Int2 => "int2",
            ShaderDataType::Int3 => "int3",
            ShaderDataType::Int4 => "int4",
            ShaderDataType::Bool => "bool",
        }
    }
}

impl fmt::Display for ShaderDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShaderDataType {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShaderDataType::ALL
            .into_iter()
            .find(|ty| ty.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LayoutError::UnknownType(s.to_string()))
    }
}

/// One attribute of a vertex record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferElement {
    /// The attribute type.
    pub data_type: ShaderDataType,
    /// A human-readable name, usually the shader input's name.
    pub name: String,
    /// Size in bytes, derived from `data_type`.
    pub size: u32,
    /// Byte offset from the start of the record. Assigned by [`BufferLayout::new`].
    pub offset: u32,
    /// Whether integer data is normalized to `[0, 1]` / `[-1, 1]` when read as float.
    pub normalized: bool,
}

impl BufferElement {
    /// Creates a non-normalized element. The offset is filled in by the layout.
    pub fn new(data_type: ShaderDataType, name: impl Into<String>) -> Self {
        Self {
            data_type,
            name: name.into(),
            size: data_type.size(),
            offset: 0,
            normalized: false,
        }
    }

    /// Marks the element as normalized.
    pub fn normalized(mut self) -> Self {
        self.normalized = true;
        self
    }
}

/// An ordered list of [`BufferElement`]s with computed offsets and stride.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BufferLayout {
    elements: Vec<BufferElement>,
    stride: u32,
}

impl BufferLayout {
    /// Builds a layout, assigning each element the running byte offset.
    pub fn new(mut elements: Vec<BufferElement>) -> Self {
        let mut offset = 0;
        for element in &mut elements {
            element.offset = offset;
            offset += element.size;
        }
        Self {
            elements,
            stride: offset,
        }
    }

    /// Builds a layout from `(type name, attribute name)` pairs.
    ///
    /// # Errors
    /// Returns [`LayoutError::UnknownType`] for the first type name that is not
    /// a known [`ShaderDataType`].
    pub fn parse<S: AsRef<str>, N: Into<String>>(
        declarations: impl IntoIterator<Item = (S, N)>,
    ) -> Result<Self, LayoutError> {
        let elements = declarations
            .into_iter()
            .map(|(ty, name)| {
                let data_type = ty.as_ref().parse::<ShaderDataType>()?;
                Ok::<_, LayoutError>(BufferElement::new(data_type, name))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(elements))
    }

    /// The elements in declaration order.
    pub fn elements(&self) -> &[BufferElement] {
        &self.elements
    }

    /// The total size in bytes of one vertex record.
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the layout declares no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of shader input slots needed to bind the whole layout.
    pub fn slot_count(&self) -> u32 {
        self.elements
            .iter()
            .map(|e| e.data_type.slot_count())
            .sum()
    }

    /// Iterates over the elements in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, BufferElement> {
        self.elements.iter()
    }
}

impl<'a> IntoIterator for &'a BufferLayout {
    type Item = &'a BufferElement;
    type IntoIter = std::slice::Iter<'a, BufferElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl FromIterator<BufferElement> for BufferLayout {
    fn from_iter<T: IntoIterator<Item = BufferElement>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
