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

//! Defines data structures related to GPU buffer resources.

use serde::{Deserialize, Serialize};

/// An opaque handle to a GPU buffer object.
///
/// This ID is returned by [`GraphicsDevice::create_buffer`](crate::renderer::GraphicsDevice::create_buffer)
/// and is used to reference the buffer in all subsequent operations. The value
/// `0` is reserved by drivers and means "no buffer".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BufferId(pub u32);

impl BufferId {
    /// The sentinel id that refers to no buffer at all.
    pub const NONE: Self = Self(0);

    /// Returns `true` if this is the sentinel id.
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

/// The binding point a buffer is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Per-vertex attribute data (`ARRAY_BUFFER`).
    Vertex,
    /// Element indices (`ELEMENT_ARRAY_BUFFER`).
    Index,
}

/// A hint telling the driver how often the contents of a buffer change.
///
/// Drivers use it to place the buffer in the most suitable memory; it never
/// restricts what the caller may do with the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BufferUsage {
    /// Uploaded once, drawn many times.
    #[default]
    StaticDraw,
    /// Re-uploaded occasionally, drawn many times.
    DynamicDraw,
    /// Re-uploaded every frame.
    StreamDraw,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_buffer_id() {
        assert!(BufferId::NONE.is_none());
        assert!(BufferId::default().is_none());
        assert!(!BufferId(7).is_none());
    }
}
