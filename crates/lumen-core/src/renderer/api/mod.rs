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

//! Plain data types exchanged with a [`GraphicsDevice`](super::GraphicsDevice).

pub mod attribute;
pub mod backend;
pub mod buffer;
pub mod layout;
pub mod pipeline;
pub mod settings;
pub mod shader;
pub mod texture;
pub mod vertex;

pub use self::attribute::{AttributeKind, VertexArrayId, VertexAttributePointer};
pub use self::backend::{GraphicsBackendType, RendererAdapterInfo};
pub use self::buffer::{BufferId, BufferTarget, BufferUsage};
pub use self::layout::{BufferElement, BufferLayout, ShaderDataType};
pub use self::pipeline::{
    BlendFactor, BlendState, ClearFlags, IndexFormat, PolygonMode, PrimitiveTopology, Viewport,
};
pub use self::settings::RenderSettings;
pub use self::shader::{ProgramId, ShaderStage, UniformValue};
pub use self::texture::{
    FilterMode, TextureFormat, TextureId, TextureKind, TextureUpload, WrapMode,
};
pub use self::vertex::Vertex;
