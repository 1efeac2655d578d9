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

//! GPU-facing building blocks of the pipeline.

mod buffer;
mod error;
mod index_buffer;
mod mesh;
mod model;
mod renderer;
mod shader;
mod texture;
mod vertex_array;
mod vertex_buffer;

pub use self::error::{MeshError, ModelError, TextureError};
pub use self::index_buffer::IndexBuffer;
pub use self::mesh::Mesh;
pub use self::model::Model;
pub use self::renderer::{FrameStats, Renderer};
pub use self::shader::Shader;
pub use self::texture::{Texture, TextureState};
pub use self::vertex_array::VertexArray;
pub use self::vertex_buffer::VertexBuffer;
