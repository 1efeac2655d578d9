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

//! # Lumen SDK
//!
//! The path from an asset file to a sequence of indexed draw calls.
//!
//! [`graphics::Model::load`] imports a scene, flattens its node tree into
//! [`graphics::Mesh`]es and shares every decoded texture between the meshes
//! that reference it. [`graphics::Renderer`] then draws models mesh by mesh.
//! Every GPU object is owned by exactly one wrapper and released on drop;
//! textures are the only resource shared, through `Rc`.

#![warn(missing_docs)]

pub mod config;
pub mod graphics;

/// Types needed by most users of the crate.
pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::graphics::{
        FrameStats, IndexBuffer, Mesh, MeshError, Model, ModelError, Renderer, Shader, Texture,
        TextureError, TextureState, VertexArray, VertexBuffer,
    };
    pub use lumen_core::renderer::api::{
        BufferElement, BufferLayout, BufferUsage, RenderSettings, ShaderDataType, TextureKind,
        Vertex,
    };
    pub use lumen_core::renderer::GraphicsDevice;
    pub use lumen_io::{ImportSettings, PostProcess};
}
