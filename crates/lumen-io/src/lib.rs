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

//! # Lumen IO
//!
//! Everything that reads assets from disk: the scene importers that turn a
//! glTF or OBJ file into an in-memory [`scene::Scene`] tree, the
//! post-processing steps applied to that tree, and image decoding for
//! textures. Nothing in this crate touches the GPU.

#![warn(missing_docs)]

pub mod image_decoder;
pub mod import;
pub mod scene;

pub use import::{import_scene, ImportError, ImportSettings, SceneImporter};
pub use scene::{PostProcess, Scene};
