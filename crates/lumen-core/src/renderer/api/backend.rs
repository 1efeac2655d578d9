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

//! Information about the device a renderer is running on.

use std::fmt;

/// The family of driver behind a [`GraphicsDevice`](crate::renderer::GraphicsDevice).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphicsBackendType {
    /// Desktop OpenGL (3.3 core or later).
    OpenGL,
    /// No GPU at all; calls are recorded instead of executed.
    Headless,
}

impl fmt::Display for GraphicsBackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphicsBackendType::OpenGL => f.write_str("OpenGL"),
            GraphicsBackendType::Headless => f.write_str("Headless"),
        }
    }
}

/// Describes the adapter behind a device, for logs and diagnostics panels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererAdapterInfo {
    /// Driver family.
    pub backend_type: GraphicsBackendType,
    /// The renderer string reported by the driver.
    pub name: String,
    /// The vendor string reported by the driver.
    pub vendor: String,
    /// The version string reported by the driver.
    pub version: String,
}
