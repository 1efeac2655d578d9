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

//! Startup state of a renderer.

use super::pipeline::{BlendState, PolygonMode};
use crate::math::LinearRgba;
use serde::{Deserialize, Serialize};

/// The global state a renderer applies when it is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Color the framebuffer is cleared to.
    pub clear_color: LinearRgba,
    /// Whether fragments are depth tested (`LESS`).
    pub depth_test: bool,
    /// The blend equation, or `None` to disable blending.
    pub blend: Option<BlendState>,
    /// Fill or wireframe rasterization.
    pub polygon_mode: PolygonMode,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            clear_color: LinearRgba::default(),
            depth_test: true,
            blend: Some(BlendState::ALPHA_BLENDING),
            polygon_mode: PolygonMode::Fill,
        }
    }
}
