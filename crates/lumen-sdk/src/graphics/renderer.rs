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

use super::{Mesh, MeshError, Model, Shader};
use lumen_core::math::LinearRgba;
use lumen_core::renderer::api::{BlendState, ClearFlags, PolygonMode, RenderSettings, Viewport};
use lumen_core::renderer::GraphicsDevice;
use lumen_telemetry::{CounterHandle, GaugeHandle, MetricsRegistry, MetricsResult};
use std::rc::Rc;

/// What was submitted since the last [`Renderer::begin_frame`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Indexed draws issued.
    pub draw_calls: u32,
    /// Indices submitted over all draws.
    pub indices: u64,
    /// Texture unit bindings made.
    pub texture_binds: u32,
}

#[derive(Debug)]
struct RendererCounters {
    draw_calls: CounterHandle,
    indices: CounterHandle,
    texture_binds: CounterHandle,
    frame_indices: GaugeHandle,
}

impl RendererCounters {
    const NAMESPACE: &'static str = "renderer";

    fn register(registry: &MetricsRegistry) -> MetricsResult<Self> {
        Ok(Self {
            draw_calls: registry.register_counter(
                Self::NAMESPACE,
                "draw_calls",
                "Indexed draws issued",
            )?,
            indices: registry.register_counter(
                Self::NAMESPACE,
                "indices",
                "Indices submitted",
            )?,
            texture_binds: registry.register_counter(
                Self::NAMESPACE,
                "texture_binds",
                "Texture unit bindings",
            )?,
            frame_indices: registry.register_gauge(
                Self::NAMESPACE,
                "frame_indices",
                "Indices submitted in the current frame",
                "indices",
            )?,
        })
    }

    fn record(&self, indices: u64, texture_binds: u32, frame: &FrameStats) -> MetricsResult<()> {
        self.draw_calls.increment()?;
        self.indices.increment_by(indices)?;
        self.texture_binds.increment_by(u64::from(texture_binds))?;
        self.frame_indices.set(frame.indices as f64)
    }
}

/// Global pipeline state and draw submission.
#[derive(Debug)]
pub struct Renderer {
    device: Rc<dyn GraphicsDevice>,
    wireframe: bool,
    stats: FrameStats,
    counters: Option<RendererCounters>,
}

impl Renderer {
    /// Applies `settings` to the device and returns the renderer.
    pub fn new(device: Rc<dyn GraphicsDevice>, settings: &RenderSettings) -> Self {
        device.set_clear_color(settings.clear_color);
        device.set_depth_test(settings.depth_test);
        device.set_blend_state(settings.blend);
        device.set_polygon_mode(settings.polygon_mode);
        log::debug!("Renderer created with {settings:?}");
        Self {
            device,
            wireframe: settings.polygon_mode == PolygonMode::Line,
            stats: FrameStats::default(),
            counters: None,
        }
    }

    /// Publishes per-draw counters under the `renderer` namespace of `registry`.
    pub fn attach_metrics(&mut self, registry: &MetricsRegistry) -> MetricsResult<()> {
        self.counters = Some(RendererCounters::register(registry)?);
        Ok(())
    }

    /// Clears the color and depth planes.
    pub fn clear(&self) {
        self.device.clear(ClearFlags::COLOR | ClearFlags::DEPTH);
    }

    /// Sets the color [`Renderer::clear`] fills with.
    pub fn set_clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.device.set_clear_color(LinearRgba::new(r, g, b, a));
    }

    /// Switches between wireframe and filled polygons.
    pub fn set_wireframe(&mut self, enabled: bool) {
        self.wireframe = enabled;
        self.device.set_polygon_mode(if enabled {
            PolygonMode::Line
        } else {
            PolygonMode::Fill
        });
    }

    /// Flips the wireframe mode and returns the new value.
    pub fn toggle_wireframe(&mut self) -> bool {
        self.set_wireframe(!self.wireframe);
        self.wireframe
    }

    /// Whether polygons are drawn as outlines.
    pub fn is_wireframe(&self) -> bool {
        self.wireframe
    }

    /// Enables or disables depth testing.
    pub fn set_depth_test(&self, enabled: bool) {
        self.device.set_depth_test(enabled);
    }

    /// Enables alpha blending, or disables blending.
    pub fn set_blending(&self, enabled: bool) {
        self.device
            .set_blend_state(enabled.then_some(BlendState::ALPHA_BLENDING));
    }

    /// Sets the framebuffer region drawn to.
    pub fn set_viewport(&self, x: i32, y: i32, width: u32, height: u32) {
        self.device.set_viewport(Viewport {
            x,
            y,
            width,
            height,
        });
    }

    /// Resets the frame statistics.
    pub fn begin_frame(&mut self) {
        self.stats = FrameStats::default();
        if let Some(counters) = &self.counters {
            if let Err(err) = counters.frame_indices.set(0.0) {
                log::warn!("Failed to reset renderer frame metrics: {err}");
            }
        }
    }

    /// Draws one mesh with `shader`.
    pub fn draw_mesh(&mut self, mesh: &Mesh, shader: &Shader) -> Result<(), MeshError> {
        mesh.draw(shader)?;

        let indices = mesh.index_count() as u64;
        let texture_binds = mesh.texture_count() as u32;
        self.stats.draw_calls += 1;
        self.stats.indices += indices;
        self.stats.texture_binds += texture_binds;
        if let Some(counters) = &self.counters {
            if let Err(err) = counters.record(indices, texture_binds, &self.stats) {
                log::warn!("Failed to record renderer metrics: {err}");
            }
        }
        Ok(())
    }

    /// Draws every mesh of `model` in order with the same shader.
    ///
    /// Stops at the first mesh that cannot be drawn.
    pub fn draw_model(&mut self, model: &Model, shader: &Shader) -> Result<(), MeshError> {
        for mesh in model.meshes() {
            self.draw_mesh(mesh, shader)?;
        }
        Ok(())
    }

    /// Statistics of the current frame.
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// The device draws are submitted to.
    pub fn device(&self) -> &Rc<dyn GraphicsDevice> {
        &self.device
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::testing::headless;
    use crate::graphics::Texture;
    use lumen_core::renderer::api::TextureKind;
    use lumen_infra::DeviceCommand;
    use lumen_telemetry::MetricId;

    const VERTEX: &str = "void main() {}";
    const FRAGMENT: &str = "uniform sampler2D material;\nvoid main() {}";

    fn triangle(device: &Rc<dyn GraphicsDevice>, textures: usize) -> Mesh {
        let textures = (0..textures)
            .map(|_| {
                Rc::new(
                    Texture::from_data(Rc::clone(device), 1, 1, 4, &[0; 4], TextureKind::Diffuse)
                        .unwrap(),
                )
            })
            .collect();
        Mesh::from_interleaved(Rc::clone(device), &[0.0; 24], &[0, 1, 2], textures).unwrap()
    }

    #[test]
    fn test_settings_are_applied_on_creation() {
        let (device, shared) = headless();
        let settings = RenderSettings {
            clear_color: LinearRgba::rgb(0.1, 0.2, 0.3),
            depth_test: false,
            blend: None,
            polygon_mode: PolygonMode::Line,
        };
        let renderer = Renderer::new(shared, &settings);
        assert!(renderer.is_wireframe());
        assert!(!device.depth_test());
        assert_eq!(device.blend_state(), None);
        assert_eq!(device.polygon_mode(), PolygonMode::Line);
        assert_eq!(device.clear_color(), LinearRgba::rgb(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_state_setters() {
        let (device, shared) = headless();
        let mut renderer = Renderer::new(shared, &RenderSettings::default());
        assert!(device.depth_test());
        assert_eq!(device.blend_state(), Some(BlendState::ALPHA_BLENDING));

        assert!(renderer.toggle_wireframe());
        assert_eq!(device.polygon_mode(), PolygonMode::Line);
        assert!(!renderer.toggle_wireframe());
        assert_eq!(device.polygon_mode(), PolygonMode::Fill);

        renderer.set_blending(false);
        assert_eq!(device.blend_state(), None);
        renderer.set_depth_test(false);
        assert!(!device.depth_test());
        renderer.set_clear_color(0.0, 0.0, 0.0, 0.5);
        assert_eq!(device.clear_color(), LinearRgba::new(0.0, 0.0, 0.0, 0.5));
        renderer.set_viewport(0, 0, 800, 600);
        assert_eq!(
            device.viewport(),
            Viewport {
                x: 0,
                y: 0,
                width: 800,
                height: 600
            }
        );
    }

    #[test]
    fn test_clear_targets_color_and_depth() {
        let (device, shared) = headless();
        let renderer = Renderer::new(shared, &RenderSettings::default());
        device.clear_commands();
        renderer.clear();
        assert_eq!(
            device.commands(),
            vec![DeviceCommand::Clear(ClearFlags::COLOR | ClearFlags::DEPTH)]
        );
    }

    #[test]
    fn test_frame_stats_accumulate_and_reset() {
        let (device, shared) = headless();
        let mut renderer = Renderer::new(Rc::clone(&shared), &RenderSettings::default());
        let shader = Shader::new(Rc::clone(&shared), VERTEX, FRAGMENT).unwrap();
        let plain = triangle(&shared, 0);
        let textured = triangle(&shared, 2);

        renderer.begin_frame();
        renderer.draw_mesh(&plain, &shader).unwrap();
        renderer.draw_mesh(&textured, &shader).unwrap();
        assert_eq!(
            renderer.stats(),
            FrameStats {
                draw_calls: 2,
                indices: 6,
                texture_binds: 2
            }
        );
        assert_eq!(device.draw_calls().len(), 2);

        renderer.begin_frame();
        assert_eq!(renderer.stats(), FrameStats::default());
    }

    #[test]
    fn test_metrics_are_published() {
        let (_device, shared) = headless();
        let registry = MetricsRegistry::new();
        let mut renderer = Renderer::new(Rc::clone(&shared), &RenderSettings::default());
        renderer.attach_metrics(&registry).unwrap();
        let shader = Shader::new(Rc::clone(&shared), VERTEX, FRAGMENT).unwrap();
        let mesh = triangle(&shared, 1);

        renderer.draw_mesh(&mesh, &shader).unwrap();
        renderer.draw_mesh(&mesh, &shader).unwrap();

        let value = |name: &str| {
            registry
                .get_metric(&MetricId::new("renderer", name))
                .unwrap()
                .value
                .as_counter()
                .unwrap()
        };
        assert_eq!(value("draw_calls"), 2);
        assert_eq!(value("indices"), 6);
        assert_eq!(value("texture_binds"), 2);
        assert_eq!(registry.namespace_metrics("renderer").len(), 4);

        let frame_indices = || {
            registry
                .get_metric(&MetricId::new("renderer", "frame_indices"))
                .unwrap()
                .value
                .as_gauge()
                .unwrap()
        };
        assert_eq!(frame_indices(), 6.0);
        renderer.begin_frame();
        assert_eq!(frame_indices(), 0.0);
        renderer.draw_mesh(&mesh, &shader).unwrap();
        assert_eq!(frame_indices(), 3.0);
        assert_eq!(value("indices"), 9);
    }
}
