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

//! Loads a model on the headless device and prints what was uploaded.
//!
//! ```text
//! lumen-inspect assets/backpack.obj --config engine.ron --draw
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use lumen_core::renderer::GraphicsDevice;
use lumen_infra::HeadlessDevice;
use lumen_sdk::config::EngineConfig;
use lumen_sdk::graphics::{Model, Renderer, Shader};
use lumen_sdk::prelude::PostProcess;
use lumen_telemetry::MetricsRegistry;
use std::path::PathBuf;
use std::rc::Rc;

const VERTEX_SHADER: &str = "\
#version 330 core
layout(location = 0) in vec3 a_Position;
layout(location = 1) in vec3 a_Normal;
layout(location = 2) in vec2 a_TexCoords;
out vec2 v_TexCoords;
uniform mat4 u_MVP;
void main() {
    v_TexCoords = a_TexCoords;
    gl_Position = u_MVP * vec4(a_Position, 1.0);
}
";

const FRAGMENT_SHADER: &str = "\
#version 330 core
struct Material { sampler2D diffuse1; sampler2D specular1; sampler2D normal1; };
in vec2 v_TexCoords;
out vec4 o_Color;
uniform Material material;
void main() {
    o_Color = texture(material.diffuse1, v_TexCoords);
}
";

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// The scene file to load (`.obj`, `.gltf` or `.glb`).
    model: PathBuf,

    /// Engine configuration in RON.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip every post-processing step.
    #[arg(long)]
    no_postprocess: bool,

    /// Also submit one frame and report the draw statistics.
    #[arg(long)]
    draw: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config '{}'", path.display()))?,
        None => EngineConfig::default(),
    };
    if args.no_postprocess {
        config.import.post_process = PostProcess::empty();
    }
    lumen_telemetry::logging::init(&config.log)?;

    let device = Rc::new(HeadlessDevice::new());
    let shared: Rc<dyn GraphicsDevice> = device.clone();

    let model = Model::load(Rc::clone(&shared), &args.model, &config.import)
        .with_context(|| format!("loading model '{}'", args.model.display()))?;

    println!("{}", args.model.display());
    for (i, mesh) in model.meshes().iter().enumerate() {
        let roles: Vec<&str> = mesh.textures().iter().map(|t| t.kind().as_str()).collect();
        println!(
            "  mesh {i:>3}: {:>7} vertices {:>8} indices  textures [{}]",
            mesh.vertex_count(),
            mesh.index_count(),
            roles.join(", ")
        );
    }
    println!(
        "total: {} mesh(es), {} vertices, {} indices, {} texture reference(s), {} unique texture(s)",
        model.meshes().len(),
        model.vertex_count(),
        model.index_count(),
        model.texture_count(),
        model.unique_texture_count()
    );
    println!("device objects alive: {}", device.live_objects());

    if args.draw {
        let registry = MetricsRegistry::new();
        let mut renderer = Renderer::new(Rc::clone(&shared), &config.render);
        renderer.attach_metrics(&registry)?;
        let shader = Shader::new(shared, VERTEX_SHADER, FRAGMENT_SHADER)?;

        renderer.begin_frame();
        renderer.clear();
        renderer.draw_model(&model, &shader)?;
        let stats = renderer.stats();
        println!(
            "frame: {} draw call(s), {} indices, {} texture bind(s)",
            stats.draw_calls, stats.indices, stats.texture_binds
        );
        for metric in registry.namespace_metrics("renderer") {
            log::debug!("{} = {:?}", metric.id, metric.value);
        }
    }
    Ok(())
}
