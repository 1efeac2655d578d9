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

use anyhow::Result;
use lumen_core::renderer::api::{TextureKind, UniformValue, Vertex};
use lumen_core::renderer::GraphicsDevice;
use lumen_infra::HeadlessDevice;
use lumen_io::{ImportSettings, PostProcess};
use lumen_sdk::graphics::{Model, ModelError, Renderer, Shader};
use lumen_sdk::prelude::RenderSettings;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

const VERTEX: &str = "\
layout(location = 0) in vec3 a_Position;
layout(location = 1) in vec3 a_Normal;
layout(location = 2) in vec2 a_TexCoords;
uniform mat4 u_Model;
void main() {}
";

const FRAGMENT: &str = "\
struct Material { sampler2D diffuse1; };
uniform Material material;
void main() {}
";

/// Two quads, `left` then `right`, sharing one textured material.
const TWO_QUADS: &str = "\
mtllib scene.mtl
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 10 0 0
v 11 0 0
v 11 1 0
v 10 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
o left
usemtl brick
f 1/1/1 2/2/1 3/3/1 4/4/1
o right
usemtl brick
f 5/1/1 6/2/1 7/3/1 8/4/1
";

fn devices() -> (Rc<HeadlessDevice>, Rc<dyn GraphicsDevice>) {
    let device = Rc::new(HeadlessDevice::new());
    let shared: Rc<dyn GraphicsDevice> = device.clone();
    (device, shared)
}

fn settings() -> ImportSettings {
    ImportSettings {
        post_process: PostProcess::TRIANGULATE | PostProcess::FLIP_UVS,
    }
}

fn write_scene(dir: &Path, obj: &str, texture: &str) -> Result<PathBuf> {
    fs::write(
        dir.join("scene.mtl"),
        format!("newmtl brick\nKd 1 1 1\nmap_Kd {texture}\n"),
    )?;
    image::RgbImage::from_pixel(4, 2, image::Rgb([180, 60, 20])).save(dir.join("brick.png"))?;
    let path = dir.join("scene.obj");
    fs::write(&path, obj)?;
    Ok(path)
}

#[test]
fn two_textured_quads_load_and_draw() -> Result<()> {
    lumen_telemetry::logging::init_for_tests();
    let dir = tempfile::tempdir()?;
    let path = write_scene(dir.path(), TWO_QUADS, "brick.png")?;
    let (device, shared) = devices();

    let model = Model::load(Rc::clone(&shared), &path, &settings())?;
    assert_eq!(model.meshes().len(), 2);
    assert_eq!(model.vertex_count(), 8);
    assert_eq!(model.index_count(), 12);
    assert_eq!(model.texture_count(), 2);
    assert_eq!(model.unique_texture_count(), 1);
    assert_eq!(model.directory(), dir.path());

    let texture = &model.meshes()[0].textures()[0];
    assert_eq!(texture.kind(), TextureKind::Diffuse);
    let info = device
        .texture_info(texture.id())
        .expect("texture is live on the device");
    assert_eq!((info.width, info.height), (4, 2));
    assert!(info.mipmapped);

    let shader = Shader::new(Rc::clone(&shared), VERTEX, FRAGMENT)?;
    let mut renderer = Renderer::new(Rc::clone(&shared), &RenderSettings::default());
    device.clear_commands();
    renderer.begin_frame();
    renderer.draw_model(&model, &shader)?;

    let calls = device.draw_calls();
    assert_eq!(calls.len(), 2);
    for (call, mesh) in calls.iter().zip(model.meshes()) {
        assert_eq!(call.count, 6);
        assert_eq!(call.textures, vec![(0, texture.id())]);
        assert_eq!(call.vertex_array, mesh.vertex_array().id());
        assert_eq!(call.active_unit, 0);
    }
    assert_eq!(
        device.uniform(shader.id(), "material.diffuse1"),
        Some(UniformValue::Int(0))
    );
    assert_eq!(renderer.stats().draw_calls, 2);
    assert_eq!(renderer.stats().indices, 12);
    Ok(())
}

#[test]
fn meshes_keep_file_order() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_scene(dir.path(), TWO_QUADS, "brick.png")?;
    let (device, shared) = devices();

    let model = Model::load(shared, &path, &settings())?;
    let first_x = |mesh: usize| -> Result<f32> {
        let id = model.meshes()[mesh].vertex_buffer().id();
        let bytes = device
            .buffer_data(id)
            .ok_or_else(|| anyhow::anyhow!("buffer {id:?} is not live"))?;
        let vertices: &[Vertex] = bytemuck::cast_slice(&bytes);
        Ok(vertices[0].position[0])
    };
    assert!(first_x(0)? < 5.0);
    assert!(first_x(1)? >= 10.0);
    Ok(())
}

#[test]
fn missing_texture_fails_and_releases_everything() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_scene(dir.path(), TWO_QUADS, "nowhere.png")?;
    let (device, shared) = devices();

    let err = Model::load(shared, &path, &settings()).unwrap_err();
    assert!(matches!(err, ModelError::Texture { .. }), "{err}");
    assert_eq!(device.live_objects(), 0);
    assert_eq!(device.invalid_releases(), 0);
    Ok(())
}

#[test]
fn unreadable_paths_fail() {
    let (device, shared) = devices();
    assert!(matches!(
        Model::load(Rc::clone(&shared), "missing/scene.obj", &settings()).unwrap_err(),
        ModelError::Import(_)
    ));
    assert!(matches!(
        Model::load(Rc::clone(&shared), "scene.fbx", &settings()).unwrap_err(),
        ModelError::Import(_)
    ));
    assert!(matches!(
        Model::load(shared, "", &settings()).unwrap_err(),
        ModelError::InvalidPath(_)
    ));
    assert_eq!(device.live_objects(), 0);
}

#[test]
fn moving_a_model_keeps_its_objects() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_scene(dir.path(), TWO_QUADS, "brick.png")?;
    let (device, shared) = devices();

    let model = Model::load(shared, &path, &settings())?;
    let live = device.live_objects();
    let mut models = Vec::new();
    models.push(model);
    let moved = models.pop().expect("pushed above");
    assert_eq!(device.live_objects(), live);

    drop(moved);
    assert_eq!(device.live_objects(), 0);
    assert_eq!(device.invalid_releases(), 0);
    Ok(())
}

#[test]
fn reload_replaces_only_on_success() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_scene(dir.path(), TWO_QUADS, "brick.png")?;
    let (device, shared) = devices();

    let mut model = Model::load(shared, &path, &settings())?;
    let one_quad = TWO_QUADS
        .split("o right")
        .next()
        .ok_or_else(|| anyhow::anyhow!("fixture has two objects"))?;
    fs::write(&path, one_quad)?;
    model.reload(&settings())?;
    assert_eq!(model.meshes().len(), 1);

    fs::remove_file(&path)?;
    assert!(model.reload(&settings()).is_err());
    assert_eq!(model.meshes().len(), 1);
    assert_eq!(device.live_vertex_arrays(), 1);
    Ok(())
}
