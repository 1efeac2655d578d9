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

use super::{Mesh, ModelError, Texture};
use lumen_core::renderer::api::{TextureKind, Vertex};
use lumen_core::renderer::GraphicsDevice;
use lumen_io::scene::{MaterialTexture, Scene, SceneMesh, SceneNode, TextureSource};
use lumen_io::{import_scene, ImportSettings};
use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};
use std::rc::Rc;

/// Identity of a texture within one load.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum TextureKey {
    File(PathBuf, TextureKind),
    Embedded(usize, TextureKind),
}

/// An imported scene turned into GPU meshes.
///
/// Meshes are kept in depth-first node order, a node's own meshes before its
/// children's. A texture referenced several times in one load is uploaded
/// once and shared by every mesh that uses it.
#[derive(Debug)]
pub struct Model {
    device: Rc<dyn GraphicsDevice>,
    meshes: Vec<Mesh>,
    directory: PathBuf,
    path: Option<PathBuf>,
}

impl Model {
    /// Imports the scene file at `path` and uploads every mesh it references.
    ///
    /// ## Errors
    /// * `ModelError::InvalidPath` - If `path` has no file name. Nothing is read.
    /// * `ModelError::Import` - If the importer fails.
    /// * `ModelError::IncompleteScene` / `ModelError::MissingRoot` - If the scene
    ///   cannot be walked.
    /// * `ModelError::Texture` / `ModelError::Mesh` - If an upload fails.
    ///
    /// On error every object created so far is released.
    pub fn load(
        device: Rc<dyn GraphicsDevice>,
        path: impl AsRef<Path>,
        settings: &ImportSettings,
    ) -> Result<Self, ModelError> {
        let path = path.as_ref();
        if path.file_name().is_none() {
            return Err(ModelError::InvalidPath(path.to_path_buf()));
        }
        let directory = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let scene = import_scene(path, settings.post_process)?;
        let mut model = Self::build(device, &scene, directory, path)?;
        model.path = Some(path.to_path_buf());

        log::info!(
            "Loaded model '{}': {} mesh(es), {} vertices, {} indices, {} unique texture(s)",
            path.display(),
            model.meshes.len(),
            model.vertex_count(),
            model.index_count(),
            model.unique_texture_count()
        );
        Ok(model)
    }

    /// Uploads an already imported scene. Relative texture paths are resolved
    /// against `directory`.
    pub fn from_scene(
        device: Rc<dyn GraphicsDevice>,
        scene: &Scene,
        directory: impl Into<PathBuf>,
    ) -> Result<Self, ModelError> {
        let directory = directory.into();
        let label = directory.clone();
        Self::build(device, scene, directory, &label)
    }

    fn build(
        device: Rc<dyn GraphicsDevice>,
        scene: &Scene,
        directory: PathBuf,
        label: &Path,
    ) -> Result<Self, ModelError> {
        if scene.incomplete {
            return Err(ModelError::IncompleteScene(label.to_path_buf()));
        }
        let root = scene
            .root
            .as_ref()
            .ok_or_else(|| ModelError::MissingRoot(label.to_path_buf()))?;

        let mut loader = SceneLoader {
            device: &device,
            scene,
            directory: &directory,
            cache: HashMap::new(),
        };
        let mut meshes = Vec::with_capacity(scene.referenced_mesh_count());

        // Pre-order walk: children are pushed reversed so the first child pops first.
        let mut stack: Vec<&SceneNode> = vec![root];
        while let Some(node) = stack.pop() {
            for &index in &node.meshes {
                let source = scene.meshes.get(index).ok_or_else(|| {
                    ModelError::InvalidMeshIndex {
                        node: node.name.clone(),
                        index,
                        count: scene.meshes.len(),
                    }
                })?;
                meshes.push(loader.process_mesh(source)?);
            }
            stack.extend(node.children.iter().rev());
        }

        Ok(Self {
            device,
            meshes,
            directory,
            path: None,
        })
    }

    /// Imports the file again and replaces the meshes.
    ///
    /// The current meshes are kept when the new load fails. A model built
    /// with [`Model::from_scene`] has no file and reloading it is an
    /// `InvalidPath` error.
    pub fn reload(&mut self, settings: &ImportSettings) -> Result<(), ModelError> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| ModelError::InvalidPath(self.directory.clone()))?;
        *self = Self::load(Rc::clone(&self.device), path, settings)?;
        Ok(())
    }

    /// The meshes, in depth-first node order.
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// The directory relative texture paths were resolved against.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// The file the model was loaded from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Total vertices over every mesh.
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(Mesh::vertex_count).sum()
    }

    /// Total indices over every mesh.
    pub fn index_count(&self) -> usize {
        self.meshes.iter().map(Mesh::index_count).sum()
    }

    /// Texture references over every mesh, shared textures counted once per mesh.
    pub fn texture_count(&self) -> usize {
        self.meshes.iter().map(Mesh::texture_count).sum()
    }

    /// Distinct GPU textures used by the model.
    pub fn unique_texture_count(&self) -> usize {
        self.meshes
            .iter()
            .flat_map(Mesh::textures)
            .map(Rc::as_ptr)
            .collect::<HashSet<_>>()
            .len()
    }
}

struct SceneLoader<'a> {
    device: &'a Rc<dyn GraphicsDevice>,
    scene: &'a Scene,
    directory: &'a Path,
    cache: HashMap<TextureKey, Rc<Texture>>,
}

impl SceneLoader<'_> {
    fn process_mesh(&mut self, source: &SceneMesh) -> Result<Mesh, ModelError> {
        let vertices: Vec<Vertex> = source
            .positions
            .iter()
            .enumerate()
            .map(|(i, &position)| Vertex {
                position,
                normal: source
                    .normals
                    .as_ref()
                    .and_then(|normals| normals.get(i).copied())
                    .unwrap_or_default(),
                tex_coords: source
                    .tex_coords
                    .as_ref()
                    .and_then(|coords| coords.get(i).copied())
                    .unwrap_or_default(),
            })
            .collect();
        let indices: Vec<u32> = source
            .faces
            .iter()
            .flat_map(|face| face.indices.iter().copied())
            .collect();

        let mut textures = Vec::new();
        if let Some(material) = source.material.and_then(|m| self.scene.materials.get(m)) {
            for kind in TextureKind::ALL {
                for reference in material.textures_of(kind) {
                    textures.push(self.texture(reference)?);
                }
            }
        }

        Mesh::new(Rc::clone(self.device), &vertices, &indices, textures).map_err(|error| {
            ModelError::Mesh {
                name: source.name.clone(),
                error,
            }
        })
    }

    fn texture(&mut self, reference: &MaterialTexture) -> Result<Rc<Texture>, ModelError> {
        let kind = reference.kind;
        let key = match &reference.source {
            TextureSource::File(path) => TextureKey::File(self.resolve(path), kind),
            TextureSource::Embedded { index, .. } => TextureKey::Embedded(*index, kind),
        };
        if let Some(texture) = self.cache.get(&key) {
            return Ok(Rc::clone(texture));
        }

        let device = Rc::clone(self.device);
        let loaded = match &reference.source {
            TextureSource::File(path) => {
                let resolved = self.resolve(path);
                Texture::from_file(device, &resolved, kind).map_err(|error| {
                    ModelError::Texture {
                        source_name: resolved.display().to_string(),
                        error,
                    }
                })
            }
            TextureSource::Embedded { index, bytes } => {
                Texture::from_memory(device, bytes, kind).map_err(|error| ModelError::Texture {
                    source_name: format!("embedded #{index}"),
                    error,
                })
            }
        }?;
        log::debug!("Uploaded {kind} texture {:?}", key);

        let texture = Rc::new(loaded);
        self.cache.insert(key, Rc::clone(&texture));
        Ok(texture)
    }

    /// Joins `path` to the model directory so that every spelling of the same
    /// file maps to one path.
    fn resolve(&self, path: &Path) -> PathBuf {
        let joined = self.directory.join(path);
        std::fs::canonicalize(&joined).unwrap_or_else(|_| normalize_lexically(&joined))
    }
}

/// Folds `.` and `..` components without touching the file system.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::testing::headless;
    use lumen_io::scene::{Face, SceneMaterial};

    fn triangle(name: &str, material: Option<usize>) -> SceneMesh {
        SceneMesh {
            name: name.to_string(),
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            normals: None,
            tex_coords: None,
            faces: vec![Face::triangle(0, 1, 2)],
            material,
        }
    }

    fn png_bytes() -> Vec<u8> {
        let image = image::RgbImage::from_pixel(2, 2, image::Rgb([200, 10, 10]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        image
            .write_to(&mut bytes, image::ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    fn embedded(kind: TextureKind, index: usize) -> MaterialTexture {
        MaterialTexture {
            kind,
            source: TextureSource::Embedded {
                index,
                bytes: png_bytes(),
            },
        }
    }

    #[test]
    fn test_meshes_follow_depth_first_node_order() {
        let (device, shared) = headless();
        // Mesh `i` is tagged by the x of its first vertex.
        let meshes = (0..4)
            .map(|i| {
                let mut mesh = triangle(&format!("m{i}"), None);
                mesh.positions[0][0] = i as f32;
                mesh
            })
            .collect();
        let scene = Scene {
            meshes,
            root: Some(
                SceneNode::new("root", vec![0])
                    .with_child(SceneNode::new("a", vec![1]).with_child(SceneNode::new("c", vec![3])))
                    .with_child(SceneNode::new("b", vec![2])),
            ),
            ..Default::default()
        };
        let model = Model::from_scene(shared, &scene, "").unwrap();

        let tags: Vec<f32> = model
            .meshes()
            .iter()
            .map(|mesh| {
                let bytes = device.buffer_data(mesh.vertex_buffer().id()).unwrap();
                bytemuck::cast_slice::<u8, Vertex>(&bytes)[0].position[0]
            })
            .collect();
        assert_eq!(tags, [0.0, 1.0, 3.0, 2.0]);
        assert_eq!(model.vertex_count(), 12);
        assert_eq!(model.index_count(), 12);
    }

    #[test]
    fn test_instanced_mesh_is_uploaded_per_reference() {
        let (device, shared) = headless();
        let scene = Scene {
            meshes: vec![triangle("shared", None)],
            root: Some(
                SceneNode::new("root", vec![])
                    .with_child(SceneNode::new("a", vec![0]))
                    .with_child(SceneNode::new("b", vec![0])),
            ),
            ..Default::default()
        };
        let model = Model::from_scene(shared, &scene, "").unwrap();
        assert_eq!(model.meshes().len(), 2);
        assert_eq!(device.live_vertex_arrays(), 2);
    }

    #[test]
    fn test_missing_attributes_default_to_zero() {
        let (device, shared) = headless();
        let scene = Scene {
            meshes: vec![triangle("bare", None)],
            root: Some(SceneNode::new("root", vec![0])),
            ..Default::default()
        };
        let model = Model::from_scene(shared, &scene, "").unwrap();
        let bytes = device
            .buffer_data(model.meshes()[0].vertex_buffer().id())
            .unwrap();
        let vertices: &[Vertex] = bytemuck::cast_slice(&bytes);
        assert_eq!(vertices[1].position, [1.0, 0.0, 0.0]);
        assert!(vertices.iter().all(|v| v.normal == [0.0; 3]));
        assert!(vertices.iter().all(|v| v.tex_coords == [0.0; 2]));
    }

    #[test]
    fn test_textures_are_ordered_by_role_and_shared() {
        let (device, shared) = headless();
        let material = SceneMaterial {
            name: "brick".to_string(),
            textures: vec![
                embedded(TextureKind::Specular, 1),
                embedded(TextureKind::Diffuse, 0),
            ],
        };
        let scene = Scene {
            meshes: vec![triangle("a", Some(0)), triangle("b", Some(0))],
            materials: vec![material],
            root: Some(SceneNode::new("root", vec![0, 1])),
            ..Default::default()
        };
        let model = Model::from_scene(shared, &scene, "").unwrap();

        let kinds: Vec<_> = model.meshes()[0]
            .textures()
            .iter()
            .map(|t| t.kind())
            .collect();
        assert_eq!(kinds, [TextureKind::Diffuse, TextureKind::Specular]);
        assert_eq!(model.texture_count(), 4);
        assert_eq!(model.unique_texture_count(), 2);
        assert_eq!(device.live_textures(), 2);
    }

    #[test]
    fn test_differently_spelled_paths_share_one_texture() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("tex")).unwrap();
        std::fs::write(dir.path().join("brick.png"), png_bytes()).unwrap();

        let file = |path: &str| MaterialTexture {
            kind: TextureKind::Diffuse,
            source: TextureSource::File(PathBuf::from(path)),
        };
        let scene = Scene {
            meshes: vec![triangle("a", Some(0)), triangle("b", Some(1))],
            materials: vec![
                SceneMaterial {
                    name: "plain".to_string(),
                    textures: vec![file("brick.png")],
                },
                SceneMaterial {
                    name: "dotted".to_string(),
                    textures: vec![file("tex/../brick.png")],
                },
            ],
            root: Some(SceneNode::new("root", vec![0, 1])),
            ..Default::default()
        };
        let (device, shared) = headless();
        let model = Model::from_scene(shared, &scene, dir.path()).unwrap();
        assert_eq!(model.texture_count(), 2);
        assert_eq!(model.unique_texture_count(), 1);
        assert_eq!(device.live_textures(), 1);
    }

    #[test]
    fn test_lexical_normalization() {
        assert_eq!(
            normalize_lexically(Path::new("models/./tex/../brick.png")),
            PathBuf::from("models/brick.png")
        );
        assert_eq!(
            normalize_lexically(Path::new("../shared/brick.png")),
            PathBuf::from("../shared/brick.png")
        );
        assert_eq!(
            normalize_lexically(Path::new("/../brick.png")),
            PathBuf::from("/brick.png")
        );
    }

    #[test]
    fn test_same_image_with_two_roles_is_two_textures() {
        let (device, shared) = headless();
        let material = SceneMaterial {
            name: String::new(),
            textures: vec![
                embedded(TextureKind::Diffuse, 0),
                embedded(TextureKind::Specular, 0),
            ],
        };
        let scene = Scene {
            meshes: vec![triangle("a", Some(0))],
            materials: vec![material],
            root: Some(SceneNode::new("root", vec![0])),
            ..Default::default()
        };
        let model = Model::from_scene(shared, &scene, "").unwrap();
        assert_eq!(model.unique_texture_count(), 2);
        assert_eq!(device.live_textures(), 2);
    }

    #[test]
    fn test_bad_node_reference_releases_everything() {
        let (device, shared) = headless();
        let scene = Scene {
            meshes: vec![triangle("only", None)],
            root: Some(SceneNode::new("root", vec![0, 3])),
            ..Default::default()
        };
        let err = Model::from_scene(shared, &scene, "").unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidMeshIndex { index: 3, count: 1, .. }
        ));
        assert_eq!(device.live_objects(), 0);
    }

    #[test]
    fn test_incomplete_or_rootless_scene_is_rejected() {
        let (device, shared) = headless();
        let incomplete = Scene {
            root: Some(SceneNode::new("root", vec![])),
            incomplete: true,
            ..Default::default()
        };
        assert!(matches!(
            Model::from_scene(shared.clone(), &incomplete, "assets").unwrap_err(),
            ModelError::IncompleteScene(_)
        ));
        assert!(matches!(
            Model::from_scene(shared, &Scene::default(), "assets").unwrap_err(),
            ModelError::MissingRoot(_)
        ));
        assert!(device.commands().is_empty());
    }

    #[test]
    fn test_missing_texture_file_fails_the_load() {
        let (device, shared) = headless();
        let material = SceneMaterial {
            name: String::new(),
            textures: vec![MaterialTexture {
                kind: TextureKind::Diffuse,
                source: TextureSource::File(PathBuf::from("missing.png")),
            }],
        };
        let scene = Scene {
            meshes: vec![triangle("a", None), triangle("b", Some(0))],
            materials: vec![material],
            root: Some(SceneNode::new("root", vec![0, 1])),
            ..Default::default()
        };
        let err = Model::from_scene(shared, &scene, "no-such-dir").unwrap_err();
        match err {
            ModelError::Texture { source_name, .. } => {
                assert!(source_name.ends_with("missing.png"), "{source_name}");
            }
            other => panic!("expected a texture error, got {other}"),
        }
        assert_eq!(device.live_objects(), 0);
    }

    #[test]
    fn test_path_without_file_name_is_rejected_before_io() {
        let (device, shared) = headless();
        let err = Model::load(shared, "/", &ImportSettings::default()).unwrap_err();
        assert!(matches!(err, ModelError::InvalidPath(_)));
        assert!(device.commands().is_empty());
    }

    #[test]
    fn test_scene_model_cannot_reload() {
        let (_device, shared) = headless();
        let scene = Scene {
            root: Some(SceneNode::new("root", vec![])),
            ..Default::default()
        };
        let mut model = Model::from_scene(shared, &scene, "").unwrap();
        assert!(model.path().is_none());
        assert!(matches!(
            model.reload(&ImportSettings::default()).unwrap_err(),
            ModelError::InvalidPath(_)
        ));
    }
}
