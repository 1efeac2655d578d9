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

//! The in-memory scene produced by an importer.
//!
//! The shape mirrors what scene-import libraries hand out: a flat array of
//! meshes and a flat array of materials, plus a node tree whose nodes refer
//! to meshes by index. Node transforms are not kept; the renderer draws the
//! whole model under one transform supplied by the caller.

pub mod postprocess;

pub use self::postprocess::{
    flip_uvs, generate_smooth_normals, join_identical_vertices, triangulate, PostProcess,
};

use lumen_core::renderer::api::TextureKind;
use std::path::PathBuf;

/// A fully imported scene.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    /// Every mesh of the file. Nodes refer to them by index.
    pub meshes: Vec<SceneMesh>,
    /// Every material of the file. Meshes refer to them by index.
    pub materials: Vec<SceneMaterial>,
    /// The root of the node hierarchy, if the file had one.
    pub root: Option<SceneNode>,
    /// Set when the importer could only read part of the file.
    pub incomplete: bool,
}

impl Scene {
    /// Counts the mesh references reachable from the root, one per node
    /// reference (a mesh instanced by two nodes counts twice).
    pub fn referenced_mesh_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&SceneNode> = self.root.iter().collect();
        while let Some(node) = stack.pop() {
            count += node.meshes.len();
            stack.extend(node.children.iter());
        }
        count
    }
}

/// One node of the hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneNode {
    /// The node name, possibly empty.
    pub name: String,
    /// Indices into [`Scene::meshes`], in file order.
    pub meshes: Vec<usize>,
    /// Child nodes, in file order.
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// Creates a node without children.
    pub fn new(name: impl Into<String>, meshes: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            meshes,
            children: Vec::new(),
        }
    }

    /// Appends a child and returns `self`.
    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }
}

/// One polygon, as a list of indices into the owning mesh's vertex arrays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    /// Vertex indices, in winding order.
    pub indices: Vec<u32>,
}

impl Face {
    /// Creates a triangle.
    pub fn triangle(a: u32, b: u32, c: u32) -> Self {
        Self {
            indices: vec![a, b, c],
        }
    }
}

/// Geometry with a single material.
///
/// The attribute arrays are parallel: `normals[i]` and `tex_coords[i]`
/// belong to `positions[i]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneMesh {
    /// The mesh name, possibly empty.
    pub name: String,
    /// Vertex positions.
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals, if the file provides them.
    pub normals: Option<Vec<[f32; 3]>>,
    /// First texture coordinate channel, if the file provides one.
    pub tex_coords: Option<Vec<[f32; 2]>>,
    /// Polygons.
    pub faces: Vec<Face>,
    /// Index into [`Scene::materials`].
    pub material: Option<usize>,
}

impl SceneMesh {
    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of indices over all faces.
    pub fn index_count(&self) -> usize {
        self.faces.iter().map(|f| f.indices.len()).sum()
    }
}

/// The texture references of one material.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneMaterial {
    /// The material name, possibly empty.
    pub name: String,
    /// Texture references, in file order.
    pub textures: Vec<MaterialTexture>,
}

impl SceneMaterial {
    /// The references of one role, in file order.
    pub fn textures_of(&self, kind: TextureKind) -> impl Iterator<Item = &MaterialTexture> {
        self.textures.iter().filter(move |t| t.kind == kind)
    }
}

/// One texture slot of a material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialTexture {
    /// The role of the texture in the material.
    pub kind: TextureKind,
    /// Where the image data lives.
    pub source: TextureSource,
}

/// Where the image of a texture reference lives.
#[derive(Clone, PartialEq, Eq)]
pub enum TextureSource {
    /// A file, relative to the asset's directory unless absolute.
    File(PathBuf),
    /// Encoded image bytes stored inside the asset itself.
    Embedded {
        /// The image index inside the asset; unique per asset.
        index: usize,
        /// The encoded (PNG, JPEG, ...) bytes.
        bytes: Vec<u8>,
    },
}

impl std::fmt::Debug for TextureSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextureSource::File(path) => f.debug_tuple("File").field(path).finish(),
            TextureSource::Embedded { index, bytes } => f
                .debug_struct("Embedded")
                .field("index", index)
                .field("len", &bytes.len())
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_referenced_mesh_count_walks_whole_tree() {
        let scene = Scene {
            root: Some(
                SceneNode::new("root", vec![0])
                    .with_child(SceneNode::new("a", vec![1, 2]))
                    .with_child(SceneNode::new("b", vec![]).with_child(SceneNode::new("c", vec![0]))),
            ),
            ..Default::default()
        };
        assert_eq!(scene.referenced_mesh_count(), 4);
    }

    #[test]
    fn test_textures_of_filters_by_role() {
        let material = SceneMaterial {
            name: "m".into(),
            textures: vec![
                MaterialTexture {
                    kind: TextureKind::Specular,
                    source: TextureSource::File("s.png".into()),
                },
                MaterialTexture {
                    kind: TextureKind::Diffuse,
                    source: TextureSource::File("d.png".into()),
                },
            ],
        };
        let diffuse: Vec<_> = material.textures_of(TextureKind::Diffuse).collect();
        assert_eq!(diffuse.len(), 1);
        assert_eq!(diffuse[0].source, TextureSource::File("d.png".into()));
    }
}
