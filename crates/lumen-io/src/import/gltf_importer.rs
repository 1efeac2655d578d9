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

//! glTF 2.0 importer with support for both embedded and external resources.

use super::{
    decode_data_uri, uri_to_path, FileSystemResolver, ImportError, ResourceResolver, SceneImporter,
};
use crate::scene::{
    Face, MaterialTexture, Scene, SceneMaterial, SceneMesh, SceneNode, TextureSource,
};
use gltf::{mesh::Mode, Buffer};
use lumen_core::renderer::api::TextureKind;
use std::path::Path;

/// Node hierarchies deeper than this are rejected as malformed.
pub const MAX_NODE_DEPTH: usize = 256;

/// Imports `.gltf` and `.glb` files.
///
/// Every primitive becomes its own [`SceneMesh`], so a glTF mesh with two
/// materials yields two scene meshes referenced by the same node.
#[derive(Debug, Clone, Copy, Default)]
pub struct GltfImporter;

impl SceneImporter for GltfImporter {
    fn extensions(&self) -> &'static [&'static str] {
        &["gltf", "glb"]
    }

    fn import(&self, path: &Path) -> Result<Scene, ImportError> {
        let bytes = std::fs::read(path).map_err(|source| ImportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        self.import_slice(&bytes, &FileSystemResolver::new(base))
    }
}

impl GltfImporter {
    /// Parses glTF JSON or GLB bytes, resolving external buffers through `resolver`.
    pub fn import_slice(
        &self,
        bytes: &[u8],
        resolver: &dyn ResourceResolver,
    ) -> Result<Scene, ImportError> {
        let gltf = gltf::Gltf::from_slice(bytes)?;
        let buffer_data = load_buffer_data(&gltf, resolver)?;

        let materials = gltf
            .materials()
            .map(|material| convert_material(&material, &buffer_data))
            .collect::<Result<Vec<_>, _>>()?;

        // glTF mesh index -> indices of the scene meshes built from its primitives.
        let mut meshes = Vec::new();
        let mut primitives_of = Vec::with_capacity(gltf.meshes().len());
        for mesh in gltf.meshes() {
            let mut indices = Vec::new();
            for primitive in mesh.primitives() {
                if let Some(scene_mesh) = convert_primitive(&mesh, &primitive, &buffer_data)? {
                    indices.push(meshes.len());
                    meshes.push(scene_mesh);
                }
            }
            primitives_of.push(indices);
        }

        let root = match gltf.default_scene().or_else(|| gltf.scenes().next()) {
            Some(scene) => {
                let mut root = SceneNode::new(scene.name().unwrap_or_default(), Vec::new());
                for node in scene.nodes() {
                    root.children.push(convert_node(&node, &primitives_of, 1)?);
                }
                Some(root)
            }
            None => None,
        };

        Ok(Scene {
            incomplete: meshes.is_empty(),
            meshes,
            materials,
            root,
        })
    }
}

fn load_buffer_data(
    gltf: &gltf::Gltf,
    resolver: &dyn ResourceResolver,
) -> Result<Vec<Vec<u8>>, ImportError> {
    let mut buffer_data = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                if let Some(blob) = gltf.blob.as_deref() {
                    buffer_data.push(blob.to_vec());
                } else {
                    return Err(ImportError::Resolve(
                        "GLB file references binary chunk but it is missing".into(),
                    ));
                }
            }
            gltf::buffer::Source::Uri(uri) => buffer_data.push(resolver.resolve_buffer(uri)?),
        }
    }
    Ok(buffer_data)
}

fn convert_primitive(
    mesh: &gltf::Mesh<'_>,
    primitive: &gltf::Primitive<'_>,
    buffer_data: &[Vec<u8>],
) -> Result<Option<SceneMesh>, ImportError> {
    let name = mesh.name().unwrap_or_default().to_owned();
    let mode = primitive.mode();
    if matches!(
        mode,
        Mode::Points | Mode::Lines | Mode::LineLoop | Mode::LineStrip
    ) {
        log::warn!(
            "glTF mesh '{}': skipping primitive {} with non-triangle mode {:?}",
            name,
            primitive.index(),
            mode
        );
        return Ok(None);
    }

    let get_buffer_data = |buffer: Buffer<'_>| buffer_data.get(buffer.index()).map(Vec::as_slice);
    let reader = primitive.reader(get_buffer_data);

    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .map(Iterator::collect)
        .ok_or_else(|| {
            ImportError::Malformed(format!(
                "glTF mesh '{}': vertex positions attribute not found",
                name
            ))
        })?;
    let normals = reader.read_normals().map(Iterator::collect);
    let tex_coords = reader
        .read_tex_coords(0)
        .map(|iter| iter.into_f32().collect());
    let indices: Vec<u32> = match reader.read_indices() {
        Some(iter) => iter.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };

    if let Some(bad) = indices.iter().find(|&&i| i as usize >= positions.len()) {
        return Err(ImportError::Malformed(format!(
            "glTF mesh '{}': index {} out of range for {} vertices",
            name,
            bad,
            positions.len()
        )));
    }

    Ok(Some(SceneMesh {
        name,
        positions,
        normals,
        tex_coords,
        faces: faces_for_mode(mode, &indices),
        material: primitive.material().index(),
    }))
}

/// Splits an index stream into triangles according to the primitive mode.
fn faces_for_mode(mode: Mode, indices: &[u32]) -> Vec<Face> {
    match mode {
        Mode::TriangleStrip => indices
            .windows(3)
            .enumerate()
            .map(|(i, w)| {
                // Odd triangles swap their first two corners to keep the winding.
                if i % 2 == 0 {
                    Face::triangle(w[0], w[1], w[2])
                } else {
                    Face::triangle(w[1], w[0], w[2])
                }
            })
            .collect(),
        Mode::TriangleFan => match indices.split_first() {
            Some((&first, rest)) => rest
                .windows(2)
                .map(|w| Face::triangle(first, w[0], w[1]))
                .collect(),
            None => Vec::new(),
        },
        _ => indices
            .chunks_exact(3)
            .map(|c| Face::triangle(c[0], c[1], c[2]))
            .collect(),
    }
}

fn convert_material(
    material: &gltf::Material<'_>,
    buffer_data: &[Vec<u8>],
) -> Result<SceneMaterial, ImportError> {
    let mut textures = Vec::new();
    if let Some(info) = material.pbr_metallic_roughness().base_color_texture() {
        textures.push(MaterialTexture {
            kind: TextureKind::Diffuse,
            source: image_source(&info.texture().source(), buffer_data)?,
        });
    }
    if let Some(normal) = material.normal_texture() {
        textures.push(MaterialTexture {
            kind: TextureKind::Normal,
            source: image_source(&normal.texture().source(), buffer_data)?,
        });
    }
    Ok(SceneMaterial {
        name: material.name().unwrap_or_default().to_owned(),
        textures,
    })
}

fn image_source(
    image: &gltf::Image<'_>,
    buffer_data: &[Vec<u8>],
) -> Result<TextureSource, ImportError> {
    match image.source() {
        gltf::image::Source::Uri { uri, .. } if uri.starts_with("data:") => {
            Ok(TextureSource::Embedded {
                index: image.index(),
                bytes: decode_data_uri(uri)?,
            })
        }
        gltf::image::Source::Uri { uri, .. } => Ok(TextureSource::File(uri_to_path(uri)?)),
        gltf::image::Source::View { view, .. } => {
            let start = view.offset();
            let end = start + view.length();
            let bytes = buffer_data
                .get(view.buffer().index())
                .and_then(|buffer| buffer.get(start..end))
                .ok_or_else(|| {
                    ImportError::Malformed(format!(
                        "glTF image {}: buffer view out of range",
                        image.index()
                    ))
                })?;
            Ok(TextureSource::Embedded {
                index: image.index(),
                bytes: bytes.to_vec(),
            })
        }
    }
}

fn convert_node(
    node: &gltf::Node<'_>,
    primitives_of: &[Vec<usize>],
    depth: usize,
) -> Result<SceneNode, ImportError> {
    if depth > MAX_NODE_DEPTH {
        return Err(ImportError::Malformed(format!(
            "node hierarchy deeper than {} levels",
            MAX_NODE_DEPTH
        )));
    }
    let meshes = node
        .mesh()
        .and_then(|mesh| primitives_of.get(mesh.index()))
        .cloned()
        .unwrap_or_default();
    let mut scene_node = SceneNode::new(node.name().unwrap_or_default(), meshes);
    for child in node.children() {
        scene_node
            .children
            .push(convert_node(&child, primitives_of, depth + 1)?);
    }
    Ok(scene_node)
}
