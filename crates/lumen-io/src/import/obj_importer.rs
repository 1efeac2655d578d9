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

//! Wavefront OBJ importer, including the `.mtl` material libraries.

use super::{ImportError, SceneImporter};
use crate::scene::{Face, MaterialTexture, Scene, SceneMaterial, SceneMesh, SceneNode, TextureSource};
use lumen_core::renderer::api::TextureKind;
use std::path::{Path, PathBuf};

/// Imports `.obj` files.
///
/// Each object or group of the file becomes one [`SceneMesh`] and one child
/// node of the root. Polygons are kept as written; triangulation is a
/// post-processing step.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjImporter;

impl SceneImporter for ObjImporter {
    fn extensions(&self) -> &'static [&'static str] {
        &["obj"]
    }

    fn import(&self, path: &Path) -> Result<Scene, ImportError> {
        let (models, materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                single_index: true,
                triangulate: false,
                ignore_points: true,
                ignore_lines: true,
                ..Default::default()
            },
        )?;

        // A broken material library does not invalidate the geometry.
        let materials = materials.unwrap_or_else(|e| {
            log::warn!("OBJ '{}': failed to load materials: {}", path.display(), e);
            Vec::new()
        });

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let mut root = SceneNode::new(stem, Vec::new());
        let mut meshes = Vec::with_capacity(models.len());
        for model in models {
            root.children
                .push(SceneNode::new(model.name.clone(), vec![meshes.len()]));
            meshes.push(convert_model(model, materials.len())?);
        }

        Ok(Scene {
            incomplete: meshes.is_empty(),
            meshes,
            materials: materials.into_iter().map(convert_material).collect(),
            root: Some(root),
        })
    }
}

fn convert_model(model: tobj::Model, material_count: usize) -> Result<SceneMesh, ImportError> {
    let tobj::Model { mesh, name, .. } = model;

    let positions: Vec<[f32; 3]> = mesh
        .positions
        .chunks_exact(3)
        .map(|v| [v[0], v[1], v[2]])
        .collect();
    let normals = (!mesh.normals.is_empty()).then(|| {
        mesh.normals
            .chunks_exact(3)
            .map(|n| [n[0], n[1], n[2]])
            .collect()
    });
    let tex_coords = (!mesh.texcoords.is_empty()).then(|| {
        mesh.texcoords
            .chunks_exact(2)
            .map(|t| [t[0], t[1]])
            .collect()
    });

    // Empty arities mean every face is a triangle.
    let faces = if mesh.face_arities.is_empty() {
        mesh.indices
            .chunks_exact(3)
            .map(|c| Face::triangle(c[0], c[1], c[2]))
            .collect()
    } else {
        let mut faces = Vec::with_capacity(mesh.face_arities.len());
        let mut start = 0usize;
        for &arity in &mesh.face_arities {
            let end = start + arity as usize;
            let indices = mesh.indices.get(start..end).ok_or_else(|| {
                ImportError::Malformed(format!("OBJ object '{}': truncated face list", name))
            })?;
            faces.push(Face {
                indices: indices.to_vec(),
            });
            start = end;
        }
        faces
    };

    let material = mesh.material_id.filter(|&id| {
        let known = id < material_count;
        if !known {
            log::warn!("OBJ object '{}': unknown material {}", name, id);
        }
        known
    });

    Ok(SceneMesh {
        name,
        positions,
        normals,
        tex_coords,
        faces,
        material,
    })
}

fn convert_material(material: tobj::Material) -> SceneMaterial {
    let slots = [
        (TextureKind::Diffuse, material.diffuse_texture),
        (TextureKind::Specular, material.specular_texture),
        (TextureKind::Normal, material.normal_texture),
    ];
    let textures = slots
        .into_iter()
        .filter_map(|(kind, file)| {
            file.filter(|f| !f.trim().is_empty())
                .map(|file| MaterialTexture {
                    kind,
                    source: TextureSource::File(PathBuf::from(file.trim())),
                })
        })
        .collect();
    SceneMaterial {
        name: material.name,
        textures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_quad_is_kept_as_polygon() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quad.obj");
        fs::write(
            &path,
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
        )
        .unwrap();

        let scene = ObjImporter.import(&path).unwrap();
        assert_eq!(scene.meshes.len(), 1);
        assert_eq!(scene.meshes[0].faces.len(), 1);
        assert_eq!(scene.meshes[0].faces[0].indices.len(), 4);
        assert!(scene.meshes[0].normals.is_none());
        assert!(!scene.incomplete);
    }

    #[test]
    fn test_missing_material_library_keeps_geometry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.obj");
        fs::write(
            &path,
            "mtllib missing.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
        )
        .unwrap();

        let scene = ObjImporter.import(&path).unwrap();
        assert_eq!(scene.meshes.len(), 1);
        assert!(scene.materials.is_empty());
    }

    #[test]
    fn test_material_textures_in_slot_order() {
        let material = tobj::Material {
            name: "m".into(),
            normal_texture: Some("n.png".into()),
            diffuse_texture: Some("d.png".into()),
            specular_texture: Some(" ".into()),
            ..Default::default()
        };
        let converted = convert_material(material);
        let kinds: Vec<_> = converted.textures.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TextureKind::Diffuse, TextureKind::Normal]);
    }
}
