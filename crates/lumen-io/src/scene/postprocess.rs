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

//! Clean-up steps run over a freshly imported [`Scene`].

use super::{Face, Scene, SceneMesh};
use ahash::AHashMap;
use bitflags::bitflags;
use lumen_core::math::Vec3;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Selects the post-processing steps applied after import.
    ///
    /// Steps always run in declaration order, whatever the order the flags
    /// were combined in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct PostProcess: u32 {
        /// Splits every polygon with more than three corners into a fan of triangles.
        const TRIANGULATE = 1 << 0;
        /// Replaces every texture coordinate `v` with `1 - v`.
        const FLIP_UVS = 1 << 1;
        /// Computes per-vertex normals for meshes that have none.
        const GEN_SMOOTH_NORMALS = 1 << 2;
        /// Merges vertices whose attributes are bitwise identical.
        const JOIN_IDENTICAL_VERTICES = 1 << 3;
    }
}

impl Default for PostProcess {
    fn default() -> Self {
        Self::all()
    }
}

impl PostProcess {
    /// Runs the selected steps over every mesh of `scene`.
    pub fn apply(self, scene: &mut Scene) {
        if self.is_empty() {
            return;
        }
        for mesh in &mut scene.meshes {
            self.apply_to_mesh(mesh);
        }
    }

    /// Runs the selected steps over one mesh.
    pub fn apply_to_mesh(self, mesh: &mut SceneMesh) {
        if self.contains(Self::TRIANGULATE) {
            triangulate(mesh);
        }
        if self.contains(Self::FLIP_UVS) {
            flip_uvs(mesh);
        }
        if self.contains(Self::GEN_SMOOTH_NORMALS) {
            generate_smooth_normals(mesh);
        }
        if self.contains(Self::JOIN_IDENTICAL_VERTICES) {
            join_identical_vertices(mesh);
        }
    }
}

/// Fan-triangulates polygons and drops faces that cannot form a triangle.
///
/// Triangles are kept as they are. A polygon `[a, b, c, d, ...]` becomes
/// `[a, b, c]`, `[a, c, d]`, and so on, which is exact for convex polygons.
pub fn triangulate(mesh: &mut SceneMesh) {
    if mesh.faces.iter().all(|f| f.indices.len() == 3) {
        return;
    }

    let mut dropped = 0usize;
    let mut faces = Vec::with_capacity(mesh.faces.len());
    for face in mesh.faces.drain(..) {
        match face.indices.len() {
            0..=2 => dropped += 1,
            3 => faces.push(face),
            _ => {
                let first = face.indices[0];
                faces.extend(
                    face.indices[1..]
                        .windows(2)
                        .map(|pair| Face::triangle(first, pair[0], pair[1])),
                );
            }
        }
    }
    if dropped > 0 {
        log::warn!(
            "Mesh '{}': dropped {} point/line primitive(s) during triangulation",
            mesh.name,
            dropped
        );
    }
    mesh.faces = faces;
}

/// Flips the `v` texture coordinate of every vertex.
pub fn flip_uvs(mesh: &mut SceneMesh) {
    if let Some(tex_coords) = mesh.tex_coords.as_mut() {
        for uv in tex_coords.iter_mut() {
            uv[1] = 1.0 - uv[1];
        }
    }
}

fn position_key(p: [f32; 3]) -> [u32; 3] {
    // Normalizes -0.0 so both zeros land in the same bucket.
    p.map(|c| (c + 0.0).to_bits())
}

/// Generates area-weighted smooth normals for a mesh without normals.
///
/// Face normals are accumulated on every vertex sharing the same position,
/// so split vertices along a UV seam still get one continuous normal.
/// Meshes that already carry normals are left untouched.
pub fn generate_smooth_normals(mesh: &mut SceneMesh) {
    if mesh.normals.is_some() {
        return;
    }

    let mut accumulated: AHashMap<[u32; 3], Vec3> = AHashMap::new();
    for face in mesh.faces.iter().filter(|f| f.indices.len() >= 3) {
        let corner = |i: usize| {
            mesh.positions
                .get(face.indices[i] as usize)
                .copied()
                .map(Vec3::from)
        };
        let (Some(a), Some(b), Some(c)) = (corner(0), corner(1), corner(2)) else {
            continue;
        };
        // Unnormalized: the cross product length weights by face area.
        let face_normal = (b - a).cross(c - a);
        for &index in &face.indices {
            if let Some(&p) = mesh.positions.get(index as usize) {
                *accumulated.entry(position_key(p)).or_insert(Vec3::ZERO) += face_normal;
            }
        }
    }

    let normals = mesh
        .positions
        .iter()
        .map(|&p| {
            accumulated
                .get(&position_key(p))
                .map(|n| n.normalize_or_zero().to_array())
                .unwrap_or([0.0; 3])
        })
        .collect();
    mesh.normals = Some(normals);
}

/// Merges vertices with bitwise-identical attributes and remaps the faces.
///
/// The first occurrence of every distinct vertex keeps its relative order.
pub fn join_identical_vertices(mesh: &mut SceneMesh) {
    type Key = ([u32; 3], Option<[u32; 3]>, Option<[u32; 2]>);

    let count = mesh.positions.len();
    let mut seen: AHashMap<Key, u32> = AHashMap::with_capacity(count);
    let mut remap = Vec::with_capacity(count);
    let mut kept = Vec::with_capacity(count);

    for i in 0..count {
        let key: Key = (
            mesh.positions[i].map(f32::to_bits),
            mesh.normals
                .as_ref()
                .and_then(|n| n.get(i))
                .map(|n| n.map(f32::to_bits)),
            mesh.tex_coords
                .as_ref()
                .and_then(|t| t.get(i))
                .map(|t| t.map(f32::to_bits)),
        );
        let next = kept.len() as u32;
        let target = *seen.entry(key).or_insert_with(|| {
            kept.push(i);
            next
        });
        remap.push(target);
    }

    if kept.len() == count {
        return;
    }

    log::trace!(
        "Mesh '{}': joined {} vertices into {}",
        mesh.name,
        count,
        kept.len()
    );

    mesh.positions = kept.iter().map(|&i| mesh.positions[i]).collect();
    if let Some(normals) = mesh.normals.as_mut() {
        *normals = kept.iter().filter_map(|&i| normals.get(i).copied()).collect();
    }
    if let Some(tex_coords) = mesh.tex_coords.as_mut() {
        *tex_coords = kept
            .iter()
            .filter_map(|&i| tex_coords.get(i).copied())
            .collect();
    }
    for face in &mut mesh.faces {
        for index in &mut face.indices {
            if let Some(&new_index) = remap.get(*index as usize) {
                *index = new_index;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> SceneMesh {
        SceneMesh {
            name: "quad".into(),
            positions: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            normals: None,
            tex_coords: Some(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]),
            faces: vec![Face {
                indices: vec![0, 1, 2, 3],
            }],
            material: None,
        }
    }

    #[test]
    fn test_default_enables_every_step() {
        assert_eq!(PostProcess::default(), PostProcess::all());
    }

    #[test]
    fn test_triangulate_builds_a_fan() {
        let mut mesh = quad();
        triangulate(&mut mesh);
        assert_eq!(
            mesh.faces,
            vec![Face::triangle(0, 1, 2), Face::triangle(0, 2, 3)]
        );
    }

    #[test]
    fn test_triangulate_drops_points_and_lines() {
        let mut mesh = quad();
        mesh.faces.push(Face { indices: vec![0, 1] });
        mesh.faces.push(Face { indices: vec![2] });
        triangulate(&mut mesh);
        assert_eq!(mesh.faces.len(), 2);
        assert!(mesh.faces.iter().all(|f| f.indices.len() == 3));
    }

    #[test]
    fn test_flip_uvs_inverts_v() {
        let mut mesh = quad();
        flip_uvs(&mut mesh);
        let uvs = mesh.tex_coords.unwrap();
        assert_eq!(uvs[0], [0.0, 1.0]);
        assert_eq!(uvs[2], [1.0, 0.0]);
    }

    #[test]
    fn test_smooth_normals_of_flat_quad_point_up() {
        let mut mesh = quad();
        triangulate(&mut mesh);
        generate_smooth_normals(&mut mesh);
        for n in mesh.normals.unwrap() {
            assert_eq!(n, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_smooth_normals_keep_existing_normals() {
        let mut mesh = quad();
        mesh.normals = Some(vec![[1.0, 0.0, 0.0]; 4]);
        triangulate(&mut mesh);
        generate_smooth_normals(&mut mesh);
        assert_eq!(mesh.normals.unwrap()[0], [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_smooth_normals_average_across_split_vertices() {
        // Two triangles folded at a right angle along the x axis, with the
        // shared edge duplicated as separate vertices.
        let mut mesh = SceneMesh {
            positions: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0],
                [0.0, 0.0, 1.0],
                [1.0, 0.0, 0.0],
            ],
            faces: vec![Face::triangle(0, 1, 2), Face::triangle(3, 4, 5)],
            ..Default::default()
        };
        generate_smooth_normals(&mut mesh);
        let normals = mesh.normals.unwrap();
        assert_eq!(normals[0], normals[3]);
        let n = Vec3::from(normals[0]);
        assert!((n.length() - 1.0).abs() < 1e-6);
        assert!((n.z - n.y).abs() < 1e-6);
    }

    #[test]
    fn test_join_identical_vertices_remaps_faces() {
        let mut mesh = SceneMesh {
            positions: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            faces: vec![Face::triangle(0, 1, 2), Face::triangle(3, 4, 5)],
            ..Default::default()
        };
        join_identical_vertices(&mut mesh);
        assert_eq!(mesh.positions.len(), 4);
        assert_eq!(
            mesh.faces,
            vec![Face::triangle(0, 1, 2), Face::triangle(1, 3, 2)]
        );
    }

    #[test]
    fn test_join_keeps_vertices_with_distinct_uvs() {
        let mut mesh = SceneMesh {
            positions: vec![[0.0; 3], [0.0; 3], [1.0, 0.0, 0.0]],
            tex_coords: Some(vec![[0.0, 0.0], [0.5, 0.5], [1.0, 0.0]]),
            faces: vec![Face::triangle(0, 1, 2)],
            ..Default::default()
        };
        join_identical_vertices(&mut mesh);
        assert_eq!(mesh.positions.len(), 3);
    }

    #[test]
    fn test_apply_runs_selected_steps_only() {
        let mut scene = Scene {
            meshes: vec![quad()],
            ..Default::default()
        };
        PostProcess::TRIANGULATE.apply(&mut scene);
        assert_eq!(scene.meshes[0].faces.len(), 2);
        assert!(scene.meshes[0].normals.is_none());
        assert_eq!(scene.meshes[0].tex_coords.as_ref().unwrap()[0], [0.0, 0.0]);
    }

    #[test]
    fn test_flags_roundtrip_through_ron() {
        let flags = PostProcess::TRIANGULATE | PostProcess::FLIP_UVS;
        let text = ron::to_string(&flags).unwrap();
        let back: PostProcess = ron::from_str(&text).unwrap();
        assert_eq!(back, flags);
    }
}
