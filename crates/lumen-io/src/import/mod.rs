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

//! Scene importers and the format dispatch in front of them.

mod gltf_importer;
mod obj_importer;
mod resource_resolver;

pub use gltf_importer::*;
pub use obj_importer::*;
pub use resource_resolver::*;

use crate::scene::{PostProcess, Scene};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while importing a scene.
#[derive(Debug, Error)]
pub enum ImportError {
    /// No importer handles the file extension.
    #[error("Unsupported scene format: '{0}'")]
    UnsupportedFormat(String),
    /// The file could not be read.
    #[error("Failed to read '{path}': {source}")]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The glTF document could not be parsed.
    #[error("Failed to parse glTF: {0}")]
    Gltf(#[from] gltf::Error),
    /// The OBJ file could not be parsed.
    #[error("Failed to parse OBJ: {0}")]
    Obj(#[from] tobj::LoadError),
    /// A resource referenced by the file could not be resolved.
    #[error("Failed to resolve resource: {0}")]
    Resolve(String),
    /// The file parsed but its content is inconsistent.
    #[error("Malformed scene: {0}")]
    Malformed(String),
}

/// Options of one import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// Steps run over the scene once it is parsed.
    pub post_process: PostProcess,
}

/// Parses one family of scene files.
pub trait SceneImporter {
    /// Lower-case file extensions this importer accepts, without the dot.
    fn extensions(&self) -> &'static [&'static str];

    /// Parses the file at `path` into a scene, without post-processing.
    ///
    /// Relative resources are resolved against the file's directory.
    fn import(&self, path: &Path) -> Result<Scene, ImportError>;

    /// Returns `true` if the importer accepts the extension of `path`.
    fn can_import(&self, path: &Path) -> bool {
        extension_of(path).is_some_and(|ext| self.extensions().contains(&ext.as_str()))
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

/// Imports the scene at `path` and runs the selected post-processing steps.
///
/// The importer is chosen from the file extension (`gltf`, `glb`, `obj`).
///
/// ## Errors
/// * `ImportError::UnsupportedFormat` - If no importer handles the extension.
/// * `ImportError::Io` - If the file cannot be read.
/// * Any parse or resolve error reported by the importer.
pub fn import_scene(path: &Path, post_process: PostProcess) -> Result<Scene, ImportError> {
    let importers: [&dyn SceneImporter; 2] = [&GltfImporter, &ObjImporter];
    let importer = importers
        .into_iter()
        .find(|importer| importer.can_import(path))
        .ok_or_else(|| {
            ImportError::UnsupportedFormat(extension_of(path).unwrap_or_default())
        })?;

    std::fs::metadata(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut scene = importer.import(path)?;
    post_process.apply(&mut scene);

    log::debug!(
        "Imported '{}': {} mesh(es), {} material(s)",
        path.display(),
        scene.meshes.len(),
        scene.materials.len()
    );
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_extension_is_unsupported() {
        let err = import_scene(Path::new("model.fbx"), PostProcess::empty()).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat(ext) if ext == "fbx"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = import_scene(Path::new("/nonexistent/model.obj"), PostProcess::empty())
            .unwrap_err();
        assert!(matches!(err, ImportError::Io { .. }));
    }

    #[test]
    fn test_extension_match_ignores_case() {
        assert!(GltfImporter.can_import(Path::new("a/B.GLB")));
        assert!(ObjImporter.can_import(Path::new("a/b.Obj")));
        assert!(!ObjImporter.can_import(Path::new("a/b")));
    }

    #[test]
    fn test_settings_default_from_empty_ron() {
        let settings: ImportSettings = ron::from_str("()").unwrap();
        assert_eq!(settings.post_process, PostProcess::all());
    }
}
