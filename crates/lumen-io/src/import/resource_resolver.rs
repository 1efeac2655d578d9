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

//! Resolution of the external resources a scene file points at.

use super::ImportError;
use base64::Engine;
use std::path::{Path, PathBuf};

/// Resolves a URI found inside a scene file to its bytes.
pub trait ResourceResolver {
    /// Resolves an external buffer URI to its binary data.
    fn resolve_buffer(&self, uri: &str) -> Result<Vec<u8>, ImportError>;
}

/// Resolves resources from the local filesystem relative to a base path.
#[derive(Debug, Clone)]
pub struct FileSystemResolver {
    base_path: PathBuf,
}

impl FileSystemResolver {
    /// Creates a new `FileSystemResolver` with a specified base path.
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// The directory relative URIs are joined to.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl ResourceResolver for FileSystemResolver {
    fn resolve_buffer(&self, uri: &str) -> Result<Vec<u8>, ImportError> {
        if uri.starts_with("data:") {
            return decode_data_uri(uri);
        }
        let path = self.base_path.join(uri_to_path(uri)?);
        std::fs::read(&path).map_err(|e| {
            ImportError::Resolve(format!(
                "Failed to read external buffer from '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

/// Turns a relative URI into a path, undoing its percent-encoding.
pub fn uri_to_path(uri: &str) -> Result<PathBuf, ImportError> {
    urlencoding::decode(uri)
        .map(|decoded| PathBuf::from(decoded.as_ref()))
        .map_err(|e| ImportError::Resolve(format!("Invalid percent-encoding in '{}': {}", uri, e)))
}

/// Decodes a base64 `data:` URI, whatever its media type.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, ImportError> {
    let unsupported = || ImportError::Resolve(format!("Unsupported data URI: {:.48}", uri));
    let rest = uri.strip_prefix("data:").ok_or_else(unsupported)?;
    let (header, payload) = rest.split_once(',').ok_or_else(unsupported)?;
    if !header.ends_with(";base64") {
        return Err(unsupported());
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| ImportError::Resolve(format!("Invalid base64 payload: {}", e)))
}
