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

//! Error types reported by graphics devices and layout construction.

use crate::renderer::api::shader::ShaderStage;
use std::fmt;

/// An error that occurred while compiling or linking a shader program.
#[derive(Debug)]
pub enum ShaderError {
    /// The shader source could not be read from disk.
    LoadError {
        /// The path of the file that failed to load.
        path: String,
        /// The underlying I/O error, rendered as text.
        source_error: String,
    },
    /// One stage failed to compile.
    CompilationError {
        /// The stage that failed.
        stage: ShaderStage,
        /// The driver's info log.
        details: String,
    },
    /// The compiled stages failed to link into a program.
    LinkError {
        /// The driver's info log.
        details: String,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::LoadError { path, source_error } => {
                write!(
                    f,
                    "Failed to load shader source from '{path}': {source_error}"
                )
            }
            ShaderError::CompilationError { stage, details } => {
                write!(f, "{stage:?} shader compilation failed: {details}")
            }
            ShaderError::LinkError { details } => {
                write!(f, "Shader program linking failed: {details}")
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// An error related to the creation or use of a GPU resource.
#[derive(Debug)]
pub enum ResourceError {
    /// A shader-specific error occurred.
    Shader(ShaderError),
    /// The handle used to reference a resource is the sentinel or unknown to the device.
    InvalidHandle,
    /// The driver refused to allocate a new object.
    AllocationFailed(String),
    /// The upload does not match the declared dimensions or format.
    InvalidUpload(String),
    /// An error originating from the specific graphics backend implementation.
    BackendError(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::Shader(err) => write!(f, "Shader resource error: {err}"),
            ResourceError::InvalidHandle => write!(f, "Invalid resource handle or ID."),
            ResourceError::AllocationFailed(msg) => {
                write!(f, "Failed to allocate GPU object: {msg}")
            }
            ResourceError::InvalidUpload(msg) => write!(f, "Invalid upload: {msg}"),
            ResourceError::BackendError(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Shader(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShaderError> for ResourceError {
    fn from(err: ShaderError) -> Self {
        ResourceError::Shader(err)
    }
}

/// An error raised while declaring a [`BufferLayout`](crate::renderer::api::layout::BufferLayout).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The attribute type name is not one of the known shader data types.
    UnknownType(String),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::UnknownType(name) => {
                write!(f, "Unknown shader data type '{name}' in buffer layout")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_shader_error_is_resource_error_source() {
        let err: ResourceError = ShaderError::LinkError {
            details: "missing main".to_string(),
        }
        .into();
        assert!(err.to_string().contains("missing main"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_layout_error_display() {
        let err = LayoutError::UnknownType("float5".to_string());
        assert_eq!(
            err.to_string(),
            "Unknown shader data type 'float5' in buffer layout"
        );
    }
}
