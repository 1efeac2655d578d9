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

//! The engine configuration file.
//!
//! A single RON document with one section per subsystem. Every field is
//! optional and falls back to its default:
//!
//! ```ron
//! (
//!     render: (depth_test: true, polygon_mode: line),
//!     import: (post_process: "TRIANGULATE | FLIP_UVS"),
//!     log: (default_filter: "debug"),
//! )
//! ```

use lumen_core::renderer::api::RenderSettings;
use lumen_io::ImportSettings;
use lumen_telemetry::LogSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading or writing an [`EngineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config '{}': {source}", path.display())]
    Io {
        /// The config file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid RON for this schema.
    #[error("Invalid config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// The config could not be serialized.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),
}

/// Settings of every subsystem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Global pipeline state.
    pub render: RenderSettings,
    /// Scene import options.
    pub import: ImportSettings,
    /// Logger setup.
    pub log: LogSettings,
}

impl EngineConfig {
    /// Parses a RON document.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(source)?)
    }

    /// Reads and parses the file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron_str(&source)?;
        log::debug!("Loaded config from '{}'", path.display());
        Ok(config)
    }

    /// Serializes to pretty-printed RON.
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }
}
