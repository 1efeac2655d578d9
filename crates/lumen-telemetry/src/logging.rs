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

//! Global logger setup over `env_logger`.
//!
//! `RUST_LOG`, when set, replaces [`LogSettings::default_filter`]. Per-module
//! overrides are applied afterwards and always win.

use env_logger::{Builder, Env};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while installing the global logger.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// A module override names a level `log` does not know.
    #[error("invalid log level '{level}' for module '{module}'")]
    InvalidLevel {
        /// The module the override targets.
        module: String,
        /// The rejected level name.
        level: String,
    },
    /// Another logger was installed first.
    #[error("a global logger is already installed")]
    AlreadyInitialized(#[from] log::SetLoggerError),
}

/// Logger configuration, usually read from the `log` section of the engine config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Filter used when `RUST_LOG` is not set, in `env_logger` syntax
    /// (`"info"`, `"warn,lumen_io=debug"`).
    pub default_filter: String,
    /// `(module, level)` pairs applied on top of the filter.
    pub module_filters: Vec<(String, String)>,
    /// Whether records are prefixed with a timestamp.
    pub timestamps: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            default_filter: "info".to_string(),
            module_filters: Vec::new(),
            timestamps: true,
        }
    }
}

impl LogSettings {
    /// Parses the module overrides.
    pub fn module_levels(&self) -> Result<Vec<(String, LevelFilter)>, LoggingError> {
        self.module_filters
            .iter()
            .map(|(module, level)| {
                level
                    .trim()
                    .parse::<LevelFilter>()
                    .map(|filter| (module.clone(), filter))
                    .map_err(|_| LoggingError::InvalidLevel {
                        module: module.clone(),
                        level: level.clone(),
                    })
            })
            .collect()
    }

    /// Builds a configured, not yet installed, logger builder.
    pub fn builder(&self) -> Result<Builder, LoggingError> {
        let mut builder =
            Builder::from_env(Env::default().default_filter_or(self.default_filter.as_str()));
        for (module, level) in self.module_levels()? {
            builder.filter_module(&module, level);
        }
        if !self.timestamps {
            builder.format_timestamp(None);
        }
        Ok(builder)
    }
}

/// Installs the global logger described by `settings`.
///
/// # Errors
/// Fails on an unknown module level, or when a logger is already installed.
pub fn init(settings: &LogSettings) -> Result<(), LoggingError> {
    settings.builder()?.try_init()?;
    log::debug!(
        "Logger initialised (default filter '{}', {} module override(s))",
        settings.default_filter,
        settings.module_filters.len()
    );
    Ok(())
}

/// Routes log output through the test harness. Safe to call from every test.
pub fn init_for_tests() {
    let _ = Builder::from_env(Env::default().default_filter_or("debug"))
        .is_test(true)
        .try_init();
}
