//! Logger configuration and its JSON loading

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::handler::HandlerConfig;

/// Configuration of a `Logger`, also its serialized form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggerConfig {
    #[serde(default)]
    pub name: Option<String>,
    /// Reference folder, created if missing; relative file sinks live here
    #[serde(default = "default_folder")]
    pub folder: PathBuf,
    /// Minimum and default level; negative values are clamped to 0
    #[serde(default = "default_level")]
    pub level: i64,
    #[serde(default = "default_handlers")]
    pub handlers: Vec<HandlerConfig>,
}

fn default_folder() -> PathBuf {
    PathBuf::from(".")
}

fn default_level() -> i64 {
    1
}

fn default_handlers() -> Vec<HandlerConfig> {
    vec![HandlerConfig::stream()]
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            name: None,
            folder: default_folder(),
            level: default_level(),
            handlers: default_handlers(),
        }
    }
}

impl LoggerConfig {
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn in_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.folder = folder.into();
        self
    }

    pub fn with_level(mut self, level: i64) -> Self {
        self.level = level;
        self
    }

    pub fn with_handlers(mut self, handlers: Vec<HandlerConfig>) -> Self {
        self.handlers = handlers;
        self
    }

    /// Parse a JSON configuration
    pub fn from_json_str(content: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a JSON configuration file
    pub fn load_from_path(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read logger config file: {}", path.display()))?;
        let config = Self::from_json_str(&content)
            .with_context(|| format!("Invalid logger config file: {}", path.display()))?;
        Ok(config)
    }
}
