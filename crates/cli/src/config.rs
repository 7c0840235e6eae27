//! Project configuration file `nsresolve.toml`.
//!
//! ```toml
//! source_paths = ["src", "test"]
//! extensions = ["clj", "cljs", "cljc"]
//! ```
//!
//! Relative source paths are resolved against the directory holding the
//! config file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::CliError;

pub const CONFIG_FILE_NAME: &str = "nsresolve.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(default)]
    pub source_paths: Vec<PathBuf>,
    /// File extensions `check` picks up when walking directories
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_extensions() -> Vec<String> {
    ["clj", "cljs", "cljc", "edn"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            source_paths: Vec::new(),
            extensions: default_extensions(),
        }
    }
}

/// A config together with the directory its relative paths hang off.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    /// The file it came from, if any
    pub path: Option<PathBuf>,
    pub config: ProjectConfig,
}

impl LoadedConfig {
    /// Source roots as absolute paths.
    pub fn source_roots(&self) -> Vec<PathBuf> {
        let base = self
            .path
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or(Path::new(""));
        self.config
            .source_paths
            .iter()
            .map(|p| nsresolve_core::normalize_path(&base.join(p)))
            .collect()
    }
}

/// Parse a config file.
pub fn load(path: &Path) -> Result<LoadedConfig, CliError> {
    let content = std::fs::read_to_string(path).map_err(|e| CliError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let config: ProjectConfig = toml::from_str(&content).map_err(|e| CliError::Config {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })?;
    log::debug!(
        "loaded {} with {} source path(s)",
        path.display(),
        config.source_paths.len()
    );
    Ok(LoadedConfig {
        path: Some(path.to_path_buf()),
        config,
    })
}

/// Find the nearest `nsresolve.toml` in `start` or one of its ancestors.
/// No file anywhere means default settings.
pub fn discover(start: &Path) -> Result<LoadedConfig, CliError> {
    for dir in start.ancestors() {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return load(&candidate);
        }
    }
    log::debug!("no {} above {}", CONFIG_FILE_NAME, start.display());
    Ok(LoadedConfig::default())
}
