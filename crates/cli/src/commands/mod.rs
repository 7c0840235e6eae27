pub(crate) mod at;
pub(crate) mod check;
pub(crate) mod path;

use std::path::{Path, PathBuf};

use nsresolve_core::normalize_path;

use crate::config;
use crate::error::CliError;

/// Source roots and file extensions after merging command-line flags with
/// `nsresolve.toml`.
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub source_roots: Vec<PathBuf>,
    pub extensions: Vec<String>,
}

impl Settings {
    /// `--source-path` flags win over the config file's `source_paths`.
    /// Without `--config`, the config is searched for upwards from `start`.
    pub fn resolve(
        config_path: Option<&Path>,
        cli_roots: &[PathBuf],
        start: &Path,
    ) -> Result<Self, CliError> {
        let loaded = match config_path {
            Some(path) => config::load(&absolutize(path)?)?,
            None => config::discover(start)?,
        };

        let source_roots = if cli_roots.is_empty() {
            loaded.source_roots()
        } else {
            cli_roots
                .iter()
                .map(|p| absolutize(p))
                .collect::<Result<Vec<_>, _>>()?
        };
        log::debug!("source roots: {:?}", source_roots);

        Ok(Self {
            source_roots,
            extensions: loaded.config.extensions,
        })
    }
}

/// Anchor `path` at the working directory and drop `.`/`..` components.
pub(crate) fn absolutize(path: &Path) -> Result<PathBuf, CliError> {
    if path.is_absolute() {
        return Ok(normalize_path(path));
    }
    let cwd = std::env::current_dir().map_err(CliError::WorkingDir)?;
    Ok(normalize_path(&cwd.join(path)))
}

/// Directory config discovery starts from for `path`.
pub(crate) fn search_start(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.to_path_buf()
    } else {
        path.parent().map(Path::to_path_buf).unwrap_or_default()
    }
}

pub(crate) fn read_source(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|e| CliError::Read {
        path: path.to_path_buf(),
        source: e,
    })
}
