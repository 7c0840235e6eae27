use std::path::PathBuf;

/// Errors surfaced by `nsresolve` subcommands.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// A source or config file could not be read.
    #[error("error reading file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// `nsresolve.toml` exists but is not valid.
    #[error("could not parse '{}': {message}", .path.display())]
    Config { path: PathBuf, message: String },

    /// `--offset` / `--line` / `--column` point outside the file.
    #[error("invalid position: {0}")]
    Position(String),

    #[error("cannot determine working directory: {0}")]
    WorkingDir(std::io::Error),
}
