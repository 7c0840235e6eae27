mod commands;
mod config;
mod error;
mod logging;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;

use crate::commands::at::Position;
use crate::commands::{absolutize, search_start, Settings};
use crate::error::CliError;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Namespace resolution for Clojure source files.
#[derive(Parser)]
#[command(
    name = "nsresolve",
    version,
    about = "Namespace resolution for Clojure source files"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, env = "NSRESOLVE_LOG", default_value = "warn")]
    log_level: LevelFilter,

    /// Config file to use instead of searching for nsresolve.toml
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the namespace in effect at a position in a source file
    At {
        /// Path to the source file
        file: PathBuf,
        /// Byte offset (defaults to end of file)
        #[arg(long, conflicts_with_all = ["line", "column"])]
        offset: Option<usize>,
        /// 1-based line number
        #[arg(long, requires = "column")]
        line: Option<u32>,
        /// 1-based column, in characters
        #[arg(long, requires = "line")]
        column: Option<u32>,
    },

    /// Print the namespace name implied by a file's path
    Path {
        /// Path to the source file (need not exist)
        file: PathBuf,
        /// Source root; repeatable, overrides source_paths from the config
        #[arg(long = "source-path", value_name = "DIR")]
        source_paths: Vec<PathBuf>,
    },

    /// Check that files declare the namespace their path implies
    Check {
        /// Files or directories to check
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Source root; repeatable, overrides source_paths from the config
        #[arg(long = "source-path", value_name = "DIR")]
        source_paths: Vec<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.log_level) {
        eprintln!("warning: could not install logger: {}", e);
    }

    let result = run(cli.command, cli.config, cli.output, cli.quiet);
    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            report_error(&e.to_string(), cli.output, cli.quiet);
            process::exit(1);
        }
    }
}

/// Dispatch a subcommand. `Ok(false)` means the command ran but the answer
/// is a failure (no namespace, mismatched files).
fn run(
    command: Commands,
    config: Option<PathBuf>,
    output: OutputFormat,
    quiet: bool,
) -> Result<bool, CliError> {
    match command {
        Commands::At {
            file,
            offset,
            line,
            column,
        } => {
            let position = match (offset, line, column) {
                (Some(offset), _, _) => Position::Offset(offset),
                (None, Some(line), Some(column)) => Position::LineColumn(line, column),
                _ => Position::End,
            };
            commands::at::cmd_at(&file, position, output, quiet)
        }
        Commands::Path { file, source_paths } => {
            let file = absolutize(&file)?;
            let start = search_start(&file);
            let settings = Settings::resolve(config.as_deref(), &source_paths, &start)?;
            commands::path::cmd_path(&file, &settings, output);
            Ok(true)
        }
        Commands::Check {
            paths,
            source_paths,
        } => {
            let paths = paths
                .iter()
                .map(|p| absolutize(p))
                .collect::<Result<Vec<_>, _>>()?;
            let start = paths.first().map(|p| search_start(p)).unwrap_or_default();
            let settings = Settings::resolve(config.as_deref(), &source_paths, &start)?;
            commands::check::cmd_check(&paths, &settings, output, quiet)
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
