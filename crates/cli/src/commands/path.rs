use std::path::{Path, PathBuf};

use nsresolve_core::{is_prefix, resolve_ns_name};
use serde::Serialize;

use crate::commands::Settings;
use crate::OutputFormat;

#[derive(Serialize)]
struct PathReport<'a> {
    file: &'a Path,
    namespace: &'a str,
    /// Root the name was derived against; `null` for the file-name fallback
    source_root: Option<&'a PathBuf>,
}

/// Print the namespace name implied by `file`'s location. The file does not
/// need to exist.
pub(crate) fn cmd_path(file: &Path, settings: &Settings, output: OutputFormat) {
    let namespace = resolve_ns_name(&settings.source_roots, file);
    let source_root = settings
        .source_roots
        .iter()
        .find(|root| is_prefix(root, file));
    if source_root.is_none() {
        log::info!(
            "{} is outside every source root, using its file name",
            file.display()
        );
    }

    match output {
        OutputFormat::Json => {
            let report = PathReport {
                file,
                namespace: &namespace,
                source_root,
            };
            let json = serde_json::to_string_pretty(&report)
                .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
            println!("{}", json);
        }
        OutputFormat::Text => println!("{}", namespace),
    }
}
