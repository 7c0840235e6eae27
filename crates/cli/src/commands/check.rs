use std::path::{Path, PathBuf};

use nsresolve_core::{is_prefix, ns_declarations, ns_to_path, resolve_ns_name, Document};
use serde::Serialize;

use crate::commands::{read_source, Settings};
use crate::error::CliError;
use crate::OutputFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Ok,
    Mismatch,
    Missing,
}

#[derive(Debug, Serialize)]
struct FileCheck {
    file: PathBuf,
    status: CheckStatus,
    /// Name derived from the file's location
    expected: String,
    /// First `ns`/`in-ns` name in the file
    declared: Option<String>,
    line: Option<u32>,
    /// Where the declared namespace would be found under a source root
    suggested_path: Option<PathBuf>,
}

#[derive(Serialize)]
struct CheckReport<'a> {
    files: &'a [FileCheck],
    mismatches: usize,
    missing: usize,
}

/// Compare each file's first namespace declaration with the name its path
/// implies. Directories are walked for files with a configured extension.
pub(crate) fn cmd_check(
    paths: &[PathBuf],
    settings: &Settings,
    output: OutputFormat,
    quiet: bool,
) -> Result<bool, CliError> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            collect_files(path, &settings.extensions, &mut files)?;
        } else {
            files.push(path.clone());
        }
    }
    log::debug!("checking {} file(s)", files.len());

    let mut results = Vec::with_capacity(files.len());
    for file in &files {
        results.push(check_file(file, settings)?);
    }

    let mismatches = count(&results, CheckStatus::Mismatch);
    let missing = count(&results, CheckStatus::Missing);

    if !quiet {
        match output {
            OutputFormat::Json => {
                let report = CheckReport {
                    files: &results,
                    mismatches,
                    missing,
                };
                let json = serde_json::to_string_pretty(&report)
                    .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
                println!("{}", json);
            }
            OutputFormat::Text => {
                for result in &results {
                    print_result(result);
                }
                println!(
                    "checked {} file(s): {} mismatch(es), {} missing declaration(s)",
                    results.len(),
                    mismatches,
                    missing
                );
            }
        }
    }

    Ok(mismatches == 0 && missing == 0)
}

fn check_file(file: &Path, settings: &Settings) -> Result<FileCheck, CliError> {
    let doc = Document::new(read_source(file)?);
    let expected = resolve_ns_name(&settings.source_roots, file);
    let first = ns_declarations(&doc).into_iter().next();

    let Some(decl) = first else {
        return Ok(FileCheck {
            file: file.to_path_buf(),
            status: CheckStatus::Missing,
            expected,
            declared: None,
            line: None,
            suggested_path: None,
        });
    };

    let status = if decl.name == expected {
        CheckStatus::Ok
    } else {
        CheckStatus::Mismatch
    };
    let suggested_path = (status == CheckStatus::Mismatch).then(|| {
        let ext = file.extension().and_then(|e| e.to_str()).unwrap_or("");
        let rel = ns_to_path(&decl.name, ext);
        match settings.source_roots.iter().find(|root| is_prefix(root, file)) {
            Some(root) => root.join(rel),
            None => rel,
        }
    });

    Ok(FileCheck {
        file: file.to_path_buf(),
        status,
        expected,
        declared: Some(decl.name),
        line: Some(decl.line),
        suggested_path,
    })
}

fn print_result(result: &FileCheck) {
    match (result.status, &result.declared) {
        (CheckStatus::Ok, _) => {}
        (CheckStatus::Missing, _) => {
            println!(
                "{}: no namespace declaration (expected {})",
                result.file.display(),
                result.expected
            );
        }
        (CheckStatus::Mismatch, Some(declared)) => {
            println!(
                "{}:{}: declares {} but its path implies {}",
                result.file.display(),
                result.line.unwrap_or(1),
                declared,
                result.expected
            );
            if let Some(ref suggested) = result.suggested_path {
                println!("  {} would be expected at {}", declared, suggested.display());
            }
        }
        (CheckStatus::Mismatch, None) => {}
    }
}

fn count(results: &[FileCheck], status: CheckStatus) -> usize {
    results.iter().filter(|r| r.status == status).count()
}

/// Collect files under `dir` whose extension is one of `extensions`,
/// skipping hidden directories. Results are sorted per directory.
fn collect_files(
    dir: &Path,
    extensions: &[String],
    files: &mut Vec<PathBuf>,
) -> Result<(), CliError> {
    let read_dir = std::fs::read_dir(dir).map_err(|e| CliError::Read {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut entries: Vec<PathBuf> = read_dir.filter_map(|e| e.ok()).map(|e| e.path()).collect();
    entries.sort();

    for path in entries {
        if path.is_dir() {
            let hidden = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with('.'));
            if !hidden {
                collect_files(&path, extensions, files)?;
            }
        } else {
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if extensions.iter().any(|e| e == ext) {
                files.push(path);
            }
        }
    }
    Ok(())
}
