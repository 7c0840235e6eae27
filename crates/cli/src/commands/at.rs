use std::path::Path;

use nsresolve_core::{find_ns_declaration, Document, NsDeclaration};
use serde::Serialize;

use crate::commands::read_source;
use crate::error::CliError;
use crate::OutputFormat;

/// Where in the file to resolve.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Position {
    End,
    Offset(usize),
    /// 1-based line and column
    LineColumn(u32, u32),
}

impl Position {
    fn to_offset(self, doc: &Document) -> Result<usize, CliError> {
        match self {
            Position::End => Ok(doc.len()),
            Position::Offset(offset) if offset <= doc.len() => Ok(offset),
            Position::Offset(offset) => Err(CliError::Position(format!(
                "offset {} is past the end of the file ({} bytes)",
                offset,
                doc.len()
            ))),
            Position::LineColumn(line, column) => {
                doc.offset_at(line, column).ok_or_else(|| {
                    CliError::Position(format!(
                        "line {} does not exist (file has {} lines)",
                        line,
                        doc.line_of(doc.len())
                    ))
                })
            }
        }
    }
}

#[derive(Serialize)]
struct AtReport<'a> {
    file: &'a Path,
    offset: usize,
    namespace: Option<&'a str>,
    declaration: Option<&'a NsDeclaration>,
}

/// Print the namespace in effect at `position` in `file`.
///
/// Text output fails (returns `Ok(false)`) when no declaration governs the
/// position; JSON output reports `null` instead.
pub(crate) fn cmd_at(
    file: &Path,
    position: Position,
    output: OutputFormat,
    quiet: bool,
) -> Result<bool, CliError> {
    let doc = Document::new(read_source(file)?);
    let offset = position.to_offset(&doc)?;
    let declaration = find_ns_declaration(&doc, offset);
    log::debug!(
        "{} @ {}: {:?}",
        file.display(),
        offset,
        declaration.as_ref().map(|d| d.name.as_str())
    );

    match output {
        OutputFormat::Json => {
            let report = AtReport {
                file,
                offset,
                namespace: declaration.as_ref().map(|d| d.name.as_str()),
                declaration: declaration.as_ref(),
            };
            let json = serde_json::to_string_pretty(&report)
                .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
            println!("{}", json);
            Ok(true)
        }
        OutputFormat::Text => match declaration {
            Some(decl) => {
                println!("{}", decl.name);
                Ok(true)
            }
            None => {
                if !quiet {
                    eprintln!("no namespace declaration governs offset {}", offset);
                }
                Ok(false)
            }
        },
    }
}
