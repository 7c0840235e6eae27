//! Mapping between source file paths and namespace names.
//!
//! Everything here is lexical: paths are compared component by component
//! after resolving `.` and `..`, without touching the filesystem.

use std::path::{Component, Path, PathBuf};

/// Resolve `.` and `..` components without touching the filesystem.
///
/// A leading `..` in a relative path is kept; one directly under a root is
/// dropped.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            other => components.push(other),
        }
    }
    components.iter().collect()
}

/// Lexical path from `base` to `target`.
///
/// Returns `None` when one path is absolute and the other is not. Absolute
/// paths that share no root (different drives) yield `target` unchanged.
pub fn relative_path(base: &Path, target: &Path) -> Option<PathBuf> {
    let base = normalize_path(base);
    let target = normalize_path(target);
    if base.is_absolute() != target.is_absolute() {
        return None;
    }
    let base: Vec<Component<'_>> = base.components().collect();
    let target_parts: Vec<Component<'_>> = target.components().collect();
    let common = base
        .iter()
        .zip(&target_parts)
        .take_while(|(a, b)| a == b)
        .count();
    if common == 0 && target.is_absolute() {
        return Some(target.clone());
    }

    let mut rel = PathBuf::new();
    for _ in common..base.len() {
        rel.push("..");
    }
    for part in &target_parts[common..] {
        rel.push(part.as_os_str());
    }
    Some(rel)
}

/// True if `path` is `root` itself or lies under it.
pub fn is_prefix(root: impl AsRef<Path>, path: impl AsRef<Path>) -> bool {
    match relative_path(root.as_ref(), path.as_ref()) {
        Some(rel) => {
            !rel.is_absolute() && rel.components().next() != Some(Component::ParentDir)
        }
        None => false,
    }
}

/// Extension of the last path segment, dot included. Dotfiles such as
/// `.lein-env` have none.
fn extension(path: &str) -> &str {
    let segment_start = path.rfind(['/', '\\']).map_or(0, |i| i + 1);
    let segment = &path[segment_start..];
    match segment.rfind('.') {
        Some(dot) if dot > 0 => &segment[dot..],
        _ => "",
    }
}

/// Namespace name for a path: extension dropped, separators become `.`,
/// underscores become `-`.
pub fn path_to_ns(path: &str) -> String {
    let stem = &path[..path.len() - extension(path).len()];
    stem.chars()
        .map(|c| match c {
            '/' | '\\' => '.',
            '_' => '-',
            other => other,
        })
        .collect()
}

/// Namespace name for `path` relative to the first source root containing
/// it, or derived from the bare file name when no root matches.
pub fn resolve_ns_name<P: AsRef<Path>>(source_roots: &[P], path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    for root in source_roots {
        let root = root.as_ref();
        if is_prefix(root, path) {
            if let Some(rel) = relative_path(root, path) {
                return path_to_ns(&rel.to_string_lossy());
            }
        }
    }
    let base = path
        .file_name()
        .map_or_else(|| path.to_string_lossy(), |name| name.to_string_lossy());
    path_to_ns(&base)
}

/// Relative file path a namespace is expected to live at, e.g.
/// `my-app.core` with extension `clj` becomes `my_app/core.clj`.
pub fn ns_to_path(ns: &str, extension: &str) -> PathBuf {
    let mut path = PathBuf::new();
    let mut segments = ns.split('.').peekable();
    while let Some(segment) = segments.next() {
        let segment = segment.replace('-', "_");
        if segments.peek().is_none() && !extension.is_empty() {
            path.push(format!("{}.{}", segment, extension));
        } else {
            path.push(segment);
        }
    }
    path
}
