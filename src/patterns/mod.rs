//! Glob pattern derivation for analyzer include/exclude settings

use globset::Glob;

/// Catch-all include covering every Python file in the tree
pub const ALL_PYTHON: &str = "./**/*.py";

/// Catch-all exclude covering the entire tree
pub const EXCLUDE_EVERYTHING: &str = "**";

/// Recursive Python-files suffix appended to directory references
const PY_SUFFIX: &str = "/**/*.py";

/// Translate configured include roots into analyzer include globs.
///
/// Order-preserving and deterministic. A directory reference (with or
/// without wildcards) gains the recursive `*.py` suffix; an entry that
/// already names the file suffix passes through with the relative-path
/// prefix. Zero usable entries fall back to the catch-all pattern.
pub fn to_include_globs(entries: &[String]) -> Vec<String> {
    let mut globs = Vec::new();
    for entry in entries {
        let Some(pattern) = include_glob(entry) else {
            continue;
        };
        match Glob::new(&pattern) {
            Ok(_) => globs.push(pattern),
            Err(e) => tracing::warn!("skipping invalid include pattern {pattern:?}: {e}"),
        }
    }
    if globs.is_empty() {
        globs.push(ALL_PYTHON.to_string());
    }
    globs
}

fn include_glob(entry: &str) -> Option<String> {
    let trimmed = entry.trim();
    if trimmed.is_empty() {
        return None;
    }

    let base = trimmed.trim_start_matches("./").trim_end_matches('/');
    if base.is_empty() || base == "." {
        return Some(ALL_PYTHON.to_string());
    }
    if base.ends_with(".py") {
        return Some(format!("./{base}"));
    }
    Some(format!("./{base}{PY_SUFFIX}"))
}

/// Translate excluded directory names into analyzer exclude globs.
///
/// Each name matches at any depth; the analyzer prunes everything under
/// an excluded directory. Duplicate names yield duplicate (harmless)
/// patterns.
pub fn to_exclude_globs(names: &[String]) -> Vec<String> {
    let mut globs = Vec::new();
    for name in names {
        let name = name.trim().trim_matches('/');
        if name.is_empty() {
            continue;
        }
        let pattern = format!("**/{name}");
        match Glob::new(&pattern) {
            Ok(_) => globs.push(pattern),
            Err(e) => tracing::warn!("skipping invalid exclude pattern {pattern:?}: {e}"),
        }
    }
    globs
}
