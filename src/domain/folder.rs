use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Stable identity for a workspace folder.
///
/// Derived from the canonical root path, so the same folder maps to the
/// same key across sessions. The snapshot store relies on this.
pub type FolderKey = String;

/// A root directory registered as an independent analysis scope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    /// Unique key (canonical root path)
    pub key: FolderKey,

    /// Human-readable name (folder base name)
    pub name: String,

    /// Root path of the folder
    pub root: PathBuf,
}

impl Folder {
    /// Create a folder from a root path, canonicalizing for a stable key
    pub fn from_root(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let canonical = path.canonicalize().unwrap_or(path);

        let name = canonical
            .file_name()
            .and_then(|n| n.to_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| canonical.display().to_string());

        Self {
            key: canonical.display().to_string(),
            name,
            root: canonical,
        }
    }
}
