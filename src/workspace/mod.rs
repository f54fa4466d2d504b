//! Workspace folder membership

use std::collections::HashMap;
use std::path::Path;

use crate::{Folder, FolderKey};

/// In-memory set of the folders currently registered as analysis scopes.
///
/// Membership is owned by the host (or the CLI); nothing here persists
/// across sessions.
#[derive(Debug, Default)]
pub struct FolderRegistry {
    folders: HashMap<FolderKey, Folder>,
}

impl FolderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a folder, returning its key. Re-adding is a no-op.
    pub fn add(&mut self, folder: Folder) -> FolderKey {
        let key = folder.key.clone();
        self.folders.entry(key.clone()).or_insert(folder);
        key
    }

    /// Remove a folder by key
    pub fn remove(&mut self, key: &str) -> Option<Folder> {
        self.folders.remove(key)
    }

    /// Get a folder by key
    pub fn get(&self, key: &str) -> Option<&Folder> {
        self.folders.get(key)
    }

    /// The registered folder whose root contains `path`, preferring the
    /// deepest root when folders nest
    pub fn owner_of(&self, path: &Path) -> Option<&Folder> {
        let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        self.folders
            .values()
            .filter(|folder| canonical.starts_with(&folder.root))
            .max_by_key(|folder| folder.root.components().count())
    }

    /// Keys of all registered folders
    pub fn keys(&self) -> Vec<FolderKey> {
        self.folders.keys().cloned().collect()
    }

    /// All registered folders, sorted by name for stable output
    pub fn list(&self) -> Vec<&Folder> {
        let mut folders: Vec<_> = self.folders.values().collect();
        folders.sort_by(|a, b| a.name.cmp(&b.name));
        folders
    }

    /// Number of registered folders
    pub fn len(&self) -> usize {
        self.folders.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }
}
