//! Durable snapshots of pre-modification analyzer settings

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::FolderKey;
use crate::settings::FolderSettings;

/// The settings a folder had before pyscope first wrote to it.
///
/// `None` fields mean "the key was unset" and restore to unset, not to an
/// empty value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderSnapshot {
    /// Include patterns before the first write
    pub include: Option<Vec<String>>,

    /// Exclude patterns before the first write
    pub exclude: Option<Vec<String>>,

    /// Type-checking mode before the first write
    pub type_checking: Option<String>,

    /// When the snapshot was captured
    pub captured_at: DateTime<Utc>,
}

impl FolderSnapshot {
    /// Capture the currently stored settings
    pub fn capture(settings: &FolderSettings) -> Self {
        Self {
            include: settings.include.clone(),
            exclude: settings.exclude.clone(),
            type_checking: settings.type_checking.clone(),
            captured_at: Utc::now(),
        }
    }
}

/// Process-wide durable store mapping folder keys to their snapshots.
///
/// A folder's entry is written at most once per activation session and
/// removed only when its settings are restored, so repeated toggles can
/// never overwrite the first-seen state.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SnapshotStore {
    entries: HashMap<FolderKey, FolderSnapshot>,

    #[serde(skip)]
    path: PathBuf,
}

impl SnapshotStore {
    /// Default location of the snapshot file (~/.pyscope/snapshots.json)
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".pyscope")
            .join("snapshots.json")
    }

    /// Load the store from a file; a missing file is an empty store
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self {
                path,
                ..Default::default()
            });
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read snapshot store from {}", path.display()))?;

        let mut store: SnapshotStore =
            serde_json::from_str(&content).with_context(|| "Failed to parse snapshot store JSON")?;
        store.path = path;

        Ok(store)
    }

    /// Load from a path, falling back to an empty store on any error
    pub fn load_or_create(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::load(path.clone()).unwrap_or_else(|e| {
            tracing::warn!("starting with an empty snapshot store: {e:#}");
            Self {
                path,
                ..Default::default()
            }
        })
    }

    /// Persist the store with an exclusive lock and atomic rename
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create snapshot directory: {}", parent.display())
            })?;
        }

        let content = serde_json::to_string_pretty(self)
            .with_context(|| "Failed to serialize snapshot store")?;

        // Separate lock file so the rename below stays atomic
        let lock_path = self.path.with_extension("json.lock");
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .with_context(|| format!("Failed to create lock file: {}", lock_path.display()))?;
        lock_file
            .lock_exclusive()
            .with_context(|| "Failed to acquire snapshot store lock")?;

        let tmp_path = self.path.with_extension("json.tmp");
        let mut tmp_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp_path)
            .with_context(|| format!("Failed to create temp file: {}", tmp_path.display()))?;

        tmp_file
            .write_all(content.as_bytes())
            .with_context(|| "Failed to write snapshot store content")?;
        tmp_file
            .sync_all()
            .with_context(|| "Failed to sync snapshot store file")?;

        std::fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to rename snapshot store: {}", self.path.display()))?;

        Ok(())
    }

    /// Record a snapshot for a folder unless one already exists.
    /// Returns true if this call recorded (and persisted) the entry.
    pub fn record_if_absent(&mut self, key: &str, snapshot: FolderSnapshot) -> Result<bool> {
        if self.entries.contains_key(key) {
            return Ok(false);
        }
        self.entries.insert(key.to_string(), snapshot);
        self.save()?;
        Ok(true)
    }

    /// Get a folder's snapshot
    pub fn get(&self, key: &str) -> Option<&FolderSnapshot> {
        self.entries.get(key)
    }

    /// Drop a folder's entry after restoring it
    pub fn remove(&mut self, key: &str) -> Result<Option<FolderSnapshot>> {
        let removed = self.entries.remove(key);
        if removed.is_some() {
            self.save()?;
        }
        Ok(removed)
    }

    /// Keys of all snapshotted folders
    pub fn keys(&self) -> Vec<FolderKey> {
        self.entries.keys().cloned().collect()
    }

    /// Number of snapshotted folders
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
