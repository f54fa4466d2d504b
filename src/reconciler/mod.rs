//! Applies desired analyzer settings and snapshots prior state

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::Folder;
use crate::domain::Classification;
use crate::settings::{SettingsPatch, SettingsStore};
use crate::snapshot::{FolderSnapshot, SnapshotStore};
use crate::workspace::FolderRegistry;

/// Type-checking mode written when a folder is scoped off without
/// `keep_strict`
pub const RELAXED_TYPE_CHECKING: &str = "basic";

/// What a reconciliation pass did to a folder's settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// At least one field was written
    Applied,
    /// Everything already matched; nothing was written
    Unchanged,
}

/// Bring a folder's stored analyzer settings in line with a classification.
///
/// The pre-change values are recorded in the snapshot store before the
/// first write to the folder in this session; after that, only fields
/// that differ are written. Unset and empty are distinct states, so a
/// removed key is never confused with an empty list. Calling again with
/// the same desired state is a no-op.
pub async fn reconcile(
    folder: &Folder,
    desired: &Classification,
    store: &dyn SettingsStore,
    snapshots: &mut SnapshotStore,
) -> Result<ReconcileOutcome> {
    let current = store
        .read(folder)
        .await
        .with_context(|| format!("reading analyzer settings for {}", folder.name))?;

    let mut patch = SettingsPatch::default();
    if current.include != desired.include {
        patch.include = Some(desired.include.clone());
    }
    let desired_exclude = Some(desired.exclude.clone());
    if current.exclude != desired_exclude {
        patch.exclude = Some(desired_exclude);
    }
    if desired.relax_strictness && current.type_checking.as_deref() != Some(RELAXED_TYPE_CHECKING) {
        patch.type_checking = Some(Some(RELAXED_TYPE_CHECKING.to_string()));
    }

    if patch.is_empty() {
        debug!(folder = %folder.name, "analyzer settings already match");
        return Ok(ReconcileOutcome::Unchanged);
    }

    // Snapshot strictly before the write so the first-seen state stays
    // restorable even if the write below fails
    let recorded = snapshots
        .record_if_absent(&folder.key, FolderSnapshot::capture(&current))
        .with_context(|| format!("recording settings snapshot for {}", folder.name))?;
    if recorded {
        debug!(folder = %folder.name, "captured pre-change settings snapshot");
    }

    store
        .apply(folder, patch)
        .await
        .with_context(|| format!("writing analyzer settings for {}", folder.name))?;

    info!(folder = %folder.name, action = ?desired.action, files = desired.file_count, "updated analyzer scope");
    Ok(ReconcileOutcome::Applied)
}

/// Restore every snapshotted folder to its recorded settings and drop the
/// entries.
///
/// A folder that is no longer registered is skipped and keeps its entry
/// for a later session. A failed write keeps the entry too, so a retry
/// stays possible; neither case stops the remaining restores.
pub async fn restore_all(
    registry: &FolderRegistry,
    store: &dyn SettingsStore,
    snapshots: &mut SnapshotStore,
) -> Result<()> {
    for key in snapshots.keys() {
        let Some(folder) = registry.get(&key).cloned() else {
            debug!(%key, "folder no longer present, keeping its snapshot");
            continue;
        };
        let Some(snapshot) = snapshots.get(&key).cloned() else {
            continue;
        };

        let patch = SettingsPatch {
            include: Some(snapshot.include),
            exclude: Some(snapshot.exclude),
            type_checking: Some(snapshot.type_checking),
        };
        if let Err(e) = store.apply(&folder, patch).await {
            warn!(folder = %folder.name, error = %e, "failed to restore analyzer settings");
            continue;
        }

        snapshots
            .remove(&key)
            .with_context(|| format!("dropping restored snapshot for {}", folder.name))?;
        info!(folder = %folder.name, "restored analyzer settings");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tempfile::TempDir;

    use crate::classifier::classify;
    use crate::settings::{FolderSettings, SettingsError};

    /// In-memory settings store that counts writes
    #[derive(Default)]
    struct MemorySettings {
        values: Mutex<HashMap<String, FolderSettings>>,
        writes: AtomicUsize,
    }

    impl MemorySettings {
        fn write_count(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        fn values_for(&self, folder: &Folder) -> FolderSettings {
            self.values
                .lock()
                .unwrap()
                .get(&folder.key)
                .cloned()
                .unwrap_or_default()
        }

        fn preset(&self, folder: &Folder, settings: FolderSettings) {
            self.values
                .lock()
                .unwrap()
                .insert(folder.key.clone(), settings);
        }
    }

    #[async_trait]
    impl SettingsStore for MemorySettings {
        async fn read(&self, folder: &Folder) -> Result<FolderSettings, SettingsError> {
            Ok(self.values_for(folder))
        }

        async fn apply(&self, folder: &Folder, patch: SettingsPatch) -> Result<(), SettingsError> {
            if patch.is_empty() {
                return Ok(());
            }
            self.writes.fetch_add(1, Ordering::SeqCst);
            let mut values = self.values.lock().unwrap();
            let entry = values.entry(folder.key.clone()).or_default();
            if let Some(include) = patch.include {
                entry.include = include;
            }
            if let Some(exclude) = patch.exclude {
                entry.exclude = exclude;
            }
            if let Some(mode) = patch.type_checking {
                entry.type_checking = mode;
            }
            Ok(())
        }
    }

    fn test_folder(temp: &TempDir) -> Folder {
        Folder::from_root(temp.path())
    }

    fn snapshots_in(temp: &TempDir) -> SnapshotStore {
        SnapshotStore::load_or_create(temp.path().join("snapshots.json"))
    }

    #[tokio::test]
    async fn test_second_identical_pass_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let folder = test_folder(&temp);
        let store = MemorySettings::default();
        let mut snapshots = snapshots_in(&temp);

        let desired = classify(10, 200, &["src".to_string()], &[".venv".to_string()], false);

        let first = reconcile(&folder, &desired, &store, &mut snapshots)
            .await
            .unwrap();
        assert_eq!(first, ReconcileOutcome::Applied);
        assert_eq!(store.write_count(), 1);

        let second = reconcile(&folder, &desired, &store, &mut snapshots)
            .await
            .unwrap();
        assert_eq!(second, ReconcileOutcome::Unchanged);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_snapshot_records_first_seen_state_once() {
        let temp = TempDir::new().unwrap();
        let folder = test_folder(&temp);
        let store = MemorySettings::default();
        let mut snapshots = snapshots_in(&temp);

        let original = FolderSettings {
            include: Some(vec!["./app/**/*.py".to_string()]),
            exclude: None,
            type_checking: Some("strict".to_string()),
        };
        store.preset(&folder, original.clone());

        let disable = classify(500, 200, &[], &[], false);
        reconcile(&folder, &disable, &store, &mut snapshots)
            .await
            .unwrap();

        let enable = classify(100, 200, &[], &[], false);
        reconcile(&folder, &enable, &store, &mut snapshots)
            .await
            .unwrap();

        // Still the pre-first-write values, not anything intermediate
        let recorded = snapshots.get(&folder.key).unwrap();
        assert_eq!(recorded.include, original.include);
        assert_eq!(recorded.exclude, None);
        assert_eq!(recorded.type_checking, Some("strict".to_string()));
    }

    #[tokio::test]
    async fn test_disable_relaxes_type_checking() {
        let temp = TempDir::new().unwrap();
        let folder = test_folder(&temp);
        let store = MemorySettings::default();
        let mut snapshots = snapshots_in(&temp);

        store.preset(
            &folder,
            FolderSettings {
                type_checking: Some("strict".to_string()),
                ..Default::default()
            },
        );

        let disable = classify(500, 200, &[], &[], false);
        reconcile(&folder, &disable, &store, &mut snapshots)
            .await
            .unwrap();

        let after = store.values_for(&folder);
        assert_eq!(after.type_checking, Some(RELAXED_TYPE_CHECKING.to_string()));
        assert_eq!(after.include, None);
        assert_eq!(after.exclude, Some(vec!["**".to_string()]));
    }

    #[tokio::test]
    async fn test_restore_puts_back_unset_state() {
        let temp = TempDir::new().unwrap();
        let folder = test_folder(&temp);
        let store = MemorySettings::default();
        let mut snapshots = snapshots_in(&temp);
        let mut registry = FolderRegistry::new();
        registry.add(folder.clone());

        // Everything unset before the first pass
        let disable = classify(500, 200, &[], &[], false);
        reconcile(&folder, &disable, &store, &mut snapshots)
            .await
            .unwrap();
        assert_ne!(store.values_for(&folder), FolderSettings::default());

        restore_all(&registry, &store, &mut snapshots).await.unwrap();

        assert_eq!(store.values_for(&folder), FolderSettings::default());
        assert!(snapshots.is_empty());
    }

    #[tokio::test]
    async fn test_restore_skips_unregistered_folder() {
        let temp = TempDir::new().unwrap();
        let folder = test_folder(&temp);
        let store = MemorySettings::default();
        let mut snapshots = snapshots_in(&temp);

        let disable = classify(500, 200, &[], &[], false);
        reconcile(&folder, &disable, &store, &mut snapshots)
            .await
            .unwrap();

        // Folder never registered: entry must survive for a later retry
        let registry = FolderRegistry::new();
        restore_all(&registry, &store, &mut snapshots).await.unwrap();
        assert_eq!(snapshots.len(), 1);
    }

    #[tokio::test]
    async fn test_restore_with_empty_store_is_noop() {
        let temp = TempDir::new().unwrap();
        let store = MemorySettings::default();
        let mut snapshots = snapshots_in(&temp);
        let registry = FolderRegistry::new();

        restore_all(&registry, &store, &mut snapshots).await.unwrap();
        assert_eq!(store.write_count(), 0);
    }
}
