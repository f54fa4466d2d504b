//! Restore command: put back snapshotted settings

use std::path::{Path, PathBuf};

use anyhow::Result;

use pyscope::Folder;
use pyscope::reconciler;
use pyscope::settings::JsonSettingsStore;
use pyscope::snapshot::SnapshotStore;
use pyscope::workspace::FolderRegistry;

/// Restore each folder to the settings recorded before pyscope's first
/// write, then drop the snapshot entries
pub async fn restore_command(paths: &[PathBuf], snapshot_path: &Path) -> Result<()> {
    let mut registry = FolderRegistry::new();
    for path in paths {
        registry.add(Folder::from_root(path));
    }

    let store = JsonSettingsStore::new();
    let mut snapshots = SnapshotStore::load_or_create(snapshot_path);
    let before = snapshots.len();

    reconciler::restore_all(&registry, &store, &mut snapshots).await?;

    let restored = before - snapshots.len();
    println!(
        "Restored {restored} folder(s); {} snapshot(s) remain.",
        snapshots.len()
    );
    Ok(())
}
