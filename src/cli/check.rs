//! Check command: one-shot classification

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use pyscope::Folder;
use pyscope::lifecycle::LifecycleController;
use pyscope::notifier::{ConsolePresenter, Notifier};
use pyscope::settings::JsonSettingsStore;
use pyscope::snapshot::SnapshotStore;
use pyscope::workspace::FolderRegistry;

/// Classify each folder once and apply the resulting scope settings
pub async fn check_command(paths: &[PathBuf], snapshot_path: &Path) -> Result<()> {
    let mut registry = FolderRegistry::new();
    for path in paths {
        registry.add(Folder::from_root(path));
    }

    let snapshots = SnapshotStore::load_or_create(snapshot_path);
    let notifier = Notifier::new(Box::new(ConsolePresenter));
    let mut controller = LifecycleController::new(
        registry,
        Arc::new(JsonSettingsStore::new()),
        snapshots,
        notifier,
    );

    controller.classify_all().await;
    Ok(())
}
