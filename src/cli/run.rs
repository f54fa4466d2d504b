//! Run command: watch folders and keep scope settings current

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use pyscope::Folder;
use pyscope::config::{Config, DEFAULT_EXCLUDE_DIRS};
use pyscope::lifecycle::{Event, LifecycleController};
use pyscope::notifier::{ConsolePresenter, Notifier};
use pyscope::settings::JsonSettingsStore;
use pyscope::snapshot::SnapshotStore;
use pyscope::watcher::{FolderWatcher, WatchEvent};
use pyscope::workspace::FolderRegistry;

/// Watch the given folders, reclassify on changes, restore on Ctrl-C
pub async fn run_command(paths: &[PathBuf], snapshot_path: &Path) -> Result<()> {
    let mut registry = FolderRegistry::new();
    for path in paths {
        registry.add(Folder::from_root(path));
    }

    // The watcher filters with the union of every folder's exclusions so
    // virtualenv churn in any of them stays quiet
    let mut excluded: BTreeSet<String> =
        DEFAULT_EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect();
    let mut roots = Vec::new();
    for folder in registry.list() {
        excluded.extend(Config::from_dir(&folder.root).exclude_dirs);
        roots.push(folder.root.clone());
    }

    let watcher = FolderWatcher::new(
        &roots,
        Duration::from_millis(500),
        excluded.into_iter().collect(),
    )?;

    let snapshots = SnapshotStore::load_or_create(snapshot_path);
    let notifier = Notifier::new(Box::new(ConsolePresenter));
    let mut controller = LifecycleController::new(
        registry,
        Arc::new(JsonSettingsStore::new()),
        snapshots,
        notifier,
    );
    let mut due = controller.take_due_receiver();

    controller.handle_event(Event::Startup).await;
    println!(
        "pyscope watching {} folder(s), Ctrl-C to restore and exit",
        controller.registry().len()
    );

    let mut poll = tokio::time::interval(Duration::from_millis(200));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!("restoring analyzer settings...");
                controller.handle_event(Event::Shutdown).await;
                break;
            }
            Some(key) = due.recv() => {
                controller.classify_folder(&key).await;
            }
            _ = poll.tick() => {
                while let Some(event) = watcher.try_recv() {
                    match event {
                        WatchEvent::SourceChanged(path) => {
                            controller.handle_event(Event::ActiveFileChanged(path)).await;
                        }
                        WatchEvent::ConfigChanged(_) => {
                            controller.handle_event(Event::ConfigChanged).await;
                        }
                        WatchEvent::Error(e) => {
                            tracing::warn!("watcher error: {e}");
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
