//! Status command: show settings and snapshot state per folder

use std::path::{Path, PathBuf};

use anyhow::Result;

use pyscope::Folder;
use pyscope::settings::{JsonSettingsStore, SettingsStore};
use pyscope::snapshot::SnapshotStore;

/// Print current analyzer settings and snapshot state for each folder
pub async fn status_command(paths: &[PathBuf], snapshot_path: &Path) -> Result<()> {
    let store = JsonSettingsStore::new();
    let snapshots = SnapshotStore::load_or_create(snapshot_path);

    for path in paths {
        let folder = Folder::from_root(path);
        println!("{} ({})", folder.name, folder.root.display());

        match store.read(&folder).await {
            Ok(settings) => {
                println!("  include:      {}", format_list(&settings.include));
                println!("  exclude:      {}", format_list(&settings.exclude));
                println!(
                    "  typeChecking: {}",
                    settings.type_checking.as_deref().unwrap_or("(unset)")
                );
            }
            Err(e) => println!("  settings unreadable: {e}"),
        }

        match snapshots.get(&folder.key) {
            Some(snapshot) => println!(
                "  snapshot:     captured {}",
                snapshot.captured_at.format("%Y-%m-%d %H:%M UTC")
            ),
            None => println!("  snapshot:     none"),
        }
        println!();
    }

    Ok(())
}

fn format_list(value: &Option<Vec<String>>) -> String {
    match value {
        None => "(unset)".to_string(),
        Some(list) if list.is_empty() => "[]".to_string(),
        Some(list) => format!("[{}]", list.join(", ")),
    }
}
