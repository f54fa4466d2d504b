//! File system watcher feeding lifecycle events

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Result;
use notify_debouncer_mini::notify;
use notify_debouncer_mini::{DebounceEventResult, DebouncedEventKind, new_debouncer};

/// Events from the file watcher
#[derive(Debug, Clone)]
pub enum WatchEvent {
    /// A Python source file changed
    SourceChanged(PathBuf),

    /// A pyscope configuration file changed
    ConfigChanged(PathBuf),

    /// An error occurred
    Error(String),
}

/// Watches folder roots and emits debounced change events.
///
/// Churn under excluded directory names is dropped at this layer so a
/// busy virtualenv never triggers classification passes.
pub struct FolderWatcher {
    /// Channel to receive watch events
    rx: mpsc::Receiver<WatchEvent>,

    /// The watcher itself (kept alive)
    _debouncer: notify_debouncer_mini::Debouncer<notify::RecommendedWatcher>,
}

impl FolderWatcher {
    /// Watch the given folder roots recursively
    pub fn new(roots: &[PathBuf], debounce: Duration, excluded_names: Vec<String>) -> Result<Self> {
        let (tx, rx) = mpsc::channel();

        let tx_events = tx.clone();
        let mut debouncer = new_debouncer(debounce, move |res: DebounceEventResult| match res {
            Ok(events) => {
                for event in events {
                    if !matches!(
                        event.kind,
                        DebouncedEventKind::Any | DebouncedEventKind::AnyContinuous
                    ) {
                        continue;
                    }
                    if let Some(watch_event) = classify_path(&event.path, &excluded_names) {
                        let _ = tx_events.send(watch_event);
                    }
                }
            }
            Err(e) => {
                let _ = tx_events.send(WatchEvent::Error(e.to_string()));
            }
        })?;

        for root in roots {
            debouncer
                .watcher()
                .watch(root, notify::RecursiveMode::Recursive)?;
        }

        Ok(Self {
            rx,
            _debouncer: debouncer,
        })
    }

    /// Try to receive a watch event (non-blocking)
    pub fn try_recv(&self) -> Option<WatchEvent> {
        self.rx.try_recv().ok()
    }
}

/// Map a changed path to a watch event. Paths under excluded directories,
/// and paths that are neither Python source nor pyscope config, are
/// dropped.
fn classify_path(path: &Path, excluded_names: &[String]) -> Option<WatchEvent> {
    let under_excluded = path.components().any(|component| {
        component
            .as_os_str()
            .to_str()
            .is_some_and(|name| excluded_names.iter().any(|excluded| excluded == name))
    });
    if under_excluded {
        return None;
    }

    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        let in_dot_dir = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            == Some(".pyscope");
        if name == "pyscope.toml" || (name == "config.toml" && in_dot_dir) {
            return Some(WatchEvent::ConfigChanged(path.to_path_buf()));
        }
    }

    if path.extension().and_then(|e| e.to_str()) == Some("py") {
        return Some(WatchEvent::SourceChanged(path.to_path_buf()));
    }

    None
}
