//! Event wiring: debounced classification passes and teardown

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::classifier::classify;
use crate::config::Config;
use crate::notifier::Notifier;
use crate::reconciler;
use crate::scanner::FileCounter;
use crate::settings::SettingsStore;
use crate::snapshot::SnapshotStore;
use crate::workspace::FolderRegistry;
use crate::{Folder, FolderKey};

/// Host events that drive classification
#[derive(Debug, Clone)]
pub enum Event {
    /// Process start: classify every registered folder
    Startup,

    /// A folder joined the workspace
    FolderAdded(Folder),

    /// The active document changed; reclassify its owning folder
    ActiveFileChanged(PathBuf),

    /// Relevant configuration changed; reclassify every folder
    ConfigChanged,

    /// Teardown: restore snapshots and clear UI state
    Shutdown,
}

/// Delay before a triggered classification actually runs, so a burst of
/// events collapses into one pass per folder
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(150);

/// Wires events to classification passes.
///
/// Each trigger arms a per-folder debounce timer; a newer trigger for the
/// same folder replaces the pending one. Due folders come out of the
/// receiver returned by [`take_due_receiver`](Self::take_due_receiver)
/// and are classified one at a time, so passes never interleave.
pub struct LifecycleController {
    registry: FolderRegistry,
    settings: Arc<dyn SettingsStore>,
    snapshots: SnapshotStore,
    notifier: Notifier,
    debounce_delay: Duration,
    pending: HashMap<FolderKey, JoinHandle<()>>,
    due_tx: mpsc::UnboundedSender<FolderKey>,
    due_rx: Option<mpsc::UnboundedReceiver<FolderKey>>,
}

impl LifecycleController {
    pub fn new(
        registry: FolderRegistry,
        settings: Arc<dyn SettingsStore>,
        snapshots: SnapshotStore,
        notifier: Notifier,
    ) -> Self {
        let (due_tx, due_rx) = mpsc::unbounded_channel();
        Self {
            registry,
            settings,
            snapshots,
            notifier,
            debounce_delay: DEBOUNCE_DELAY,
            pending: HashMap::new(),
            due_tx,
            due_rx: Some(due_rx),
        }
    }

    /// Override the debounce delay (tests use a short one)
    pub fn with_debounce_delay(mut self, delay: Duration) -> Self {
        self.debounce_delay = delay;
        self
    }

    /// Take the receiver of folders whose debounce window has elapsed
    pub fn take_due_receiver(&mut self) -> mpsc::UnboundedReceiver<FolderKey> {
        self.due_rx.take().expect("due receiver already taken")
    }

    pub fn registry(&self) -> &FolderRegistry {
        &self.registry
    }

    /// Feed one host event into the controller
    pub async fn handle_event(&mut self, event: Event) {
        match event {
            Event::Startup => {
                for key in self.registry.keys() {
                    self.schedule(key);
                }
            }
            Event::FolderAdded(folder) => {
                let key = self.registry.add(folder);
                self.schedule(key);
            }
            Event::ActiveFileChanged(path) => {
                let owner = self.registry.owner_of(&path).map(|f| f.key.clone());
                match owner {
                    Some(key) => self.schedule(key),
                    None => debug!(path = %path.display(), "change outside any registered folder"),
                }
            }
            Event::ConfigChanged => {
                for key in self.registry.keys() {
                    self.schedule(key);
                }
            }
            Event::Shutdown => self.shutdown().await,
        }
    }

    /// Arm (or re-arm) the debounce timer for a folder; a newer trigger
    /// replaces a pending one
    fn schedule(&mut self, key: FolderKey) {
        if let Some(previous) = self.pending.remove(&key) {
            previous.abort();
        }

        let tx = self.due_tx.clone();
        let delay = self.debounce_delay;
        let task_key = key.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(task_key);
        });
        self.pending.insert(key, handle);
    }

    /// Classify every registered folder immediately (no debounce)
    pub async fn classify_all(&mut self) {
        for key in self.registry.keys() {
            self.classify_folder(&key).await;
        }
    }

    /// One full classification pass for a folder.
    ///
    /// Any failure is logged and leaves the folder in its previous state;
    /// nothing propagates to the caller.
    pub async fn classify_folder(&mut self, key: &str) {
        self.pending.remove(key);
        let Some(folder) = self.registry.get(key).cloned() else {
            return;
        };

        let config = Config::from_dir(&folder.root);
        if !config.enable {
            debug!(folder = %folder.name, "disabled by configuration, skipping");
            return;
        }

        // Count and threshold share the same exclusion set
        let count = FileCounter::new(&config.exclude_dirs).count(&folder.root);
        let outcome = classify(
            count,
            config.max_files,
            config.effective_includes(),
            &config.exclude_dirs,
            config.keep_strict,
        );

        match reconciler::reconcile(&folder, &outcome, self.settings.as_ref(), &mut self.snapshots)
            .await
        {
            Ok(applied) => {
                debug!(folder = %folder.name, files = count, ?applied, "classification pass finished");
                self.notifier.notify(&folder, &outcome, &config, Instant::now());
            }
            Err(e) => {
                warn!(folder = %folder.name, "classification pass failed: {e:#}");
            }
        }
    }

    /// Restore every snapshotted folder, then clear notifier UI state
    pub async fn shutdown(&mut self) {
        for (_, handle) in self.pending.drain() {
            handle.abort();
        }

        if let Err(e) =
            reconciler::restore_all(&self.registry, self.settings.as_ref(), &mut self.snapshots)
                .await
        {
            warn!("settings restoration incomplete: {e:#}");
        }
        self.notifier.clear();
    }
}
