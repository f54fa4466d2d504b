//! Classification outcome presentation

use std::collections::HashMap;
use std::time::Instant;

use tracing::debug;

use crate::config::Config;
use crate::{AnalysisAction, Classification, Folder, FolderKey, NotificationMode, Severity};

/// Presentation surface the notifier renders through.
///
/// Implementations must not fail; anything that can go wrong is theirs
/// to swallow and log. Tests inject recording doubles.
pub trait Presenter: Send + Sync {
    /// Show a transient, dismissable message
    fn toast(&self, message: &str);

    /// Update the shared status indicator (one indicator, last write wins)
    fn set_status(&self, label: &str, tooltip: &str);

    /// Attach the problem entry for a folder, replacing any prior one
    fn set_problem(&self, folder_key: &str, severity: Severity, message: &str);

    /// Drop all indicator and problem state
    fn clear(&self);
}

/// Renders outcomes to the terminal
#[derive(Debug, Clone, Default)]
pub struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    fn toast(&self, message: &str) {
        println!("{message}");
    }

    fn set_status(&self, label: &str, tooltip: &str) {
        println!("[status] {label} ({tooltip})");
    }

    fn set_problem(&self, folder_key: &str, severity: Severity, message: &str) {
        let tag = match severity {
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        println!("[{tag}] {folder_key}: {message}");
    }

    fn clear(&self) {}
}

/// Reports classification outcomes through the configured mode, throttling
/// toasts per folder.
///
/// The throttle map lives in memory only and resets with the process.
pub struct Notifier {
    presenter: Box<dyn Presenter>,
    last_toast: HashMap<FolderKey, Instant>,
}

impl Notifier {
    pub fn new(presenter: Box<dyn Presenter>) -> Self {
        Self {
            presenter,
            last_toast: HashMap::new(),
        }
    }

    /// Report one classification outcome. Never fails.
    ///
    /// `now` is injected so throttling stays testable with simulated time.
    pub fn notify(&mut self, folder: &Folder, outcome: &Classification, config: &Config, now: Instant) {
        match config.notification_mode {
            NotificationMode::None => {}
            NotificationMode::Statusbar => {
                let label = match outcome.action {
                    AnalysisAction::Enable => format!("Py analysis: {}", folder.name),
                    AnalysisAction::Disable => format!("Py analysis scoped off: {}", folder.name),
                };
                let tooltip = format!(
                    "{} Python files (limit {})",
                    outcome.file_count, outcome.limit
                );
                self.presenter.set_status(&label, &tooltip);
            }
            NotificationMode::Problems => {
                let severity = match outcome.action {
                    AnalysisAction::Enable => Severity::Info,
                    AnalysisAction::Disable => Severity::Warning,
                };
                self.presenter
                    .set_problem(&folder.key, severity, &message(folder, outcome));
            }
            NotificationMode::Toast => self.toast(folder, outcome, config, now),
        }
    }

    fn toast(&mut self, folder: &Folder, outcome: &Classification, config: &Config, now: Instant) {
        let wanted = match outcome.action {
            AnalysisAction::Enable => config.show_enable_toast,
            AnalysisAction::Disable => config.show_disable_toast,
        };
        if !wanted {
            return;
        }

        let window = config.suppress_window();
        if let Some(last) = self.last_toast.get(&folder.key) {
            if now.duration_since(*last) < window {
                debug!(folder = %folder.name, "toast suppressed inside throttle window");
                return;
            }
        }

        self.last_toast.insert(folder.key.clone(), now);
        self.presenter.toast(&message(folder, outcome));
    }

    /// Drop all notifier-owned UI state
    pub fn clear(&mut self) {
        self.last_toast.clear();
        self.presenter.clear();
    }
}

fn message(folder: &Folder, outcome: &Classification) -> String {
    match outcome.action {
        AnalysisAction::Enable => format!(
            "Python analysis enabled for \"{}\" ({} files, limit {})",
            folder.name, outcome.file_count, outcome.limit
        ),
        AnalysisAction::Disable => format!(
            "Python analysis scoped off for \"{}\": {} files exceed the limit of {}",
            folder.name, outcome.file_count, outcome.limit
        ),
    }
}
