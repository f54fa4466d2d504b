use serde::{Deserialize, Serialize};

/// How classification outcomes are presented to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationMode {
    /// Transient dismissable message, throttled per folder
    #[default]
    Toast,
    /// Single shared status indicator, last write wins
    Statusbar,
    /// One diagnostic-like entry per folder
    Problems,
    /// No user-visible output
    None,
}

/// Severity of a problems-mode entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
}
