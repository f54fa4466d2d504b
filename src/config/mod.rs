//! Configuration loading and management

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};

use crate::NotificationMode;

/// Directory names that never count toward the file limit by default.
/// Covers the usual virtual environments and tool caches.
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &[
    ".venv",
    "venv",
    ".git",
    "__pycache__",
    ".mypy_cache",
    ".pytest_cache",
    ".tox",
    "node_modules",
    "site-packages",
];

/// Per-folder configuration
///
/// Read fresh at the start of every classification pass so edits take
/// effect without a restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Master switch; a disabled folder is never counted or touched
    #[serde(default = "default_true")]
    pub enable: bool,

    /// Folders with more Python files than this get scoped off
    #[serde(default = "default_max_files")]
    pub max_files: usize,

    /// Analysis roots used while the folder stays enabled
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub include_dirs: Vec<String>,

    /// Ready-made include patterns; wins over `include_dirs` when non-empty
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub include_patterns: Vec<String>,

    /// Directory names skipped while counting and excluded from analysis
    #[serde(default = "default_exclude_dirs", deserialize_with = "lenient_string_list")]
    pub exclude_dirs: Vec<String>,

    /// How outcomes are shown to the user
    #[serde(default)]
    pub notification_mode: NotificationMode,

    /// Show a toast when a folder is (re-)enabled
    #[serde(default = "default_true")]
    pub show_enable_toast: bool,

    /// Show a toast when a folder is scoped off
    #[serde(default = "default_true")]
    pub show_disable_toast: bool,

    /// Minutes a folder's toast stays suppressed after the previous one
    #[serde(default = "default_toast_suppress_minutes")]
    pub toast_suppress_minutes: u64,

    /// Keep strict type checking even when a folder is scoped off
    #[serde(default)]
    pub keep_strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enable: true,
            max_files: default_max_files(),
            include_dirs: Vec::new(),
            include_patterns: Vec::new(),
            exclude_dirs: default_exclude_dirs(),
            notification_mode: NotificationMode::default(),
            show_enable_toast: true,
            show_disable_toast: true,
            toast_suppress_minutes: default_toast_suppress_minutes(),
            keep_strict: false,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration from a folder root.
    /// Looks for: .pyscope/config.toml (preferred) or pyscope.toml.
    /// An unreadable file falls back to defaults so a bad edit never
    /// knocks the folder out of its previous state.
    pub fn from_dir(dir: &Path) -> Self {
        for candidate in [dir.join(".pyscope/config.toml"), dir.join("pyscope.toml")] {
            if candidate.exists() {
                match Self::from_file(&candidate) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("ignoring config {}: {e:#}", candidate.display());
                        return Self::default();
                    }
                }
            }
        }
        Self::default()
    }

    /// The include entries fed to pattern translation
    pub fn effective_includes(&self) -> &[String] {
        if !self.include_patterns.is_empty() {
            &self.include_patterns
        } else {
            &self.include_dirs
        }
    }

    /// Toast suppression window as a duration
    pub fn suppress_window(&self) -> Duration {
        Duration::from_secs(self.toast_suppress_minutes * 60)
    }
}

/// Starter pyscope.toml written by `pyscope init`
pub fn default_toml() -> String {
    let excludes = DEFAULT_EXCLUDE_DIRS
        .iter()
        .map(|name| format!("\"{name}\""))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"# pyscope configuration

# Master switch for this folder
# enable = true

# Folders with more Python files than this get scoped off
max_files = 200

# Analysis roots while the folder stays enabled. Bare directory names
# become recursive *.py patterns; empty means the whole folder.
include_dirs = []

# Directory names skipped while counting and excluded from analysis
exclude_dirs = [{excludes}]

# One of: "toast", "statusbar", "problems", "none"
notification_mode = "toast"

# show_enable_toast = true
# show_disable_toast = true
# toast_suppress_minutes = 5

# Keep strict type checking even when a folder is scoped off
# keep_strict = false
"#
    )
}

fn default_true() -> bool {
    true
}

fn default_max_files() -> usize {
    200
}

fn default_exclude_dirs() -> Vec<String> {
    DEFAULT_EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect()
}

fn default_toast_suppress_minutes() -> u64 {
    5
}

/// Accept a list of strings, coerce a bare string to a one-element list,
/// and fold anything else down to an empty list instead of failing the
/// whole config.
fn lenient_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Many(Vec<String>),
        One(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Lenient::deserialize(deserializer)? {
        Lenient::Many(list) => list,
        Lenient::One(single) => vec![single],
        Lenient::Other(_) => {
            tracing::warn!("expected a list of strings in config, using an empty list");
            Vec::new()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.enable);
        assert_eq!(config.max_files, 200);
        assert_eq!(config.notification_mode, NotificationMode::Toast);
        assert_eq!(config.toast_suppress_minutes, 5);
        assert!(config.exclude_dirs.contains(&".venv".to_string()));
        assert!(!config.keep_strict);
    }

    #[test]
    fn test_full_config_round_trip() {
        let config: Config = toml::from_str(
            r#"
            enable = false
            max_files = 50
            include_dirs = ["src", "lib"]
            exclude_dirs = ["third_party"]
            notification_mode = "problems"
            show_disable_toast = false
            toast_suppress_minutes = 0
            keep_strict = true
            "#,
        )
        .unwrap();

        assert!(!config.enable);
        assert_eq!(config.max_files, 50);
        assert_eq!(config.include_dirs, vec!["src", "lib"]);
        assert_eq!(config.exclude_dirs, vec!["third_party"]);
        assert_eq!(config.notification_mode, NotificationMode::Problems);
        assert!(config.show_enable_toast);
        assert!(!config.show_disable_toast);
        assert!(config.keep_strict);
    }

    #[test]
    fn test_scalar_string_coerced_to_list() {
        let config: Config = toml::from_str(r#"include_dirs = "src""#).unwrap();
        assert_eq!(config.include_dirs, vec!["src"]);
    }

    #[test]
    fn test_malformed_list_coerced_to_empty() {
        let config: Config = toml::from_str("include_dirs = 42").unwrap();
        assert!(config.include_dirs.is_empty());
    }

    #[test]
    fn test_include_patterns_win_over_include_dirs() {
        let config: Config = toml::from_str(
            r#"
            include_dirs = ["src"]
            include_patterns = ["./app/**/*.py"]
            "#,
        )
        .unwrap();
        assert_eq!(config.effective_includes(), ["./app/**/*.py"]);
    }

    #[test]
    fn test_from_dir_prefers_dot_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join(".pyscope")).unwrap();
        std::fs::write(temp.path().join(".pyscope/config.toml"), "max_files = 7").unwrap();
        std::fs::write(temp.path().join("pyscope.toml"), "max_files = 9").unwrap();

        let config = Config::from_dir(temp.path());
        assert_eq!(config.max_files, 7);
    }

    #[test]
    fn test_from_dir_without_config_uses_defaults() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = Config::from_dir(temp.path());
        assert_eq!(config.max_files, 200);
    }

    #[test]
    fn test_from_dir_with_broken_file_falls_back() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("pyscope.toml"), "max_files = [nonsense").unwrap();
        let config = Config::from_dir(temp.path());
        assert_eq!(config.max_files, 200);
    }
}
