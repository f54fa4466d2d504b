//! Folder-scoped analyzer settings boundary

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::Folder;

/// Analyzer settings keys managed by pyscope
pub const INCLUDE_KEY: &str = "python.analysis.include";
pub const EXCLUDE_KEY: &str = "python.analysis.exclude";
pub const TYPE_CHECKING_KEY: &str = "python.analysis.typeCheckingMode";

/// Errors crossing the settings-store boundary
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write settings file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings file {path} is not valid JSON")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("settings file {path} is not a JSON object")]
    NotAnObject { path: PathBuf },
}

/// Current values of the managed keys for one folder.
///
/// `None` means the key is unset, which is observably different from an
/// empty list to the consuming analyzer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FolderSettings {
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub type_checking: Option<String>,
}

/// A partial write to one folder's settings.
///
/// `None` leaves the field untouched, `Some(None)` removes the key,
/// `Some(Some(value))` sets it.
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub include: Option<Option<Vec<String>>>,
    pub exclude: Option<Option<Vec<String>>>,
    pub type_checking: Option<Option<String>>,
}

impl SettingsPatch {
    /// True when the patch would not touch anything
    pub fn is_empty(&self) -> bool {
        self.include.is_none() && self.exclude.is_none() && self.type_checking.is_none()
    }
}

/// Read/write access to a folder's analyzer settings.
///
/// Writes always target folder scope so folders stay independently
/// configurable.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read the managed keys for a folder
    async fn read(&self, folder: &Folder) -> Result<FolderSettings, SettingsError>;

    /// Apply a partial write; an empty patch is a no-op
    async fn apply(&self, folder: &Folder, patch: SettingsPatch) -> Result<(), SettingsError>;
}

/// Settings store editing the folder's `.vscode/settings.json`.
///
/// Only the managed keys are touched; everything else in the file is
/// preserved. A missing file reads as all-unset.
#[derive(Debug, Clone, Default)]
pub struct JsonSettingsStore;

impl JsonSettingsStore {
    pub fn new() -> Self {
        Self
    }

    /// Path of the folder-scoped settings file
    pub fn settings_path(folder: &Folder) -> PathBuf {
        folder.root.join(".vscode").join("settings.json")
    }

    async fn load_map(path: &Path) -> Result<Map<String, Value>, SettingsError> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        let value: Value = serde_json::from_str(&content).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        match value {
            Value::Object(map) => Ok(map),
            _ => Err(SettingsError::NotAnObject {
                path: path.to_path_buf(),
            }),
        }
    }
}

#[async_trait]
impl SettingsStore for JsonSettingsStore {
    async fn read(&self, folder: &Folder) -> Result<FolderSettings, SettingsError> {
        let path = Self::settings_path(folder);
        let map = Self::load_map(&path).await?;

        Ok(FolderSettings {
            include: string_list(map.get(INCLUDE_KEY)),
            exclude: string_list(map.get(EXCLUDE_KEY)),
            type_checking: map
                .get(TYPE_CHECKING_KEY)
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
        })
    }

    async fn apply(&self, folder: &Folder, patch: SettingsPatch) -> Result<(), SettingsError> {
        if patch.is_empty() {
            return Ok(());
        }

        let path = Self::settings_path(folder);
        let mut map = Self::load_map(&path).await?;

        if let Some(include) = patch.include {
            set_list(&mut map, INCLUDE_KEY, include);
        }
        if let Some(exclude) = patch.exclude {
            set_list(&mut map, EXCLUDE_KEY, exclude);
        }
        if let Some(mode) = patch.type_checking {
            match mode {
                Some(mode) => {
                    map.insert(TYPE_CHECKING_KEY.to_string(), Value::String(mode));
                }
                None => {
                    map.remove(TYPE_CHECKING_KEY);
                }
            }
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SettingsError::Write {
                    path: path.clone(),
                    source: e,
                })?;
        }

        let content = serde_json::to_string_pretty(&Value::Object(map)).map_err(|e| {
            SettingsError::Parse {
                path: path.clone(),
                source: e,
            }
        })?;

        // Write to a temp file and rename so a crash never leaves a
        // half-written settings file
        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, content)
            .await
            .map_err(|e| SettingsError::Write {
                path: tmp_path.clone(),
                source: e,
            })?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| SettingsError::Write {
                path: path.clone(),
                source: e,
            })?;

        Ok(())
    }
}

/// A present-but-malformed value reads as unset
fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    let array = value?.as_array()?;
    Some(
        array
            .iter()
            .filter_map(|v| v.as_str().map(|s| s.to_string()))
            .collect(),
    )
}

fn set_list(map: &mut Map<String, Value>, key: &str, value: Option<Vec<String>>) {
    match value {
        Some(list) => {
            map.insert(
                key.to_string(),
                Value::Array(list.into_iter().map(Value::String).collect()),
            );
        }
        None => {
            map.remove(key);
        }
    }
}
