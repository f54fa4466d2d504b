//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use pyscope::notifier::Presenter;
use pyscope::{Folder, Severity};

/// Create a temp workspace folder containing `count` Python files
pub fn folder_with_py_files(count: usize) -> (TempDir, Folder) {
    let temp = TempDir::new().expect("create temp dir");
    write_py_files(temp.path(), count);
    let folder = Folder::from_root(temp.path());
    (temp, folder)
}

/// Write `count` small Python files into `dir`, creating it if needed
pub fn write_py_files(dir: &Path, count: usize) {
    fs::create_dir_all(dir).expect("create dir");
    for i in 0..count {
        fs::write(dir.join(format!("mod_{i:04}.py")), "x = 1\n").expect("write file");
    }
}

/// Path of a per-test snapshot store, kept apart from any home directory
pub fn snapshot_store_path(temp: &TempDir) -> PathBuf {
    temp.path().join("store").join("snapshots.json")
}

/// Path of the folder's settings file
pub fn settings_path(folder: &Folder) -> PathBuf {
    folder.root.join(".vscode").join("settings.json")
}

/// Read the folder's raw settings JSON (panics if missing or invalid)
pub fn read_settings_json(folder: &Folder) -> serde_json::Value {
    let content = fs::read_to_string(settings_path(folder)).expect("read settings.json");
    serde_json::from_str(&content).expect("parse settings.json")
}

/// Presenter that records everything it is asked to show
#[derive(Clone, Default)]
pub struct RecordingPresenter {
    pub toasts: Arc<Mutex<Vec<String>>>,
    pub statuses: Arc<Mutex<Vec<String>>>,
    pub problems: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingPresenter {
    pub fn toast_count(&self) -> usize {
        self.toasts.lock().unwrap().len()
    }

    pub fn last_toast(&self) -> Option<String> {
        self.toasts.lock().unwrap().last().cloned()
    }
}

impl Presenter for RecordingPresenter {
    fn toast(&self, message: &str) {
        self.toasts.lock().unwrap().push(message.to_string());
    }

    fn set_status(&self, label: &str, _tooltip: &str) {
        self.statuses.lock().unwrap().push(label.to_string());
    }

    fn set_problem(&self, folder_key: &str, _severity: Severity, message: &str) {
        self.problems
            .lock()
            .unwrap()
            .push((folder_key.to_string(), message.to_string()));
    }

    fn clear(&self) {}
}
