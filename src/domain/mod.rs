//! Core domain types for pyscope

mod classification;
mod folder;
mod notification;

pub use classification::{AnalysisAction, Classification};
pub use folder::{Folder, FolderKey};
pub use notification::{NotificationMode, Severity};
