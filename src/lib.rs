//! pyscope keeps Python static analysis responsive in large workspaces.
//!
//! Each workspace folder is classified by counting its Python files:
//! a folder at or under the configured limit keeps full analysis with
//! whitelist-style include patterns, an oversized folder is scoped off
//! behind a catch-all exclude. Every settings write is preceded by a
//! snapshot of the folder's prior values, so teardown puts back exactly
//! what was there before pyscope touched anything.

pub mod classifier;
pub mod config;
pub mod domain;
pub mod lifecycle;
pub mod notifier;
pub mod patterns;
pub mod reconciler;
pub mod scanner;
pub mod settings;
pub mod snapshot;
pub mod watcher;
pub mod workspace;

pub use domain::*;
