//! Python file counting walk

use std::collections::HashSet;
use std::path::Path;

use ignore::WalkBuilder;

/// Counts Python source files under a folder root.
///
/// Any directory whose base name appears in the exclusion set is pruned
/// entirely, so its contents can never push a folder over the limit.
/// Unreadable subtrees contribute zero; the walk never fails.
pub struct FileCounter {
    excluded: HashSet<String>,
}

impl FileCounter {
    /// Create a counter that prunes the given directory names
    pub fn new(excluded_names: &[String]) -> Self {
        Self {
            excluded: excluded_names
                .iter()
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect(),
        }
    }

    /// Count `.py` files under `root`
    pub fn count(&self, root: &Path) -> usize {
        let excluded = self.excluded.clone();

        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(false)
            .filter_entry(move |entry| {
                // Always allow the root itself
                if entry.depth() == 0 {
                    return true;
                }
                let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                if !is_dir {
                    return true;
                }
                match entry.file_name().to_str() {
                    Some(name) => !excluded.contains(name),
                    None => true,
                }
            })
            .build();

        let mut count = 0;
        for entry in walker.flatten() {
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if is_file && is_python_file(entry.path()) {
                count += 1;
            }
        }
        count
    }
}

fn is_python_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("py")
}
