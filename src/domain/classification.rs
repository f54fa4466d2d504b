/// Enable/disable decision for a folder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisAction {
    /// Analysis stays on with whitelist-style include patterns
    Enable,
    /// The folder is scoped off behind a catch-all exclude
    Disable,
}

/// Outcome of one classification pass for a folder.
///
/// Ephemeral: derived fresh on every pass, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// The decision
    pub action: AnalysisAction,

    /// Python files counted under the folder root
    pub file_count: usize,

    /// Limit the count was compared against
    pub limit: usize,

    /// Desired include patterns; `None` means the key should be removed
    /// (not set to an empty list)
    pub include: Option<Vec<String>>,

    /// Desired exclude patterns
    pub exclude: Vec<String>,

    /// Lower the analyzer's type-checking mode along with scoping off
    pub relax_strictness: bool,
}
