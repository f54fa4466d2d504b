//! Threshold classification of folders

use crate::patterns::{self, EXCLUDE_EVERYTHING};
use crate::{AnalysisAction, Classification};

/// Decide whether a folder stays fully analyzed or gets scoped off.
///
/// A count at or under the limit keeps analysis enabled with the
/// configured include roots; over the limit, the include key is removed
/// (not emptied, which would fight the analyzer's exclude-wins rule) and
/// a catch-all exclude takes over. The exclusion set used for counting
/// must be the same one passed here so excluded directories never tip
/// the decision.
pub fn classify(
    file_count: usize,
    limit: usize,
    include_config: &[String],
    exclude_config: &[String],
    keep_strict: bool,
) -> Classification {
    if file_count > limit {
        Classification {
            action: AnalysisAction::Disable,
            file_count,
            limit,
            include: None,
            exclude: vec![EXCLUDE_EVERYTHING.to_string()],
            relax_strictness: !keep_strict,
        }
    } else {
        Classification {
            action: AnalysisAction::Enable,
            file_count,
            limit,
            include: Some(patterns::to_include_globs(include_config)),
            exclude: patterns::to_exclude_globs(exclude_config),
            relax_strictness: false,
        }
    }
}
