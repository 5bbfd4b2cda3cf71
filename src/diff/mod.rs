//! Diff parsing and filtering pipeline.
//!
//! Raw diff text flows through two pure stages: [`filter_large_files`]
//! drops files whose effective size exceeds the configured ceiling, then
//! [`filter_diff`] reconciles the result with the `.lazyprignore`
//! patterns, rebuilding the diff only when the retained file set actually
//! changed. Every stage returns a new string; callers may retry the whole
//! pipeline safely.

pub mod filter;
pub mod parser;

pub use filter::{filter_large_files, rebuild_with_files};
pub use parser::{classify, parse, FileSection, LineKind};

use std::collections::HashSet;

use crate::ignore::{apply_ignore_patterns, IgnorePattern};

/// Runs the full filtering pipeline over a raw diff.
///
/// Size filtering first, then ignore-pattern filtering over the paths
/// that survived it. The result is a syntactically valid diff (or the
/// empty string when nothing survives).
pub fn filter_diff(diff: &str, max_lines: usize, patterns: &[IgnorePattern]) -> String {
    let filtered = filter_large_files(diff, max_lines);

    let paths: Vec<String> = parser::parse(&filtered)
        .into_iter()
        .map(|section| section.path)
        .collect();
    let retained = apply_ignore_patterns(&paths, patterns);

    if retained.len() == paths.len() {
        return filtered;
    }

    let allowed: HashSet<String> = retained.into_iter().collect();
    rebuild_with_files(&filtered, &allowed)
}
