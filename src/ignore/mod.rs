//! `.lazyprignore` loading and gitignore-style path filtering.

use std::fs;
use std::path::Path;

use globset::GlobBuilder;
use tracing::debug;

/// Name of the project-local ignore file.
pub const IGNORE_FILE_NAME: &str = ".lazyprignore";

/// A single line from an ignore file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnorePattern {
    /// Whether the pattern re-includes paths a regular pattern excluded.
    pub negated: bool,
    /// Glob body with any leading `!` stripped.
    pub glob: String,
}

impl IgnorePattern {
    /// Parses one pattern line, splitting off a leading `!`.
    pub fn new(line: &str) -> Self {
        match line.strip_prefix('!') {
            Some(body) => Self {
                negated: true,
                glob: body.to_string(),
            },
            None => Self {
                negated: false,
                glob: line.to_string(),
            },
        }
    }
}

/// Loads ignore patterns from `.lazyprignore` in the current directory.
pub fn load_ignore_patterns() -> Vec<IgnorePattern> {
    load_ignore_patterns_from(Path::new(IGNORE_FILE_NAME))
}

/// Loads ignore patterns from an explicit file path.
///
/// A missing or unreadable file yields an empty list. Comment (`#`) and
/// empty lines are skipped before they reach the filter.
pub fn load_ignore_patterns_from(path: &Path) -> Vec<IgnorePattern> {
    let Ok(content) = fs::read_to_string(path) else {
        return Vec::new();
    };

    let patterns: Vec<IgnorePattern> = content
        .lines()
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(IgnorePattern::new)
        .collect();

    debug!(
        "Loaded {} ignore patterns from {}",
        patterns.len(),
        path.display()
    );
    patterns
}

/// Evaluates one glob body (negation already stripped by the caller)
/// against a file path.
///
/// Gitignore-style semantics: `*` stays within a path segment, `**`
/// crosses segments, a trailing `/` matches the named directory and
/// everything beneath it, and a pattern with no internal `/` is
/// unanchored (it also matches under any directory prefix). A glob that
/// fails to compile degrades to a literal comparison instead of raising.
pub fn matches_glob(glob: &str, path: &str) -> bool {
    let body = match glob.strip_suffix('/') {
        Some(dir) => format!("{dir}/**"),
        None => glob.to_string(),
    };

    if glob_matches(&body, path) {
        return true;
    }

    let anchored = glob.trim_end_matches('/').contains('/');
    if !anchored {
        return glob_matches(&format!("**/{body}"), path);
    }
    false
}

fn glob_matches(pattern: &str, path: &str) -> bool {
    match GlobBuilder::new(pattern).literal_separator(true).build() {
        Ok(glob) => glob.compile_matcher().is_match(path),
        Err(_) => pattern == path,
    }
}

/// Applies an ordered pattern list to a list of file paths, returning
/// the retained subset in input order.
///
/// A path is dropped when it matches any regular pattern and no negation
/// pattern rescues it; a negation pattern with no matching regular
/// pattern has no effect. An empty pattern list returns the input
/// unchanged without any glob evaluation.
pub fn apply_ignore_patterns(paths: &[String], patterns: &[IgnorePattern]) -> Vec<String> {
    if patterns.is_empty() {
        return paths.to_vec();
    }

    let (negation, regular): (Vec<&IgnorePattern>, Vec<&IgnorePattern>) =
        patterns.iter().partition(|pattern| pattern.negated);

    paths
        .iter()
        .filter(|path| {
            let mut ignored = regular
                .iter()
                .any(|pattern| matches_glob(&pattern.glob, path));
            if ignored
                && negation
                    .iter()
                    .any(|pattern| matches_glob(&pattern.glob, path))
            {
                ignored = false;
            }
            !ignored
        })
        .cloned()
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn paths(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn pattern_line_parsing() {
        let plain = IgnorePattern::new("*.log");
        assert!(!plain.negated);
        assert_eq!(plain.glob, "*.log");

        let negated = IgnorePattern::new("!keep.log");
        assert!(negated.negated);
        assert_eq!(negated.glob, "keep.log");
    }

    #[test]
    fn glob_matching_cases() {
        assert!(matches_glob("*.log", "debug.log"));
        assert!(!matches_glob("*.log", "debug.txt"));
        assert!(matches_glob("*.log", "nested/dir/debug.log"));
        assert!(matches_glob("__pycache__/", "__pycache__/file.pyc"));
        assert!(matches_glob("__pycache__/", "src/__pycache__/file.pyc"));
        assert!(matches_glob("temp/**", "temp/file.txt"));
        assert!(matches_glob("temp/**", "temp/subdir/file.txt"));
        assert!(matches_glob("*.pyc", "file.pyc"));
        assert!(!matches_glob("*.pyc", "file.py"));
    }

    #[test]
    fn star_stays_within_a_segment() {
        assert!(matches_glob("src/*.rs", "src/main.rs"));
        assert!(!matches_glob("src/*.rs", "src/nested/main.rs"));
    }

    #[test]
    fn patterns_with_a_slash_are_anchored() {
        assert!(!matches_glob("src/*.rs", "vendor/src/main.rs"));
    }

    #[test]
    fn malformed_glob_degrades_to_literal() {
        // Unclosed character class cannot compile.
        assert!(!matches_glob("[oops", "anything"));
        assert!(matches_glob("[oops", "[oops"));
    }

    #[test]
    fn filters_matching_files() {
        let files = paths(&["app.py", "debug.log", "error.log", "main.py"]);
        let patterns = vec![IgnorePattern::new("*.log")];
        assert_eq!(
            apply_ignore_patterns(&files, &patterns),
            paths(&["app.py", "main.py"])
        );
    }

    #[test]
    fn empty_pattern_list_is_a_no_op() {
        let files = paths(&["app.py", "debug.log"]);
        assert_eq!(apply_ignore_patterns(&files, &[]), files);
    }

    #[test]
    fn multiple_patterns_apply_cumulatively() {
        let files = paths(&["app.py", "debug.log", "temp.tmp", "__pycache__/cache.pyc"]);
        let patterns = vec![IgnorePattern::new("*.log"), IgnorePattern::new("*.tmp")];
        assert_eq!(
            apply_ignore_patterns(&files, &patterns),
            paths(&["app.py", "__pycache__/cache.pyc"])
        );
    }

    #[test]
    fn negation_rescues_only_previously_ignored_paths() {
        let files = paths(&["keep.log", "drop.log"]);
        let patterns = vec![IgnorePattern::new("*.log"), IgnorePattern::new("!keep.log")];
        assert_eq!(apply_ignore_patterns(&files, &patterns), paths(&["keep.log"]));
    }

    #[test]
    fn negation_without_a_matching_regular_pattern_has_no_effect() {
        let files = paths(&["readme.md"]);
        let patterns = vec![IgnorePattern::new("!readme.md")];
        assert_eq!(apply_ignore_patterns(&files, &patterns), files);
    }

    #[test]
    fn load_skips_comments_and_blank_lines() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join(IGNORE_FILE_NAME);
        fs::write(&file, "# comment\n*.log\n\n__pycache__/\n").unwrap();

        let patterns = load_ignore_patterns_from(&file);
        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].glob, "*.log");
        assert_eq!(patterns[1].glob, "__pycache__/");
    }

    #[test]
    fn load_missing_file_returns_empty() {
        let dir = TempDir::new().unwrap();
        let patterns = load_ignore_patterns_from(&dir.path().join("absent"));
        assert!(patterns.is_empty());
    }
}
