//! Size-based diff filtering and allow-list diff reconstruction.

use std::collections::HashSet;

use super::parser::{self, classify, LineKind};

/// Removes files whose effective line count exceeds `max_lines`.
///
/// Whitespace-only input yields an empty string without invoking the
/// parser. When nothing is over the threshold the input is returned
/// byte-for-byte rather than round-tripped through the rebuilder. When
/// every file is removed the result is the empty string.
pub fn filter_large_files(diff: &str, max_lines: usize) -> String {
    if diff.trim().is_empty() {
        return String::new();
    }

    let effective = parser::effective_line_counts(diff);
    let oversized: HashSet<&str> = effective
        .iter()
        .filter(|(_, count)| **count > max_lines)
        .map(|(path, _)| path.as_str())
        .collect();

    if oversized.is_empty() {
        return diff.to_string();
    }

    let allowed: HashSet<String> = effective
        .keys()
        .filter(|path| !oversized.contains(path.as_str()))
        .cloned()
        .collect();

    rebuild_with_files(diff, &allowed)
}

/// Reconstructs a diff containing only the sections whose path is in
/// `allowed`.
///
/// A streaming re-scan with the same header-detection rule as the
/// parser: sections appear in source order regardless of any ordering
/// on `allowed`, and sections with an unparseable header are always
/// excluded. Output is trimmed of trailing whitespace and terminated by
/// exactly one newline; with no retained section it is the empty string.
/// Idempotent over its own output.
pub fn rebuild_with_files(diff: &str, allowed: &HashSet<String>) -> String {
    let normalized = diff.replace("\r\n", "\n");
    let mut retained: Vec<&str> = Vec::new();
    let mut include_current = false;

    for line in normalized.split('\n') {
        if let LineKind::Header(paths) = classify(line) {
            include_current = paths.is_some_and(|(_, new_path)| allowed.contains(new_path));
            if include_current {
                retained.push(line);
            }
        } else if include_current {
            retained.push(line);
        }
    }

    if retained.is_empty() {
        return String::new();
    }

    format!("{}\n", retained.join("\n").trim_end())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn small_and_large_diff() -> &'static str {
        "diff --git a/small.py b/small.py\n\
         index 123..456 100644\n\
         --- a/small.py\n\
         +++ b/small.py\n\
         @@ -1 +1 @@\n\
         -old\n\
         +new\n\
         \n\
         diff --git a/large.py b/large.py\n\
         index 789..abc 100644\n\
         --- a/large.py\n\
         +++ b/large.py\n\
         @@ -1,1000 +1,1000 @@\n"
    }

    #[test]
    fn removes_files_exceeding_threshold() {
        let result = filter_large_files(small_and_large_diff(), 10);
        assert!(result.contains("small.py"));
        assert!(!result.contains("large.py"));
    }

    #[test]
    fn high_threshold_returns_input_verbatim() {
        let diff = small_and_large_diff();
        let result = filter_large_files(diff, 1100);
        assert_eq!(result, diff);
    }

    #[test]
    fn empty_input_short_circuits() {
        assert_eq!(filter_large_files("", 10), "");
        assert_eq!(filter_large_files("   \n\n  ", 10), "");
    }

    #[test]
    fn all_files_removed_yields_empty_string() {
        let diff = "diff --git a/huge.py b/huge.py\n\
                     index 123..456 100644\n\
                     --- a/huge.py\n\
                     +++ b/huge.py\n\
                     @@ -1,2000 +1,2000 @@\n";
        assert_eq!(filter_large_files(diff, 100), "");
    }

    #[test]
    fn rebuild_preserves_source_ordering() {
        let diff = "diff --git a/b.rs b/b.rs\n\
                     index 111..222 100644\n\
                     +one\n\
                     diff --git a/a.rs b/a.rs\n\
                     index 333..444 100644\n\
                     +two\n";
        let allowed: HashSet<String> = ["a.rs", "b.rs"].iter().map(ToString::to_string).collect();
        let result = rebuild_with_files(diff, &allowed);
        let b_pos = result.find("b.rs").unwrap();
        let a_pos = result.find("a.rs").unwrap();
        assert!(b_pos < a_pos, "source order must win over allow-list order");
    }

    #[test]
    fn rebuild_excludes_unparseable_headers() {
        let diff = "diff --git mangled\n\
                     +orphan\n\
                     diff --git a/keep.rs b/keep.rs\n\
                     +kept\n";
        let allowed: HashSet<String> = ["keep.rs"].iter().map(ToString::to_string).collect();
        let result = rebuild_with_files(diff, &allowed);
        assert!(!result.contains("orphan"));
        assert!(result.contains("kept"));
    }

    #[test]
    fn rebuild_with_empty_allow_list_is_empty() {
        let result = rebuild_with_files(small_and_large_diff(), &HashSet::new());
        assert_eq!(result, "");
    }

    #[test]
    fn rebuild_output_ends_with_single_newline() {
        let allowed: HashSet<String> =
            ["small.py"].iter().map(ToString::to_string).collect();
        let result = rebuild_with_files(small_and_large_diff(), &allowed);
        assert!(result.ends_with("+new\n"));
        assert!(!result.ends_with("\n\n"));
    }

    // ── property tests ─────────────────────────────────────────

    /// One synthetic file section: body line count and an optional
    /// declared hunk count.
    #[derive(Debug, Clone)]
    struct GenFile {
        body_lines: usize,
        declared: Option<usize>,
    }

    fn gen_file() -> impl Strategy<Value = GenFile> {
        (0usize..20, proptest::option::of(1usize..2000)).prop_map(|(body_lines, declared)| {
            GenFile {
                body_lines,
                declared,
            }
        })
    }

    /// Renders a diff with one uniquely-named section per generated file.
    fn render_diff(files: &[GenFile]) -> String {
        let mut out = String::new();
        for (i, file) in files.iter().enumerate() {
            let path = format!("file_{i}.rs");
            out.push_str(&format!("diff --git a/{path} b/{path}\n"));
            out.push_str("index 1111111..2222222 100644\n");
            out.push_str(&format!("--- a/{path}\n"));
            out.push_str(&format!("+++ b/{path}\n"));
            match file.declared {
                Some(declared) => {
                    out.push_str(&format!("@@ -1,{declared} +1,{declared} @@\n"));
                }
                None => out.push_str("@@ -1 +1 @@\n"),
            }
            for line in 0..file.body_lines {
                out.push_str(&format!("+line {line}\n"));
            }
        }
        out
    }

    proptest! {
        #[test]
        fn rebuild_is_idempotent(
            files in proptest::collection::vec(gen_file(), 0..6),
            mask in proptest::collection::vec(proptest::bool::ANY, 6),
        ) {
            let diff = render_diff(&files);
            let allowed: HashSet<String> = files
                .iter()
                .enumerate()
                .filter(|(i, _)| mask[*i])
                .map(|(i, _)| format!("file_{i}.rs"))
                .collect();

            let once = rebuild_with_files(&diff, &allowed);
            let twice = rebuild_with_files(&once, &allowed);
            prop_assert_eq!(&once, &twice);
        }

        #[test]
        fn size_filter_is_monotone(
            files in proptest::collection::vec(gen_file(), 0..6),
            low in 0usize..100,
            extra in 0usize..2000,
        ) {
            let diff = render_diff(&files);
            let high = low + extra;

            let kept_low = parser::parse(&filter_large_files(&diff, low)).len();
            let kept_high = parser::parse(&filter_large_files(&diff, high)).len();
            prop_assert!(kept_low <= kept_high);
        }
    }
}
