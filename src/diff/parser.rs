//! Unified diff parsing: per-file sections and line counting.
//!
//! A diff is segmented at `diff --git a/<old> b/<new>` header lines. Every
//! line is classified exactly once by [`classify`] into a [`LineKind`]; the
//! same discriminator backs both the counting pass here and the rebuild
//! pass in [`super::filter`].

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// Marker that begins a per-file section in unified diff output.
pub const FILE_HEADER_MARKER: &str = "diff --git ";

/// Exact line emitted for binary content; the section containing it is
/// discarded entirely.
const BINARY_MARKER: &str = "Binary files differ";

/// Exact marker for a file that does not end with a newline.
const NO_NEWLINE_MARKER: &str = "\\ No newline at end of file";

/// Hunk header of the form `@@ -a[,b] +c[,d] @@`; capture 1 is the
/// new-side line count when present. The optional comma is deliberately
/// lenient about `+c,` with no trailing digits.
#[allow(clippy::expect_used)]
static HUNK_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@ -\d+(?:,\d+)? \+\d+,?(\d+)? @@").expect("hunk header pattern is valid")
});

/// Classification of a single raw diff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `diff --git a/<old> b/<new>`, with the extracted `(old, new)` path
    /// pair, or `None` when the two-path extraction fails.
    Header(Option<(&'a str, &'a str)>),
    /// `index <old>..<new> <mode>`.
    IndexLine,
    /// `--- a/<path>`.
    OldFileMarker,
    /// `+++ b/<path>`.
    NewFileMarker,
    /// `@@ -a[,b] +c[,d] @@`, with the declared new-side line count when
    /// the header parses and carries one.
    HunkHeader(Option<usize>),
    /// An added line (`+` prefix).
    Addition,
    /// A removed line (`-` prefix).
    Deletion,
    /// An unchanged context line (single space prefix).
    Context,
    /// The exact `\ No newline at end of file` marker.
    NoNewlineMarker,
    /// Anything else: blank separators between sections, binary markers,
    /// extended header lines git does not prefix.
    Other,
}

impl LineKind<'_> {
    /// Whether this line belongs to the current section's diff content
    /// and counts toward its actual line total.
    ///
    /// The section header itself is not content by classification; the
    /// parser seeds each section's count at 1 to include it.
    pub fn is_content(&self) -> bool {
        !matches!(self, LineKind::Header(_) | LineKind::Other)
    }
}

/// Classifies one raw diff line.
///
/// Prefix checks are ordered so that `--- ` wins over `-` and `+++ `
/// over `+`.
pub fn classify(line: &str) -> LineKind<'_> {
    if let Some(rest) = line.strip_prefix(FILE_HEADER_MARKER) {
        return LineKind::Header(parse_header_paths(rest));
    }
    if line.starts_with("index ") {
        return LineKind::IndexLine;
    }
    if line.starts_with("--- ") {
        return LineKind::OldFileMarker;
    }
    if line.starts_with("+++ ") {
        return LineKind::NewFileMarker;
    }
    if line.starts_with("@@") {
        return LineKind::HunkHeader(parse_hunk_new_count(line));
    }
    if line.starts_with('+') {
        return LineKind::Addition;
    }
    if line.starts_with('-') {
        return LineKind::Deletion;
    }
    if line.starts_with(' ') {
        return LineKind::Context;
    }
    if line == NO_NEWLINE_MARKER {
        return LineKind::NoNewlineMarker;
    }
    LineKind::Other
}

/// Extracts `(old, new)` from the remainder of a header line after
/// `diff --git `.
///
/// The split point is the last ` b/` occurrence so paths containing
/// spaces resolve the same way a greedy `a/(.*) b/(.*)` match would.
fn parse_header_paths(rest: &str) -> Option<(&str, &str)> {
    let rest = rest.strip_prefix("a/")?;
    let split = rest.rfind(" b/")?;
    Some((&rest[..split], &rest[split + 3..]))
}

/// Extracts the declared new-side line count from a hunk header.
///
/// `@@ -1,5 +1,8 @@` yields `Some(8)`; a single-line `+` side with no
/// comma (`@@ -1 +1 @@`) contributes nothing, as does any `@@` line that
/// fails to parse.
fn parse_hunk_new_count(line: &str) -> Option<usize> {
    HUNK_HEADER_RE.captures(line)?.get(1)?.as_str().parse().ok()
}

/// A contiguous run of lines belonging to one file within a diff.
#[derive(Debug, Clone)]
pub struct FileSection {
    /// Post-change file path (the `b/` side of the header).
    pub path: String,
    /// Raw lines of the section, header line inclusive.
    pub lines: Vec<String>,
    /// Count of the header plus content-classified lines.
    pub actual_lines: usize,
    /// Largest declared new-side count across the section's hunk
    /// headers, or `None` when no hunk header contributed one.
    pub declared_lines: Option<usize>,
}

impl FileSection {
    /// The size metric used for threshold filtering: the declared hunk
    /// count when one parsed and exceeds the actual count, else the
    /// actual count.
    pub fn effective_lines(&self) -> usize {
        self.declared_lines
            .map_or(self.actual_lines, |declared| {
                declared.max(self.actual_lines)
            })
    }
}

/// Splits a raw diff into its ordered per-file sections.
///
/// Input is normalized to `\n` line endings and the single trailing
/// empty line a final newline produces is dropped. A header whose path
/// extraction fails opens no section; subsequent lines are attributed
/// to no file until the next valid header. A section followed by the
/// literal `Binary files differ` line is discarded entirely. When a
/// path repeats, the last header wins.
pub fn parse(diff: &str) -> Vec<FileSection> {
    let normalized = diff.replace("\r\n", "\n");
    let mut lines: Vec<&str> = normalized.split('\n').collect();
    if lines.last() == Some(&"") {
        lines.pop();
    }

    let mut sections: Vec<FileSection> = Vec::new();
    let mut current: Option<FileSection> = None;

    for line in lines {
        let kind = classify(line);

        if let LineKind::Header(paths) = kind {
            if let Some(done) = current.take() {
                push_section(&mut sections, done);
            }
            current = paths.map(|(_, new_path)| FileSection {
                path: new_path.to_string(),
                actual_lines: 1,
                declared_lines: None,
                lines: vec![line.to_string()],
            });
            continue;
        }

        let Some(section) = current.as_mut() else {
            continue;
        };

        if line == BINARY_MARKER {
            current = None;
            continue;
        }

        if kind.is_content() {
            section.actual_lines += 1;
        }
        if let LineKind::HunkHeader(Some(count)) = kind {
            if section.declared_lines.map_or(true, |declared| count > declared) {
                section.declared_lines = Some(count);
            }
        }
        section.lines.push(line.to_string());
    }

    if let Some(done) = current.take() {
        push_section(&mut sections, done);
    }

    sections
}

/// Appends a finished section, dropping any earlier section with the
/// same path so the last header wins.
fn push_section(sections: &mut Vec<FileSection>, section: FileSection) {
    sections.retain(|existing| existing.path != section.path);
    sections.push(section);
}

/// Maps each file path to its actual counted line total.
pub fn line_counts(diff: &str) -> HashMap<String, usize> {
    parse(diff)
        .into_iter()
        .map(|section| (section.path, section.actual_lines))
        .collect()
}

/// Maps each file path to its effective line total (see
/// [`FileSection::effective_lines`]).
pub fn effective_line_counts(diff: &str) -> HashMap<String, usize> {
    parse(diff)
        .into_iter()
        .map(|section| {
            let effective = section.effective_lines();
            (section.path, effective)
        })
        .collect()
}
