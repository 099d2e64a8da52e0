//! Splitting a file's unified diff into independently stageable hunks.

pub mod patch;
pub mod select;

pub use patch::{group_by_file, stage_hunks, FilePatch, StageReport};
pub use select::{Decision, HunkSelector, Selection};

const HUNK_MARKER: &str = "@@";

/// One body line of a hunk, without its one-character prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    Context(String),
    Added(String),
    Removed(String),
}

impl DiffLine {
    fn parse(line: &str) -> Option<Self> {
        if let Some(rest) = line.strip_prefix('+') {
            Some(DiffLine::Added(rest.to_string()))
        } else if let Some(rest) = line.strip_prefix('-') {
            Some(DiffLine::Removed(rest.to_string()))
        } else {
            line.strip_prefix(' ')
                .map(|rest| DiffLine::Context(rest.to_string()))
        }
    }

    /// The line as it appeared in the diff, prefix included.
    pub fn render(&self) -> String {
        match self {
            DiffLine::Context(s) => format!(" {}", s),
            DiffLine::Added(s) => format!("+{}", s),
            DiffLine::Removed(s) => format!("-{}", s),
        }
    }
}

/// Old/new line ranges from a `@@ -a,b +c,d @@` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkRange {
    pub old_start: u32,
    pub old_len: u32,
    pub new_start: u32,
    pub new_len: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub file_path: String,
    /// Position of this hunk within its file's diff.
    pub index: usize,
    pub header: String,
    pub lines: Vec<DiffLine>,
}

impl Hunk {
    pub fn added(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| matches!(l, DiffLine::Added(_)))
            .count()
    }

    pub fn removed(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| matches!(l, DiffLine::Removed(_)))
            .count()
    }

    pub fn summary(&self) -> String {
        format!("{} +{} -{}", self.file_path, self.added(), self.removed())
    }

    pub fn body_lines(&self) -> Vec<String> {
        self.lines.iter().map(DiffLine::render).collect()
    }

    /// Parse the ranges out of the header. Staging never depends on this.
    pub fn range(&self) -> Option<HunkRange> {
        let inner = self.header.strip_prefix(HUNK_MARKER)?;
        let end = inner.find(HUNK_MARKER)?;
        let mut parts = inner[..end].split_whitespace();
        let (old_start, old_len) = parse_range(parts.next()?.strip_prefix('-')?)?;
        let (new_start, new_len) = parse_range(parts.next()?.strip_prefix('+')?)?;
        Some(HunkRange {
            old_start,
            old_len,
            new_start,
            new_len,
        })
    }
}

fn parse_range(s: &str) -> Option<(u32, u32)> {
    match s.split_once(',') {
        Some((start, len)) => Some((start.parse().ok()?, len.parse().ok()?)),
        None => Some((s.parse().ok()?, 1)),
    }
}

/// Split one file's unified diff into hunks.
///
/// Lines before the first `@@` marker (file headers) are ignored, as is any
/// line not starting with `+`, `-` or a space. Malformed input degrades to
/// fewer hunks rather than an error.
pub fn parse_hunks(file_path: &str, diff: &str) -> Vec<Hunk> {
    let mut hunks = Vec::new();
    let mut current: Option<Hunk> = None;

    for line in diff.split('\n') {
        if line.starts_with(HUNK_MARKER) {
            if let Some(done) = current.take() {
                hunks.push(done);
            }
            current = Some(Hunk {
                file_path: file_path.to_string(),
                index: hunks.len(),
                header: line.to_string(),
                lines: Vec::new(),
            });
        } else if let Some(hunk) = current.as_mut() {
            if let Some(parsed) = DiffLine::parse(line) {
                hunk.lines.push(parsed);
            }
        }
    }

    if let Some(done) = current {
        hunks.push(done);
    }

    hunks
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_HUNKS: &str = "diff --git a/src/lib.rs b/src/lib.rs
index 3b18e51..a9c1f2d 100644
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -1,3 +1,4 @@ mod a;
 use std::io;
+use std::fs;

 fn main() {
@@ -20,2 +21,2 @@ fn helper() {
-    old();
+    new();
 }
";

    #[test]
    fn test_single_hunk() {
        let hunks = parse_hunks("x.txt", "@@ -1,2 +1,3 @@\n a\n+b\n c");
        assert_eq!(hunks.len(), 1);
        assert_eq!(hunks[0].header, "@@ -1,2 +1,3 @@");
        assert_eq!(hunks[0].body_lines(), vec![" a", "+b", " c"]);
        assert_eq!(hunks[0].file_path, "x.txt");
    }

    #[test]
    fn test_empty_diff() {
        assert!(parse_hunks("x.txt", "").is_empty());
    }

    #[test]
    fn test_body_lines_without_marker_are_ignored() {
        assert!(parse_hunks("x.txt", "+added\n-removed\n context").is_empty());
    }

    #[test]
    fn test_hunk_count_and_order() {
        let hunks = parse_hunks("src/lib.rs", TWO_HUNKS);
        assert_eq!(hunks.len(), 2);
        assert_eq!(hunks[0].header, "@@ -1,3 +1,4 @@ mod a;");
        assert_eq!(hunks[1].header, "@@ -20,2 +21,2 @@ fn helper() {");
        assert_eq!(hunks[0].index, 0);
        assert_eq!(hunks[1].index, 1);
    }

    #[test]
    fn test_file_headers_not_in_body() {
        let hunks = parse_hunks("src/lib.rs", TWO_HUNKS);
        for hunk in &hunks {
            assert!(hunk.body_lines().iter().all(|l| !l.starts_with("+++")));
            assert!(hunk.body_lines().iter().all(|l| !l.starts_with("---")));
        }
        assert_eq!(
            hunks[0].body_lines(),
            vec![" use std::io;", "+use std::fs;", " fn main() {"]
        );
    }

    #[test]
    fn test_no_newline_marker_dropped() {
        let diff = "@@ -1 +1 @@\n-old\n\\ No newline at end of file\n\
                    +new\n\\ No newline at end of file\n";
        let hunks = parse_hunks("a.txt", diff);
        assert_eq!(hunks[0].body_lines(), vec!["-old", "+new"]);
    }

    #[test]
    fn test_summary_counts() {
        let hunks = parse_hunks("src/lib.rs", TWO_HUNKS);
        assert_eq!(hunks[1].summary(), "src/lib.rs +1 -1");
        assert_eq!(hunks[0].added(), 1);
        assert_eq!(hunks[0].removed(), 0);
    }

    #[test]
    fn test_range_parsing() {
        let hunks = parse_hunks("src/lib.rs", TWO_HUNKS);
        assert_eq!(
            hunks[1].range(),
            Some(HunkRange {
                old_start: 20,
                old_len: 2,
                new_start: 21,
                new_len: 2
            })
        );

        let single = parse_hunks("a.txt", "@@ -3 +3 @@\n-x\n+y");
        assert_eq!(
            single[0].range(),
            Some(HunkRange {
                old_start: 3,
                old_len: 1,
                new_start: 3,
                new_len: 1
            })
        );
    }

    #[test]
    fn test_crlf_content_preserved() {
        let hunks = parse_hunks("win.txt", "@@ -1 +1 @@\r\n-a\r\n+b\r\n");
        assert_eq!(hunks[0].body_lines(), vec!["-a\r", "+b\r"]);
    }
}
