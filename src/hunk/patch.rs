//! Rebuilding per-file patches from selected hunks and applying them to the index.

use std::io::Write;

use tracing::{debug, info};

use crate::error::StageError;
use crate::git::Vcs;

use super::Hunk;

/// Placeholder blob ids: `git apply` trusts the paths when these don't resolve.
const PLACEHOLDER_INDEX: &str = "index 0000000..1111111 100644";

/// The selected hunks of a single file, in original diff order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePatch {
    pub file_path: String,
    pub hunks: Vec<Hunk>,
}

impl FilePatch {
    pub fn render(&self) -> String {
        let path = &self.file_path;
        let mut patch = String::new();

        patch.push_str(&format!("diff --git a/{} b/{}\n", path, path));
        patch.push_str(PLACEHOLDER_INDEX);
        patch.push('\n');
        patch.push_str(&format!("--- a/{}\n", path));
        patch.push_str(&format!("+++ b/{}\n", path));

        for hunk in &self.hunks {
            patch.push_str(&hunk.header);
            patch.push('\n');
            for line in &hunk.lines {
                patch.push_str(&line.render());
                patch.push('\n');
            }
        }

        patch
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageReport {
    pub staged_files: Vec<String>,
}

/// Group hunks by file. Files keep first-appearance order; hunks within a
/// file are put back in diff order regardless of selection order.
pub fn group_by_file(hunks: &[Hunk]) -> Vec<FilePatch> {
    let mut groups: Vec<FilePatch> = Vec::new();

    for hunk in hunks {
        match groups.iter_mut().find(|g| g.file_path == hunk.file_path) {
            Some(group) => group.hunks.push(hunk.clone()),
            None => groups.push(FilePatch {
                file_path: hunk.file_path.clone(),
                hunks: vec![hunk.clone()],
            }),
        }
    }

    for group in &mut groups {
        group.hunks.sort_by_key(|h| h.index);
    }

    groups
}

/// Apply one patch per file to the index.
///
/// Stops at the first file git rejects. Files staged before that stay
/// staged and are listed in the error.
pub fn stage_hunks(vcs: &dyn Vcs, hunks: &[Hunk]) -> Result<StageReport, StageError> {
    if hunks.is_empty() {
        return Err(StageError::NothingSelected);
    }

    let mut report = StageReport::default();

    for file_patch in group_by_file(hunks) {
        let file = file_patch.file_path.clone();
        let content = file_patch.render();

        // Removed on drop, whether or not the apply succeeds.
        let mut tmp = tempfile::Builder::new()
            .prefix("llm-commit-")
            .suffix(".patch")
            .tempfile()
            .map_err(|source| StageError::WritePatch {
                file: file.clone(),
                source,
            })?;
        tmp.write_all(content.as_bytes())
            .and_then(|_| tmp.flush())
            .map_err(|source| StageError::WritePatch {
                file: file.clone(),
                source,
            })?;

        debug!(
            file = %file,
            hunks = file_patch.hunks.len(),
            path = %tmp.path().display(),
            "applying patch to index"
        );

        if let Err(source) = vcs.apply_cached(tmp.path()) {
            return Err(StageError::Apply {
                file,
                applied: report.staged_files,
                source,
            });
        }

        info!(file = %file, "staged hunks");
        report.staged_files.push(file);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hunk::parse_hunks;
    use crate::testing::FakeVcs;

    fn two_hunk_file() -> Vec<Hunk> {
        parse_hunks(
            "notes.txt",
            "@@ -1,2 +1,2 @@\n-one\n+ONE\n two\n@@ -10,2 +10,2 @@\n ten\n-eleven\n+ELEVEN\n",
        )
    }

    #[test]
    fn test_render_header_and_body() {
        let patch = FilePatch {
            file_path: "x.txt".to_string(),
            hunks: parse_hunks("x.txt", "@@ -1,2 +1,3 @@\n a\n+b\n c"),
        };
        assert_eq!(
            patch.render(),
            "diff --git a/x.txt b/x.txt\n\
             index 0000000..1111111 100644\n\
             --- a/x.txt\n\
             +++ b/x.txt\n\
             @@ -1,2 +1,3 @@\n a\n+b\n c\n"
        );
    }

    #[test]
    fn test_grouping_restores_diff_order() {
        let mut hunks = two_hunk_file();
        hunks.reverse();

        let groups = group_by_file(&hunks);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].hunks[0].header, "@@ -1,2 +1,2 @@");
        assert_eq!(groups[0].hunks[1].header, "@@ -10,2 +10,2 @@");
    }

    #[test]
    fn test_two_files_two_patches() {
        let mut hunks = parse_hunks("a.txt", "@@ -1 +1 @@\n-a\n+A");
        hunks.extend(parse_hunks("b.txt", "@@ -1 +1 @@\n-b\n+B"));

        let vcs = FakeVcs::default();
        let report = stage_hunks(&vcs, &hunks).unwrap();
        assert_eq!(report.staged_files, vec!["a.txt", "b.txt"]);

        let applied = vcs.applied_patches();
        assert_eq!(applied.len(), 2);
        assert!(applied[0].contains("+++ b/a.txt"));
        assert!(!applied[0].contains("b.txt"));
        assert!(applied[1].contains("+++ b/b.txt"));
        assert!(!applied[1].contains("a.txt"));
    }

    #[test]
    fn test_empty_selection_rejected() {
        let vcs = FakeVcs::default();
        assert!(matches!(
            stage_hunks(&vcs, &[]),
            Err(StageError::NothingSelected)
        ));
    }

    #[test]
    fn test_failure_stops_later_files() {
        let mut hunks = parse_hunks("a.txt", "@@ -1 +1 @@\n-a\n+A");
        hunks.extend(parse_hunks("b.txt", "@@ -1 +1 @@\n-b\n+B"));
        hunks.extend(parse_hunks("c.txt", "@@ -1 +1 @@\n-c\n+C"));

        let vcs = FakeVcs::default().rejecting("b.txt");
        match stage_hunks(&vcs, &hunks) {
            Err(StageError::Apply { file, applied, .. }) => {
                assert_eq!(file, "b.txt");
                assert_eq!(applied, vec!["a.txt"]);
            }
            other => panic!("expected apply failure, got {:?}", other),
        }
        // c.txt never attempted
        assert_eq!(vcs.applied_patches().len(), 2);
    }

    #[test]
    fn test_temp_patch_removed() {
        let hunks = two_hunk_file();
        let vcs = FakeVcs::default();
        stage_hunks(&vcs, &hunks).unwrap();
        for path in vcs.patch_paths() {
            assert!(!path.exists());
        }

        let failing = FakeVcs::default().rejecting("notes.txt");
        assert!(stage_hunks(&failing, &hunks).is_err());
        for path in failing.patch_paths() {
            assert!(!path.exists());
        }
    }
}
