use std::path::Path;

use crate::error::GitError;

use super::GitCli;

/// Paths changed relative to HEAD (staged or not), repo-relative.
///
/// Names come back verbatim so they can be handed straight back to git as pathspecs.
pub fn modified_files(git: &GitCli) -> Result<Vec<String>, GitError> {
    let out = git.run(["-c", "core.quotePath=false", "diff", "--name-only", "-z", "HEAD"])?;
    Ok(nul_separated(&out))
}

/// Unified diff of one path against HEAD.
pub fn file_diff(git: &GitCli, path: &str) -> Result<String, GitError> {
    git.run(["diff", "--no-color", "--no-ext-diff", "HEAD", "--", path])
}

/// Unified diff of everything currently in the index.
pub fn staged_diff(git: &GitCli) -> Result<String, GitError> {
    git.run(["diff", "--no-color", "--no-ext-diff", "--staged"])
}

/// Apply a patch file to the index only; the working tree is left alone.
pub fn apply_cached(git: &GitCli, patch: &Path) -> Result<(), GitError> {
    git.run([
        std::ffi::OsStr::new("apply"),
        std::ffi::OsStr::new("--cached"),
        patch.as_os_str(),
    ])?;
    Ok(())
}

pub fn tracked_files(git: &GitCli) -> Result<Vec<String>, GitError> {
    let out = git.run(["-c", "core.quotePath=false", "ls-files", "-z"])?;
    Ok(nul_separated(&out))
}

fn nul_separated(out: &str) -> Vec<String> {
    out.split('\0')
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

pub(super) fn non_empty_lines(out: &str) -> Vec<String> {
    out.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}
