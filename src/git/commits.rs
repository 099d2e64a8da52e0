use crate::error::GitError;

use super::diff::non_empty_lines;
use super::GitCli;

/// One-line summaries (`<short sha> <subject>`) of the most recent commits.
///
/// A repository without commits yields an empty list instead of an error.
pub fn get_recent_commits(git: &GitCli, limit: usize) -> Result<Vec<String>, GitError> {
    let limit = format!("-{}", limit);
    match git.run(["log", "--oneline", limit.as_str()]) {
        Ok(out) => Ok(non_empty_lines(&out)),
        Err(GitError::CommandFailed { stderr, .. })
            if stderr.contains("does not have any commits") =>
        {
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}
