use crate::error::GitError;

use super::GitCli;

/// Create a commit from the index with the given message.
pub fn create_commit(git: &GitCli, message: &str) -> Result<(), GitError> {
    git.run(["commit", "-m", message])?;
    Ok(())
}

/// Stage all changes (modified + untracked) under the repository root.
pub fn stage_all(git: &GitCli) -> Result<(), GitError> {
    git.run(["add", "."])?;
    Ok(())
}

pub fn stage_paths(git: &GitCli, paths: &[String]) -> Result<(), GitError> {
    if paths.is_empty() {
        return Ok(());
    }
    let mut args = vec!["add", "--"];
    args.extend(paths.iter().map(String::as_str));
    git.run(args)?;
    Ok(())
}
