mod commit_ops;
mod commits;
mod diff;
mod repo;

pub use commit_ops::{create_commit, stage_all, stage_paths};
pub use commits::get_recent_commits;
pub use diff::{apply_cached, file_diff, modified_files, staged_diff, tracked_files};
pub use repo::GitCli;

use std::path::Path;

use crate::error::GitError;

/// The version-control operations the commit and docs flows need.
///
/// Every call blocks until the underlying tool finishes.
pub trait Vcs {
    fn repo_root(&self) -> &Path;
    fn modified_files(&self) -> Result<Vec<String>, GitError>;
    fn file_diff(&self, path: &str) -> Result<String, GitError>;
    fn staged_diff(&self) -> Result<String, GitError>;
    /// Apply the patch stored at `patch` to the staging area only.
    fn apply_cached(&self, patch: &Path) -> Result<(), GitError>;
    fn commit(&self, message: &str) -> Result<(), GitError>;
    fn recent_commits(&self, limit: usize) -> Result<Vec<String>, GitError>;
    fn stage_paths(&self, paths: &[String]) -> Result<(), GitError>;
    fn stage_all(&self) -> Result<(), GitError>;
    fn tracked_files(&self) -> Result<Vec<String>, GitError>;
}

impl Vcs for GitCli {
    fn repo_root(&self) -> &Path {
        self.root()
    }

    fn modified_files(&self) -> Result<Vec<String>, GitError> {
        modified_files(self)
    }

    fn file_diff(&self, path: &str) -> Result<String, GitError> {
        file_diff(self, path)
    }

    fn staged_diff(&self) -> Result<String, GitError> {
        staged_diff(self)
    }

    fn apply_cached(&self, patch: &Path) -> Result<(), GitError> {
        apply_cached(self, patch)
    }

    fn commit(&self, message: &str) -> Result<(), GitError> {
        create_commit(self, message)
    }

    fn recent_commits(&self, limit: usize) -> Result<Vec<String>, GitError> {
        get_recent_commits(self, limit)
    }

    fn stage_paths(&self, paths: &[String]) -> Result<(), GitError> {
        stage_paths(self, paths)
    }

    fn stage_all(&self) -> Result<(), GitError> {
        stage_all(self)
    }

    fn tracked_files(&self) -> Result<Vec<String>, GitError> {
        tracked_files(self)
    }
}
