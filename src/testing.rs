//! In-memory fakes for the git and model collaborators.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

use crate::ai::{ChatMessage, ChatModel};
use crate::error::{GitError, LlmError};
use crate::git::Vcs;

#[derive(Default)]
pub struct FakeVcs {
    pub root: PathBuf,
    pub modified: Vec<String>,
    pub diffs: HashMap<String, String>,
    pub staged: RefCell<String>,
    pub commits: Vec<String>,
    pub tracked: Vec<String>,
    pub reject: Option<String>,
    pub applied: RefCell<Vec<String>>,
    pub paths: RefCell<Vec<PathBuf>>,
    pub committed: RefCell<Vec<String>>,
    pub staged_paths: RefCell<Vec<String>>,
    pub staged_all: RefCell<bool>,
}

impl FakeVcs {
    pub fn rejecting(mut self, file: &str) -> Self {
        self.reject = Some(file.to_string());
        self
    }

    pub fn with_diff(mut self, path: &str, diff: &str) -> Self {
        self.modified.push(path.to_string());
        self.diffs.insert(path.to_string(), diff.to_string());
        self
    }

    pub fn applied_patches(&self) -> Vec<String> {
        self.applied.borrow().clone()
    }

    pub fn patch_paths(&self) -> Vec<PathBuf> {
        self.paths.borrow().clone()
    }
}

impl Vcs for FakeVcs {
    fn repo_root(&self) -> &Path {
        &self.root
    }

    fn modified_files(&self) -> Result<Vec<String>, GitError> {
        Ok(self.modified.clone())
    }

    fn file_diff(&self, path: &str) -> Result<String, GitError> {
        Ok(self.diffs.get(path).cloned().unwrap_or_default())
    }

    fn staged_diff(&self) -> Result<String, GitError> {
        Ok(self.staged.borrow().clone())
    }

    fn apply_cached(&self, patch: &Path) -> Result<(), GitError> {
        let content = std::fs::read_to_string(patch).map_err(GitError::Spawn)?;
        self.paths.borrow_mut().push(patch.to_path_buf());
        self.applied.borrow_mut().push(content.clone());

        if let Some(file) = &self.reject {
            if content.contains(&format!("+++ b/{}\n", file)) {
                return Err(GitError::CommandFailed {
                    command: "apply --cached".to_string(),
                    stderr: format!("error: patch failed: {}:1", file),
                });
            }
        }

        self.staged.borrow_mut().push_str(&content);
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<(), GitError> {
        self.committed.borrow_mut().push(message.to_string());
        Ok(())
    }

    fn recent_commits(&self, limit: usize) -> Result<Vec<String>, GitError> {
        Ok(self.commits.iter().take(limit).cloned().collect())
    }

    fn stage_paths(&self, paths: &[String]) -> Result<(), GitError> {
        self.staged_paths.borrow_mut().extend(paths.iter().cloned());
        for path in paths {
            if let Some(diff) = self.diffs.get(path) {
                self.staged.borrow_mut().push_str(diff);
            }
        }
        Ok(())
    }

    fn stage_all(&self) -> Result<(), GitError> {
        *self.staged_all.borrow_mut() = true;
        let mut staged = self.staged.borrow_mut();
        for path in &self.modified {
            if let Some(diff) = self.diffs.get(path) {
                staged.push_str(diff);
            }
        }
        Ok(())
    }

    fn tracked_files(&self) -> Result<Vec<String>, GitError> {
        Ok(self.tracked.clone())
    }
}

/// Returns queued replies in order and records every request.
#[derive(Default)]
pub struct FakeModel {
    replies: RefCell<VecDeque<Result<String, LlmError>>>,
    pub requests: RefCell<Vec<Vec<ChatMessage>>>,
}

impl FakeModel {
    pub fn replying(replies: &[&str]) -> Self {
        Self {
            replies: RefCell::new(replies.iter().map(|r| Ok(r.to_string())).collect()),
            requests: RefCell::default(),
        }
    }

    pub fn failing(err: LlmError) -> Self {
        let model = Self::default();
        model.replies.borrow_mut().push_back(Err(err));
        model
    }
}

impl ChatModel for FakeModel {
    fn complete(&self, messages: &[ChatMessage], _temperature: f32) -> Result<String, LlmError> {
        self.requests.borrow_mut().push(messages.to_vec());
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::InvalidResponse("no reply queued".to_string())))
    }
}
