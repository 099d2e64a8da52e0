use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::GitError;

/// Handle on a working tree, driven through the `git` binary.
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    /// Locate the repository containing `start` (or the current directory).
    pub fn discover(start: Option<&Path>) -> Result<Self, GitError> {
        let start = start.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));

        let output = Command::new("git")
            .arg("-C")
            .arg(&start)
            .args(["rev-parse", "--show-toplevel"])
            .output()
            .map_err(GitError::Spawn)?;

        if !output.status.success() {
            return Err(GitError::NotARepository(start));
        }

        let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!(root = %root, "discovered repository");
        Ok(Self {
            root: PathBuf::from(root),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run `git -C <root> <args>` and return stdout, failing on non-zero exit.
    pub(crate) fn run<I, S>(&self, args: I) -> Result<String, GitError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<_> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
        let command = args
            .iter()
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ");
        debug!(command = %command, "running git");

        let output = Command::new("git")
            .arg("-C")
            .arg(&self.root)
            .args(&args)
            .output()
            .map_err(GitError::Spawn)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let detail = if stderr.trim().is_empty() {
                if stdout.trim().is_empty() {
                    format!("exit code {}", output.status.code().unwrap_or(-1))
                } else {
                    stdout.trim().to_string()
                }
            } else {
                stderr.trim().to_string()
            };
            return Err(GitError::CommandFailed {
                command,
                stderr: detail,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
