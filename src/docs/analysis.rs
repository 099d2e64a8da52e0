use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use crate::git::Vcs;

const DOC_EXTENSIONS: [&str; 4] = ["md", "rst", "txt", "mdx"];
const KEY_FILE_PATTERNS: [&str; 10] = [
    "*.py",
    "*.js",
    "*.ts",
    "*.go",
    "*.rs",
    "*.java",
    "README*",
    "package.json",
    "requirements.txt",
    "Cargo.toml",
];
pub const KEY_FILE_LIMIT: usize = 20;
pub const RECENT_COMMITS: usize = 10;

/// Documentation files under `dir`, sorted. A missing directory yields nothing.
pub fn find_doc_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| DOC_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                .unwrap_or(false)
        })
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

fn key_file_matcher() -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in KEY_FILE_PATTERNS {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// Tracked paths whose file name matches a key-file pattern, skipping hidden paths.
pub fn key_files(tracked: &[String], limit: usize) -> Result<Vec<String>> {
    let matcher = key_file_matcher()?;
    Ok(tracked
        .iter()
        .filter(|p| !p.split('/').any(|part| part.starts_with('.')))
        .filter(|p| {
            Path::new(p)
                .file_name()
                .map(|name| matcher.is_match(name))
                .unwrap_or(false)
        })
        .take(limit)
        .cloned()
        .collect())
}

/// What the model is told about the project when asked for doc suggestions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectSnapshot {
    pub recent_commits: Vec<String>,
    pub modified_files: Vec<String>,
    pub key_files: Vec<String>,
    pub docs_dir: PathBuf,
}

impl ProjectSnapshot {
    pub fn gather(vcs: &dyn Vcs, docs_dir: &Path) -> Result<Self> {
        let recent_commits = vcs
            .recent_commits(RECENT_COMMITS)
            .context("Failed to read recent commits")?;
        let modified_files = vcs
            .modified_files()
            .context("Failed to list modified files")?;
        let tracked = vcs.tracked_files().context("Failed to list tracked files")?;

        Ok(Self {
            recent_commits,
            modified_files,
            key_files: key_files(&tracked, KEY_FILE_LIMIT)?,
            docs_dir: docs_dir.to_path_buf(),
        })
    }

    pub fn render(&self) -> String {
        format!(
            "Project Analysis:\n\nRecent commits:\n{}\n\nModified files:\n{}\n\n\
             Key project files:\n{}\n\nDocumentation directory: {}\n",
            self.recent_commits.join("\n"),
            self.modified_files.join("\n"),
            self.key_files.join("\n"),
            self.docs_dir.display()
        )
    }
}
