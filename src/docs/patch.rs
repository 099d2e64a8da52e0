//! The line-oriented patch language the model uses to edit documentation.
//!
//! ```text
//! PATCH_START
//! SECTION: ## Installation
//! ACTION: INSERT_AFTER
//! CONTENT:
//! Run `cargo install llm-git-commits`.
//! PATCH_END
//! ```
//!
//! Directives apply in order against the current text. `REPLACE` substitutes
//! every occurrence of the section string; `INSERT_AFTER`/`INSERT_BEFORE`
//! splice next to the first line containing it. `DELETE` parses but has no
//! effect.

use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use tracing::{debug, warn};

const PATCH_START: &str = "PATCH_START";
const PATCH_END: &str = "PATCH_END";
const SECTION: &str = "SECTION:";
const ACTION: &str = "ACTION:";
const CONTENT: &str = "CONTENT:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchAction {
    Replace,
    InsertAfter,
    InsertBefore,
    Delete,
}

impl FromStr for PatchAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "REPLACE" => Ok(Self::Replace),
            "INSERT_AFTER" => Ok(Self::InsertAfter),
            "INSERT_BEFORE" => Ok(Self::InsertBefore),
            "DELETE" => Ok(Self::Delete),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocPatch {
    pub section: String,
    pub action: PatchAction,
    pub content: Vec<String>,
}

#[derive(Default)]
struct PendingPatch {
    section: Option<String>,
    action: Option<String>,
    content: Option<Vec<String>>,
}

impl PendingPatch {
    fn finish(self) -> Option<DocPatch> {
        let section = self.section?;
        let action = match self.action?.parse() {
            Ok(action) => action,
            Err(unknown) => {
                warn!(action = %unknown, section = %section, "skipping patch with unknown action");
                return None;
            }
        };
        Some(DocPatch {
            section,
            action,
            content: self.content.unwrap_or_default(),
        })
    }
}

/// Extract every complete `PATCH_START … PATCH_END` block from a reply.
///
/// Markers are matched on trimmed lines; content lines keep their leading
/// indentation. Blocks missing a section or action are dropped.
pub fn parse_doc_patches(text: &str) -> Vec<DocPatch> {
    let mut patches = Vec::new();
    let mut current: Option<PendingPatch> = None;

    for raw in text.lines() {
        let line = raw.trim();

        if line == PATCH_START {
            current = Some(PendingPatch::default());
        } else if line == PATCH_END {
            if let Some(done) = current.take().and_then(PendingPatch::finish) {
                patches.push(done);
            }
        } else if let Some(patch) = current.as_mut() {
            if let Some(rest) = line.strip_prefix(SECTION) {
                patch.section = Some(rest.trim().to_string());
            } else if let Some(rest) = line.strip_prefix(ACTION) {
                patch.action = Some(rest.trim().to_string());
            } else if line.starts_with(CONTENT) {
                patch.content = Some(Vec::new());
            } else if let Some(content) = patch.content.as_mut() {
                content.push(raw.trim_end().to_string());
            }
        }
    }

    patches
}

/// Apply `patches` to `text`. Returns `None` when no directive changed anything.
pub fn apply_doc_patches(text: &str, patches: &[DocPatch]) -> Option<String> {
    let mut lines: Vec<String> = text.split('\n').map(String::from).collect();
    let mut modified = false;

    for patch in patches {
        if patch.section.is_empty() {
            warn!(action = ?patch.action, "skipping patch with empty section");
            continue;
        }
        let content = patch.content.join("\n");

        match patch.action {
            PatchAction::Replace => {
                let joined = lines.join("\n");
                if joined.contains(&patch.section) {
                    lines = joined
                        .replace(&patch.section, &content)
                        .split('\n')
                        .map(String::from)
                        .collect();
                    modified = true;
                }
            }
            PatchAction::InsertAfter => {
                if let Some(i) = lines.iter().position(|l| l.contains(&patch.section)) {
                    lines.insert(i + 1, content);
                    modified = true;
                }
            }
            PatchAction::InsertBefore => {
                if let Some(i) = lines.iter().position(|l| l.contains(&patch.section)) {
                    lines.insert(i, content);
                    modified = true;
                }
            }
            PatchAction::Delete => {
                warn!(section = %patch.section, "DELETE directives are not applied");
            }
        }
    }

    modified.then(|| lines.join("\n"))
}

/// Parse `reply` and apply it to the file at `path`, writing only on change.
///
/// A missing file is treated as empty. Returns whether the file was rewritten.
pub fn apply_doc_patches_to_file(path: &Path, reply: &str) -> io::Result<bool> {
    let current = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e),
    };

    let patches = parse_doc_patches(reply);
    debug!(path = %path.display(), patches = patches.len(), "applying doc patches");

    match apply_doc_patches(&current, &patches) {
        Some(updated) => {
            fs::write(path, updated)?;
            Ok(true)
        }
        None => Ok(false),
    }
}
