//! Asking the model which documentation files need attention.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use super::analysis::{find_doc_files, ProjectSnapshot};
use crate::ai::{strip_code_blocks, ChatMessage, ChatModel, DEFAULT_TEMPERATURE};
use crate::git::Vcs;

/// At most this many existing docs are shown to the model.
pub const MAX_DOCS: usize = 5;
pub const DOC_EXCERPT_CHARS: usize = 1000;

const SYSTEM_PROMPT: &str = r#"You are a technical documentation expert. Analyze the project and suggest documentation updates.

Return your response as a JSON object with this structure:
{
    "updates": [
        {
            "file": "path/to/file.md",
            "action": "create|update|delete",
            "reason": "Why this change is needed",
            "priority": "high|medium|low"
        }
    ],
    "suggestions": [
        {
            "type": "content",
            "description": "What specific content should be added/updated"
        }
    ]
}

Focus on:
- API documentation
- Installation/setup guides
- Usage examples
- Architecture documentation
- Changelog updates
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum DocAction {
    Create,
    #[default]
    Update,
    Delete,
}

impl From<String> for DocAction {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "create" => Self::Create,
            "delete" => Self::Delete,
            _ => Self::Update,
        }
    }
}

impl fmt::Display for DocAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum Priority {
    High,
    Medium,
    #[default]
    Low,
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "high" => Self::High,
            "medium" => Self::Medium,
            _ => Self::Low,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DocUpdate {
    pub file: String,
    pub action: DocAction,
    pub reason: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContentSuggestion {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DocSuggestions {
    pub updates: Vec<DocUpdate>,
    pub suggestions: Vec<ContentSuggestion>,
}

impl DocSuggestions {
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty() && self.suggestions.is_empty()
    }
}

/// Parse the model's JSON reply. Anything unparsable degrades to no suggestions.
pub fn parse_suggestions(raw: &str) -> DocSuggestions {
    match serde_json::from_str(&strip_code_blocks(raw)) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "could not parse documentation suggestions as JSON");
            DocSuggestions::default()
        }
    }
}

/// Leading excerpt of the first few docs, keyed by repo-relative path.
fn doc_excerpts(repo_root: &Path, docs: &[std::path::PathBuf]) -> BTreeMap<String, String> {
    let mut excerpts = BTreeMap::new();
    for doc in docs.iter().take(MAX_DOCS) {
        let Ok(content) = fs::read_to_string(doc) else {
            debug!(path = %doc.display(), "skipping unreadable doc");
            continue;
        };
        let key = doc
            .strip_prefix(repo_root)
            .unwrap_or(doc)
            .display()
            .to_string();
        excerpts.insert(key, content.chars().take(DOC_EXCERPT_CHARS).collect());
    }
    excerpts
}

pub fn suggest_doc_updates(
    model: &dyn ChatModel,
    vcs: &dyn Vcs,
    docs_dir: &Path,
) -> Result<DocSuggestions> {
    if !docs_dir.exists() {
        fs::create_dir_all(docs_dir)
            .with_context(|| format!("Failed to create {}", docs_dir.display()))?;
    }

    let snapshot = ProjectSnapshot::gather(vcs, docs_dir)?;
    let excerpts = doc_excerpts(vcs.repo_root(), &find_doc_files(docs_dir));
    let existing = serde_json::to_string_pretty(&excerpts)?;

    let messages = vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(format!(
            "Project analysis:\n{}\n\nExisting documentation:\n{}\n\n\
             Suggest documentation updates needed based on recent changes.",
            snapshot.render(),
            existing
        )),
    ];

    let reply = model
        .complete(&messages, DEFAULT_TEMPERATURE)
        .context("Failed to request documentation suggestions")?;
    Ok(parse_suggestions(&reply))
}
