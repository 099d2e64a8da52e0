use std::path::Path;

use anyhow::{Context, Result};

use super::analysis::ProjectSnapshot;
use crate::ai::{strip_code_blocks, ChatMessage, ChatModel, DEFAULT_TEMPERATURE};

const PATCH_PROMPT: &str = r#"You are a technical writer updating documentation.
Provide updates in a simple patch format:

PATCH_START
SECTION: [exact text of a line or passage in the file]
ACTION: [REPLACE|INSERT_AFTER|INSERT_BEFORE|DELETE]
CONTENT:
[new content here]
PATCH_END

You can provide multiple patches. Be precise with section identification."#;

/// Draft a brand-new documentation file.
pub fn create_doc_content(
    model: &dyn ChatModel,
    path: &Path,
    content_type: &str,
    snapshot: &ProjectSnapshot,
) -> Result<String> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let messages = vec![
        ChatMessage::system(format!(
            "You are a technical writer creating {} documentation.\n\
             Write clear, comprehensive documentation that follows best practices.\n\
             Use markdown format with appropriate headings, code blocks, and examples.",
            content_type
        )),
        ChatMessage::user(format!(
            "Create documentation for: {}\nContent type: {}\n\nProject context:\n{}\n\n\
             Write comprehensive documentation that would be helpful for users/developers.",
            name,
            content_type,
            snapshot.render()
        )),
    ];

    let reply = model
        .complete(&messages, DEFAULT_TEMPERATURE)
        .with_context(|| format!("Failed to generate {}", name))?;
    let mut content = strip_code_blocks(&reply);
    content.push('\n');
    Ok(content)
}

/// Ask for patch directives that turn `current` into the requested revision.
pub fn request_doc_patches(
    model: &dyn ChatModel,
    current: &str,
    instructions: &str,
) -> Result<String> {
    let messages = vec![
        ChatMessage::system(PATCH_PROMPT),
        ChatMessage::user(format!(
            "Current file content:\n```\n{}\n```\n\nUpdate instructions: {}\n\n\
             Provide patches to update this documentation.",
            current, instructions
        )),
    ];

    model
        .complete(&messages, DEFAULT_TEMPERATURE)
        .context("Failed to request documentation patches")
}
