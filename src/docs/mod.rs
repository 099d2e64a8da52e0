pub mod analysis;
pub mod generate;
pub mod patch;
pub mod suggest;

pub use analysis::{find_doc_files, ProjectSnapshot};
pub use generate::{create_doc_content, request_doc_patches};
pub use patch::{
    apply_doc_patches, apply_doc_patches_to_file, parse_doc_patches, DocPatch, PatchAction,
};
pub use suggest::{
    parse_suggestions, suggest_doc_updates, DocAction, DocSuggestions, DocUpdate, Priority,
};

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;

use crate::ai::ChatModel;
use crate::git::Vcs;
use crate::prompt::{ask, confirm};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocsReport {
    pub created: Vec<PathBuf>,
    pub updated: Vec<PathBuf>,
}

/// Where a suggested file lives, or `None` if it would escape `docs_dir`.
///
/// Models often repeat the docs directory in the path; that prefix is not doubled.
pub fn resolve_doc_path(docs_dir: &Path, file: &str) -> Option<PathBuf> {
    let rel = Path::new(file);
    if file.trim().is_empty()
        || rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return None;
    }
    if rel.starts_with(docs_dir) {
        Some(rel.to_path_buf())
    } else {
        Some(docs_dir.join(rel))
    }
}

fn priority_marker(priority: Priority) -> colored::ColoredString {
    match priority {
        Priority::High => "▲".red().bold(),
        Priority::Medium => "●".yellow(),
        Priority::Low => "○".dimmed(),
    }
}

/// Suggest documentation changes and apply the ones the operator accepts.
pub fn run_docs_workflow<R: BufRead, W: Write>(
    vcs: &dyn Vcs,
    model: &dyn ChatModel,
    docs_dir: &Path,
    input: &mut R,
    output: &mut W,
) -> Result<DocsReport> {
    writeln!(output, "{} Analyzing project for documentation updates...", "●".cyan())?;
    let suggestions = suggest_doc_updates(model, vcs, docs_dir)?;
    let mut report = DocsReport::default();

    if suggestions.is_empty() {
        writeln!(output, "{}", "No documentation updates suggested".dimmed())?;
        return Ok(report);
    }

    writeln!(output)?;
    writeln!(output, "{}", "Documentation update suggestions:".bold())?;
    for update in &suggestions.updates {
        writeln!(
            output,
            "  {} {}: {}",
            priority_marker(update.priority),
            update.action.to_string().to_uppercase(),
            update.file
        )?;
        let reason = if update.reason.is_empty() {
            "No reason provided"
        } else {
            update.reason.as_str()
        };
        writeln!(output, "    {} {}", "Reason:".dimmed(), reason)?;
    }

    if !suggestions.suggestions.is_empty() {
        writeln!(output)?;
        writeln!(output, "{}", "Content suggestions:".bold())?;
        for suggestion in &suggestions.suggestions {
            writeln!(output, "  • {}", suggestion.description)?;
        }
    }

    for update in &suggestions.updates {
        let Some(path) = resolve_doc_path(docs_dir, &update.file) else {
            writeln!(output, "{} Skipping unsafe path: {}", "✗".red(), update.file)?;
            continue;
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| update.file.clone());

        writeln!(output)?;
        if !confirm(input, output, &format!("Apply {} to {}? [y/n]", update.action, name))? {
            continue;
        }

        match update.action {
            DocAction::Create => {
                let question = "Content type (e.g., 'API reference', 'tutorial'):";
                let content_type = ask(input, output, question)?.unwrap_or_default();
                let snapshot = ProjectSnapshot::gather(vcs, docs_dir)?;
                let content = create_doc_content(model, &path, &content_type, &snapshot)?;
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create {}", parent.display()))?;
                }
                fs::write(&path, content)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                writeln!(output, "{} Created {}", "✓".green(), path.display())?;
                report.created.push(path);
            }
            DocAction::Update => {
                if !path.exists() {
                    writeln!(output, "{} {} does not exist, skipping", "✗".red(), path.display())?;
                    continue;
                }
                let instructions = ask(input, output, "Update instructions:")?.unwrap_or_default();
                let current = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                let reply = request_doc_patches(model, &current, &instructions)?;
                let changed = apply_doc_patches_to_file(&path, &reply)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                if changed {
                    writeln!(output, "{} Updated {}", "✓".green(), path.display())?;
                    report.updated.push(path);
                } else {
                    writeln!(output, "{} No changes applied to {}", "!".yellow(), path.display())?;
                }
            }
            DocAction::Delete => {
                writeln!(
                    output,
                    "{} Deleting docs is not supported; remove {} by hand",
                    "!".yellow(),
                    path.display()
                )?;
            }
        }
    }

    Ok(report)
}
