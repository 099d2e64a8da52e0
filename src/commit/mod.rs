pub mod prompt;

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use colored::Colorize;

use crate::ai::{strip_code_blocks, ChatModel, DEFAULT_TEMPERATURE};
use crate::config::StagingMode;
use crate::error::StageError;
use crate::git::Vcs;
use crate::hunk::{parse_hunks, stage_hunks, Hunk, HunkSelector};
use crate::prompt::{ask, confirm_default_yes, parse_selection};

/// Ask the model for a commit message describing `diff`.
pub fn generate_commit_message(model: &dyn ChatModel, diff: &str) -> Result<String> {
    if diff.trim().is_empty() {
        bail!("No staged changes to generate commit message for");
    }

    let reply = model
        .complete(&prompt::build_messages(diff), DEFAULT_TEMPERATURE)
        .context("Failed to generate commit message")?;

    Ok(strip_code_blocks(&reply))
}

#[derive(Debug, Clone, Default)]
pub struct CommitOptions {
    pub auto_stage: bool,
    pub interactive: bool,
    pub staging_mode: StagingMode,
    pub message_override: Option<String>,
}

impl CommitOptions {
    fn effective_mode(&self) -> StagingMode {
        if self.auto_stage {
            StagingMode::Auto
        } else if self.interactive {
            StagingMode::Interactive
        } else {
            self.staging_mode
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed(String),
    NoChanges,
    NothingSelected,
    NothingStaged,
    Cancelled,
}

/// Stage changes, draft a message and commit, prompting on `input`/`output`.
pub fn run_commit_workflow<R: BufRead, W: Write>(
    vcs: &dyn Vcs,
    model: &dyn ChatModel,
    options: &CommitOptions,
    input: &mut R,
    output: &mut W,
) -> Result<CommitOutcome> {
    let modified = vcs.modified_files().context("Failed to list modified files")?;
    if modified.is_empty() {
        writeln!(output, "{} No modified files found", "✓".green())?;
        return Ok(CommitOutcome::NoChanges);
    }
    writeln!(output, "{} {}", "Modified files:".bold(), modified.join(", "))?;

    let mode = match options.effective_mode() {
        StagingMode::Ask => match ask_staging_choice(input, output)? {
            Some(choice) => choice,
            None => return Ok(CommitOutcome::Cancelled),
        },
        mode => StagingChoice::from(mode),
    };

    let staged = match mode {
        StagingChoice::All => {
            vcs.stage_all().context("Failed to stage changes")?;
            writeln!(output, "{} Staged all changes", "✓".green())?;
            true
        }
        StagingChoice::Hunks => stage_interactively(vcs, &modified, input, output)?,
        StagingChoice::Files => stage_files(vcs, &modified, input, output)?,
    };
    if !staged {
        writeln!(output, "{}", "No changes selected for staging".dimmed())?;
        return Ok(CommitOutcome::NothingSelected);
    }

    let diff = vcs.staged_diff().context("Failed to read staged diff")?;
    if diff.trim().is_empty() {
        writeln!(output, "{}", "No changes staged for commit".dimmed())?;
        return Ok(CommitOutcome::NothingStaged);
    }

    let message = match &options.message_override {
        Some(message) => message.clone(),
        None => {
            writeln!(output, "{} Generating commit message...", "●".cyan())?;
            generate_commit_message(model, &diff)?
        }
    };

    writeln!(output)?;
    writeln!(output, "{}", "Proposed commit message:".bold())?;
    writeln!(output, "{}", "─".repeat(50).dimmed())?;
    for line in message.lines() {
        writeln!(output, "  {}", line)?;
    }
    writeln!(output, "{}", "─".repeat(50).dimmed())?;

    if !confirm_default_yes(input, output, "Proceed with commit? [Y/n]")? {
        writeln!(output, "{} Commit cancelled", "✗".red())?;
        return Ok(CommitOutcome::Cancelled);
    }

    vcs.commit(&message).context("Failed to commit changes")?;
    let subject = message.lines().next().unwrap_or_default();
    writeln!(output, "{} Committed: {}", "✓".green().bold(), subject)?;
    Ok(CommitOutcome::Committed(message))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StagingChoice {
    All,
    Hunks,
    Files,
}

impl From<StagingMode> for StagingChoice {
    fn from(mode: StagingMode) -> Self {
        match mode {
            StagingMode::Interactive => Self::Hunks,
            StagingMode::Auto | StagingMode::Ask => Self::All,
        }
    }
}

fn ask_staging_choice<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<Option<StagingChoice>> {
    writeln!(output)?;
    writeln!(output, "{}", "Options:".bold())?;
    writeln!(output, "  [{}] Auto-stage all changes", "1".cyan())?;
    writeln!(output, "  [{}] Interactive staging", "2".cyan())?;
    writeln!(output, "  [{}] Stage specific files", "3".cyan())?;

    let choice = match ask(input, output, "Choose option [1/2/3]:")?.as_deref() {
        Some("1") => Some(StagingChoice::All),
        Some("2") => Some(StagingChoice::Hunks),
        Some("3") => Some(StagingChoice::Files),
        _ => {
            writeln!(output, "{} Invalid choice", "✗".red())?;
            None
        }
    };
    Ok(choice)
}

/// Returns whether anything was staged.
fn stage_interactively<R: BufRead, W: Write>(
    vcs: &dyn Vcs,
    modified: &[String],
    input: &mut R,
    output: &mut W,
) -> Result<bool> {
    let mut files: Vec<(String, Vec<Hunk>)> = Vec::new();
    for path in modified {
        let diff = vcs
            .file_diff(path)
            .with_context(|| format!("Failed to diff {}", path))?;
        files.push((path.clone(), parse_hunks(path, &diff)));
    }

    let selection = HunkSelector::new(&mut *input, &mut *output).select(&files)?;
    if selection.hunks.is_empty() {
        return Ok(false);
    }

    writeln!(
        output,
        "\n{} Staging {} selected hunk(s)...",
        "●".cyan(),
        selection.hunks.len()
    )?;
    let staged_files = match stage_hunks(vcs, &selection.hunks) {
        Ok(report) => report.staged_files,
        Err(err) => {
            if let StageError::Apply { file, applied, .. } = &err {
                for staged in applied {
                    writeln!(output, "{} Staged changes for {}", "✓".green(), staged)?;
                }
                writeln!(output, "{} Could not stage {}", "✗".red(), file)?;
                if !applied.is_empty() {
                    let hint = "Files above remain staged (undo with `git restore --staged`)";
                    writeln!(output, "{}", hint.dimmed())?;
                }
            }
            return Err(anyhow::Error::new(err).context("Failed to stage selected hunks"));
        }
    };
    for file in &staged_files {
        writeln!(output, "{} Staged changes for {}", "✓".green(), file)?;
    }
    Ok(true)
}

fn stage_files<R: BufRead, W: Write>(
    vcs: &dyn Vcs,
    modified: &[String],
    input: &mut R,
    output: &mut W,
) -> Result<bool> {
    writeln!(output)?;
    writeln!(output, "{}", "Select files to stage:".bold())?;
    for (i, path) in modified.iter().enumerate() {
        writeln!(output, "  [{}] {}", (i + 1).to_string().cyan(), path)?;
    }

    let answer = ask(input, output, "Enter file numbers (comma-separated):")?.unwrap_or_default();
    let picked: Vec<String> = parse_selection(&answer, modified.len())
        .into_iter()
        .map(|i| modified[i].clone())
        .collect();
    if picked.is_empty() {
        return Ok(false);
    }

    vcs.stage_paths(&picked).context("Failed to stage files")?;
    writeln!(output, "{} Staged: {}", "✓".green(), picked.join(", "))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use crate::testing::{FakeModel, FakeVcs};

    const DIFF_A: &str = "diff --git a/a.txt b/a.txt\n--- a/a.txt\n+++ b/a.txt\n\
                          @@ -1 +1 @@\n-a\n+A\n@@ -5 +5 @@\n-e\n+E\n";
    const DIFF_B: &str = "diff --git a/b.txt b/b.txt\n--- a/b.txt\n+++ b/b.txt\n\
                          @@ -1 +1 @@\n-b\n+B\n";

    fn vcs() -> FakeVcs {
        FakeVcs::default()
            .with_diff("a.txt", DIFF_A)
            .with_diff("b.txt", DIFF_B)
    }

    fn run(vcs: &FakeVcs, model: &FakeModel, options: CommitOptions, input: &str) -> CommitOutcome {
        let mut out = Vec::new();
        run_commit_workflow(vcs, model, &options, &mut input.as_bytes(), &mut out).unwrap()
    }

    #[test]
    fn test_generate_trims_and_strips_fences() {
        let model = FakeModel::replying(&["  ```\nfeat: add parser\n```  \n"]);
        let message = generate_commit_message(&model, "+x").unwrap();
        assert_eq!(message, "feat: add parser");

        let request = &model.requests.borrow()[0];
        assert_eq!(request.len(), 2);
        assert!(request[1].content.contains("```diff\n+x\n```"));
    }

    #[test]
    fn test_generate_rejects_empty_diff() {
        let model = FakeModel::default();
        assert!(generate_commit_message(&model, "  \n").is_err());
        assert!(model.requests.borrow().is_empty());
    }

    #[test]
    fn test_generate_surfaces_transport_error() {
        let model = FakeModel::failing(LlmError::Status {
            status: 401,
            body: "bad key".to_string(),
        });
        let err = generate_commit_message(&model, "+x").unwrap_err();
        assert!(format!("{:#}", err).contains("401"));
    }

    #[test]
    fn test_no_modified_files() {
        let vcs = FakeVcs::default();
        let outcome = run(&vcs, &FakeModel::default(), CommitOptions::default(), "");
        assert_eq!(outcome, CommitOutcome::NoChanges);
    }

    #[test]
    fn test_auto_stage_and_commit() {
        let vcs = vcs();
        let model = FakeModel::replying(&["fix: update letters"]);
        let options = CommitOptions {
            auto_stage: true,
            ..CommitOptions::default()
        };
        let outcome = run(&vcs, &model, options, "\n");
        assert_eq!(outcome, CommitOutcome::Committed("fix: update letters".to_string()));
        assert!(*vcs.staged_all.borrow());
        assert_eq!(*vcs.committed.borrow(), vec!["fix: update letters"]);
    }

    #[test]
    fn test_message_override_skips_model() {
        let vcs = vcs();
        let model = FakeModel::default();
        let options = CommitOptions {
            auto_stage: true,
            message_override: Some("chore: manual".to_string()),
            ..CommitOptions::default()
        };
        let outcome = run(&vcs, &model, options, "y\n");
        assert_eq!(outcome, CommitOutcome::Committed("chore: manual".to_string()));
        assert!(model.requests.borrow().is_empty());
    }

    #[test]
    fn test_declined_commit() {
        let vcs = vcs();
        let options = CommitOptions {
            auto_stage: true,
            message_override: Some("chore: x".to_string()),
            ..CommitOptions::default()
        };
        let outcome = run(&vcs, &FakeModel::default(), options, "n\n");
        assert_eq!(outcome, CommitOutcome::Cancelled);
        assert!(vcs.committed.borrow().is_empty());
    }

    #[test]
    fn test_interactive_stages_selected_hunks_in_order() {
        let vcs = vcs();
        let options = CommitOptions {
            interactive: true,
            message_override: Some("fix: a".to_string()),
            ..CommitOptions::default()
        };
        // a.txt: skip first, keep second; b.txt: keep; then confirm
        let outcome = run(&vcs, &FakeModel::default(), options, "n\ny\ny\n\n");
        assert_eq!(outcome, CommitOutcome::Committed("fix: a".to_string()));

        let applied = vcs.applied_patches();
        assert_eq!(applied.len(), 2);
        assert!(applied[0].contains("@@ -5 +5 @@\n-e\n+E\n"));
        assert!(!applied[0].contains("@@ -1 +1 @@"));
        assert!(applied[1].contains("+++ b/b.txt"));
    }

    #[test]
    fn test_interactive_nothing_selected() {
        let vcs = vcs();
        let options = CommitOptions {
            interactive: true,
            ..CommitOptions::default()
        };
        let outcome = run(&vcs, &FakeModel::default(), options, "n\nq\n");
        assert_eq!(outcome, CommitOutcome::NothingSelected);
        assert!(vcs.applied_patches().is_empty());
    }

    #[test]
    fn test_apply_failure_is_error() {
        let vcs = vcs().rejecting("a.txt");
        let options = CommitOptions {
            interactive: true,
            ..CommitOptions::default()
        };
        let mut out = Vec::new();
        let result = run_commit_workflow(
            &vcs,
            &FakeModel::default(),
            &options,
            &mut "y\ny\ny\n".as_bytes(),
            &mut out,
        );
        assert!(result.is_err());
        assert!(vcs.committed.borrow().is_empty());
    }

    #[test]
    fn test_partial_apply_failure_names_staged_files() {
        let vcs = vcs().rejecting("b.txt");
        let options = CommitOptions {
            interactive: true,
            ..CommitOptions::default()
        };
        let mut out = Vec::new();
        let err = run_commit_workflow(
            &vcs,
            &FakeModel::default(),
            &options,
            &mut "y\ny\ny\n".as_bytes(),
            &mut out,
        )
        .unwrap_err();

        let out = String::from_utf8_lossy(&out);
        assert!(out.contains("Staged changes for a.txt"));
        assert!(out.contains("Could not stage b.txt"));
        assert!(out.contains("remain staged"));

        let message = format!("{:#}", err);
        assert!(message.contains("Failed to stage b.txt"));
        assert_eq!(message.matches("patch failed").count(), 1);
        assert!(vcs.committed.borrow().is_empty());
    }

    #[test]
    fn test_menu_stage_specific_files() {
        let vcs = vcs();
        let options = CommitOptions {
            message_override: Some("docs: b".to_string()),
            ..CommitOptions::default()
        };
        let outcome = run(&vcs, &FakeModel::default(), options, "3\n2, 7\ny\n");
        assert_eq!(outcome, CommitOutcome::Committed("docs: b".to_string()));
        assert_eq!(*vcs.staged_paths.borrow(), vec!["b.txt"]);
    }

    #[test]
    fn test_menu_invalid_choice() {
        let vcs = vcs();
        let outcome = run(&vcs, &FakeModel::default(), CommitOptions::default(), "9\n");
        assert_eq!(outcome, CommitOutcome::Cancelled);
        assert!(!*vcs.staged_all.borrow());
    }

    #[test]
    fn test_configured_mode_used_without_flags() {
        let vcs = vcs();
        let options = CommitOptions {
            staging_mode: StagingMode::Auto,
            message_override: Some("chore: y".to_string()),
            ..CommitOptions::default()
        };
        let outcome = run(&vcs, &FakeModel::default(), options, "\n");
        assert_eq!(outcome, CommitOutcome::Committed("chore: y".to_string()));
        assert!(*vcs.staged_all.borrow());
    }
}
