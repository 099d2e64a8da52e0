pub mod ai;
pub mod commit;
pub mod config;
pub mod docs;
pub mod error;
pub mod git;
pub mod hunk;
pub mod prompt;

#[cfg(test)]
pub(crate) mod testing;

pub use ai::{ChatModel, LlmClient, Provider};
pub use commit::{generate_commit_message, run_commit_workflow, CommitOptions, CommitOutcome};
pub use config::{Config, Settings, StagingMode};
pub use docs::run_docs_workflow;
pub use git::{GitCli, Vcs};
pub use hunk::{parse_hunks, stage_hunks, Hunk};
