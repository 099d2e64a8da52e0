//! Error types for the staging, git and model-call layers.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from invoking the `git` binary.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not in a git repository ({})", .0.display())]
    NotARepository(PathBuf),

    #[error("Failed to spawn git")]
    Spawn(#[source] std::io::Error),

    #[error("`git {command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },
}

/// Errors from the remote language-model API.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("LLM API call timed out after {0} seconds")]
    Timeout(u64),

    #[error("LLM API call failed")]
    Transport(#[source] reqwest::Error),

    #[error("LLM API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("LLM API returned an unexpected response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout(crate::ai::REQUEST_TIMEOUT.as_secs())
        } else {
            LlmError::Transport(err)
        }
    }
}

/// Errors from rebuilding and applying per-file patches.
#[derive(Error, Debug)]
pub enum StageError {
    #[error("No hunks selected for staging")]
    NothingSelected,

    #[error("Failed to write patch for {file}")]
    WritePatch {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to stage {file}")]
    Apply {
        file: String,
        /// Files staged before the failure; these stay staged.
        applied: Vec<String>,
        #[source]
        source: GitError,
    },
}

/// Errors from reading or writing the config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write config {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize config")]
    Serialize(#[from] toml::ser::Error),

    #[error(
        "No API key for {provider}. \
         Pass --api-key, run `llm-commit config --api-key`, or set {env_var}"
    )]
    MissingApiKey { provider: String, env_var: String },

    #[error("Unknown provider: {0}. Use openrouter, openai, or anthropic.")]
    UnknownProvider(String),

    #[error("Unknown staging mode: {0}. Use ask, auto, or interactive.")]
    UnknownStagingMode(String),
}
