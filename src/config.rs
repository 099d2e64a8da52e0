use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ai::Provider;
use crate::error::ConfigError;

/// What to do when neither `--auto-stage` nor `--interactive` is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StagingMode {
    #[default]
    Ask,
    Auto,
    Interactive,
}

impl fmt::Display for StagingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ask => "ask",
            Self::Auto => "auto",
            Self::Interactive => "interactive",
        })
    }
}

impl FromStr for StagingMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ask" => Ok(Self::Ask),
            "auto" => Ok(Self::Auto),
            "interactive" => Ok(Self::Interactive),
            other => Err(ConfigError::UnknownStagingMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub default_provider: Provider,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs_dir: Option<PathBuf>,

    #[serde(default)]
    pub staging_mode: StagingMode,

    /// Keyed by provider name (`openrouter`, `openai`, `anthropic`).
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderSettings>,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_path();
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, content).map_err(write_err)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("llm-commit")
            .join("config.toml")
    }

    pub fn provider(&self, provider: Provider) -> Option<&ProviderSettings> {
        self.providers.get(provider.name())
    }

    pub fn provider_mut(&mut self, provider: Provider) -> &mut ProviderSettings {
        self.providers.entry(provider.name().to_string()).or_default()
    }
}

/// Values given on the command line; each one wins over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub provider: Option<Provider>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub docs_dir: Option<PathBuf>,
}

/// Everything needed to talk to a model, after merging all sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub provider: Provider,
    pub model: String,
    pub api_key: String,
    pub base_url: String,
    pub docs_dir: Option<PathBuf>,
    pub staging_mode: StagingMode,
}

impl Settings {
    /// Precedence: CLI flag > config file > provider env var > built-in default.
    pub fn resolve(cli: &Overrides, config: &Config) -> Result<Self, ConfigError> {
        let provider = cli.provider.unwrap_or(config.default_provider);
        let stored = config.provider(provider).cloned().unwrap_or_default();

        let api_key = cli
            .api_key
            .clone()
            .or(stored.api_key)
            .or_else(|| std::env::var(provider.api_key_env()).ok())
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey {
                provider: provider.name().to_string(),
                env_var: provider.api_key_env().to_string(),
            })?;

        Ok(Self {
            provider,
            model: cli
                .model
                .clone()
                .or(stored.model)
                .unwrap_or_else(|| provider.default_model().to_string()),
            api_key,
            base_url: cli
                .base_url
                .clone()
                .or(stored.base_url)
                .unwrap_or_else(|| provider.default_base_url().to_string()),
            docs_dir: cli.docs_dir.clone().or_else(|| config.docs_dir.clone()),
            staging_mode: config.staging_mode,
        })
    }
}
