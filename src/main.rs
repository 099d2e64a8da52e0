use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use llm_git_commits::commit::{run_commit_workflow, CommitOptions};
use llm_git_commits::config::{Config, Overrides, Settings, StagingMode};
use llm_git_commits::docs::run_docs_workflow;
use llm_git_commits::{GitCli, LlmClient, Provider};

#[derive(Parser, Debug)]
#[command(name = "llm-commit")]
#[command(
    about = "Stage hunks, then let an LLM write the commit message (and docs)",
    long_about = None
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// API key for the selected provider
    #[arg(long)]
    api_key: Option<String>,

    /// Model identifier (e.g. anthropic/claude-3-sonnet)
    #[arg(long)]
    model: Option<String>,

    /// LLM provider (openrouter, openai, anthropic)
    #[arg(long)]
    provider: Option<Provider>,

    /// Override the provider's API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Documentation directory to manage
    #[arg(long)]
    docs_dir: Option<PathBuf>,

    /// Pick hunks to stage one by one
    #[arg(short, long)]
    interactive: bool,

    /// Stage all changes without asking
    #[arg(short, long, conflicts_with = "interactive")]
    auto_stage: bool,

    /// Only suggest and apply documentation updates
    #[arg(long)]
    docs_only: bool,

    /// Use this commit message instead of generating one
    #[arg(short = 'm', long)]
    commit_message: Option<String>,

    /// Path inside the git repository (defaults to current directory)
    #[arg(long)]
    path: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show or change the saved defaults
    Config {
        /// Default provider; also the target of --model/--api-key/--base-url
        #[arg(long)]
        provider: Option<Provider>,

        #[arg(long)]
        model: Option<String>,

        #[arg(long)]
        api_key: Option<String>,

        #[arg(long)]
        base_url: Option<String>,

        #[arg(long)]
        docs_dir: Option<PathBuf>,

        /// Default staging mode: ask, auto, interactive
        #[arg(long)]
        staging_mode: Option<StagingMode>,

        /// Print the current configuration
        #[arg(long)]
        show: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} Error: {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "llm_git_commits=debug,llm_commit=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Command::Config {
            provider,
            model,
            api_key,
            base_url,
            docs_dir,
            staging_mode,
            show,
        }) => run_config_command(
            ConfigChanges {
                provider,
                model,
                api_key,
                base_url,
                docs_dir,
                staging_mode,
            },
            show,
        ),
        None => run_main_command(cli),
    }
}

fn run_main_command(cli: Cli) -> Result<()> {
    let config = Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable config");
        Config::default()
    });

    let git = GitCli::discover(cli.path.as_deref())?;

    let overrides = Overrides {
        provider: cli.provider,
        model: cli.model,
        api_key: cli.api_key,
        base_url: cli.base_url,
        docs_dir: cli.docs_dir,
    };
    let settings = Settings::resolve(&overrides, &config)?;
    let client = LlmClient::new(
        settings.provider,
        &settings.base_url,
        &settings.model,
        &settings.api_key,
    )?;

    let mut input = io::stdin().lock();
    let mut output = io::stdout();

    if cli.docs_only {
        let docs_dir = settings.docs_dir.context(
            "--docs-only needs a documentation directory: \
             pass --docs-dir or run `llm-commit config --docs-dir`",
        )?;
        run_docs_workflow(&git, &client, &docs_dir, &mut input, &mut output)?;
        return Ok(());
    }

    let options = CommitOptions {
        auto_stage: cli.auto_stage,
        interactive: cli.interactive,
        staging_mode: settings.staging_mode,
        message_override: cli.commit_message,
    };
    run_commit_workflow(&git, &client, &options, &mut input, &mut output)?;
    Ok(())
}

struct ConfigChanges {
    provider: Option<Provider>,
    model: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    docs_dir: Option<PathBuf>,
    staging_mode: Option<StagingMode>,
}

impl ConfigChanges {
    fn is_empty(&self) -> bool {
        self.provider.is_none()
            && self.model.is_none()
            && self.api_key.is_none()
            && self.base_url.is_none()
            && self.docs_dir.is_none()
            && self.staging_mode.is_none()
    }

    fn apply(self, config: &mut Config) {
        if let Some(provider) = self.provider {
            config.default_provider = provider;
        }
        let provider = self.provider.unwrap_or(config.default_provider);
        let target = config.provider_mut(provider);
        if self.model.is_some() {
            target.model = self.model;
        }
        if self.api_key.is_some() {
            target.api_key = self.api_key;
        }
        if self.base_url.is_some() {
            target.base_url = self.base_url;
        }
        if self.docs_dir.is_some() {
            config.docs_dir = self.docs_dir;
        }
        if let Some(mode) = self.staging_mode {
            config.staging_mode = mode;
        }
    }
}

fn run_config_command(changes: ConfigChanges, show: bool) -> Result<()> {
    let mut config = Config::load()?;
    let changed = !changes.is_empty();

    if changed {
        changes.apply(&mut config);
        let path = config.save()?;
        println!("{} Saved {}", "✓".green(), path.display());
    }

    if show || !changed {
        print_config(&config);
    }

    Ok(())
}

fn print_config(config: &Config) {
    println!("{} {}", "CONFIG".bold(), Config::config_path().display().to_string().dimmed());
    println!("   provider       {}", config.default_provider.name().cyan());
    println!("   staging mode   {}", config.staging_mode);
    match &config.docs_dir {
        Some(dir) => println!("   docs dir       {}", dir.display()),
        None => println!("   docs dir       {}", "(none)".dimmed()),
    }

    for provider in Provider::ALL {
        let Some(settings) = config.provider(provider) else {
            continue;
        };
        println!();
        println!("   {}", provider.name().bold());
        println!(
            "     model      {}",
            settings.model.as_deref().unwrap_or(provider.default_model())
        );
        println!(
            "     api key    {}",
            settings
                .api_key
                .as_deref()
                .map(mask_key)
                .unwrap_or_else(|| "(unset)".dimmed().to_string())
        );
        if let Some(url) = &settings.base_url {
            println!("     base url   {}", url);
        }
    }
}

fn mask_key(key: &str) -> String {
    let tail: String = key.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    format!("****{}", tail)
}
