//! cmmt - CLI entry point.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use cmmt::config::{config_path, load_config, run_init};
use cmmt::git::SystemGit;
use cmmt::llm::{OpenAiClient, TiktokenEstimator};
use cmmt::run::{Pipeline, RunOptions, TerminalPrompter};

/// Draft a conventional commit message from staged changes using an LLM.
#[derive(Parser, Debug)]
#[command(name = "cmmt")]
#[command(about = "AI Git Helper")]
#[command(version, disable_version_flag = true)]
struct Cli {
    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,

    /// Initialize config file
    #[arg(long, conflicts_with_all = ["push", "yes", "branch", "extra_info", "output"])]
    init: bool,

    /// Push after commit
    #[arg(short, long)]
    push: bool,

    /// Auto confirm
    #[arg(short, long)]
    yes: bool,

    /// Suggest branch name
    #[arg(short, long)]
    branch: bool,

    /// Extra information for prompt
    #[arg(short, long)]
    extra_info: Option<String>,

    /// Output prompt to file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Cli {
    fn run_options(&self) -> RunOptions {
        RunOptions {
            suggest_branch: self.branch,
            auto_confirm: self.yes,
            push: self.push,
            extra_info: self.extra_info.clone(),
            prompt_output: self.output.clone(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let path = config_path()?;

    if cli.init {
        run_init(&path).context("Failed to initialize config")?;
        println!("Config initialized at {}.", path.display());
        return Ok(());
    }

    let config = load_config(&path)?;
    let git = SystemGit::locate().context("git is required")?;
    let backend = OpenAiClient::new();

    let pipeline = Pipeline {
        git: &git,
        backend: &backend,
        estimator: &TiktokenEstimator,
        prompter: &TerminalPrompter,
    };

    // A declined confirmation is a clean exit, same as a completed run.
    pipeline.run(&cli.run_options(), &config).await?;
    Ok(())
}

/// Log to stderr at `warn` unless `RUST_LOG` says otherwise.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .ok();
}
