//! Error types for cmmt modules using thiserror.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading, saving, or initializing the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("API key not found. Run `cmmt --init` first.")]
    MissingCredential,

    #[error("Could not locate the home directory (HOME is not set). Set CMMT_CONFIG to a config file path.")]
    HomeNotFound,

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file {path} is not valid YAML: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[source] serde_yaml::Error),

    #[error("Interactive setup failed: {0}")]
    Prompt(#[source] dialoguer::Error),
}

/// Errors from read-only repository queries.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("git executable not found in PATH")]
    NotInstalled,

    #[error("Not in a git repository or git status failed: {stderr}")]
    NotARepository { stderr: String },

    #[error("Failed to spawn git: {0}")]
    SpawnFailed(#[source] std::io::Error),
}

/// A mutating git step run by the command executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitStep {
    Commit,
    Checkout,
    Push,
}

impl GitStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            GitStep::Commit => "commit",
            GitStep::Checkout => "checkout",
            GitStep::Push => "push",
        }
    }
}

impl fmt::Display for GitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mutating git step failed. Earlier steps are left in place.
#[derive(Error, Debug)]
#[error("Git {step} failed: {detail}")]
pub struct CommandError {
    pub step: GitStep,
    pub detail: String,
}

/// Errors from the generation backend. None of these are retried.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Request to generation backend failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Generation backend rejected the API key (HTTP {status}): {body}")]
    Unauthorized { status: u16, body: String },

    #[error("Rate limited by generation backend: {body}")]
    RateLimited { body: String },

    #[error("Generation backend returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Generation backend returned an unreadable response: {0}")]
    InvalidResponse(String),

    #[error("Generation backend returned no message content")]
    EmptyResponse,
}

/// The model's output could not be turned into a commit plan.
#[derive(Error, Debug)]
pub enum ResponseError {
    #[error("Failed to parse JSON response ({reason}).\nAI Response: {raw}")]
    Malformed { reason: String, raw: String },
}

/// Fatal outcomes of a single run.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error("Failed to write prompt to {path}: {source}")]
    PromptWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("OpenAI API error: {0}")]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Response(#[from] ResponseError),

    #[error(transparent)]
    Command(#[from] CommandError),
}
