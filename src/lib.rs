//! cmmt - A CLI tool that drafts conventional commit messages from staged changes.
//!
//! # Overview
//!
//! cmmt reads `git status` and the staged diff, asks an OpenAI-compatible
//! model for a commit message (and optionally a branch name) in JSON, shows
//! the draft for confirmation, and then runs `git commit`, `git checkout -b`,
//! and `git push` as requested.

pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod llm;
pub mod run;

// Re-export commonly used types
pub use commit::CommitPlan;
pub use config::Configuration;
pub use error::{BackendError, CommandError, ConfigError, GitError, GitStep, ResponseError, RunError};
pub use git::RepositoryState;
pub use llm::{GenerationResult, Usage};
pub use run::{Gate, Pipeline, RunOptions, RunOutcome};
