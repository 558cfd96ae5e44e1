//! The git binary as an opaque command executor.
//!
//! Every repository query and mutation goes through [`GitRunner`], so the
//! pipeline can be exercised without a real repository.

use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use crate::error::GitError;

/// Captured result of one git invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    /// Short failure description, preferring stderr.
    pub fn failure_detail(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        "git exited with a non-zero status".to_string()
    }
}

/// Trait for executing git commands.
///
/// This abstraction allows mocking the git subprocess in tests.
#[cfg_attr(test, mockall::automock)]
pub trait GitRunner {
    /// Run git with `args` and wait for it to finish.
    ///
    /// `Err` is returned only when the process could not be started; a
    /// non-zero exit is reported through [`GitOutput::success`].
    fn run(&self, args: &[String]) -> std::io::Result<GitOutput>;
}

/// Runs the system `git` binary, inheriting the user's git config,
/// SSH agent, and credential store.
#[derive(Debug, Clone)]
pub struct SystemGit {
    program: PathBuf,
    workdir: Option<PathBuf>,
}

impl SystemGit {
    /// Locate `git` on PATH.
    ///
    /// Uses the `which` crate for cross-platform executable detection.
    pub fn locate() -> Result<Self, GitError> {
        let program = which::which("git").map_err(|_| GitError::NotInstalled)?;
        Ok(Self {
            program,
            workdir: None,
        })
    }

    /// Run every command inside `dir` instead of the process working directory.
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }
}

impl GitRunner for SystemGit {
    fn run(&self, args: &[String]) -> std::io::Result<GitOutput> {
        debug!("git {}", args.join(" "));

        let mut command = Command::new(&self.program);
        command.args(args);
        if let Some(dir) = &self.workdir {
            command.current_dir(dir);
        }

        let output = command.output()?;
        Ok(GitOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Convert string literals into the owned argument list [`GitRunner`] takes.
pub(crate) fn args<I, S>(parts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    parts.into_iter().map(Into::into).collect()
}
