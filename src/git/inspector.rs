//! Read-only repository queries: porcelain status and staged diff.

use tracing::warn;

use super::runner::{GitRunner, args};
use crate::error::GitError;

/// Repository state handed to the prompt builder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryState {
    /// `git status --porcelain --untracked-files=all` output.
    pub status: String,
    /// Staged diff; empty when nothing is staged.
    pub diff: String,
}

/// Get the porcelain working-tree status, including untracked files.
///
/// Any failure means "not a repository" and is fatal for the run.
pub fn get_status<G: GitRunner + ?Sized>(git: &G) -> Result<String, GitError> {
    let output = git
        .run(&args(["status", "--porcelain", "--untracked-files=all"]))
        .map_err(GitError::SpawnFailed)?;

    if !output.success {
        return Err(GitError::NotARepository {
            stderr: output.failure_detail(),
        });
    }

    Ok(output.stdout)
}

/// Build the `git diff --staged` argument list.
///
/// Each ignore glob becomes one `:(exclude)` pathspec after a single `--`,
/// in the given order, without deduplication or validation.
pub fn diff_args(ignore_files: &[String]) -> Vec<String> {
    let mut command = args(["diff", "--staged"]);
    if !ignore_files.is_empty() {
        command.push("--".to_string());
        command.extend(ignore_files.iter().map(|glob| format!(":(exclude){glob}")));
    }
    command
}

/// Get the staged diff, excluding `ignore_files`.
///
/// Never fails: a git error (including an invalid exclude glob) is treated
/// as "nothing staged" and yields an empty diff.
pub fn get_diff<G: GitRunner + ?Sized>(git: &G, ignore_files: &[String]) -> String {
    match git.run(&diff_args(ignore_files)) {
        Ok(output) if output.success => output.stdout,
        Ok(output) => {
            warn!(
                "git diff --staged failed, treating as no staged changes: {}",
                output.failure_detail()
            );
            String::new()
        }
        Err(e) => {
            warn!("Could not run git diff, treating as no staged changes: {}", e);
            String::new()
        }
    }
}

/// Collect status then diff. Status failure stops before the diff is queried.
pub fn inspect<G: GitRunner + ?Sized>(
    git: &G,
    ignore_files: &[String],
) -> Result<RepositoryState, GitError> {
    let status = get_status(git)?;
    let diff = get_diff(git, ignore_files);
    Ok(RepositoryState { status, diff })
}
