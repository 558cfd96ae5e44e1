//! Mutating git operations: commit, branch creation, and push.
//!
//! Steps run strictly in order and stop at the first failure. A failed step
//! never undoes the ones before it: a commit made before a failed checkout
//! or push stays in place so the user can see and finish the work by hand.

use super::runner::{GitRunner, args};
use crate::commit::CommitPlan;
use crate::error::{CommandError, GitStep};

/// Remote used for `--push`.
pub const DEFAULT_REMOTE: &str = "origin";

/// Branch pushed when the plan does not name one.
pub const FALLBACK_BRANCH: &str = "main";

/// Commit the plan, optionally create its branch, and optionally push.
///
/// Steps:
/// 1. `git commit -m <message>`
/// 2. `git checkout -b <branch>` (only if the plan has a branch name)
/// 3. `git push -u origin <branch or main>` (only if `push` is set)
pub fn execute<G: GitRunner + ?Sized>(
    git: &G,
    plan: &CommitPlan,
    push: bool,
) -> Result<(), CommandError> {
    run_step(
        git,
        GitStep::Commit,
        args(["commit", "-m", plan.commit_message.as_str()]),
    )?;
    println!("Committed.");

    if let Some(branch) = plan.branch_name.as_deref() {
        run_step(git, GitStep::Checkout, args(["checkout", "-b", branch]))?;
        println!("Checked out to new branch: {}", branch);
    }

    if push {
        let branch = plan.branch_name.as_deref().unwrap_or(FALLBACK_BRANCH);
        run_step(
            git,
            GitStep::Push,
            args(["push", "-u", DEFAULT_REMOTE, branch]),
        )?;
        println!("Pushed.");
    }

    Ok(())
}

/// Run one git step and map any failure to a [`CommandError`] naming it.
fn run_step<G: GitRunner + ?Sized>(
    git: &G,
    step: GitStep,
    command: Vec<String>,
) -> Result<(), CommandError> {
    let output = git.run(&command).map_err(|e| CommandError {
        step,
        detail: format!("could not run git: {}", e),
    })?;

    if !output.success {
        return Err(CommandError {
            step,
            detail: output.failure_detail(),
        });
    }

    Ok(())
}
