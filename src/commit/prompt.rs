//! Prompt construction for AI-generated commit messages.
//!
//! The prompt is a pure function of the repository state, the run options,
//! and the configuration: no I/O, no clock, no randomness. The same inputs
//! always produce the same bytes.

use crate::config::Configuration;
use crate::git::RepositoryState;
use crate::run::RunOptions;

/// Conventional commit types the model is instructed to choose from.
pub const COMMIT_TYPES: [&str; 11] = [
    "feat", "fix", "docs", "style", "refactor", "perf", "test", "build", "ci", "chore", "revert",
];

/// Branch name prefixes the model is instructed to choose from.
pub const BRANCH_TYPES: [&str; 8] = [
    "feat", "fix", "docs", "style", "refactor", "perf", "test", "chore",
];

/// Advisory maximum length of the commit header.
pub const HEADER_MAX_CHARS: usize = 50;

const COMMIT_EXAMPLE: &str = "feat(auth): add login with OAuth 2.0

- Implement OAuth 2.0 login flow using Google and Facebook.
- Update user model to store OAuth tokens.

BREAKING CHANGE: user passwords are no longer stored in the database.
Closes #123";

/// Build the LLM prompt for generating a commit message (and branch name).
///
/// Sections, in order: task, commit message specification, branch name
/// specification (only with `suggest_branch`), output format, extra
/// information (only if any is configured), and the git context.
pub fn build_prompt(state: &RepositoryState, options: &RunOptions, config: &Configuration) -> String {
    let mut prompt = String::new();

    prompt.push_str(&task_section(options.suggest_branch));
    prompt.push_str(&commit_spec_section());
    if options.suggest_branch {
        prompt.push_str(&branch_spec_section());
    }
    prompt.push_str(&output_format_section(options.suggest_branch));
    if let Some(extra) = extra_info_section(config.extra_info(), options.extra_info()) {
        prompt.push_str(&extra);
    }
    prompt.push_str(&context_section(state));

    prompt
}

fn task_section(suggest_branch: bool) -> String {
    let mut section = String::from(
        "# Task
I will provide you with the output of `git status` and `git diff`. Based on this, generate:
- A **Commit Message** that follows the **Conventional Commits** specification.
",
    );
    if suggest_branch {
        section.push_str("- A **Branch Name** that follows the specification.\n");
    }
    section
}

fn commit_spec_section() -> String {
    format!(
        "# Requirements
## Commit Message Specification
- **Header**: `<type>(<scope>): <short summary>` (no more than {HEADER_MAX_CHARS} characters)
  - Type: {types}.
  - Scope: Optional, indicates the module (e.g., auth, ui, parser, gradle).
  - Summary: Starts with a verb in present tense, lowercase first letter, no period at the end, describes the changes in detail.
- **Body**: (if necessary) Detailed explanation of the reason and logic for the changes.
- **Footer**: (if necessary) List Breaking Changes or related Issue IDs.
Example:
```
{COMMIT_EXAMPLE}
```
",
        types = COMMIT_TYPES.join(", "),
    )
}

fn branch_spec_section() -> String {
    format!(
        "## Branch Name Specification
- Format: `type/short-description` (e.g., feat/login-api, fix/overflow-issue)
- Use lowercase letters, separate words with hyphens `-`.
- Types: {types}.
",
        types = BRANCH_TYPES.join(", "),
    )
}

fn output_format_section(suggest_branch: bool) -> String {
    let keys = if suggest_branch {
        r#"{"commit_message": "...", "branch_name": "..."}"#
    } else {
        r#"{"commit_message": "..."}"#
    };
    format!(
        "# Important
You must strictly follow the specifications without any deviations.
# Output Format
Respond with a single JSON object and nothing else (no explanation, no surrounding text): {keys}
"
    )
}

/// Configured extra info first, then the run's, each only if non-empty.
fn extra_info_section(configured: Option<&str>, per_run: Option<&str>) -> Option<String> {
    let parts: Vec<&str> = [configured, per_run].into_iter().flatten().collect();
    if parts.is_empty() {
        return None;
    }

    let mut section = String::from("# Extra Information\n");
    for part in parts {
        section.push_str(part);
        section.push('\n');
    }
    Some(section)
}

fn context_section(state: &RepositoryState) -> String {
    format!(
        "# Context
## Git status:
{status}
## Git diff:
{diff}
",
        status = state.status,
        diff = state.diff,
    )
}
