//! AI-generated commit messages: prompt in, commit plan out.

pub mod plan;
pub mod prompt;

pub use plan::{CommitPlan, normalize_response, parse_response};
pub use prompt::{BRANCH_TYPES, COMMIT_TYPES, build_prompt};
