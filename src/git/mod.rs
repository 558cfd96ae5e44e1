//! Git operations via the system git binary.

pub mod executor;
pub mod inspector;
pub mod runner;

pub use executor::{DEFAULT_REMOTE, FALLBACK_BRANCH, execute};
pub use inspector::{RepositoryState, get_diff, get_status, inspect};
pub use runner::{GitOutput, GitRunner, SystemGit};
