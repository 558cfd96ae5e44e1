//! Confirmation gates.

use dialoguer::Confirm;
use tracing::warn;

/// Asks the user a yes/no question and blocks until answered.
pub trait Prompter {
    fn confirm(&self, question: &str) -> bool;
}

/// Interactive terminal prompt. Anything but an explicit "yes" declines.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&self, question: &str) -> bool {
        match Confirm::new()
            .with_prompt(question)
            .default(false)
            .interact()
        {
            Ok(answer) => answer,
            Err(e) => {
                // No terminal (or input closed): treat as a decline.
                warn!("Could not read confirmation: {}", e);
                false
            }
        }
    }
}
