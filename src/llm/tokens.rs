//! Best-effort prompt size estimation.
//!
//! An unknown model never fails the run: the estimate falls back to the
//! prompt's character count. Generation itself has no such fallback.

use std::fmt;

use tracing::debug;

/// Counts tokens for a model, if it knows the model's encoding.
pub trait TokenEstimator {
    fn count_tokens(&self, model: &str, text: &str) -> Option<usize>;
}

/// Estimator backed by `tiktoken-rs` encodings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TiktokenEstimator;

impl TokenEstimator for TiktokenEstimator {
    fn count_tokens(&self, model: &str, text: &str) -> Option<usize> {
        match tiktoken_rs::get_bpe_from_model(model) {
            Ok(bpe) => Some(bpe.encode_with_special_tokens(text).len()),
            Err(e) => {
                debug!("No tokenizer for model '{}': {}", model, e);
                None
            }
        }
    }
}

/// Size of the prompt as shown to the user before generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptSize {
    Tokens(usize),
    /// The model is unknown to the estimator.
    Characters(usize),
}

impl fmt::Display for PromptSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptSize::Tokens(n) => write!(f, "Prompt token count: {}", n),
            PromptSize::Characters(n) => write!(
                f,
                "Warning: Unknown model for token counting.\nPrompt length (chars): {}",
                n
            ),
        }
    }
}

/// Estimate the prompt size, falling back to its character count.
pub fn estimate_prompt<E: TokenEstimator + ?Sized>(
    estimator: &E,
    model: &str,
    prompt: &str,
) -> PromptSize {
    match estimator.count_tokens(model, prompt) {
        Some(tokens) => PromptSize::Tokens(tokens),
        None => PromptSize::Characters(prompt.chars().count()),
    }
}
