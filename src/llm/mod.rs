//! Generation backend client and prompt size estimation.

pub mod client;
pub mod tokens;

pub use client::{DEFAULT_BASE_URL, GenerationBackend, GenerationResult, OpenAiClient, Usage};
pub use tokens::{PromptSize, TiktokenEstimator, TokenEstimator, estimate_prompt};
