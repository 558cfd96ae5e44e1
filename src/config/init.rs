//! Interactive `--init` flow.

use std::path::Path;

use dialoguer::{Input, Password};

use super::{Configuration, DEFAULT_MODEL, load_config, save_config};
use crate::error::ConfigError;

/// Answers collected from the user during `--init`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitAnswers {
    pub api_key: String,
    pub model: String,
    pub base_url: Option<String>,
    pub max_tokens: u32,
}

/// Prompt for credentials and model settings, then save them to `path`.
///
/// Existing keys not covered by the questions (ignore list, extra info,
/// unknown keys) are kept.
pub fn run_init(path: &Path) -> Result<Configuration, ConfigError> {
    let existing = load_config(path)?;
    let answers = ask()?;
    let config = apply_answers(existing, answers);
    save_config(path, &config)?;
    Ok(config)
}

fn ask() -> Result<InitAnswers, ConfigError> {
    let api_key = Password::new()
        .with_prompt("Enter OpenAI API key")
        .interact()
        .map_err(ConfigError::Prompt)?;

    let model: String = Input::new()
        .with_prompt("Enter model")
        .default(DEFAULT_MODEL.to_string())
        .interact_text()
        .map_err(ConfigError::Prompt)?;

    let base_url: String = Input::new()
        .with_prompt("Enter base URL (optional)")
        .allow_empty(true)
        .interact_text()
        .map_err(ConfigError::Prompt)?;

    let max_tokens: String = Input::new()
        .with_prompt("Enter max tokens (optional)")
        .allow_empty(true)
        .validate_with(|input: &String| -> Result<(), &str> {
            parse_max_tokens(input)
                .map(|_| ())
                .ok_or("max tokens must be a non-negative integer")
        })
        .interact_text()
        .map_err(ConfigError::Prompt)?;

    Ok(InitAnswers {
        api_key: api_key.trim().to_string(),
        model,
        base_url: Some(base_url.trim().to_string()).filter(|s| !s.is_empty()),
        max_tokens: parse_max_tokens(&max_tokens).unwrap_or(0),
    })
}

/// Blank input means "backend default" and is stored as 0.
fn parse_max_tokens(input: &str) -> Option<u32> {
    let input = input.trim();
    if input.is_empty() {
        return Some(0);
    }
    input.parse().ok()
}

/// Merge init answers into an existing configuration.
pub fn apply_answers(existing: Configuration, answers: InitAnswers) -> Configuration {
    let model = if answers.model.trim().is_empty() {
        DEFAULT_MODEL.to_string()
    } else {
        answers.model.trim().to_string()
    };

    Configuration {
        api_key: answers.api_key,
        model,
        base_url: answers.base_url.or(existing.base_url),
        max_tokens: Some(answers.max_tokens),
        extra_info: Some(existing.extra_info.unwrap_or_default()),
        ..existing
    }
}
