//! Parsing the model's reply into a [`CommitPlan`].
//!
//! The plan is the only thing that crosses from generated text into git
//! commands, so its shape is checked strictly: `commit_message` must be a
//! non-empty string, and `branch_name` (when wanted and present) must be a
//! non-empty string too. Anything else is rejected whole.

use serde_json::Value;

use crate::error::ResponseError;

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

/// A validated commit message and optional branch name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitPlan {
    pub commit_message: String,
    pub branch_name: Option<String>,
}

/// Strip a leading ```` ```json ```` and a trailing ```` ``` ````, then trim.
pub fn normalize_response(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix(FENCE_OPEN) {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix(FENCE_CLOSE) {
        text = rest;
    }
    text.trim()
}

/// Parse the model's reply.
///
/// `branch_name` is only read when `wants_branch` is set; a missing or null
/// `branch_name` is tolerated. There is no attempt to dig JSON out of
/// surrounding prose: the normalized text must be the object itself.
pub fn parse_response(raw: &str, wants_branch: bool) -> Result<CommitPlan, ResponseError> {
    let text = normalize_response(raw);
    let malformed = |reason: String| ResponseError::Malformed {
        reason,
        raw: text.to_string(),
    };

    let value: Value =
        serde_json::from_str(text).map_err(|e| malformed(format!("invalid JSON: {}", e)))?;

    let Value::Object(object) = value else {
        return Err(malformed("expected a JSON object".to_string()));
    };

    let commit_message = match object.get("commit_message") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::String(_)) => {
            return Err(malformed("`commit_message` is empty".to_string()));
        }
        Some(other) => {
            return Err(malformed(format!(
                "`commit_message` must be a string, got {}",
                type_name(other)
            )));
        }
        None => return Err(malformed("missing `commit_message`".to_string())),
    };

    let branch_name = if wants_branch {
        match object.get("branch_name") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            Some(Value::String(_)) => {
                return Err(malformed("`branch_name` is empty".to_string()));
            }
            Some(other) => {
                return Err(malformed(format!(
                    "`branch_name` must be a string, got {}",
                    type_name(other)
                )));
            }
        }
    } else {
        None
    };

    Ok(CommitPlan {
        commit_message,
        branch_name,
    })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
