//! JSON parsing helpers for AI backend responses
//!
//! Models often wrap the JSON payload in prose or code fences, so the
//! outermost `{ ... }` span is extracted before deserializing.

use crate::error::{Error, Result};

use super::types::MessageClassification;

/// Longest slice of raw model output quoted in error messages
const MAX_RAW_IN_ERROR: usize = 200;

fn truncate(raw: &str) -> String {
    if raw.len() <= MAX_RAW_IN_ERROR {
        return raw.to_string();
    }
    let mut end = MAX_RAW_IN_ERROR;
    while !raw.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &raw[..end])
}

/// Slice from the first `{` to the last `}` of a response
fn extract_json(response: &str) -> Result<&str> {
    let response = response.trim();
    match (response.find('{'), response.rfind('}')) {
        (Some(s), Some(e)) if s < e => Ok(&response[s..=e]),
        _ => Err(Error::InvalidData(format!(
            "No JSON found in AI response | Raw: {}",
            truncate(response)
        ))),
    }
}

/// Parse a message classification from AI response
pub fn parse_message_classification(response: &str) -> Result<MessageClassification> {
    let json_str = extract_json(response)?;

    let classification: MessageClassification = serde_json::from_str(json_str).map_err(|e| {
        Error::InvalidData(format!(
            "Invalid JSON from AI: {} | Raw: {}",
            e,
            truncate(json_str)
        ))
    })?;

    classification.validate()?;
    Ok(classification)
}
