//! Chat-completion chunk envelopes
//!
//! Only the path `choices[0].delta.content` matters. Every other field is
//! ignored, and any missing link in that path means "no fragment".

use serde::Deserialize;

/// One `data:` payload from the chat endpoint
///
/// Choices stay untyped so a malformed later choice cannot hide the first.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChunkPayload {
    #[serde(default)]
    pub choices: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChoicePayload {
    #[serde(default)]
    pub delta: Option<DeltaPayload>,
}

/// Incremental part of a choice
#[derive(Debug, Clone, Deserialize, Default)]
pub(crate) struct DeltaPayload {
    #[serde(default)]
    pub content: Option<String>,
}

/// Extract the text fragment carried by a data payload.
///
/// Returns `None` for malformed JSON, a missing field anywhere along the
/// path, or empty content.
pub fn extract_delta(payload: &str) -> Option<String> {
    let chunk: ChunkPayload = match serde_json::from_str(payload) {
        Ok(chunk) => chunk,
        Err(e) => {
            tracing::debug!("Skipping unparseable payload: {}", e);
            return None;
        }
    };

    let first = chunk.choices.first()?;
    let choice = match ChoicePayload::deserialize(first) {
        Ok(choice) => choice,
        Err(e) => {
            tracing::debug!("Skipping malformed first choice: {}", e);
            return None;
        }
    };

    choice
        .delta
        .and_then(|delta| delta.content)
        .filter(|content| !content.is_empty())
}
