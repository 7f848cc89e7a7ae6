use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Message;

/// Interview style requested from the chat endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewMode {
    /// Programming and problem-solving questions
    Technical,
    /// Past experience and situational questions
    Behavioral,
    /// Open-ended getting-to-know-you questions
    #[default]
    General,
}

impl InterviewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewMode::Technical => "technical",
            InterviewMode::Behavioral => "behavioral",
            InterviewMode::General => "general",
        }
    }
}

impl fmt::Display for InterviewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known interview mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown interview mode '{0}' (expected technical, behavioral or general)")]
pub struct ParseModeError(pub String);

impl FromStr for InterviewMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "technical" => Ok(InterviewMode::Technical),
            "behavioral" | "behavioural" => Ok(InterviewMode::Behavioral),
            "general" => Ok(InterviewMode::General),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// Request body for the streaming chat endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    /// Full history, ending with the new user turn
    pub messages: Vec<Message>,
    /// Active interview mode
    pub mode: InterviewMode,
}

impl ChatRequest {
    pub fn new(messages: Vec<Message>, mode: InterviewMode) -> Self {
        Self { messages, mode }
    }

    /// Encode the request as a JSON body.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
