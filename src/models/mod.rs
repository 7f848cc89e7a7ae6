//! Data models shared by the streaming client and its callers.

mod message;
mod request;

pub use message::{Message, MessageRole};
pub use request::{ChatRequest, InterviewMode, ParseModeError};
