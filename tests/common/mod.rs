//! Common test utilities for integration tests.
//!
//! Fixtures for building chat sessions against scripted response bodies.

pub mod mocks;

#[allow(unused_imports)]
pub use mocks::*;

use interview_chat::adapters::mock::{MockHttpClient, MockResponse};
use interview_chat::config::ChatConfig;
use interview_chat::session::ChatSession;

/// Endpoint used by every test session.
pub const TEST_URL: &str = "http://localhost:54321/functions/v1/interview-chat";

/// A `data:` line carrying one content delta, newline included.
pub fn data_line(content: &str) -> String {
    format!(
        "data: {}\n",
        serde_json::json!({"choices": [{"delta": {"content": content}}]})
    )
}

/// The "Hel" + "lo!" body terminated by the sentinel.
#[allow(dead_code)]
pub fn hello_body() -> String {
    format!("{}{}data: [DONE]\n", data_line("Hel"), data_line("lo!"))
}

/// Session whose transport replays the given body chunks.
#[allow(dead_code)]
pub fn scripted_session<I, S>(chunks: I) -> ChatSession<MockHttpClient>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ChatSession::new(
        MockHttpClient::with_default(MockResponse::chunks(chunks)),
        ChatConfig::new(TEST_URL),
    )
}
