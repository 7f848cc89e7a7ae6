//! Mock implementations for testing.
//!
//! Enables testing the chat session without network access.

pub mod http;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
