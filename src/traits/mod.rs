//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - Streaming POST transport used by the chat session

pub mod http;

pub use http::{ByteStream, Headers, HttpClient};
