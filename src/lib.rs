//! Interview Chat - streaming client for AI mock interviews
//!
//! Sends the interview transcript to a chat-completion endpoint and folds the
//! SSE reply into the transcript while it is still arriving.
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod config;
pub mod conversation;
pub mod error;
pub mod models;
pub mod session;
pub mod sse;
pub mod traits;
