//! SSE (Server-Sent Events) stream decoding
//!
//! Turns the raw body of a chat-completion response into text fragments.
//! The body is newline-delimited:
//! - `data: <json>` - a completion chunk envelope
//! - `data: [DONE]` - explicit end of stream
//! - Lines starting with `:` and blank lines - keep-alives (ignored)
//!
//! # Module structure
//! - `framer` - Byte chunks to complete lines (LineFramer)
//! - `events` - Line and frame type definitions (SseLine, StreamFrame)
//! - `parser` - Per-line classification (parse_sse_line, decode_line)
//! - `payloads` - Envelope deserialization and delta extraction

mod events;
mod framer;
mod parser;
mod payloads;

pub use events::{SseLine, StreamFrame, COMMENT_MARKER, DATA_PREFIX, DONE_SENTINEL};
pub use framer::LineFramer;
pub use parser::{decode_line, parse_sse_line};
pub use payloads::extract_delta;
