//! Per-line SSE classification
//!
//! Stateless: every line maps to exactly one frame and no frame spans two
//! lines. Malformed lines never fail the stream, they decode to
//! [`StreamFrame::Comment`].

use crate::sse::events::{SseLine, StreamFrame, COMMENT_MARKER, DATA_PREFIX, DONE_SENTINEL};

/// Parse a single SSE line into its component type
pub fn parse_sse_line(line: &str) -> SseLine {
    if line.trim().is_empty() {
        return SseLine::Empty;
    }

    if let Some(stripped) = line.strip_prefix(COMMENT_MARKER) {
        return SseLine::Comment(stripped.trim().to_string());
    }

    if let Some(rest) = line.strip_prefix(DATA_PREFIX) {
        return SseLine::Data(rest.trim().to_string());
    }

    // Unknown line format - kept for logging, ignored downstream
    SseLine::Other(line.to_string())
}

/// Classify a framed line as a protocol event.
pub fn decode_line(line: &str) -> StreamFrame {
    match parse_sse_line(line) {
        SseLine::Data(payload) if payload == DONE_SENTINEL => StreamFrame::End,
        SseLine::Data(payload) => StreamFrame::Data(payload),
        SseLine::Empty | SseLine::Comment(_) => StreamFrame::Comment,
        SseLine::Other(other) => {
            tracing::debug!("Ignoring unrecognized stream line: {}", other);
            StreamFrame::Comment
        }
    }
}
