//! SSE line and frame definitions

/// Prefix of lines carrying a payload
pub const DATA_PREFIX: &str = "data:";

/// Leading character of comment / keep-alive lines
pub const COMMENT_MARKER: char = ':';

/// Payload marking explicit end of stream
pub const DONE_SENTINEL: &str = "[DONE]";

/// Represents a parsed SSE line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseLine {
    /// Blank or whitespace-only line
    Empty,
    /// Comment line (starts with ':')
    Comment(String),
    /// Data payload with the prefix removed and whitespace trimmed
    Data(String),
    /// Anything else (`event:`, `id:`, garbage)
    Other(String),
}

/// One classified protocol event, derived from exactly one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamFrame {
    /// A payload to hand to the delta parser
    Data(String),
    /// Keep-alive, comment, or an unrecognized line
    Comment,
    /// The `[DONE]` sentinel
    End,
}

impl StreamFrame {
    /// Returns the frame kind as a string for logging.
    pub fn kind_name(&self) -> &'static str {
        match self {
            StreamFrame::Data(_) => "data",
            StreamFrame::Comment => "comment",
            StreamFrame::End => "end",
        }
    }
}
