//! Line framing for chunked response bodies
//!
//! Chunks may split a line anywhere, including inside a multi-byte UTF-8
//! sequence. The framer carries incomplete bytes and the unterminated tail
//! across calls, so the lines it yields do not depend on where chunk
//! boundaries fall.

/// Stateful framer that turns byte chunks into complete lines.
///
/// # Example
///
/// ```
/// use interview_chat::sse::LineFramer;
///
/// let mut framer = LineFramer::new();
/// framer.push_bytes(b"data: a\nda");
/// assert_eq!(framer.next_line().as_deref(), Some("data: a"));
/// assert_eq!(framer.next_line(), None);
///
/// framer.push_bytes(b"ta: b\r\n");
/// assert_eq!(framer.next_line().as_deref(), Some("data: b"));
/// ```
#[derive(Debug, Default)]
pub struct LineFramer {
    /// Decoded text; everything before `start` has been handed out
    buffer: String,
    /// Read offset of the first line not yet returned
    start: usize,
    /// Trailing bytes of an incomplete UTF-8 sequence
    pending: Vec<u8>,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes from the body stream.
    ///
    /// Invalid UTF-8 is replaced with U+FFFD; a sequence cut off at the end
    /// of the chunk is held until the next call.
    pub fn push_bytes(&mut self, chunk: &[u8]) {
        self.compact();
        self.pending.extend_from_slice(chunk);

        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    self.buffer.push_str(text);
                    self.pending.clear();
                    return;
                }
                Err(err) => {
                    let valid = err.valid_up_to();
                    self.buffer
                        .push_str(&String::from_utf8_lossy(&self.pending[..valid]));
                    match err.error_len() {
                        Some(len) => {
                            self.buffer.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid + len);
                        }
                        None => {
                            // Incomplete sequence at the end; wait for more bytes
                            self.pending.drain(..valid);
                            return;
                        }
                    }
                }
            }
        }
    }

    /// Feed already-decoded text.
    pub fn push_str(&mut self, text: &str) {
        self.compact();
        self.buffer.push_str(text);
    }

    /// Pop the next complete line, without its `\n` or `\r\n` terminator.
    pub fn next_line(&mut self) -> Option<String> {
        let rest = &self.buffer[self.start..];
        let newline_pos = rest.find('\n')?;
        let raw = &rest[..newline_pos];
        let line = raw.strip_suffix('\r').unwrap_or(raw).to_string();
        self.start += newline_pos + 1;
        Some(line)
    }

    /// Drain every complete line currently buffered.
    pub fn lines(&mut self) -> impl Iterator<Item = String> + '_ {
        std::iter::from_fn(move || self.next_line())
    }

    /// Whether an unterminated tail is buffered.
    pub fn has_partial(&self) -> bool {
        self.buffer.len() > self.start || !self.pending.is_empty()
    }

    /// End of stream: discard any unterminated tail.
    ///
    /// A final line without a newline carries no event, so it is returned
    /// only for diagnostics and never decoded.
    pub fn finish(&mut self) -> Option<String> {
        self.pending.clear();
        self.compact();
        if self.buffer.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.buffer))
        }
    }

    /// Drop the lines already handed out, once per push rather than per line.
    fn compact(&mut self) {
        if self.start > 0 {
            self.buffer.drain(..self.start);
            self.start = 0;
        }
    }
}
