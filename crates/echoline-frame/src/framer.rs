use bytes::BytesMut;

use crate::message::Message;

/// Default line buffer capacity, including the reserved terminator
/// slot: content is capped at `DEFAULT_BUFFER_SIZE - 1` bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 32;

/// Bytes accepted as end-of-line.
pub const TERMINATORS: [u8; 2] = [b'\n', b'\r'];

/// Returns true for either accepted end-of-line byte.
pub fn is_terminator(byte: u8) -> bool {
    TERMINATORS.contains(&byte)
}

/// Configuration for a line framer.
#[derive(Debug, Clone)]
pub struct FramerConfig {
    /// Line buffer capacity in bytes, terminator slot included.
    /// Maximum message content is `buffer_size - 1`.
    pub buffer_size: usize,
}

impl Default for FramerConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

/// Accumulates raw serial bytes into terminator-delimited messages.
///
/// One instance per channel, owned exclusively by that channel's rx
/// pump. Push semantics:
///
/// - terminator with pending bytes: emit them as a [`Message`] and
///   reset the buffer;
/// - terminator with an empty buffer: ignored (bare newlines never
///   produce messages);
/// - ordinary byte with room left: appended;
/// - ordinary byte past the content limit: dropped — the partial line
///   is preserved and truncated at the boundary, never overflowed.
#[derive(Debug)]
pub struct LineFramer {
    buf: BytesMut,
    config: FramerConfig,
}

impl LineFramer {
    /// Create a framer with the default buffer size.
    pub fn new() -> Self {
        Self::with_config(FramerConfig::default())
    }

    /// Create a framer with explicit configuration.
    pub fn with_config(config: FramerConfig) -> Self {
        Self {
            buf: BytesMut::with_capacity(config.buffer_size),
            config,
        }
    }

    /// Feed one received byte. Returns a completed message when `byte`
    /// terminates a non-empty line.
    pub fn push_byte(&mut self, byte: u8) -> Option<Message> {
        if is_terminator(byte) {
            if self.buf.is_empty() {
                return None;
            }
            // Copy out so the line buffer is reused in place.
            let payload = bytes::Bytes::copy_from_slice(&self.buf);
            self.buf.clear();
            return Some(Message::new(payload));
        }

        if self.buf.len() < self.max_message_len() {
            self.buf.extend_from_slice(&[byte]);
        }
        // else: bytes beyond the buffer limit are dropped

        None
    }

    /// Maximum message content length: one slot is reserved for the
    /// terminator.
    pub fn max_message_len(&self) -> usize {
        self.config.buffer_size.saturating_sub(1)
    }

    /// Bytes currently pending in the line buffer.
    pub fn pending_len(&self) -> usize {
        self.buf.len()
    }

    /// Framer configuration.
    pub fn config(&self) -> &FramerConfig {
        &self.config
    }
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_all(framer: &mut LineFramer, bytes: &[u8]) -> Vec<Message> {
        bytes
            .iter()
            .filter_map(|&byte| framer.push_byte(byte))
            .collect()
    }

    #[test]
    fn newline_completes_a_message() {
        let mut framer = LineFramer::new();
        let messages = push_all(&mut framer, b"hello\n");

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].as_bytes(), b"hello");
        assert_eq!(framer.pending_len(), 0);
    }

    #[test]
    fn carriage_return_also_terminates() {
        let mut framer = LineFramer::new();
        let messages = push_all(&mut framer, b"hi\r");

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].as_bytes(), b"hi");
    }

    #[test]
    fn bare_terminators_emit_nothing() {
        let mut framer = LineFramer::new();
        let messages = push_all(&mut framer, b"\n\r\n\r");
        assert!(messages.is_empty());
    }

    #[test]
    fn crlf_yields_a_single_message() {
        // The \r completes the line; the following \n lands on an
        // empty buffer and is ignored.
        let mut framer = LineFramer::new();
        let messages = push_all(&mut framer, b"one\r\ntwo\r\n");

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].as_bytes(), b"one");
        assert_eq!(messages[1].as_bytes(), b"two");
    }

    #[test]
    fn consecutive_lines_reuse_the_buffer() {
        let mut framer = LineFramer::new();
        let messages = push_all(&mut framer, b"first\nsecond\nthird\n");

        let contents: Vec<&[u8]> = messages.iter().map(|m| m.as_bytes()).collect();
        assert_eq!(contents, vec![&b"first"[..], b"second", b"third"]);
    }

    #[test]
    fn overlong_line_truncates_at_content_limit() {
        let mut framer = LineFramer::with_config(FramerConfig { buffer_size: 200 });

        let mut messages = push_all(&mut framer, &[b'x'; 250]);
        assert!(messages.is_empty());
        assert_eq!(framer.pending_len(), 199);

        messages.extend(framer.push_byte(b'\n'));
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].as_bytes(), &[b'x'; 199][..]);
    }

    #[test]
    fn framer_recovers_after_truncation() {
        let mut framer = LineFramer::with_config(FramerConfig { buffer_size: 8 });

        let mut messages = push_all(&mut framer, b"0123456789ABCDEF\n");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].as_bytes(), b"0123456");

        messages = push_all(&mut framer, b"ok\n");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].as_bytes(), b"ok");
    }

    #[test]
    fn exactly_full_line_is_intact() {
        let mut framer = LineFramer::with_config(FramerConfig { buffer_size: 8 });
        let messages = push_all(&mut framer, b"1234567\n");

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].as_bytes(), b"1234567");
    }

    #[test]
    fn default_buffer_matches_constant() {
        let framer = LineFramer::new();
        assert_eq!(framer.max_message_len(), DEFAULT_BUFFER_SIZE - 1);
    }

    #[test]
    fn terminator_classification() {
        assert!(is_terminator(b'\n'));
        assert!(is_terminator(b'\r'));
        assert!(!is_terminator(b'a'));
        assert!(!is_terminator(0));
    }
}
