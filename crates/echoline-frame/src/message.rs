use bytes::Bytes;

/// A completed, terminator-stripped line of input.
///
/// Messages are copied out of the framer's buffer at emission time, so
/// the buffer can be reused immediately and the consumer owns its bytes
/// outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    payload: Bytes,
}

impl Message {
    /// Create a message from already-framed bytes.
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// The message content, without any terminator.
    pub fn as_bytes(&self) -> &[u8] {
        &self.payload
    }

    /// Content length in bytes.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Consume the message, returning its payload.
    pub fn into_bytes(self) -> Bytes {
        self.payload
    }
}

impl AsRef<[u8]> for Message {
    fn as_ref(&self) -> &[u8] {
        &self.payload
    }
}
