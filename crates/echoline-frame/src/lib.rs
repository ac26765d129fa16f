//! Line-terminated message framing for echoline.
//!
//! This is the core value-add layer of echoline. Raw bytes arriving on
//! a serial line are accumulated, one at a time, into a fixed-capacity
//! buffer; a `\n` or `\r` completes the pending bytes into a
//! [`Message`]. The framer is total and non-blocking: it never errors,
//! never allocates past its buffer, and drops out-of-policy bytes
//! silently, so it is safe to drive from an interrupt-style context.

pub mod framer;
pub mod message;

pub use framer::{is_terminator, FramerConfig, LineFramer, DEFAULT_BUFFER_SIZE, TERMINATORS};
pub use message::Message;
