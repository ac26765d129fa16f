//! Channel queues, echo workers, and wiring for echoline.
//!
//! This is the "just works" layer. Hand it a set of serial links and a
//! status indicator and it runs the whole pipeline: one rx pump and one
//! echo worker per channel, bridged by a bounded per-channel message
//! queue, plus a periodic indicator blinker. Channels are fully
//! isolated — each queue has exactly one producer (its pump) and one
//! consumer (its worker), and nothing is shared across channels.

pub mod engine;
pub mod error;
pub mod indicator;
pub mod queue;

mod pump;
mod worker;

pub use engine::{ChannelConfig, Engine, EngineConfig, StopHandle, GREETING};
pub use error::{EngineError, Result};
pub use indicator::{LogIndicator, StatusIndicator};
pub use queue::{MessageQueue, QueueConsumer, QueueProducer};
pub use worker::ECHO_LINE_ENDING;
