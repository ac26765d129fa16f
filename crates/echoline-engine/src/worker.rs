use echoline_frame::Message;
use echoline_transport::{SerialTx, TransportError};
use tracing::{debug, warn};

use crate::queue::QueueConsumer;

/// Line ending appended to every echoed message.
pub const ECHO_LINE_ENDING: &[u8] = b"\r\n";

/// Drive one channel's transmit side: block on the queue and echo each
/// message back out the originating line, byte by byte.
///
/// Transmit failures are logged and the message abandoned — the
/// transport is treated as always-succeeding, so there is no retry. A
/// disconnect ends the loop; otherwise it runs until the queue ends.
pub(crate) fn run_echo_worker(channel: usize, consumer: QueueConsumer, mut tx: Box<dyn SerialTx>) {
    while let Some(message) = consumer.dequeue() {
        if let Err(err) = echo_message(tx.as_mut(), &message) {
            warn!(channel, error = %err, "echo transmit failed");
            if matches!(err, TransportError::Disconnected) {
                break;
            }
        }
    }
    debug!(channel, "echo worker stopped");
}

fn echo_message(tx: &mut dyn SerialTx, message: &Message) -> echoline_transport::Result<()> {
    tx.write_all(message.as_bytes())?;
    tx.write_all(ECHO_LINE_ENDING)
}
