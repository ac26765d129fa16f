use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use echoline_frame::LineFramer;
use echoline_transport::SerialRx;
use tracing::{debug, trace};

use crate::queue::QueueProducer;

/// How long the pump idles when the line is quiet.
const IDLE_POLL: Duration = Duration::from_millis(1);

/// Drive one channel's receive side: fetch bytes, frame them, and hand
/// completed messages to the queue.
///
/// This loop is the interrupt-context analog. It never blocks on the
/// queue — a full queue drops the message silently — and it drains all
/// available bytes before idling, so framing keeps pace with bursts.
/// Exits when the stop flag is set or the line reports a disconnect;
/// dropping the producer then lets the worker drain and stop.
pub(crate) fn run_rx_pump(
    channel: usize,
    mut rx: Box<dyn SerialRx>,
    mut framer: LineFramer,
    producer: QueueProducer,
    stop: Arc<AtomicBool>,
) {
    while !stop.load(Ordering::Relaxed) {
        match rx.read_byte() {
            Ok(Some(byte)) => {
                if let Some(message) = framer.push_byte(byte) {
                    if !producer.try_enqueue(message) {
                        // Deliberate backpressure shedding: observable
                        // only via the absent echo.
                        trace!(channel, "queue full, message dropped");
                    }
                }
            }
            Ok(None) => thread::sleep(IDLE_POLL),
            Err(err) => {
                debug!(channel, error = %err, "receive line closed");
                break;
            }
        }
    }
    debug!(channel, "rx pump stopped");
}
