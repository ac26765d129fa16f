use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use echoline_frame::Message;

/// A bounded FIFO of completed messages bridging one channel's rx pump
/// (producer) and echo worker (consumer).
///
/// The producer side never blocks: enqueueing into a full queue drops
/// the new message and leaves existing entries untouched. The consumer
/// side blocks until a message arrives. Queues are strictly
/// per-channel; there is no cross-channel ordering.
pub struct MessageQueue;

impl MessageQueue {
    /// Default queue depth, in messages.
    pub const DEFAULT_DEPTH: usize = 10;

    /// Create a bounded queue and return its two endpoints.
    pub fn bounded(depth: usize) -> (QueueProducer, QueueConsumer) {
        let (tx, rx) = bounded::<Message>(depth);
        (QueueProducer { tx }, QueueConsumer { rx })
    }
}

/// The producing endpoint, owned by the channel's rx pump.
pub struct QueueProducer {
    tx: Sender<Message>,
}

impl QueueProducer {
    /// Enqueue without blocking. Returns `false` when the queue is full
    /// (the message is dropped, never retried) or the consumer is gone.
    pub fn try_enqueue(&self, message: Message) -> bool {
        match self.tx.try_send(message) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => false,
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Maximum number of messages in flight.
    pub fn capacity(&self) -> usize {
        // Constructed via `bounded`, so capacity is always present.
        self.tx.capacity().unwrap_or(0)
    }
}

/// The consuming endpoint, owned by the channel's echo worker.
pub struct QueueConsumer {
    rx: Receiver<Message>,
}

impl QueueConsumer {
    /// Dequeue the next message, blocking until one is available.
    /// Returns `None` once the producer is gone and the queue is
    /// drained — the worker's exit signal.
    pub fn dequeue(&self) -> Option<Message> {
        self.rx.recv().ok()
    }

    /// Messages currently queued.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
