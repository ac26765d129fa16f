use echoline_transport::TransportError;

/// Errors that can occur while starting the echo engine.
///
/// Steady-state policies (queue-full, line truncation) are silent by
/// design and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Started with an empty link set.
    #[error("no channels configured")]
    NoChannels,

    /// A serial device failed its readiness check.
    #[error("serial device not ready on channel {channel} ({name})")]
    DeviceNotReady { channel: usize, name: String },

    /// The status indicator failed its readiness check.
    #[error("status indicator not ready")]
    IndicatorNotReady,

    /// OS refused a worker thread.
    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        name: String,
        source: std::io::Error,
    },

    /// Transport-level error during startup (banner transmit, split).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
