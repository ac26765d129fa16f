/// Errors that can occur in serial transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the named serial device.
    #[error("failed to open {port}: {source}")]
    Open {
        port: String,
        source: serialport::Error,
    },

    /// An I/O error occurred on the serial line.
    #[error("serial I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The other end of the link is gone.
    #[error("link disconnected")]
    Disconnected,

    /// The device does not support a required capability.
    #[error("unsupported device capability: {0}")]
    Unsupported(String),
}

pub type Result<T> = std::result::Result<T, TransportError>;
