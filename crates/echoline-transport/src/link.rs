use crate::error::Result;

/// The receive half of a serial link.
///
/// `read_byte` is a non-blocking fetch: it is called from the rx pump,
/// which must complete each poll in bounded time, so an empty line FIFO
/// is reported as `Ok(None)` rather than blocking.
pub trait SerialRx: Send {
    /// Fetch the next received byte, if one is available.
    fn read_byte(&mut self) -> Result<Option<u8>>;
}

/// The transmit half of a serial link.
///
/// Transmission is polling, one byte at a time — the serial analog of
/// `uart_poll_out`. Writers may block until the byte is on the wire.
pub trait SerialTx: Send {
    /// Transmit a single byte.
    fn write_byte(&mut self, byte: u8) -> Result<()>;

    /// Transmit a byte slice, byte by byte.
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        for &byte in bytes {
            self.write_byte(byte)?;
        }
        Ok(())
    }
}

/// One serial line, before it is wired into a channel.
///
/// A link is consumed at startup: `split` yields independent rx and tx
/// halves so the rx pump and the echo worker each own exactly one side.
pub trait SerialLink: Send {
    /// Human-readable device name for diagnostics.
    fn name(&self) -> &str;

    /// Device readiness check. Links that report `false` here fail
    /// channel initialization; there is no retry.
    fn is_ready(&self) -> bool;

    /// Consume the link, yielding its receive and transmit halves.
    fn split(self: Box<Self>) -> (Box<dyn SerialRx>, Box<dyn SerialTx>);
}
