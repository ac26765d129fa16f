use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use serialport::SerialPort;
use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::link::{SerialLink, SerialRx, SerialTx};

/// Poll interval for reads. A short timeout keeps `read_byte`
/// effectively non-blocking while avoiding a pure busy spin in the
/// driver.
const READ_TIMEOUT: Duration = Duration::from_millis(5);

/// A real serial device, opened by path and baud rate.
///
/// The underlying handle is cloned at open time so `split` can hand out
/// independent rx and tx halves without further fallible work.
pub struct SerialPortLink {
    name: String,
    reader: Box<dyn SerialPort>,
    writer: Box<dyn SerialPort>,
}

impl SerialPortLink {
    /// Open a serial device. 8N1, no flow control.
    pub fn open(path: &str, baud_rate: u32) -> Result<Self> {
        let writer = serialport::new(path, baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|source| TransportError::Open {
                port: path.to_string(),
                source,
            })?;

        verify_baud(baud_rate, writer.baud_rate())?;

        let reader = writer.try_clone().map_err(|source| TransportError::Open {
            port: path.to_string(),
            source,
        })?;

        info!(port = path, baud = baud_rate, "opened serial device");

        Ok(Self {
            name: path.to_string(),
            reader,
            writer,
        })
    }
}

impl SerialLink for SerialPortLink {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_ready(&self) -> bool {
        // Opening the device is the readiness check; a handle we hold
        // is a handle the OS accepted.
        true
    }

    fn split(self: Box<Self>) -> (Box<dyn SerialRx>, Box<dyn SerialTx>) {
        debug!(port = %self.name, "splitting serial link");
        (
            Box::new(SerialPortRx { port: self.reader }),
            Box::new(SerialPortTx { port: self.writer }),
        )
    }
}

struct SerialPortRx {
    port: Box<dyn SerialPort>,
}

impl SerialRx for SerialPortRx {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        match self.port.read(&mut byte) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(byte[0])),
            Err(err) if err.kind() == ErrorKind::TimedOut => Ok(None),
            Err(err) if err.kind() == ErrorKind::WouldBlock => Ok(None),
            Err(err) if err.kind() == ErrorKind::Interrupted => Ok(None),
            Err(err) => Err(TransportError::Io(err)),
        }
    }
}

/// Some drivers accept any rate at open and silently clamp it. Read
/// the rate back so a clamped device fails loudly instead of echoing
/// garbage at the wrong speed.
fn verify_baud(requested: u32, reported: serialport::Result<u32>) -> Result<()> {
    match reported {
        Ok(actual) if actual == requested => Ok(()),
        Ok(actual) => Err(TransportError::Unsupported(format!(
            "baud rate {requested} (device reports {actual})"
        ))),
        Err(_) => Err(TransportError::Unsupported(format!(
            "baud rate {requested} (device cannot report its rate)"
        ))),
    }
}

struct SerialPortTx {
    port: Box<dyn SerialPort>,
}

impl SerialTx for SerialPortTx {
    fn write_byte(&mut self, byte: u8) -> Result<()> {
        loop {
            match self.port.write(&[byte]) {
                Ok(0) => return Err(TransportError::Disconnected),
                Ok(_) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::TimedOut => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }
}
