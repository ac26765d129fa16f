use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};

use crate::error::{Result, TransportError};
use crate::link::{SerialLink, SerialRx, SerialTx};

/// In-memory serial link for tests and hardware-free runs.
///
/// [`LoopbackLink::pair`] returns the device side (implements
/// [`SerialLink`]) and a [`LoopbackHost`] representing the far end of
/// the wire: bytes the host sends appear on the device's rx half, and
/// bytes the device transmits can be read back from the host.
pub struct LoopbackLink {
    name: String,
    ready: bool,
    rx: Receiver<u8>,
    tx: Sender<u8>,
}

/// The far end of a loopback link.
pub struct LoopbackHost {
    to_device: Sender<u8>,
    from_device: Receiver<u8>,
}

impl LoopbackLink {
    /// Create a connected link/host pair.
    pub fn pair(name: impl Into<String>) -> (LoopbackLink, LoopbackHost) {
        Self::pair_with_readiness(name, true)
    }

    /// Create a pair whose device side reports not-ready.
    ///
    /// Exercises the startup failure path without hardware.
    pub fn pair_not_ready(name: impl Into<String>) -> (LoopbackLink, LoopbackHost) {
        Self::pair_with_readiness(name, false)
    }

    fn pair_with_readiness(name: impl Into<String>, ready: bool) -> (LoopbackLink, LoopbackHost) {
        let (host_tx, device_rx) = unbounded::<u8>();
        let (device_tx, host_rx) = unbounded::<u8>();
        let link = LoopbackLink {
            name: name.into(),
            ready,
            rx: device_rx,
            tx: device_tx,
        };
        let host = LoopbackHost {
            to_device: host_tx,
            from_device: host_rx,
        };
        (link, host)
    }
}

impl SerialLink for LoopbackLink {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn split(self: Box<Self>) -> (Box<dyn SerialRx>, Box<dyn SerialTx>) {
        (
            Box::new(LoopbackRx { rx: self.rx }),
            Box::new(LoopbackTx { tx: self.tx }),
        )
    }
}

struct LoopbackRx {
    rx: Receiver<u8>,
}

impl SerialRx for LoopbackRx {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        match self.rx.try_recv() {
            Ok(byte) => Ok(Some(byte)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(TransportError::Disconnected),
        }
    }
}

struct LoopbackTx {
    tx: Sender<u8>,
}

impl SerialTx for LoopbackTx {
    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.tx
            .send(byte)
            .map_err(|_| TransportError::Disconnected)
    }
}

impl LoopbackHost {
    /// Put bytes on the device's receive line.
    pub fn send_bytes(&self, bytes: &[u8]) {
        for &byte in bytes {
            // Device side gone: bytes fall on the floor, like an
            // unplugged cable.
            let _ = self.to_device.send(byte);
        }
    }

    /// Read one transmitted byte, waiting up to `timeout`.
    pub fn recv_byte(&self, timeout: Duration) -> Option<u8> {
        self.from_device.recv_timeout(timeout).ok()
    }

    /// Read transmitted bytes until a `\n` arrives (inclusive) or the
    /// deadline passes. Returns what was collected either way.
    pub fn recv_line(&self, timeout: Duration) -> Vec<u8> {
        let deadline = Instant::now() + timeout;
        let mut line = Vec::new();
        while let Some(remaining) = deadline.checked_duration_since(Instant::now()) {
            match self.from_device.recv_timeout(remaining) {
                Ok(byte) => {
                    line.push(byte);
                    if byte == b'\n' {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
        line
    }

    /// Drain everything the device has transmitted so far.
    pub fn drain(&self) -> Vec<u8> {
        self.from_device.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_flow_host_to_device() {
        let (link, host) = LoopbackLink::pair("loop0");
        let (mut rx, _tx) = Box::new(link).split();

        host.send_bytes(b"hi");
        assert_eq!(rx.read_byte().unwrap(), Some(b'h'));
        assert_eq!(rx.read_byte().unwrap(), Some(b'i'));
        assert_eq!(rx.read_byte().unwrap(), None);
    }

    #[test]
    fn bytes_flow_device_to_host() {
        let (link, host) = LoopbackLink::pair("loop0");
        let (_rx, mut tx) = Box::new(link).split();

        tx.write_all(b"ok\r\n").unwrap();
        assert_eq!(host.drain(), b"ok\r\n");
    }

    #[test]
    fn halves_work_across_threads() {
        let (link, host) = LoopbackLink::pair("loop0");
        let (mut rx, mut tx) = Box::new(link).split();

        let echo = std::thread::spawn(move || {
            let mut seen = 0;
            while seen < 3 {
                if let Some(byte) = rx.read_byte().unwrap() {
                    tx.write_byte(byte).unwrap();
                    seen += 1;
                } else {
                    std::thread::yield_now();
                }
            }
        });

        host.send_bytes(b"abc");
        let mut out = Vec::new();
        for _ in 0..3 {
            out.push(host.recv_byte(Duration::from_secs(1)).unwrap());
        }
        echo.join().unwrap();
        assert_eq!(out, b"abc");
    }

    #[test]
    fn dropped_host_reports_disconnect() {
        let (link, host) = LoopbackLink::pair("loop0");
        let (mut rx, _tx) = Box::new(link).split();
        drop(host);

        let err = rx.read_byte().unwrap_err();
        assert!(matches!(err, TransportError::Disconnected));
    }

    #[test]
    fn not_ready_pair_reports_not_ready() {
        let (link, _host) = LoopbackLink::pair_not_ready("dead0");
        assert!(!link.is_ready());
        assert_eq!(link.name(), "dead0");
    }

    #[test]
    fn recv_line_collects_through_newline() {
        let (link, host) = LoopbackLink::pair("loop0");
        let (_rx, mut tx) = Box::new(link).split();

        tx.write_all(b"hello\r\nrest").unwrap();
        let line = host.recv_line(Duration::from_millis(200));
        assert_eq!(line, b"hello\r\n");
    }
}
