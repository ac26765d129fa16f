//! Serial link abstraction for echoline.
//!
//! Provides a unified interface over different serial line mechanisms:
//! - Real serial devices (via the `serialport` crate)
//! - In-memory loopback pairs (for tests and hardware-free runs)
//!
//! This is the lowest layer of echoline. Everything else builds on top of
//! the [`SerialLink`] trait provided here.

pub mod error;
pub mod link;
pub mod loopback;
pub mod ports;
pub mod serial;

pub use error::{Result, TransportError};
pub use link::{SerialLink, SerialRx, SerialTx};
pub use loopback::{LoopbackHost, LoopbackLink};
pub use ports::{list_ports, PortInfo};
pub use serial::SerialPortLink;
