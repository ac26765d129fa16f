use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::error::Result;

/// A binary status output toggled on a fixed interval.
///
/// The blinker task is the indicator's single owner; nothing else reads
/// or writes its state, and it has no data dependency on the channels.
pub trait StatusIndicator: Send {
    /// Readiness check, before the blinker starts.
    fn is_ready(&self) -> bool {
        true
    }

    /// One-time output configuration.
    fn configure(&mut self) -> Result<()> {
        Ok(())
    }

    /// Flip the output state.
    fn toggle(&mut self);
}

/// Indicator that records its state and logs each toggle.
///
/// The stand-in for a status LED on hosts without one.
#[derive(Debug, Default)]
pub struct LogIndicator {
    lit: bool,
}

impl LogIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current output state.
    pub fn is_lit(&self) -> bool {
        self.lit
    }
}

impl StatusIndicator for LogIndicator {
    fn toggle(&mut self) {
        self.lit = !self.lit;
        debug!(lit = self.lit, "status indicator toggled");
    }
}

/// Toggle-then-sleep forever, regardless of serial traffic. Runs at the
/// bottom of the schedule: the sleep dominates, so channel threads are
/// never starved.
pub(crate) fn run_blinker(
    mut indicator: Box<dyn StatusIndicator>,
    interval: Duration,
    stop: Arc<AtomicBool>,
) {
    while !stop.load(Ordering::Relaxed) {
        indicator.toggle();
        thread::sleep(interval);
    }
    debug!("blinker stopped");
}
