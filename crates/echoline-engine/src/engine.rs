use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use echoline_frame::{FramerConfig, LineFramer};
use echoline_transport::{SerialLink, SerialRx, SerialTx};
use tracing::info;

use crate::error::{EngineError, Result};
use crate::indicator::{run_blinker, StatusIndicator};
use crate::pump::run_rx_pump;
use crate::queue::{MessageQueue, QueueConsumer, QueueProducer};
use crate::worker::run_echo_worker;

/// Greeting banner transmitted on each channel at startup.
pub const GREETING: [&str; 2] = [
    "Hello! I'm your echo bot.\r\n",
    "Tell me something and press enter:\r\n",
];

/// Per-channel sizing. The same configuration applies to every channel;
/// the channel count is fixed by the link set at startup.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Line buffer capacity, terminator slot included.
    pub buffer_size: usize,
    /// Message queue depth.
    pub queue_depth: usize,
    /// Transmit the greeting banner at startup.
    pub greet: bool,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            buffer_size: echoline_frame::DEFAULT_BUFFER_SIZE,
            queue_depth: MessageQueue::DEFAULT_DEPTH,
            greet: true,
        }
    }
}

/// Engine-wide configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub channel: ChannelConfig,
    /// Indicator toggle interval.
    pub blink_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            channel: ChannelConfig::default(),
            blink_interval: Duration::from_secs(1),
        }
    }
}

/// Requests engine shutdown. Cloneable; safe to use from a signal
/// handler.
#[derive(Clone)]
pub struct StopHandle {
    stop: Arc<AtomicBool>,
}

impl StopHandle {
    /// Ask every pipeline thread to wind down.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

/// A running echo pipeline: per-channel pump and worker threads plus
/// the indicator blinker.
pub struct Engine {
    stop: Arc<AtomicBool>,
    threads: Vec<JoinHandle<()>>,
}

impl Engine {
    /// Validate readiness, greet, and start every thread.
    ///
    /// Everything that can fail runs before anything is spawned:
    /// readiness checks, the greeting transmit, and per-channel wiring
    /// all complete first, so an error on any channel fails the whole
    /// startup with a diagnostic and no stray threads. By the time the
    /// first byte can arrive, the channel's framer and queue already
    /// exist.
    pub fn start(
        links: Vec<Box<dyn SerialLink>>,
        mut indicator: Box<dyn StatusIndicator>,
        config: EngineConfig,
    ) -> Result<Engine> {
        if links.is_empty() {
            return Err(EngineError::NoChannels);
        }
        for (channel, link) in links.iter().enumerate() {
            if !link.is_ready() {
                return Err(EngineError::DeviceNotReady {
                    channel,
                    name: link.name().to_string(),
                });
            }
        }
        if !indicator.is_ready() {
            return Err(EngineError::IndicatorNotReady);
        }
        indicator.configure()?;

        let mut pipelines = Vec::with_capacity(links.len());
        for (channel, link) in links.into_iter().enumerate() {
            let device = link.name().to_string();
            let (rx, mut tx) = link.split();

            if config.channel.greet {
                for line in GREETING {
                    tx.write_all(line.as_bytes())?;
                }
            }

            let (producer, consumer) = MessageQueue::bounded(config.channel.queue_depth);
            let framer = LineFramer::with_config(FramerConfig {
                buffer_size: config.channel.buffer_size,
            });

            pipelines.push(ChannelPipeline {
                channel,
                device,
                rx,
                tx,
                framer,
                producer,
                consumer,
            });
        }

        let stop = Arc::new(AtomicBool::new(false));
        let mut threads = Vec::with_capacity(pipelines.len() * 2 + 1);

        for pipeline in pipelines {
            let ChannelPipeline {
                channel,
                device,
                rx,
                tx,
                framer,
                producer,
                consumer,
            } = pipeline;

            info!(
                channel,
                device = %device,
                buffer_size = config.channel.buffer_size,
                queue_depth = config.channel.queue_depth,
                "channel started"
            );

            let pump_stop = stop.clone();
            let pump = spawn_named(format!("echoline-rx-{channel}"), move || {
                run_rx_pump(channel, rx, framer, producer, pump_stop)
            });
            match pump {
                Ok(handle) => threads.push(handle),
                Err(err) => return Err(wind_down(&stop, threads, err)),
            }

            let worker = spawn_named(format!("echoline-echo-{channel}"), move || {
                run_echo_worker(channel, consumer, tx)
            });
            match worker {
                Ok(handle) => threads.push(handle),
                Err(err) => return Err(wind_down(&stop, threads, err)),
            }
        }

        let blink_stop = stop.clone();
        let interval = config.blink_interval;
        let blinker = spawn_named("echoline-blink".to_string(), move || {
            run_blinker(indicator, interval, blink_stop)
        });
        match blinker {
            Ok(handle) => threads.push(handle),
            Err(err) => return Err(wind_down(&stop, threads, err)),
        }

        Ok(Engine { stop, threads })
    }

    /// Handle for requesting shutdown from another thread.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            stop: self.stop.clone(),
        }
    }

    /// Number of running pipeline threads.
    pub fn thread_count(&self) -> usize {
        self.threads.len()
    }

    /// Wait for every pipeline thread to finish. Under normal operation
    /// none of them does; this returns only after [`StopHandle::stop`].
    pub fn join(self) {
        for handle in self.threads {
            let _ = handle.join();
        }
    }
}

/// Everything a channel's threads need, assembled before any thread
/// runs.
struct ChannelPipeline {
    channel: usize,
    device: String,
    rx: Box<dyn SerialRx>,
    tx: Box<dyn SerialTx>,
    framer: LineFramer,
    producer: QueueProducer,
    consumer: QueueConsumer,
}

fn spawn_named<F>(name: String, body: F) -> Result<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new()
        .name(name.clone())
        .spawn(body)
        .map_err(|source| EngineError::Spawn { name, source })
}

/// Stop and join already-spawned threads after a mid-startup failure,
/// then hand the error back.
fn wind_down(
    stop: &Arc<AtomicBool>,
    threads: Vec<JoinHandle<()>>,
    err: EngineError,
) -> EngineError {
    stop.store(true, Ordering::Relaxed);
    for handle in threads {
        let _ = handle.join();
    }
    err
}
