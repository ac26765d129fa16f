//! End-to-end pipeline tests over loopback links: host-injected bytes
//! through framer, queue, and worker, back out the same line.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use echoline_engine::{
    ChannelConfig, Engine, EngineConfig, LogIndicator, StatusIndicator, GREETING,
};
use echoline_transport::{LoopbackHost, LoopbackLink};

const RECV_TIMEOUT: Duration = Duration::from_secs(2);

fn quiet_config() -> EngineConfig {
    EngineConfig {
        channel: ChannelConfig {
            greet: false,
            ..ChannelConfig::default()
        },
        blink_interval: Duration::from_millis(10),
    }
}

fn start_channels(count: usize, config: EngineConfig) -> (Engine, Vec<LoopbackHost>) {
    let mut links: Vec<Box<dyn echoline_transport::SerialLink>> = Vec::new();
    let mut hosts = Vec::new();
    for id in 0..count {
        let (link, host) = LoopbackLink::pair(format!("loop{id}"));
        links.push(Box::new(link));
        hosts.push(host);
    }
    let engine = Engine::start(links, Box::new(LogIndicator::new()), config).unwrap();
    (engine, hosts)
}

#[test]
fn hello_is_echoed_with_crlf() {
    let (engine, hosts) = start_channels(1, quiet_config());

    hosts[0].send_bytes(b"hello\n");
    assert_eq!(hosts[0].recv_line(RECV_TIMEOUT), b"hello\r\n");

    engine.stop_handle().stop();
    engine.join();
}

#[test]
fn channels_are_isolated() {
    let (engine, hosts) = start_channels(2, quiet_config());

    hosts[0].send_bytes(b"hello\n");
    assert_eq!(hosts[0].recv_line(RECV_TIMEOUT), b"hello\r\n");

    // Channel 1 saw none of channel 0's traffic.
    std::thread::sleep(Duration::from_millis(50));
    assert!(hosts[1].drain().is_empty());

    engine.stop_handle().stop();
    engine.join();
}

#[test]
fn multiple_lines_echo_in_order() {
    let (engine, hosts) = start_channels(1, quiet_config());

    hosts[0].send_bytes(b"first\nsecond\nthird\n");
    assert_eq!(hosts[0].recv_line(RECV_TIMEOUT), b"first\r\n");
    assert_eq!(hosts[0].recv_line(RECV_TIMEOUT), b"second\r\n");
    assert_eq!(hosts[0].recv_line(RECV_TIMEOUT), b"third\r\n");

    engine.stop_handle().stop();
    engine.join();
}

#[test]
fn carriage_return_terminates_and_bare_newlines_vanish() {
    let (engine, hosts) = start_channels(1, quiet_config());

    hosts[0].send_bytes(b"\n\nping\r\n");
    assert_eq!(hosts[0].recv_line(RECV_TIMEOUT), b"ping\r\n");

    std::thread::sleep(Duration::from_millis(50));
    assert!(hosts[0].drain().is_empty());

    engine.stop_handle().stop();
    engine.join();
}

#[test]
fn overlong_line_is_truncated_end_to_end() {
    let config = EngineConfig {
        channel: ChannelConfig {
            buffer_size: 200,
            greet: false,
            ..ChannelConfig::default()
        },
        blink_interval: Duration::from_millis(10),
    };
    let (engine, hosts) = start_channels(1, config);

    hosts[0].send_bytes(&[b'x'; 250]);
    hosts[0].send_bytes(b"\n");

    let mut expected = vec![b'x'; 199];
    expected.extend_from_slice(b"\r\n");
    assert_eq!(hosts[0].recv_line(RECV_TIMEOUT), expected);

    engine.stop_handle().stop();
    engine.join();
}

#[test]
fn greeting_banner_precedes_any_echo() {
    let config = EngineConfig {
        channel: ChannelConfig::default(),
        blink_interval: Duration::from_millis(10),
    };
    let (engine, hosts) = start_channels(1, config);

    assert_eq!(hosts[0].recv_line(RECV_TIMEOUT), GREETING[0].as_bytes());
    assert_eq!(hosts[0].recv_line(RECV_TIMEOUT), GREETING[1].as_bytes());

    hosts[0].send_bytes(b"hi\n");
    assert_eq!(hosts[0].recv_line(RECV_TIMEOUT), b"hi\r\n");

    engine.stop_handle().stop();
    engine.join();
}

#[test]
fn indicator_blinks_with_zero_traffic() {
    struct CountingIndicator {
        toggles: Arc<AtomicUsize>,
    }

    impl StatusIndicator for CountingIndicator {
        fn toggle(&mut self) {
            self.toggles.fetch_add(1, Ordering::Relaxed);
        }
    }

    let toggles = Arc::new(AtomicUsize::new(0));
    let (link, _host) = LoopbackLink::pair("loop0");
    let engine = Engine::start(
        vec![Box::new(link)],
        Box::new(CountingIndicator {
            toggles: toggles.clone(),
        }),
        quiet_config(),
    )
    .unwrap();

    std::thread::sleep(Duration::from_millis(100));
    assert!(toggles.load(Ordering::Relaxed) >= 3);

    engine.stop_handle().stop();
    engine.join();
}

#[test]
fn indicator_blinks_under_saturating_traffic() {
    struct CountingIndicator {
        toggles: Arc<AtomicUsize>,
    }

    impl StatusIndicator for CountingIndicator {
        fn toggle(&mut self) {
            self.toggles.fetch_add(1, Ordering::Relaxed);
        }
    }

    let toggles = Arc::new(AtomicUsize::new(0));
    let (link, host) = LoopbackLink::pair("loop0");
    let engine = Engine::start(
        vec![Box::new(link)],
        Box::new(CountingIndicator {
            toggles: toggles.clone(),
        }),
        quiet_config(),
    )
    .unwrap();

    for _ in 0..50 {
        host.send_bytes(b"spam line of traffic\n");
    }
    std::thread::sleep(Duration::from_millis(100));
    assert!(toggles.load(Ordering::Relaxed) >= 3);

    engine.stop_handle().stop();
    engine.join();
}

#[test]
fn stop_and_join_terminate_cleanly() {
    let (engine, hosts) = start_channels(2, quiet_config());

    hosts[0].send_bytes(b"bye\n");
    assert_eq!(hosts[0].recv_line(RECV_TIMEOUT), b"bye\r\n");

    engine.stop_handle().stop();
    // Must return: pumps see the flag, producers drop, workers drain,
    // the blinker checks the flag on its next tick.
    engine.join();
}
