use std::time::Duration;

use echoline_engine::{ChannelConfig, Engine, EngineConfig, LogIndicator};
use echoline_transport::{LoopbackHost, LoopbackLink, SerialLink, SerialPortLink};

use crate::cmd::RunArgs;
use crate::exit::{engine_error, transport_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::OutputFormat;

const DEFAULT_BAUD: u32 = 115_200;

pub fn run(args: RunArgs, _format: OutputFormat) -> CliResult<i32> {
    if args.ports.is_empty() && args.loopback == 0 {
        return Err(CliError::new(
            USAGE,
            "no channels: pass --port at least once or --loopback N",
        ));
    }
    if args.msg_size < 2 {
        return Err(CliError::new(
            USAGE,
            "--msg-size must be at least 2 (one content byte plus the terminator slot)",
        ));
    }
    if args.queue_depth == 0 {
        return Err(CliError::new(USAGE, "--queue-depth must be at least 1"));
    }

    let mut links: Vec<Box<dyn SerialLink>> = Vec::new();
    for spec in &args.ports {
        let (name, baud) = parse_port_spec(spec)?;
        let link = SerialPortLink::open(name, baud)
            .map_err(|err| transport_error("open failed", err))?;
        links.push(Box::new(link));
    }

    // Loopback hosts are held for the lifetime of the run so the
    // channels stay connected (idle unless something drives them).
    let mut hosts: Vec<LoopbackHost> = Vec::new();
    for id in 0..args.loopback {
        let (link, host) = LoopbackLink::pair(format!("loopback{id}"));
        links.push(Box::new(link));
        hosts.push(host);
    }

    let config = EngineConfig {
        channel: ChannelConfig {
            buffer_size: args.msg_size,
            queue_depth: args.queue_depth,
            greet: !args.no_greeting,
        },
        blink_interval: Duration::from_millis(args.blink_ms),
    };

    let engine = Engine::start(links, Box::new(LogIndicator::new()), config)
        .map_err(|err| engine_error("startup failed", err))?;

    install_ctrlc_handler(&engine)?;
    engine.join();
    drop(hosts);

    Ok(SUCCESS)
}

fn install_ctrlc_handler(engine: &Engine) -> CliResult<()> {
    let stop = engine.stop_handle();
    ctrlc::set_handler(move || {
        stop.stop();
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}

/// Parse `NAME` or `NAME@BAUD`.
fn parse_port_spec(spec: &str) -> CliResult<(&str, u32)> {
    match spec.rsplit_once('@') {
        None => Ok((spec, DEFAULT_BAUD)),
        Some((name, baud)) => {
            let baud: u32 = baud.parse().map_err(|_| {
                CliError::new(USAGE, format!("invalid baud rate in port spec: {spec}"))
            })?;
            if name.is_empty() {
                return Err(CliError::new(USAGE, format!("empty port name: {spec}")));
            }
            Ok((name, baud))
        }
    }
}
