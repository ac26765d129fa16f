use clap::{Args, Subcommand};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod ports;
pub mod run;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the echo service on one or more serial lines.
    Run(RunArgs),
    /// List serial devices visible to the OS.
    Ports(PortsArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Run(args) => run::run(args, format),
        Command::Ports(args) => ports::run(args, format),
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Serial device to serve, as NAME or NAME@BAUD. Repeat for one
    /// channel per line.
    #[arg(long = "port", value_name = "NAME[@BAUD]")]
    pub ports: Vec<String>,

    /// Add N idle in-memory loopback channels (no hardware required).
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub loopback: usize,

    /// Line buffer size in bytes; message content caps one byte lower.
    #[arg(long, default_value_t = 32)]
    pub msg_size: usize,

    /// Per-channel message queue depth.
    #[arg(long, default_value_t = 10)]
    pub queue_depth: usize,

    /// Status indicator toggle interval in milliseconds.
    #[arg(long, default_value_t = 1000)]
    pub blink_ms: u64,

    /// Skip the startup greeting banner.
    #[arg(long)]
    pub no_greeting: bool,
}

#[derive(Args, Debug, Default)]
pub struct PortsArgs {}
