use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "radio-link-test",
    version,
    about = "Radio link test rig: command encoding, stats and log decoding"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,

    /// Rig configuration file (TOML); defaults are used when omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Cmd {
    /// Print the bytes for a node command
    Encode(EncodeOpts),
    /// Decode RX/TX stats blocks into a run summary
    Stats(StatsOpts),
    /// Decode a captured log buffer
    Decode(DecodeOpts),
    /// Run a full session against two simulated nodes
    Demo(DemoOpts),
}

#[derive(Args, Debug, Clone)]
pub struct EncodeOpts {
    /// `mode=N`, `power=N`, `channel=N`, `packet-size=N`, `start-tx` or `start-rx`
    #[arg(required = true)]
    pub commands: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct StatsOpts {
    /// RX stats block as hex (16 bytes)
    #[arg(long)]
    pub rx: String,
    /// TX stats block as hex (at least 4 bytes)
    #[arg(long)]
    pub tx: String,
    /// Override the configured timer prescaler
    #[arg(long)]
    pub prescaler: Option<u8>,
    /// Print JSON instead of the one-line summary
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct DecodeOpts {
    /// Raw capture file
    #[arg(long, conflicts_with = "hex", required_unless_present = "hex")]
    pub file: Option<PathBuf>,
    /// Capture as hex
    #[arg(long)]
    pub hex: Option<String>,
    /// Print one JSON object per record
    #[arg(long, default_value_t = false)]
    pub json: bool,
    /// Include payload bytes in text output
    #[arg(long, default_value_t = false)]
    pub payload: bool,
}

#[derive(Args, Debug, Clone)]
pub struct DemoOpts {
    /// Packets the simulated TX node reports
    #[arg(long, default_value_t = 5000)]
    pub sent: u32,
    /// Packets the simulated RX node reports
    #[arg(long, default_value_t = 4870)]
    pub received: u32,
    /// Log records streamed by the simulated RX node
    #[arg(long, default_value_t = 4)]
    pub records: u8,
    /// Skip the configured settle/run delays
    #[arg(long, default_value_t = false)]
    pub fast: bool,
}
