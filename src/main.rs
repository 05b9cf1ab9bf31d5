use anyhow::Result;
use clap::Parser;
use radio_link_test::config::RigConfig;

mod cli;
mod cmd;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => RigConfig::load(path)?,
        None => RigConfig::default(),
    };

    match args.cmd {
        cli::Cmd::Encode(opts) => cmd::encode::run(opts),
        cli::Cmd::Stats(opts) => cmd::stats::run(opts, &config),
        cli::Cmd::Decode(opts) => cmd::decode::run(opts),
        cli::Cmd::Demo(opts) => cmd::demo::run(opts, config),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
