use anyhow::{Context, Result};

use radio_link_test::config::RigConfig;
use radio_link_test::hex::parse_hex;
use radio_link_test::stats::{Oscillator, decode_rx_stats, decode_tx_stats};
use radio_link_test::summary::RunSummary;

use crate::cli::StatsOpts;

pub fn run(opts: StatsOpts, config: &RigConfig) -> Result<()> {
    let rx_raw = parse_hex(&opts.rx).context("--rx")?;
    let tx_raw = parse_hex(&opts.tx).context("--tx")?;

    let rx = decode_rx_stats(&rx_raw).context("decoding rx stats")?;
    let sent = decode_tx_stats(&tx_raw).context("decoding tx stats")?;

    let osc = match opts.prescaler {
        Some(p) => Oscillator::new(p),
        None => config.timing.oscillator(),
    };
    let summary = RunSummary::from_stats(sent, &rx, osc);
    summary.log();

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", summary);
    }
    Ok(())
}
