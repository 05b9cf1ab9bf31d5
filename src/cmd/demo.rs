use anyhow::Result;

use radio_link_test::capture::encode_record;
use radio_link_test::config::RigConfig;
use radio_link_test::session::{collect_log, run_link_test};
use radio_link_test::sim::SimNode;
use radio_link_test::stats::RxStats;

use crate::cli::DemoOpts;

const DEMO_LOG_CHAR: &str = "demo-log";

pub fn run(opts: DemoOpts, mut config: RigConfig) -> Result<()> {
    if opts.fast {
        config.timing.settle_ms = 0;
        config.timing.run_ms = 0;
    }
    let log_char = config
        .characteristics
        .log
        .clone()
        .unwrap_or_else(|| DEMO_LOG_CHAR.to_string());
    let chars = &config.characteristics;

    let rx_stats = RxStats {
        rssi_sum: opts.received.saturating_mul(52),
        packet_count: opts.received,
        crc_error_count: opts.received.saturating_sub(3),
        tick_count: 7 * config.timing.oscillator().frequency_hz() as u32,
    };

    let mut tx = SimNode::new(config.nodes.tx.clone(), chars.command.clone())
        .with_read(chars.tx_stats.clone(), opts.sent.to_le_bytes());
    let mut rx = SimNode::new(config.nodes.rx.clone(), chars.command.clone())
        .with_read(chars.rx_stats.clone(), rx_stats.to_bytes());

    // One record per logging tick, payload pattern (i + part) like the TX node sends.
    let payload_len = usize::from(config.radio.packet_size.unwrap_or(8));
    for part in 1..=opts.records {
        let mut chunk = Vec::new();
        let payload: Vec<u8> = (0..payload_len).map(|i| (i as u8).wrapping_add(part)).collect();
        let snapshot = RxStats {
            packet_count: rx_stats.packet_count / u32::from(opts.records) * u32::from(part),
            ..rx_stats
        };
        encode_record(part, &snapshot, 52, &payload, &mut chunk)?;
        rx.push_notification(&log_char, chunk);
    }

    let summary = run_link_test(&mut tx, &mut rx, &config)?;
    println!("{}", summary);

    let capture = collect_log(&mut rx, &log_char)?;
    for rec in &capture.records {
        println!("  {}", rec);
    }
    if let Some(framing) = capture.framing {
        eprintln!("[demo] {}", framing);
    }
    Ok(())
}
