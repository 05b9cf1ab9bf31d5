use anyhow::{Context, Result};

use crate::capture::{LogRecord, decode_log_buffer};
use crate::config::{RadioParams, RigConfig};
use crate::error::FramingError;
use crate::link::{NodeLink, send_command};
use crate::proto::{ControlOp, RadioCommand};
use crate::stats::{decode_rx_stats, decode_tx_stats};
use crate::summary::RunSummary;

/// Write every radio parameter to one node.
pub fn configure_node(link: &mut dyn NodeLink, command_char: &str, params: &RadioParams) -> Result<()> {
    for warning in params.out_of_range() {
        log::warn!("[session] {}: {}, sending anyway", link.id(), warning);
    }
    for cmd in params.commands() {
        send_command(link, command_char, &cmd)?;
    }
    Ok(())
}

/// Run one TX -> RX test and collect the counters from both nodes.
///
/// Both nodes get the same radio parameters. RX is started first so it is
/// listening before the first packet goes out.
pub fn run_link_test(
    tx: &mut dyn NodeLink,
    rx: &mut dyn NodeLink,
    config: &RigConfig,
) -> Result<RunSummary> {
    let chars = &config.characteristics;
    let timing = &config.timing;

    log::info!("[session] setting parameters on {} and {}", tx.id(), rx.id());
    configure_node(tx, &chars.command, &config.radio)?;
    configure_node(rx, &chars.command, &config.radio)?;
    std::thread::sleep(timing.settle());

    log::info!("[session] starting RX on {}", rx.id());
    send_command(rx, &chars.command, &RadioCommand::Control(ControlOp::StartRx))?;
    std::thread::sleep(timing.settle());

    log::info!("[session] starting TX on {}", tx.id());
    send_command(tx, &chars.command, &RadioCommand::Control(ControlOp::StartTx))?;
    std::thread::sleep(timing.run());

    log::info!("[session] reading stats");
    let rx_raw = rx
        .read(&chars.rx_stats)
        .with_context(|| format!("reading rx stats from {}", rx.id()))?;
    let tx_raw = tx
        .read(&chars.tx_stats)
        .with_context(|| format!("reading tx stats from {}", tx.id()))?;

    let rx_stats = decode_rx_stats(&rx_raw).context("decoding rx stats")?;
    let sent = decode_tx_stats(&tx_raw).context("decoding tx stats")?;

    let summary = RunSummary::from_stats(sent, &rx_stats, timing.oscillator());
    summary.log();
    Ok(summary)
}

/// Records recovered from one capture session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogCapture {
    /// size of the concatenated capture
    pub bytes: usize,
    pub records: Vec<LogRecord>,
    /// set when the capture did not end on a record boundary
    pub framing: Option<FramingError>,
}

impl LogCapture {
    pub fn is_complete(&self) -> bool {
        self.framing.is_none()
    }
}

/// Concatenate the notification chunks delivered so far and decode them.
///
/// A framing break is not an error here: the decoded prefix is returned with
/// the break attached so the caller can decide what to keep.
pub fn collect_log(link: &mut dyn NodeLink, log_char: &str) -> Result<LogCapture> {
    let chunks = link
        .take_notifications(log_char)
        .with_context(|| format!("collecting log notifications from {}", link.id()))?;
    let buffer = chunks.concat();
    log::info!(
        "[session] {} log chunk(s), {} bytes from {}",
        chunks.len(),
        buffer.len(),
        link.id()
    );

    let capture = match decode_log_buffer(&buffer) {
        Ok(records) => LogCapture {
            bytes: buffer.len(),
            records,
            framing: None,
        },
        Err(truncated) => LogCapture {
            bytes: buffer.len(),
            records: truncated.records,
            framing: Some(truncated.source),
        },
    };
    Ok(capture)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::encode_record;
    use crate::proto::ParamId;
    use crate::sim::SimNode;
    use crate::stats::RxStats;

    fn quick_config() -> RigConfig {
        let mut config = RigConfig::default();
        config.timing.settle_ms = 0;
        config.timing.run_ms = 0;
        config
    }

    #[test]
    fn configure_writes_all_params() {
        let config = quick_config();
        let mut node = SimNode::new("n", config.characteristics.command.clone());
        let params = RadioParams {
            mode: 3,
            power: 4,
            channel: 5,
            packet_size: Some(6),
        };
        configure_node(&mut node, &config.characteristics.command, &params).unwrap();
        assert_eq!(node.param(ParamId::Mode), Some(3));
        assert_eq!(node.param(ParamId::Power), Some(4));
        assert_eq!(node.param(ParamId::Channel), Some(5));
        assert_eq!(node.param(ParamId::PacketSize), Some(6));
    }

    #[test]
    fn out_of_range_params_still_sent() {
        let mut node = SimNode::new("n", "cmd");
        let params = RadioParams {
            channel: 200,
            ..RadioParams::default()
        };
        assert!(!params.out_of_range().is_empty());
        configure_node(&mut node, "cmd", &params).unwrap();
        assert_eq!(node.param(ParamId::Channel), Some(200));
    }

    #[test]
    fn collect_log_keeps_prefix_on_break() {
        let mut node = SimNode::new("rx", "cmd");
        let mut buf = Vec::new();
        encode_record(1, &RxStats::default(), 40, &[1, 2], &mut buf).unwrap();
        let (a, b) = buf.split_at(10);
        node.push_notification("log", a.to_vec());
        node.push_notification("log", b.to_vec());
        node.push_notification("log", vec![0xAA, 0xAA, 2]);

        let capture = collect_log(&mut node, "log").unwrap();
        assert_eq!(capture.bytes, 25 + 3);
        assert_eq!(capture.records.len(), 1);
        assert!(!capture.is_complete());
        let framing = capture.framing.unwrap();
        assert_eq!(framing.offset, 25);
        assert_eq!(framing.orphaned, 3);
    }

    #[test]
    fn stats_decode_failure_is_reported() {
        let config = quick_config();
        let chars = &config.characteristics;
        let mut tx = SimNode::new("tx", chars.command.clone())
            .with_read(chars.tx_stats.clone(), vec![1, 0, 0, 0]);
        let mut rx = SimNode::new("rx", chars.command.clone())
            .with_read(chars.rx_stats.clone(), vec![0u8; 8]);
        let err = run_link_test(&mut tx, &mut rx, &config).unwrap_err();
        assert!(format!("{err:#}").contains("rx stats"));
    }
}
