use radio_link_test::capture::encode_record;
use radio_link_test::config::RigConfig;
use radio_link_test::proto::{ControlOp, ParamId, RadioCommand};
use radio_link_test::session::{collect_log, run_link_test};
use radio_link_test::sim::SimNode;
use radio_link_test::stats::RxStats;

fn rig() -> (RigConfig, SimNode, SimNode) {
    let mut config = RigConfig::default();
    config.timing.settle_ms = 0;
    config.timing.run_ms = 0;
    config.radio.mode = 2;
    config.radio.power = 8;
    config.radio.channel = 40;

    let chars = &config.characteristics;
    let rx_stats = RxStats {
        rssi_sum: 9_000,
        packet_count: 180,
        crc_error_count: 175,
        tick_count: 16_000_000,
    };
    let tx = SimNode::new("tx-node", chars.command.clone())
        .with_read(chars.tx_stats.clone(), 200u32.to_le_bytes());
    let rx = SimNode::new("rx-node", chars.command.clone())
        .with_read(chars.rx_stats.clone(), rx_stats.to_bytes());
    (config, tx, rx)
}

#[test]
fn full_run_produces_summary() {
    let (config, mut tx, mut rx) = rig();
    let summary = run_link_test(&mut tx, &mut rx, &config).unwrap();

    assert_eq!(summary.sent, 200);
    assert_eq!(summary.packets, 180);
    assert_eq!(summary.crc, 175);
    assert_eq!(summary.rssi_sum, 9_000);
    assert_eq!(summary.ticks, 16_000_000);
    assert_eq!(summary.time_taken_s, 2.0);
    assert_eq!(summary.average_rssi, Some(50.0));
    assert_eq!(summary.lost, 20);
}

#[test]
fn nodes_see_params_then_start() {
    let (config, mut tx, mut rx) = rig();
    run_link_test(&mut tx, &mut rx, &config).unwrap();

    let params = [
        RadioCommand::set(ParamId::Mode, 2),
        RadioCommand::set(ParamId::Power, 8),
        RadioCommand::set(ParamId::Channel, 40),
    ];
    let mut expect_rx = params.to_vec();
    expect_rx.push(RadioCommand::Control(ControlOp::StartRx));
    let mut expect_tx = params.to_vec();
    expect_tx.push(RadioCommand::Control(ControlOp::StartTx));

    assert_eq!(rx.commands(), expect_rx.as_slice());
    assert_eq!(tx.commands(), expect_tx.as_slice());
}

#[test]
fn run_without_packets_has_no_average() {
    let (config, mut tx, _) = rig();
    let mut rx = SimNode::new("rx-node", config.characteristics.command.clone())
        .with_read(config.characteristics.rx_stats.clone(), [0u8; 16]);
    let summary = run_link_test(&mut tx, &mut rx, &config).unwrap();
    assert_eq!(summary.packets, 0);
    assert_eq!(summary.average_rssi, None);
}

#[test]
fn missing_tx_stats_fails_run() {
    let (config, _, mut rx) = rig();
    let mut tx = SimNode::new("tx-node", config.characteristics.command.clone());
    let err = run_link_test(&mut tx, &mut rx, &config).unwrap_err();
    assert!(format!("{err:#}").contains("tx stats"));
}

#[test]
fn log_split_across_notifications() {
    let (_, _, mut rx) = rig();
    let mut stream = Vec::new();
    for part in 1..=3u8 {
        encode_record(part, &RxStats::default(), 60, &[part; 20], &mut stream).unwrap();
    }
    // Chunk boundaries ignore record boundaries.
    for chunk in stream.chunks(7) {
        rx.push_notification("log", chunk.to_vec());
    }

    let capture = collect_log(&mut rx, "log").unwrap();
    assert!(capture.is_complete());
    assert_eq!(capture.bytes, 3 * 43);
    let parts: Vec<u8> = capture.records.iter().map(|r| r.part).collect();
    assert_eq!(parts, vec![1, 2, 3]);
    assert!(capture.records.iter().all(|r| r.last_packet.data == vec![r.part; 20]));
}
