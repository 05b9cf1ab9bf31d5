use std::fmt;

use serde::{Deserialize, Serialize};

use crate::stats::{Oscillator, RxStats};

/// Result of one completed run, combined from both nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// packets the TX node reports sending
    pub sent: u32,
    /// packets the RX node saw
    pub packets: u32,
    pub crc: u32,
    pub rssi_sum: u32,
    pub ticks: u32,

    /// ticks converted with the configured oscillator
    pub time_taken_s: f64,
    /// `None` when no packets arrived
    pub average_rssi: Option<f64>,
    /// sent but not seen by RX (saturating)
    pub lost: u32,
}

impl RunSummary {
    pub fn from_stats(sent: u32, rx: &RxStats, osc: Oscillator) -> Self {
        Self {
            sent,
            packets: rx.packet_count,
            crc: rx.crc_error_count,
            rssi_sum: rx.rssi_sum,
            ticks: rx.tick_count,
            time_taken_s: osc.seconds(rx.tick_count),
            average_rssi: rx.average_rssi(),
            lost: sent.saturating_sub(rx.packet_count),
        }
    }

    pub fn log(&self) {
        log::info!("[run] {}", self);
        if self.average_rssi.is_none() {
            log::warn!("[run] no packets received, average rssi not computed");
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sent={} | packets={} crc={} rssi={} ticks={} time_taken={}s",
            self.sent, self.packets, self.crc, self.rssi_sum, self.ticks, self.time_taken_s
        )?;
        if let Some(avg) = self.average_rssi {
            write!(f, " average_rssi={avg}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_derives_time_and_average() {
        let rx = RxStats {
            rssi_sum: 4_000,
            packet_count: 80,
            crc_error_count: 78,
            tick_count: 4_000_000,
        };
        let s = RunSummary::from_stats(100, &rx, Oscillator::default());
        assert_eq!(s.time_taken_s, 0.5);
        assert_eq!(s.average_rssi, Some(50.0));
        assert_eq!(s.lost, 20);
        assert_eq!(
            s.to_string(),
            "sent=100 | packets=80 crc=78 rssi=4000 ticks=4000000 time_taken=0.5s average_rssi=50"
        );
    }

    #[test]
    fn summary_without_packets_omits_average() {
        let s = RunSummary::from_stats(5000, &RxStats::default(), Oscillator::new(0));
        assert_eq!(s.average_rssi, None);
        assert_eq!(s.lost, 5000);
        assert!(!s.to_string().contains("average_rssi"));
    }

    #[test]
    fn lost_saturates() {
        let rx = RxStats {
            packet_count: 10,
            ..RxStats::default()
        };
        assert_eq!(RunSummary::from_stats(3, &rx, Oscillator::default()).lost, 0);
    }

    #[test]
    fn summary_json_has_null_average() {
        let s = RunSummary::from_stats(1, &RxStats::default(), Oscillator::default());
        let v: serde_json::Value = serde_json::to_value(&s).unwrap();
        assert!(v["average_rssi"].is_null());
        assert_eq!(v["sent"], 1);
    }
}
