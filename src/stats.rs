use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Size of an RX stats block as read from the node.
pub const RX_STATS_LEN: usize = 16;
/// Bytes of a TX stats block that carry the sent counter.
pub const TX_STATS_MIN_LEN: usize = 4;
/// HFCLK feeding the node's timers.
pub const BASE_CLOCK_HZ: u32 = 16_000_000;
/// Largest prescaler the node's TIMER peripheral accepts.
pub const MAX_PRESCALER: u8 = 9;

/// Counters reported by the receiving node after a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RxStats {
    pub rssi_sum: u32,
    pub packet_count: u32,
    pub crc_error_count: u32,
    pub tick_count: u32,
}

impl RxStats {
    /// Mean RSSI over received packets; `None` when nothing was received.
    pub fn average_rssi(&self) -> Option<f64> {
        (self.packet_count > 0).then(|| self.rssi_sum as f64 / self.packet_count as f64)
    }

    pub fn try_average_rssi(&self) -> Result<f64, CodecError> {
        self.average_rssi().ok_or(CodecError::DivisionUndefined)
    }

    pub fn to_bytes(&self) -> [u8; RX_STATS_LEN] {
        let mut out = [0u8; RX_STATS_LEN];
        out[0..4].copy_from_slice(&self.rssi_sum.to_le_bytes());
        out[4..8].copy_from_slice(&self.packet_count.to_le_bytes());
        out[8..12].copy_from_slice(&self.crc_error_count.to_le_bytes());
        out[12..16].copy_from_slice(&self.tick_count.to_le_bytes());
        out
    }
}

/// Read the little-endian u32 at `offset`, naming `field` if it runs past the end.
pub fn read_u32_le(bytes: &[u8], offset: usize, field: &'static str) -> Result<u32, CodecError> {
    let raw = offset
        .checked_add(4)
        .and_then(|end| bytes.get(offset..end))
        .ok_or(CodecError::BufferTooShort {
            field,
            offset,
            needed: 4,
            available: bytes.len().saturating_sub(offset),
        })?;
    Ok(u32::from(raw[0])
        | u32::from(raw[1]) << 8
        | u32::from(raw[2]) << 16
        | u32::from(raw[3]) << 24)
}

/// Decode a 16-byte RX block. At least 16 bytes; extra bytes are ignored.
pub fn decode_rx_stats(bytes: &[u8]) -> Result<RxStats, CodecError> {
    if bytes.len() < RX_STATS_LEN {
        return Err(CodecError::BufferTooShort {
            field: "rx_stats",
            offset: 0,
            needed: RX_STATS_LEN,
            available: bytes.len(),
        });
    }
    if bytes.len() > RX_STATS_LEN {
        log::warn!(
            "rx stats block is {} bytes, ignoring {} trailing",
            bytes.len(),
            bytes.len() - RX_STATS_LEN
        );
    }
    Ok(RxStats {
        rssi_sum: read_u32_le(bytes, 0, "rssi_sum")?,
        packet_count: read_u32_le(bytes, 4, "packet_count")?,
        crc_error_count: read_u32_le(bytes, 8, "crc_error_count")?,
        tick_count: read_u32_le(bytes, 12, "tick_count")?,
    })
}

/// Decode the sent counter from a TX block; anything past the first 4 bytes is ignored.
pub fn decode_tx_stats(bytes: &[u8]) -> Result<u32, CodecError> {
    if bytes.len() < TX_STATS_MIN_LEN {
        return Err(CodecError::BufferTooShort {
            field: "sent_count",
            offset: 0,
            needed: TX_STATS_MIN_LEN,
            available: bytes.len(),
        });
    }
    read_u32_le(bytes, 0, "sent_count")
}

/// Timer clock used to turn tick counts into seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Oscillator {
    pub prescaler: u8,
}

impl Default for Oscillator {
    fn default() -> Self {
        Self { prescaler: 1 }
    }
}

impl Oscillator {
    pub fn new(prescaler: u8) -> Self {
        Self { prescaler }
    }

    /// `16 MHz / 2^prescaler`.
    pub fn frequency_hz(&self) -> f64 {
        BASE_CLOCK_HZ as f64 / 2f64.powi(i32::from(self.prescaler))
    }

    pub fn seconds(&self, ticks: u32) -> f64 {
        ticks as f64 / self.frequency_hz()
    }
}
