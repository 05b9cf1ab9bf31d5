//! Decoder for the streamed RX log.
//!
//! The node appends one record per logging tick and streams the packed
//! sequence back. Records carry no delimiter or checksum; the only way to
//! find the next record is to read the payload size of the current one:
//!
//! ```text
//! ┌──────────────┬──────────────┬──────────┬──────────┬──────────────┐
//! │ Header (5B)  │ Stats (16B)  │ RSSI (1) │ Size (1) │ Data (N B)   │
//! │ part at [2]  │ 4 x u32 LE   │          │ N        │              │
//! └──────────────┴──────────────┴──────────┴──────────┴──────────────┘
//! ```
//!
//! A record is therefore `23 + N` bytes and the buffer must split into whole
//! records. Anything left over is reported as a [`FramingError`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{CodecError, FramingError};
use crate::stats::{RX_STATS_LEN, RxStats, decode_rx_stats};

pub const HEADER_LEN: usize = 5;
/// Header, stats, last rssi and last size.
pub const RECORD_FIXED_LEN: usize = HEADER_LEN + RX_STATS_LEN + 2;
pub const MAX_PACKET_LEN: usize = u8::MAX as usize;
/// Marker the node writes at header bytes 0 and 1.
pub const RECORD_MARKER: [u8; 2] = [0xAA, 0xAA];

/// Raw five-byte record header. Only the part id is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordHeader(pub [u8; HEADER_LEN]);

impl RecordHeader {
    pub fn part(&self) -> u8 {
        self.0[2]
    }

    pub fn has_marker(&self) -> bool {
        self.0[..2] == RECORD_MARKER
    }

    /// Body length the writer stored in bytes 3..5 (stats through data).
    pub fn declared_body_len(&self) -> u16 {
        u16::from_le_bytes([self.0[3], self.0[4]])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastPacket {
    pub rssi: u8,
    pub size: u8,
    pub data: Vec<u8>,
}

/// One decoded log record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub header: RecordHeader,
    pub part: u8,
    pub total_rssi: u32,
    pub packet_count: u32,
    pub crc: u32,
    pub ticks: u32,
    pub last_packet: LastPacket,
}

impl LogRecord {
    /// Bytes this record occupies in the stream.
    pub fn wire_len(&self) -> usize {
        RECORD_FIXED_LEN + usize::from(self.last_packet.size)
    }

    pub fn stats(&self) -> RxStats {
        RxStats {
            rssi_sum: self.total_rssi,
            packet_count: self.packet_count,
            crc_error_count: self.crc,
            tick_count: self.ticks,
        }
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "part={} total_rssi={} packets={} crc={} ticks={} last_rssi={} last_size={}",
            self.part,
            self.total_rssi,
            self.packet_count,
            self.crc,
            self.ticks,
            self.last_packet.rssi,
            self.last_packet.size
        )
    }
}

/// Append one record in the node's on-flash layout.
///
/// The header is `[0xAA, 0xAA, part, body_len_lo, body_len_hi]` where the body
/// is everything after the header.
pub fn encode_record(
    part: u8,
    stats: &RxStats,
    last_rssi: u8,
    payload: &[u8],
    out: &mut Vec<u8>,
) -> Result<(), CodecError> {
    if payload.len() > MAX_PACKET_LEN {
        return Err(CodecError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PACKET_LEN,
        });
    }
    let body_len = (RECORD_FIXED_LEN - HEADER_LEN + payload.len()) as u16;
    out.reserve(RECORD_FIXED_LEN + payload.len());
    out.extend_from_slice(&RECORD_MARKER);
    out.push(part);
    out.extend_from_slice(&body_len.to_le_bytes());
    out.extend_from_slice(&stats.to_bytes());
    out.push(last_rssi);
    out.push(payload.len() as u8);
    out.extend_from_slice(payload);
    Ok(())
}

/// Lazy, single-pass record reader over a capture buffer.
///
/// Yields records in buffer order. The first framing failure is yielded as an
/// `Err` and the iterator is fused afterwards.
#[derive(Debug, Clone)]
pub struct LogRecords<'a> {
    buf: &'a [u8],
    pos: usize,
    decoded: usize,
    failed: bool,
}

impl<'a> LogRecords<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            decoded: 0,
            failed: false,
        }
    }

    /// Bytes consumed by whole records so far.
    pub fn consumed(&self) -> usize {
        self.pos
    }

    fn take(&self, start: usize, len: usize, field: &'static str) -> Result<&'a [u8], FramingError> {
        start
            .checked_add(len)
            .and_then(|end| self.buf.get(start..end))
            .ok_or(FramingError {
                records: self.decoded,
                offset: self.pos,
                field,
                field_offset: start,
                orphaned: self.buf.len() - self.pos,
            })
    }

    fn decode_at_cursor(&self) -> Result<LogRecord, FramingError> {
        let start = self.pos;

        let header = self.take(start, HEADER_LEN, "header")?;
        let stats_raw = self.take(start + HEADER_LEN, RX_STATS_LEN, "stats")?;
        let rssi_at = start + HEADER_LEN + RX_STATS_LEN;
        let last_rssi = self.take(rssi_at, 1, "last_packet_rssi")?[0];
        let last_size = self.take(rssi_at + 1, 1, "last_packet_size")?[0];
        let data = self.take(start + RECORD_FIXED_LEN, usize::from(last_size), "last_packet_data")?;

        let mut hdr = [0u8; HEADER_LEN];
        hdr.copy_from_slice(header);
        let header = RecordHeader(hdr);

        let stats = decode_rx_stats(stats_raw).map_err(|_| FramingError {
            records: self.decoded,
            offset: start,
            field: "stats",
            field_offset: start + HEADER_LEN,
            orphaned: self.buf.len() - start,
        })?;

        Ok(LogRecord {
            part: header.part(),
            header,
            total_rssi: stats.rssi_sum,
            packet_count: stats.packet_count,
            crc: stats.crc_error_count,
            ticks: stats.tick_count,
            last_packet: LastPacket {
                rssi: last_rssi,
                size: last_size,
                data: data.to_vec(),
            },
        })
    }
}

impl Iterator for LogRecords<'_> {
    type Item = Result<LogRecord, FramingError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.buf.len() {
            return None;
        }
        match self.decode_at_cursor() {
            Ok(record) => {
                log::debug!("log record #{} at {}: {}", self.decoded, self.pos, record);
                self.pos += record.wire_len();
                self.decoded += 1;
                Some(Ok(record))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

impl std::iter::FusedIterator for LogRecords<'_> {}

/// Eager decode that failed part way. The records before the break are kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("log capture truncated after {} record(s)", records.len())]
pub struct TruncatedLog {
    pub records: Vec<LogRecord>,
    #[source]
    pub source: FramingError,
}

/// Decode a whole capture buffer into records.
pub fn decode_log_buffer(buf: &[u8]) -> Result<Vec<LogRecord>, TruncatedLog> {
    let mut records = Vec::new();
    for item in LogRecords::new(buf) {
        match item {
            Ok(record) => records.push(record),
            Err(source) => {
                log::warn!("log capture of {} bytes: {}", buf.len(), source);
                return Err(TruncatedLog { records, source });
            }
        }
    }
    Ok(records)
}
