//! Host side of a two-node radio link test rig.
//!
//! One node transmits fixed-size packets, the other receives and counts them.
//! This crate holds the byte-level protocol both nodes speak:
//!
//! - [`proto`] - two-byte parameter commands and one-byte control commands
//! - [`stats`] - 16-byte RX and 4-byte TX counter blocks
//! - [`capture`] - the packed, self-delimiting RX log stream
//!
//! plus the pieces that drive a run: [`config`], the [`link::NodeLink`]
//! transport seam, the [`session`] sequencing and the [`summary`] it produces.
//! The codec modules are pure functions over byte slices.

pub mod capture;
pub mod config;
pub mod error;
pub mod hex;
pub mod link;
pub mod proto;
pub mod session;
pub mod sim;
pub mod stats;
pub mod summary;

pub use capture::{LastPacket, LogRecord, LogRecords, RecordHeader, TruncatedLog, decode_log_buffer};
pub use error::{CodecError, FramingError};
pub use stats::{Oscillator, RxStats, decode_rx_stats, decode_tx_stats};
pub use summary::RunSummary;
