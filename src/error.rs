use thiserror::Error;

/// Errors raised by the command encoder/parser and the stats and log decoders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("invalid parameter id: {0}")]
    InvalidParameterId(String),
    #[error("invalid control opcode: {0}")]
    InvalidOpcode(String),
    #[error("invalid value for {param}: {value:?}")]
    InvalidValue { param: &'static str, value: String },
    #[error("buffer too short for {field} at offset {offset}: need {needed} byte(s), have {available}")]
    BufferTooShort {
        field: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("command 0x{code:02X} must be {expected} byte(s), got {got}")]
    BadCommandLength {
        code: u8,
        expected: usize,
        got: usize,
    },
    #[error("packet payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },
    #[error(transparent)]
    Framing(#[from] FramingError),
    #[error("average rssi undefined: no packets received")]
    DivisionUndefined,
}

/// The log buffer did not decompose into whole records.
///
/// `offset` is where the first undecodable record starts, which is also the
/// end of the last record that decoded cleanly. Everything from there to the
/// end of the buffer is `orphaned`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "log framing broken after {records} record(s): {field} at offset {field_offset} runs past end, {orphaned} orphaned byte(s) from offset {offset}"
)]
pub struct FramingError {
    pub records: usize,
    pub offset: usize,
    pub field: &'static str,
    pub field_offset: usize,
    pub orphaned: usize,
}

impl FramingError {
    /// Index of the last record that decoded before the break, if any.
    pub fn last_record_index(&self) -> Option<usize> {
        self.records.checked_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_record_index_is_none_without_records() {
        let err = FramingError {
            records: 0,
            offset: 0,
            field: "last_packet_data",
            field_offset: 23,
            orphaned: 25,
        };
        assert_eq!(err.last_record_index(), None);

        let err = FramingError { records: 3, ..err };
        assert_eq!(err.last_record_index(), Some(2));
    }

    #[test]
    fn framing_converts_into_codec_error() {
        let err: CodecError = FramingError {
            records: 1,
            offset: 26,
            field: "header",
            field_offset: 26,
            orphaned: 4,
        }
        .into();
        assert!(matches!(err, CodecError::Framing(ref f) if f.orphaned == 4));
        assert!(err.to_string().contains("4 orphaned byte(s) from offset 26"));
    }
}
