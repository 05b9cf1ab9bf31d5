// src/proto/codec.rs
use std::fmt;
use std::str::FromStr;

use super::command::{ControlOp, ParamId, RadioCommand};
use crate::error::CodecError;

/// Serialize a parameter-set command: `[param_id, value]`.
pub fn encode_parameter(param: ParamId, value: u8) -> [u8; 2] {
    [param.code(), value]
}

/// Serialize a control command: `[opcode]`.
pub fn encode_control(op: ControlOp) -> [u8; 1] {
    [op.code()]
}

/// Public API: serialize a command to the bytes written on the command characteristic.
pub fn format_command(cmd: &RadioCommand) -> Vec<u8> {
    match *cmd {
        RadioCommand::Set { param, value } => encode_parameter(param, value).to_vec(),
        RadioCommand::Control(op) => encode_control(op).to_vec(),
    }
}

/// Public API: parse command bytes as a node receives them.
pub fn parse_command(bytes: &[u8]) -> Result<RadioCommand, CodecError> {
    let Some(&code) = bytes.first() else {
        return Err(CodecError::BufferTooShort {
            field: "opcode",
            offset: 0,
            needed: 1,
            available: 0,
        });
    };

    if let Ok(param) = ParamId::try_from(code) {
        if bytes.len() != 2 {
            return Err(CodecError::BadCommandLength {
                code,
                expected: 2,
                got: bytes.len(),
            });
        }
        return Ok(RadioCommand::Set {
            param,
            value: bytes[1],
        });
    }

    match ControlOp::try_from(code) {
        Ok(op) if bytes.len() == 1 => Ok(RadioCommand::Control(op)),
        Ok(_) => Err(CodecError::BadCommandLength {
            code,
            expected: 1,
            got: bytes.len(),
        }),
        // Parameter ids live below 0x10, control opcodes at 0x10 and up.
        Err(_) if code < 0x10 => Err(CodecError::InvalidParameterId(format!("0x{code:02X}"))),
        Err(e) => Err(e),
    }
}

/* ---------- tag conversions ---------- */

impl TryFrom<u8> for ParamId {
    type Error = CodecError;
    fn try_from(code: u8) -> Result<Self, Self::Error> {
        ParamId::ALL
            .into_iter()
            .find(|p| p.code() == code)
            .ok_or_else(|| CodecError::InvalidParameterId(format!("0x{code:02X}")))
    }
}

impl TryFrom<u8> for ControlOp {
    type Error = CodecError;
    fn try_from(code: u8) -> Result<Self, Self::Error> {
        ControlOp::ALL
            .into_iter()
            .find(|op| op.code() == code)
            .ok_or_else(|| CodecError::InvalidOpcode(format!("0x{code:02X}")))
    }
}

impl FromStr for ParamId {
    type Err = CodecError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "mode" => Ok(ParamId::Mode),
            "power" => Ok(ParamId::Power),
            "channel" => Ok(ParamId::Channel),
            "packet-size" | "packetsize" => Ok(ParamId::PacketSize),
            _ => Err(CodecError::InvalidParameterId(s.to_string())),
        }
    }
}

impl FromStr for ControlOp {
    type Err = CodecError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "start-tx" | "tx" => Ok(ControlOp::StartTx),
            "start-rx" | "rx" => Ok(ControlOp::StartRx),
            _ => Err(CodecError::InvalidOpcode(s.to_string())),
        }
    }
}

/// Accepts `name=value` for parameters and a bare name for control opcodes.
impl FromStr for RadioCommand {
    type Err = CodecError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once('=') {
            Some((name, value)) => {
                let param = ParamId::from_str(name.trim())?;
                let value = value.trim();
                let value = value.parse::<u8>().map_err(|_| CodecError::InvalidValue {
                    param: param.name(),
                    value: value.to_string(),
                })?;
                Ok(RadioCommand::Set { param, value })
            }
            None => ControlOp::from_str(s).map(RadioCommand::Control),
        }
    }
}

impl fmt::Display for RadioCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RadioCommand::Set { param, value } => write!(f, "{}={}", param.name(), value),
            RadioCommand::Control(op) => f.write_str(op.name()),
        }
    }
}

/* ---------- tests ---------- */
