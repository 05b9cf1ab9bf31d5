use serde::{Deserialize, Serialize};

/// Commands accepted on a node's command characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RadioCommand {
    // ---- Config ----
    Set { param: ParamId, value: u8 },

    // ---- Test control ----
    Control(ControlOp),
}

/// Radio parameters settable with a two-byte command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamId {
    Mode,
    Power,
    Channel,
    PacketSize,
}

/// One-byte opcodes with no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlOp {
    StartTx,
    StartRx,
}

impl ParamId {
    pub const ALL: [ParamId; 4] = [
        ParamId::Mode,
        ParamId::Power,
        ParamId::Channel,
        ParamId::PacketSize,
    ];

    pub fn code(self) -> u8 {
        match self {
            ParamId::Mode => 0x00,
            ParamId::Power => 0x01,
            ParamId::Channel => 0x02,
            ParamId::PacketSize => 0x03,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ParamId::Mode => "mode",
            ParamId::Power => "power",
            ParamId::Channel => "channel",
            ParamId::PacketSize => "packet-size",
        }
    }
}

impl ControlOp {
    pub const ALL: [ControlOp; 2] = [ControlOp::StartTx, ControlOp::StartRx];

    pub fn code(self) -> u8 {
        match self {
            ControlOp::StartTx => 0x10,
            ControlOp::StartRx => 0x11,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ControlOp::StartTx => "start-tx",
            ControlOp::StartRx => "start-rx",
        }
    }
}

impl RadioCommand {
    pub fn set(param: ParamId, value: u8) -> Self {
        RadioCommand::Set { param, value }
    }
}

impl From<ControlOp> for RadioCommand {
    fn from(op: ControlOp) -> Self {
        RadioCommand::Control(op)
    }
}
