pub mod codec;
pub mod command;

pub use codec::{encode_control, encode_parameter, format_command, parse_command};
pub use command::{ControlOp, ParamId, RadioCommand};
