use std::collections::{HashMap, VecDeque};

use anyhow::{Result, anyhow, bail};

use crate::link::NodeLink;
use crate::proto::{ControlOp, ParamId, RadioCommand, parse_command};

/// In-memory stand-in for a radio node.
///
/// Every write to the command characteristic is parsed as the firmware would
/// parse it; malformed commands fail the write. Reads and notifications are
/// served from whatever the test scripted.
#[derive(Debug, Default)]
pub struct SimNode {
    id: String,
    command_char: String,
    params: HashMap<ParamId, u8>,
    commands: Vec<RadioCommand>,
    reads: HashMap<String, Vec<u8>>,
    notifications: HashMap<String, VecDeque<Vec<u8>>>,
}

impl SimNode {
    pub fn new(id: impl Into<String>, command_char: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            command_char: command_char.into(),
            ..Self::default()
        }
    }

    /// Bytes returned by `read(characteristic)`.
    pub fn with_read(mut self, characteristic: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.reads.insert(characteristic.into(), bytes.into());
        self
    }

    /// Queue a notification chunk on `characteristic`.
    pub fn push_notification(&mut self, characteristic: &str, chunk: impl Into<Vec<u8>>) {
        self.notifications
            .entry(characteristic.to_string())
            .or_default()
            .push_back(chunk.into());
    }

    pub fn param(&self, param: ParamId) -> Option<u8> {
        self.params.get(&param).copied()
    }

    /// Every command accepted so far, in order.
    pub fn commands(&self) -> &[RadioCommand] {
        &self.commands
    }

    pub fn started(&self, op: ControlOp) -> bool {
        self.commands.contains(&RadioCommand::Control(op))
    }
}

impl NodeLink for SimNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn write(&mut self, characteristic: &str, bytes: &[u8]) -> Result<()> {
        if characteristic != self.command_char {
            bail!("{}: characteristic {} is not writable", self.id, characteristic);
        }
        let cmd = parse_command(bytes)?;
        if let RadioCommand::Set { param, value } = cmd {
            self.params.insert(param, value);
        }
        self.commands.push(cmd);
        Ok(())
    }

    fn read(&mut self, characteristic: &str) -> Result<Vec<u8>> {
        self.reads
            .get(characteristic)
            .cloned()
            .ok_or_else(|| anyhow!("{}: characteristic {} not readable", self.id, characteristic))
    }

    fn take_notifications(&mut self, characteristic: &str) -> Result<Vec<Vec<u8>>> {
        Ok(self
            .notifications
            .get_mut(characteristic)
            .map(|q| q.drain(..).collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::send_command;

    #[test]
    fn applies_parsed_commands() {
        let mut node = SimNode::new("n1", "cmd");
        send_command(&mut node, "cmd", &RadioCommand::set(ParamId::Channel, 7)).unwrap();
        send_command(&mut node, "cmd", &RadioCommand::Control(ControlOp::StartRx)).unwrap();
        assert_eq!(node.param(ParamId::Channel), Some(7));
        assert_eq!(node.param(ParamId::Power), None);
        assert!(node.started(ControlOp::StartRx));
        assert!(!node.started(ControlOp::StartTx));
        assert_eq!(node.commands().len(), 2);
    }

    #[test]
    fn rejects_garbage_and_wrong_characteristic() {
        let mut node = SimNode::new("n1", "cmd");
        assert!(node.write("cmd", &[0x7F]).is_err());
        assert!(node.write("other", &[0x10]).is_err());
        assert!(node.commands().is_empty());
    }

    #[test]
    fn notifications_drain_in_order() {
        let mut node = SimNode::new("n1", "cmd");
        node.push_notification("log", vec![1, 2]);
        node.push_notification("log", vec![3]);
        assert_eq!(node.take_notifications("log").unwrap(), vec![vec![1, 2], vec![3]]);
        assert!(node.take_notifications("log").unwrap().is_empty());
        assert!(node.read("missing").is_err());
    }
}
