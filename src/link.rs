use anyhow::{Context, Result};

use crate::proto::{RadioCommand, format_command};

/// Connection to one radio node's GATT service.
///
/// Discovery, connection and notification delivery live behind this trait;
/// the session only moves bytes through it.
pub trait NodeLink {
    /// Device address or name, for logs.
    fn id(&self) -> &str;

    /// Write without response.
    fn write(&mut self, characteristic: &str, bytes: &[u8]) -> Result<()>;

    fn read(&mut self, characteristic: &str) -> Result<Vec<u8>>;

    /// Drain notification chunks received on `characteristic` so far, in arrival order.
    fn take_notifications(&mut self, characteristic: &str) -> Result<Vec<Vec<u8>>>;
}

/// Encode `cmd` and write it to the node's command characteristic.
pub fn send_command(link: &mut dyn NodeLink, characteristic: &str, cmd: &RadioCommand) -> Result<()> {
    let bytes = format_command(cmd);
    let id = link.id().to_string();
    log::debug!("[{}] -> {} {:02X?}", id, cmd, bytes);
    link.write(characteristic, &bytes)
        .with_context(|| format!("writing {cmd} to {id}"))
}
