//! Rig configuration.
//!
//! Loaded from TOML; every section and key is optional and falls back to the
//! bench defaults:
//!
//! ```toml
//! [timing]
//! prescaler = 1
//! settle_ms = 100
//! run_ms = 7000
//!
//! [radio]
//! mode = 0
//! power = 0
//! channel = 0
//! # packet_size = 32
//!
//! [nodes]
//! tx = "DD2AD668-201C-FAAB-B036-C245019CB582"
//! rx = "12939F17-4861-09C9-1D2D-06714A323FAA"
//!
//! [characteristics]
//! command = "58e9dcbc-7de3-9bbd-d744-8a3b40a226fa"
//! rx_stats = "7371f8f8-cd17-d3ac-6048-6c5987b117c4"
//! tx_stats = "0a021046-2273-93b9-ec42-07b1acea14df"
//! # log = "..."
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::proto::{ParamId, RadioCommand};
use crate::stats::{MAX_PRESCALER, Oscillator};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    pub timing: TimingConfig,
    pub radio: RadioParams,
    pub nodes: NodeConfig,
    pub characteristics: CharacteristicConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Node timer prescaler; tick rate is 16 MHz / 2^prescaler.
    pub prescaler: u8,
    /// Pause between configuration writes and each start command.
    pub settle_ms: u64,
    /// How long the TX node is left transmitting before stats are read.
    pub run_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            prescaler: 1,
            settle_ms: 100,
            run_ms: 7_000,
        }
    }
}

impl TimingConfig {
    pub fn oscillator(&self) -> Oscillator {
        Oscillator::new(self.prescaler)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn run(&self) -> Duration {
        Duration::from_millis(self.run_ms)
    }
}

/// Highest channel the node radio tunes to (2400 + channel MHz).
pub const MAX_CHANNEL: u8 = 100;

/// Parameters written to both nodes before a run. Values go to the node as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadioParams {
    pub mode: u8,
    pub power: u8,
    pub channel: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packet_size: Option<u8>,
}

impl RadioParams {
    /// Set commands in the order the nodes expect them.
    pub fn commands(&self) -> Vec<RadioCommand> {
        let mut cmds = vec![
            RadioCommand::set(ParamId::Mode, self.mode),
            RadioCommand::set(ParamId::Power, self.power),
            RadioCommand::set(ParamId::Channel, self.channel),
        ];
        if let Some(size) = self.packet_size {
            cmds.push(RadioCommand::set(ParamId::PacketSize, size));
        }
        cmds
    }

    /// Values the node radio will not accept as given. They are still sent.
    pub fn out_of_range(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.channel > MAX_CHANNEL {
            warnings.push(format!(
                "radio.channel {} is above {} ({} MHz)",
                self.channel,
                MAX_CHANNEL,
                2400 + u32::from(self.channel)
            ));
        }
        if self.packet_size == Some(0) {
            warnings.push("radio.packet_size 0 sends empty packets".to_string());
        }
        warnings
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub tx: String,
    pub rx: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            tx: "DD2AD668-201C-FAAB-B036-C245019CB582".into(),
            rx: "12939F17-4861-09C9-1D2D-06714A323FAA".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacteristicConfig {
    pub command: String,
    pub rx_stats: String,
    pub tx_stats: String,
    /// Notify characteristic streaming log records, if the firmware exposes one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<String>,
}

impl Default for CharacteristicConfig {
    fn default() -> Self {
        Self {
            command: "58e9dcbc-7de3-9bbd-d744-8a3b40a226fa".into(),
            rx_stats: "7371f8f8-cd17-d3ac-6048-6c5987b117c4".into(),
            tx_stats: "0a021046-2273-93b9-ec42-07b1acea14df".into(),
            log: None,
        }
    }
}

impl RigConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: RigConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timing.prescaler > MAX_PRESCALER {
            bail!(
                "timing.prescaler must be 0..={}, got {}",
                MAX_PRESCALER,
                self.timing.prescaler
            );
        }
        for (key, value) in [
            ("nodes.tx", &self.nodes.tx),
            ("nodes.rx", &self.nodes.rx),
            ("characteristics.command", &self.characteristics.command),
            ("characteristics.rx_stats", &self.characteristics.rx_stats),
            ("characteristics.tx_stats", &self.characteristics.tx_stats),
        ] {
            if value.trim().is_empty() {
                bail!("{key} must not be empty");
            }
        }
        if self.nodes.tx.eq_ignore_ascii_case(&self.nodes.rx) {
            bail!("nodes.tx and nodes.rx must be different devices");
        }
        Ok(())
    }
}
