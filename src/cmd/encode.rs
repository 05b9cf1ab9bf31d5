use anyhow::{Context, Result};

use radio_link_test::hex::to_hex;
use radio_link_test::proto::{RadioCommand, format_command};

use crate::cli::EncodeOpts;

pub fn run(opts: EncodeOpts) -> Result<()> {
    for text in &opts.commands {
        let cmd: RadioCommand = text
            .parse()
            .with_context(|| format!("encoding {:?}", text))?;
        println!("{:<16} {}", cmd.to_string(), to_hex(&format_command(&cmd)));
    }
    Ok(())
}
