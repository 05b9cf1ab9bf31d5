use anyhow::{Context, Result, bail};

use radio_link_test::capture::{LogRecord, decode_log_buffer};
use radio_link_test::hex::{parse_hex, to_hex};

use crate::cli::DecodeOpts;

pub fn run(opts: DecodeOpts) -> Result<()> {
    let buffer = match (&opts.file, &opts.hex) {
        (Some(path), _) => {
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))?
        }
        (None, Some(hex)) => parse_hex(hex).context("--hex")?,
        (None, None) => bail!("one of --file or --hex is required"),
    };
    log::info!("[decode] {} bytes", buffer.len());

    match decode_log_buffer(&buffer) {
        Ok(records) => {
            print_records(&records, &opts)?;
            eprintln!("[decode] {} record(s), {} bytes", records.len(), buffer.len());
            Ok(())
        }
        Err(truncated) => {
            // Show what did decode before failing.
            print_records(&truncated.records, &opts)?;
            Err::<(), _>(truncated.source).context("capture is not a whole number of records")
        }
    }
}

fn print_records(records: &[LogRecord], opts: &DecodeOpts) -> Result<()> {
    for (i, rec) in records.iter().enumerate() {
        if opts.json {
            println!("{}", serde_json::to_string(rec)?);
        } else if opts.payload {
            println!("#{:<4} {} data=[{}]", i, rec, to_hex(&rec.last_packet.data));
        } else {
            println!("#{:<4} {}", i, rec);
        }
    }
    Ok(())
}
