use crate::models::Candle;
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Loads a JSON array of candles, oldest first.
pub fn load_candles(path: &Path) -> Result<Vec<Candle>> {
    if fs::metadata(path).is_err() {
        return Err(anyhow!("Candle file not found at {}", path.display()));
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open candle file at {}", path.display()))?;
    let candles: Vec<Candle> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Candle file {} is not a JSON candle array", path.display()))?;
    Ok(candles)
}

/// Pretty-prints `value` to `output`, or to stdout when no path is given.
pub fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create output directory {}", parent.display())
                    })?;
                }
            }
            let file = File::create(path)
                .with_context(|| format!("Unable to create output file at {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value).context("JSON encode failed")?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, value).context("JSON encode failed")?;
            handle.write_all(b"\n")?;
        }
    }
    Ok(())
}
