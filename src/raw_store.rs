// 📦 Raw layer - newline-delimited JSON
// One compact JSON record per line, in fetch order

use crate::error::{EtlError, Result};
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Write `records` to `path`, replacing whatever was there.
pub fn write_jsonl(path: &Path, records: &[Value]) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    debug!(path = %path.display(), records = records.len(), "raw file written");
    Ok(records.len())
}

/// Read a JSONL file back. Blank lines are skipped.
pub fn load_jsonl(path: &Path) -> Result<Vec<Value>> {
    if !path.exists() {
        return Err(EtlError::MissingRawFile {
            path: path.to_path_buf(),
        });
    }

    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| EtlError::MalformedRawLine {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        records.push(record);
    }

    Ok(records)
}
