use std::{fs::File, io::BufWriter, path::Path};

use anyhow::{Context, Result};
use serde::Serialize;

/// Writes a serializable value as pretty JSON to `path`.
pub(crate) fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("[io::json] Failed to create JSON file: {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .with_context(|| format!("[io::json] Failed to write JSON to {}", path.display()))
}

/// Serializes a value as pretty JSON.
pub(crate) fn to_json_string<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("[io::json] Failed to serialize JSON")
}
