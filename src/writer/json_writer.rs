use std::fs;
use std::path::Path;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use crate::core::error::{Error, ErrorKind, Result};

/// Pretty JSON with tab indentation.
pub fn to_json_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"\t"));
    value.serialize(&mut serializer)?;
    String::from_utf8(buffer).map_err(|e| Error::new(ErrorKind::Serialization, e.to_string()))
}

/// Serializes `value` fully in memory, then writes it to `path` in one go, so a
/// serialization failure never leaves a truncated file behind.
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let json = to_json_string(value)?;
    fs::write(path, json).map_err(|e| {
        Error::new(ErrorKind::Serialization, format!("{}: {}", path.display(), e))
    })?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}
