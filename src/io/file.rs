use std::path::Path;

use crate::io::payload::RawProject;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot is not a totalDetail payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Save a raw `totalDetail` payload to a JSON file.
pub fn save_snapshot(projects: &[RawProject], path: &Path) -> Result<(), SnapshotError> {
    let json = serde_json::to_string_pretty(projects)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load a raw `totalDetail` payload from a JSON file.
///
/// Accepts either the bare array or the API envelope `{ "data": [...] }`.
pub fn load_snapshot(path: &Path) -> Result<Vec<RawProject>, SnapshotError> {
    let json = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&json)?;
    let data = match value {
        serde_json::Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(serde_json::Value::Null)
        }
        other => other,
    };
    Ok(serde_json::from_value(data)?)
}
