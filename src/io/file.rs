use std::path::Path;

use crate::error::{Error, Result};
use crate::model::Snapshot;

/// Load a snapshot from a JSON file.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let json = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_snapshot(&json)
}

/// Parse a snapshot and check its timeline config.
pub fn parse_snapshot(json: &str) -> Result<Snapshot> {
    let snapshot: Snapshot = serde_json::from_str(json)?;
    snapshot.config.validate()?;
    Ok(snapshot)
}
