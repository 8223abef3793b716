//! Batch file loading.

use std::path::Path;

use kvpouch_level::RawBatchOp;

/// Loads a batch from a YAML or JSON file. The format follows the file
/// extension; anything else is tried as YAML, then JSON.
///
/// Entries may be `null`; they are kept so the adapter can report them.
pub fn load_batch(path: &Path) -> anyhow::Result<Vec<Option<RawBatchOp>>> {
    let data = std::fs::read(path)?;
    parse_batch(&data, path)
}

pub fn parse_batch(data: &[u8], path: &Path) -> anyhow::Result<Vec<Option<RawBatchOp>>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_slice(data)?),
        Some("json") => Ok(serde_json::from_slice(data)?),
        _ => {
            if let Ok(ops) = serde_yaml::from_slice(data) {
                return Ok(ops);
            }
            serde_json::from_slice(data)
                .map_err(|e| anyhow::anyhow!("failed to parse batch file (tried YAML and JSON): {e}"))
        }
    }
}
