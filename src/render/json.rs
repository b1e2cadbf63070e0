//! JSON rendering for batch manifests.

use crate::error::{Error, Result};
use crate::model::Manifest;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a manifest to JSON.
pub fn to_json(manifest: &Manifest, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(manifest),
        JsonFormat::Compact => serde_json::to_string(manifest),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
