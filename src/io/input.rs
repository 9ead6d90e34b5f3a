use std::path::Path;

use anyhow::{Context, Result};

use crate::models::TranscribeResponse;

/// Parse an Amazon Transcribe output file
pub fn parse_transcribe_file(path: &Path) -> Result<TranscribeResponse> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {path:?}"))?;
    parse_transcribe_json(&content)
}

/// Parse an Amazon Transcribe JSON string
pub fn parse_transcribe_json(json: &str) -> Result<TranscribeResponse> {
    serde_json::from_str(json).context("Failed to parse Transcribe JSON")
}
