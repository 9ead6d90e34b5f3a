use serde::{Deserialize, Serialize};

/// Health classification attached to every output row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Note {
    /// No classification; normalized to `Unknown` before a row is emitted
    #[serde(rename = "")]
    Clear,
    #[serde(rename = "error")]
    Error,
    #[serde(rename = "unknown")]
    Unknown,
    #[serde(rename = "multiple speakers")]
    MultipleSpeakers,
}

impl Note {
    pub fn as_str(&self) -> &'static str {
        match self {
            Note::Clear => "",
            Note::Error => "error",
            Note::Unknown => "unknown",
            Note::MultipleSpeakers => "multiple speakers",
        }
    }

    /// Rows never leave the builder with an empty note
    pub fn normalize(self) -> Self {
        match self {
            Note::Clear => Note::Unknown,
            other => other,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Note::Error)
    }
}

impl std::fmt::Display for Note {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A final transcript segment with aggregated confidence and a health note
///
/// Ids are 1-based, sequential, and gapless within one segmentation run.
/// Rows come out in id order; their timestamps follow the input ordering and
/// are not re-sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: u32,
    /// Resolved display name, or "Unknown"
    pub speaker: String,
    pub transcript: String,
    pub confidence_min: Option<f64>,
    pub confidence_max: Option<f64>,
    pub confidence_mean: Option<f64>,
    pub confidence_median: Option<f64>,
    pub note: Note,
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
}

impl Row {
    /// Segment length in seconds, when both endpoints are known
    pub fn duration(&self) -> Option<f64> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}
