use serde::{Deserialize, Serialize};

/// Category of a flagged anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    IncompleteSentence,
    PotentialSpeakerMismatch,
    SuspiciousConfidencePattern,
    PotentialMissedSegmentation,
    PotentialNoiseSegment,
    SegmentOverlap,
    LargeTimeGap,
    SuspiciousSpeakerTransition,
    RapidSpeakerAlternation,
    SignificantConfidenceDrop,
    ContextualConfidenceAnomaly,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::IncompleteSentence => "incomplete_sentence",
            IssueType::PotentialSpeakerMismatch => "potential_speaker_mismatch",
            IssueType::SuspiciousConfidencePattern => "suspicious_confidence_pattern",
            IssueType::PotentialMissedSegmentation => "potential_missed_segmentation",
            IssueType::PotentialNoiseSegment => "potential_noise_segment",
            IssueType::SegmentOverlap => "segment_overlap",
            IssueType::LargeTimeGap => "large_time_gap",
            IssueType::SuspiciousSpeakerTransition => "suspicious_speaker_transition",
            IssueType::RapidSpeakerAlternation => "rapid_speaker_alternation",
            IssueType::SignificantConfidenceDrop => "significant_confidence_drop",
            IssueType::ContextualConfidenceAnomaly => "contextual_confidence_anomaly",
        }
    }
}

impl std::fmt::Display for IssueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A heuristic flag that a row needs manual review
///
/// The description is a human-readable rationale; only `row_id` and
/// `issue_type` carry meaning downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// References `Row::id`
    pub row_id: u32,
    pub issue_type: IssueType,
    pub description: String,
}

impl Issue {
    pub fn new(row_id: u32, issue_type: IssueType, description: impl Into<String>) -> Self {
        Self {
            row_id,
            issue_type,
            description: description.into(),
        }
    }
}
