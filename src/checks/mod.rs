pub mod boundaries;
pub mod confidence;
pub mod speakers;
pub mod timing;

use std::collections::HashSet;

use anyhow::Result;
use thiserror::Error;
use tracing::warn;

use crate::models::{Issue, IssueType, Row};

/// Thresholds for the misalignment checks
#[derive(Debug, Clone)]
pub struct DetectorOptions {
    pub min_confidence_threshold: f64,
    pub confidence_drop_threshold: f64,
    /// Same-speaker pause (seconds) worth flagging as a missed segmentation
    pub significant_pause_threshold: f64,
    /// Accepted for compatibility; no check consumes it yet
    pub min_sentence_overlap: usize,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            min_confidence_threshold: 0.6,
            confidence_drop_threshold: 0.2,
            significant_pause_threshold: 1.5,
            min_sentence_overlap: 3,
        }
    }
}

/// Construction-time validation failure; never recoverable
#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("invalid detector option `{option}`: {value} ({reason})")]
    InvalidOption {
        option: &'static str,
        value: f64,
        reason: &'static str,
    },
}

type Check = fn(&[Row], &DetectorOptions) -> Result<Vec<Issue>>;

/// Every check runs over the whole row sequence; one failing check is
/// skipped with a warning while the rest still report.
const CHECKS: &[(&str, Check)] = &[
    ("sentence_boundaries", boundaries::check_sentence_boundaries),
    ("speaker_labels", speakers::check_speaker_labels),
    ("word_confidence", confidence::check_word_confidence),
    ("pause_silences", timing::check_pause_silences),
    ("time_adjacency", timing::check_time_adjacency),
    (
        "cross_speaker_transitions",
        speakers::check_cross_speaker_transitions,
    ),
    (
        "aggregated_confidence_drops",
        confidence::check_aggregated_confidence_drops,
    ),
];

/// Runs the misalignment check battery over a finished row sequence
#[derive(Debug)]
pub struct MisalignmentDetector<'a> {
    rows: &'a [Row],
    options: DetectorOptions,
}

impl<'a> MisalignmentDetector<'a> {
    /// Validates the options up front; malformed thresholds are a caller
    /// bug, not a condition to limp through.
    pub fn new(rows: &'a [Row], options: DetectorOptions) -> Result<Self, DetectorError> {
        for (name, value) in [
            ("min_confidence_threshold", options.min_confidence_threshold),
            (
                "confidence_drop_threshold",
                options.confidence_drop_threshold,
            ),
            (
                "significant_pause_threshold",
                options.significant_pause_threshold,
            ),
        ] {
            if !value.is_finite() {
                return Err(DetectorError::InvalidOption {
                    option: name,
                    value,
                    reason: "must be finite",
                });
            }
            if value < 0.0 {
                return Err(DetectorError::InvalidOption {
                    option: name,
                    value,
                    reason: "must not be negative",
                });
            }
        }

        Ok(Self { rows, options })
    }

    /// Run all checks, then deduplicate by `(row_id, issue_type)` keeping
    /// the first occurrence, and sort ascending by row id (stable).
    pub fn detect_issues(&self) -> Vec<Issue> {
        if self.rows.is_empty() {
            return Vec::new();
        }

        let mut issues = Vec::new();
        for (name, check) in CHECKS {
            match check(self.rows, &self.options) {
                Ok(found) => issues.extend(found),
                Err(error) => {
                    warn!(check = %name, %error, "misalignment check failed, skipping");
                }
            }
        }

        let mut seen: HashSet<(u32, IssueType)> = HashSet::new();
        issues.retain(|issue| seen.insert((issue.row_id, issue.issue_type)));
        issues.sort_by_key(|issue| issue.row_id);
        issues
    }
}

/// Convenience entry point with validated options
pub fn detect_issues(rows: &[Row], options: DetectorOptions) -> Result<Vec<Issue>, DetectorError> {
    Ok(MisalignmentDetector::new(rows, options)?.detect_issues())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::{Note, Row};

    /// Row with back-to-back timing; the staple fixture for check tests
    pub fn row(id: u32, speaker: &str, mean: Option<f64>, start: f64, end: f64) -> Row {
        Row {
            id,
            speaker: speaker.to_string(),
            transcript: "Lorem ipsum.".to_string(),
            confidence_min: mean,
            confidence_max: mean,
            confidence_mean: mean,
            confidence_median: mean,
            note: Note::Unknown,
            start_time: Some(start),
            end_time: Some(end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::row;
    use super::*;

    #[test]
    fn test_empty_rows_short_circuit() {
        let detector = MisalignmentDetector::new(&[], DetectorOptions::default()).unwrap();
        assert!(detector.detect_issues().is_empty());
    }

    #[test]
    fn test_invalid_options_fail_fast() {
        let options = DetectorOptions {
            confidence_drop_threshold: f64::NAN,
            ..DetectorOptions::default()
        };
        assert!(MisalignmentDetector::new(&[], options).is_err());

        let options = DetectorOptions {
            significant_pause_threshold: -1.0,
            ..DetectorOptions::default()
        };
        let err = MisalignmentDetector::new(&[], options).unwrap_err();
        assert!(err.to_string().contains("significant_pause_threshold"));
    }

    #[test]
    fn test_issues_sorted_and_unique() {
        // Rows engineered to trip several checks at once
        let rows = vec![
            row(1, "John", Some(0.95), 0.0, 1.0),
            row(2, "John", Some(0.55), 1.2, 1.4),
            row(3, "Mary", Some(0.9), 1.3, 2.0),
        ];

        let issues = detect_issues(&rows, DetectorOptions::default()).unwrap();
        assert!(!issues.is_empty());

        let mut seen = std::collections::HashSet::new();
        let mut last_id = 0;
        for issue in &issues {
            assert!(issue.row_id >= last_id, "issues must be sorted by row id");
            last_id = issue.row_id;
            assert!(
                seen.insert((issue.row_id, issue.issue_type)),
                "duplicate {:?} on row {}",
                issue.issue_type,
                issue.row_id
            );
        }
    }

    #[test]
    fn test_min_sentence_overlap_is_inert() {
        let rows = vec![
            row(1, "John", Some(0.9), 0.0, 1.0),
            row(2, "John", Some(0.9), 1.1, 2.0),
        ];

        let base = detect_issues(&rows, DetectorOptions::default()).unwrap();
        let tweaked = detect_issues(
            &rows,
            DetectorOptions {
                min_sentence_overlap: 99,
                ..DetectorOptions::default()
            },
        )
        .unwrap();
        assert_eq!(base, tweaked);
    }
}
