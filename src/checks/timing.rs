use anyhow::Result;

use crate::models::{Issue, IssueType, Row};

use super::DetectorOptions;

/// Flag long same-speaker pauses and short low-confidence noise segments
pub fn check_pause_silences(rows: &[Row], options: &DetectorOptions) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();

    for index in 1..rows.len() {
        let row = &rows[index];
        let prev = &rows[index - 1];

        if row.speaker == prev.speaker {
            if let (Some(start), Some(prev_end)) = (row.start_time, prev.end_time) {
                let gap = start - prev_end;
                if gap > options.significant_pause_threshold {
                    issues.push(Issue::new(
                        row.id,
                        IssueType::PotentialMissedSegmentation,
                        format!("Long pause ({gap:.2}s) between segments with same speaker"),
                    ));
                }
            }
        }

        if row.duration().is_some_and(|d| d < 0.3)
            && row.confidence_mean.is_some_and(|mean| mean < 0.7)
        {
            issues.push(Issue::new(
                row.id,
                IssueType::PotentialNoiseSegment,
                format!(
                    "Very short segment ({:.2}s) with low confidence",
                    row.duration().unwrap_or_default()
                ),
            ));
        }
    }

    Ok(issues)
}

/// Flag overlapping segments and large cross-speaker gaps
pub fn check_time_adjacency(rows: &[Row], _options: &DetectorOptions) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();

    for index in 1..rows.len() {
        let row = &rows[index];
        let prev = &rows[index - 1];

        if let (Some(start), Some(prev_end)) = (row.start_time, prev.end_time) {
            if start < prev_end {
                issues.push(Issue::new(
                    row.id,
                    IssueType::SegmentOverlap,
                    format!("Segment overlaps with previous by {:.2}s", prev_end - start),
                ));
            }

            if row.speaker != prev.speaker && start - prev_end > 2.0 {
                issues.push(Issue::new(
                    row.id,
                    IssueType::LargeTimeGap,
                    format!(
                        "Large gap ({:.2}s) between different speakers",
                        start - prev_end
                    ),
                ));
            }
        }
    }

    Ok(issues)
}
