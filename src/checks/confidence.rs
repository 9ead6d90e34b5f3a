use anyhow::Result;

use crate::models::{Issue, IssueType, Row};

use super::DetectorOptions;

/// Flag rows whose per-word confidence distribution looks wrong
///
/// Either a very low minimum paired with a wide spread, or a mean far from
/// the median (a skewed distribution), marks the row suspicious.
pub fn check_word_confidence(rows: &[Row], options: &DetectorOptions) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();

    for row in rows {
        let (Some(min), Some(max), Some(mean)) =
            (row.confidence_min, row.confidence_max, row.confidence_mean)
        else {
            continue;
        };

        if min < options.min_confidence_threshold && (max - min) > 0.4 {
            issues.push(Issue::new(
                row.id,
                IssueType::SuspiciousConfidencePattern,
                format!("Large variance in word confidence (min: {min:.2}, max: {max:.2})"),
            ));
        }

        if let Some(median) = row.confidence_median {
            if (mean - median).abs() > 0.15 {
                issues.push(Issue::new(
                    row.id,
                    IssueType::SuspiciousConfidencePattern,
                    format!(
                        "Skewed confidence distribution (mean: {mean:.2}, median: {median:.2})"
                    ),
                ));
            }
        }
    }

    Ok(issues)
}

/// Flag aggregated confidence drift between and around rows
///
/// A same-speaker drop past the configured threshold flags the later row;
/// a row sitting well below the average of its 4-row context window flags a
/// contextual anomaly.
pub fn check_aggregated_confidence_drops(
    rows: &[Row],
    options: &DetectorOptions,
) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();

    for index in 1..rows.len() {
        let row = &rows[index];
        let prev = &rows[index - 1];

        let (Some(mean), Some(prev_mean)) = (row.confidence_mean, prev.confidence_mean) else {
            continue;
        };

        if row.speaker == prev.speaker && prev_mean - mean > options.confidence_drop_threshold {
            issues.push(Issue::new(
                row.id,
                IssueType::SignificantConfidenceDrop,
                format!(
                    "Confidence dropped by {:.2} from previous segment with same speaker",
                    prev_mean - mean
                ),
            ));
        }

        // Context window: two rows back through one row ahead, counting only
        // rows that carry a mean, with at least three present.
        if index >= 2 && index < rows.len() - 1 {
            let context: Vec<f64> = rows[index - 2..=index + 1]
                .iter()
                .filter_map(|r| r.confidence_mean)
                .collect();

            if context.len() >= 3 {
                let avg = context.iter().sum::<f64>() / context.len() as f64;
                if avg - mean > 0.25 {
                    issues.push(Issue::new(
                        row.id,
                        IssueType::ContextualConfidenceAnomaly,
                        format!(
                            "Segment confidence ({mean:.2}) significantly lower than surrounding context ({avg:.2})"
                        ),
                    ));
                }
            }
        }
    }

    Ok(issues)
}
