use anyhow::Result;

use crate::models::{Issue, IssueType, Row};

use super::DetectorOptions;

/// Flag rows whose speaker attribution looks wrong relative to neighbors
///
/// A short, low-confidence interior row sandwiched between two rows of one
/// other speaker is suspect; so is a sharp confidence drop between adjacent
/// rows attributed to the same speaker.
pub fn check_speaker_labels(rows: &[Row], _options: &DetectorOptions) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();

    for index in 0..rows.len().saturating_sub(1) {
        let row = &rows[index];
        let next = &rows[index + 1];

        if index > 0 {
            let prev = &rows[index - 1];
            let sandwiched = row.speaker != prev.speaker
                && row.speaker != next.speaker
                && prev.speaker == next.speaker;
            let short = row.duration().is_some_and(|d| d < 1.0);
            let weaker = matches!(
                (row.confidence_mean, prev.confidence_mean),
                (Some(mean), Some(prev_mean)) if mean < prev_mean - 0.1
            );

            if sandwiched && short && weaker {
                issues.push(Issue::new(
                    row.id,
                    IssueType::PotentialSpeakerMismatch,
                    "Short segment with different speaker surrounded by same speaker segments",
                ));
            }
        }

        if row.speaker == next.speaker
            && row.confidence_mean.is_some_and(|mean| mean > 0.8)
            && next.confidence_mean.is_some_and(|mean| mean < 0.7)
        {
            issues.push(Issue::new(
                next.id,
                IssueType::PotentialSpeakerMismatch,
                "Significant confidence drop between segments with same speaker",
            ));
        }
    }

    Ok(issues)
}

/// Flag suspicious A-B-A interruptions and rapid speaker alternation
pub fn check_cross_speaker_transitions(
    rows: &[Row],
    _options: &DetectorOptions,
) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();

    if rows.len() < 3 {
        return Ok(issues);
    }

    for i in 1..rows.len() - 1 {
        let prev = &rows[i - 1];
        let curr = &rows[i];
        let next = &rows[i + 1];

        if prev.speaker == next.speaker && curr.speaker != prev.speaker {
            if curr.duration().is_some_and(|d| d < 1.0) {
                issues.push(Issue::new(
                    curr.id,
                    IssueType::SuspiciousSpeakerTransition,
                    format!(
                        "Short segment interrupts same speaker ({} → {} → {})",
                        prev.speaker, curr.speaker, next.speaker
                    ),
                ));
            }

            let below_both = matches!(
                (curr.confidence_mean, prev.confidence_mean, next.confidence_mean),
                (Some(curr_mean), Some(prev_mean), Some(next_mean))
                    if curr_mean < prev_mean - 0.15 && curr_mean < next_mean - 0.15
            );
            if below_both {
                issues.push(Issue::new(
                    curr.id,
                    IssueType::SuspiciousSpeakerTransition,
                    "Low confidence segment interrupts same speaker with higher confidence",
                ));
            }
        }

        // A-B-A-B within four consecutive rows reads as misattribution
        if i >= 2
            && i < rows.len() - 2
            && rows[i - 2].speaker == curr.speaker
            && rows[i - 1].speaker == next.speaker
            && rows[i - 1].speaker != curr.speaker
        {
            issues.push(Issue::new(
                curr.id,
                IssueType::RapidSpeakerAlternation,
                "Rapid alternation between speakers may indicate misattribution",
            ));
        }
    }

    Ok(issues)
}
