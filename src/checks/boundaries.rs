use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Issue, IssueType, Row};

use super::DetectorOptions;

// Terminal punctuation, optionally followed by a closing quote or paren
static TERMINAL_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[.!?…]["')]?$"#).expect("valid regex"));

static LOWERCASE_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*[a-z]").expect("valid regex"));

// Words that rarely end a finished sentence
static DANGLING_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:and|but|or|because|if|as|that|for|with|to|in|on|at)\s*$")
        .expect("valid regex")
});

/// Flag rows whose transcript appears to continue into the next row
///
/// Two triggers, both contingent on the next row belonging to a different
/// speaker and the current transcript lacking terminal punctuation: the next
/// row starts lowercase, or the current one ends on a dangling
/// conjunction/preposition.
pub fn check_sentence_boundaries(rows: &[Row], _options: &DetectorOptions) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();

    for window in rows.windows(2) {
        let [row, next] = window else { continue };

        if row.transcript.is_empty()
            || TERMINAL_PUNCT.is_match(&row.transcript)
            || next.speaker == row.speaker
        {
            continue;
        }

        if !next.transcript.is_empty() && LOWERCASE_START.is_match(&next.transcript) {
            issues.push(Issue::new(
                row.id,
                IssueType::IncompleteSentence,
                "Sentence appears to continue in the next segment with different speaker",
            ));
        }

        if DANGLING_WORD.is_match(&row.transcript) {
            issues.push(Issue::new(
                row.id,
                IssueType::IncompleteSentence,
                "Transcript ends with conjunction or preposition",
            ));
        }
    }

    Ok(issues)
}
