use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::Token;

/// What kind of boundary candidate a pause marks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PauseKind {
    SentenceEnd,
    NaturalBreak,
    TimeGap,
}

/// A boundary candidate anchored to a position in the original token
/// sequence. Computed once, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pause {
    pub token_index: usize,
    pub kind: PauseKind,
}

// Sentence-ending marks: single ./!/?, runs of !! or ??, any two-character
// mix of ! and ?, and a literal three-dot ellipsis.
static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[.!?]|!{2,}|\?{2,}|[!?][!?]|\.{3})$").expect("valid regex"));

// Natural breaks: single ,/;/: or an em dash. Quotation marks deliberately
// produce no pause at all.
static NATURAL_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[,;:]|—)$").expect("valid regex"));

/// Does the gap `b - a` meet the threshold?
///
/// Missing operands never meet it. A zero threshold demands a strictly
/// positive gap; any other threshold is inclusive.
pub fn gap_meets_threshold(a: Option<f64>, b: Option<f64>, threshold: f64) -> bool {
    let (Some(a), Some(b)) = (a, b) else {
        return false;
    };
    let gap = b - a;
    if threshold == 0.0 {
        gap > 0.0
    } else {
        gap >= threshold
    }
}

/// Classify a punctuation mark as a pause kind, if it is one
fn classify_punctuation(content: &str) -> Option<PauseKind> {
    if SENTENCE_END.is_match(content) {
        Some(PauseKind::SentenceEnd)
    } else if NATURAL_BREAK.is_match(content) {
        Some(PauseKind::NaturalBreak)
    } else {
        None
    }
}

/// Scan the full token sequence for pause markers
///
/// Time gaps are measured between a word's end and the next token's start
/// (inclusive threshold, default 1.5s upstream); punctuation pauses land on
/// the punctuation token's own index.
pub fn detect_pauses(tokens: &[Token], time_gap_threshold: f64) -> Vec<Pause> {
    let mut pauses = Vec::new();

    for (index, token) in tokens.iter().enumerate() {
        if !token.is_punctuation() {
            if let Some(next) = tokens.get(index + 1) {
                if gap_meets_threshold(token.end_time, next.start_time, time_gap_threshold) {
                    pauses.push(Pause {
                        token_index: index,
                        kind: PauseKind::TimeGap,
                    });
                }
            }
            continue;
        }

        if let Some(kind) = token.content.as_deref().and_then(classify_punctuation) {
            pauses.push(Pause {
                token_index: index,
                kind,
            });
        }
    }

    pauses
}
