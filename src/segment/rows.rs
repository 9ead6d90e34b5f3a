use std::collections::{HashMap, HashSet};

use crate::models::{Note, Row, Token, Turn};

use super::confidence::ConfidenceStats;

/// Convert final sub-turns into output rows with sequential, gapless ids
pub fn build_rows(
    tokens: &[Token],
    sub_turns: &[Turn],
    speaker_identities: &HashMap<String, String>,
) -> Vec<Row> {
    sub_turns
        .iter()
        .enumerate()
        .map(|(position, turn)| build_row(tokens, turn, position as u32 + 1, speaker_identities))
        .collect()
}

fn build_row(
    tokens: &[Token],
    turn: &Turn,
    id: u32,
    speaker_identities: &HashMap<String, String>,
) -> Row {
    let speaker = turn
        .speaker_label
        .as_ref()
        .and_then(|label| speaker_identities.get(label))
        .cloned()
        .unwrap_or_else(|| "Unknown".to_string());

    let stats = ConfidenceStats::from_confidences(
        turn.token_indices
            .iter()
            .map(|&index| tokens.get(index).and_then(|t| t.confidence)),
    );

    let distinct_speakers: HashSet<&str> = turn
        .token_indices
        .iter()
        .filter_map(|&index| tokens.get(index))
        .filter_map(|t| t.speaker_label.as_deref())
        .collect();

    // A sub-turn with no tokens, or none carrying confidence, is unusable
    // downstream and gets flagged so the writer can count it.
    let note = if turn.token_indices.is_empty() || stats.is_empty() {
        Note::Error
    } else {
        classify_note(false, distinct_speakers.len()).normalize()
    };

    Row {
        id,
        speaker,
        transcript: turn.text.clone(),
        confidence_min: stats.min,
        confidence_max: stats.max,
        confidence_mean: stats.mean,
        confidence_median: stats.median,
        note,
        start_time: turn.start_time,
        end_time: turn.end_time,
    }
}

/// Classify a sub-turn's health before normalization
///
/// The multiple-speakers branch is unreachable through the standard pipeline
/// (the splitter only emits single-speaker sub-turns) but stays live for
/// direct callers.
pub fn classify_note(has_error: bool, speaker_count: usize) -> Note {
    if has_error {
        Note::Error
    } else if speaker_count > 1 {
        Note::MultipleSpeakers
    } else {
        Note::Clear
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TokenKind;

    fn identities() -> HashMap<String, String> {
        HashMap::from([("spk_0".to_string(), "Alex".to_string())])
    }

    fn turn_over(tokens: &[Token], label: Option<&str>) -> Turn {
        let mut turn = Turn::open(label.map(str::to_string), tokens.first().and_then(|t| t.start_time));
        for (index, token) in tokens.iter().enumerate() {
            turn.push_token(index, token);
        }
        turn
    }

    #[test]
    fn test_ids_are_sequential_from_one() {
        let tokens = vec![
            Token::word("a", Some("spk_0")).with_confidence(0.9),
            Token::word("b", Some("spk_0")).with_confidence(0.8),
        ];
        let turns = vec![turn_over(&tokens[..1], Some("spk_0")), {
            let mut t = Turn::open(Some("spk_0".to_string()), None);
            t.push_token(1, &tokens[1]);
            t
        }];

        let rows = build_rows(&tokens, &turns, &identities());
        let ids: Vec<u32> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_speaker_resolution() {
        let tokens = vec![Token::word("hi", Some("spk_0")).with_confidence(0.9)];
        let turn = turn_over(&tokens, Some("spk_0"));
        let rows = build_rows(&tokens, &[turn], &identities());
        assert_eq!(rows[0].speaker, "Alex");

        // Unmapped label falls back to Unknown
        let tokens = vec![Token::word("hi", Some("spk_9")).with_confidence(0.9)];
        let turn = turn_over(&tokens, Some("spk_9"));
        let rows = build_rows(&tokens, &[turn], &identities());
        assert_eq!(rows[0].speaker, "Unknown");

        // Missing label falls back to Unknown
        let tokens = vec![Token::word("hi", None).with_confidence(0.9)];
        let turn = turn_over(&tokens, None);
        let rows = build_rows(&tokens, &[turn], &identities());
        assert_eq!(rows[0].speaker, "Unknown");
    }

    #[test]
    fn test_confidence_less_sub_turn_is_an_error() {
        let tokens = vec![Token::word("hi", Some("spk_0"))];
        let turn = turn_over(&tokens, Some("spk_0"));
        let rows = build_rows(&tokens, &[turn], &identities());

        assert_eq!(rows[0].note, Note::Error);
        assert_eq!(rows[0].confidence_min, None);
        assert_eq!(rows[0].confidence_median, None);
    }

    #[test]
    fn test_healthy_row_note_normalizes_to_unknown() {
        let tokens = vec![Token::word("hi", Some("spk_0")).with_confidence(0.92)];
        let turn = turn_over(&tokens, Some("spk_0"));
        let rows = build_rows(&tokens, &[turn], &identities());

        assert_eq!(rows[0].note, Note::Unknown);
        assert_eq!(rows[0].confidence_mean, Some(0.92));
    }

    #[test]
    fn test_multiple_speakers_note() {
        let tokens = vec![
            Token::word("we", Some("spk_0")).with_confidence(0.9),
            Token::word("overlap", Some("spk_1")).with_confidence(0.8),
        ];
        let turn = turn_over(&tokens, Some("spk_0"));
        let rows = build_rows(&tokens, &[turn], &identities());

        assert_eq!(rows[0].note, Note::MultipleSpeakers);
    }

    #[test]
    fn test_classify_note() {
        assert_eq!(classify_note(true, 1), Note::Error);
        assert_eq!(classify_note(false, 2), Note::MultipleSpeakers);
        assert_eq!(classify_note(false, 1), Note::Clear);
    }

    #[test]
    fn test_punctuation_confidence_contributes() {
        let tokens = vec![
            Token::word("sure", Some("spk_0")).with_confidence(0.9),
            Token {
                confidence: Some(0.0),
                ..Token::punctuation(".")
            },
        ];
        assert_eq!(tokens[1].kind, TokenKind::Punctuation);

        let turn = turn_over(&tokens, Some("spk_0"));
        let rows = build_rows(&tokens, &[turn], &identities());
        assert_eq!(rows[0].confidence_min, Some(0.0));
        assert_eq!(rows[0].confidence_max, Some(0.9));
    }
}
