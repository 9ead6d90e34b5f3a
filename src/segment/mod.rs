pub mod confidence;
pub mod pauses;
pub mod rows;
pub mod split;
pub mod turns;

pub use confidence::ConfidenceStats;
pub use pauses::{detect_pauses, gap_meets_threshold, Pause, PauseKind};
pub use rows::build_rows;
pub use split::split_turns_at_pauses;
pub use turns::group_into_turns;

use std::collections::HashMap;

use crate::models::{Row, Token};

/// Thresholds for the segmentation pipeline
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// Same-speaker silence (seconds, strict) that forces a new turn
    pub silence_threshold: f64,
    /// Inter-token gap (seconds, inclusive) that the pause detector flags
    pub time_gap_threshold: f64,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            silence_threshold: 1.0,
            time_gap_threshold: 1.5,
        }
    }
}

/// Run the full segmentation pipeline: turns, pauses, splitting, rows
///
/// Stateless and synchronous; identical input always yields identical rows.
/// Empty input yields no rows.
pub fn segment(
    tokens: &[Token],
    speaker_identities: &HashMap<String, String>,
    config: &SegmenterConfig,
) -> Vec<Row> {
    if tokens.is_empty() {
        return Vec::new();
    }

    let turns = group_into_turns(tokens, config.silence_threshold);
    let pauses = detect_pauses(tokens, config.time_gap_threshold);
    let sub_turns = split_turns_at_pauses(tokens, turns, &pauses);
    build_rows(tokens, &sub_turns, speaker_identities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Note;

    fn identities() -> HashMap<String, String> {
        HashMap::from([
            ("spk_0".to_string(), "Alex".to_string()),
            ("spk_1".to_string(), "Blake".to_string()),
        ])
    }

    #[test]
    fn test_empty_input_yields_no_rows() {
        assert!(segment(&[], &identities(), &SegmenterConfig::default()).is_empty());
    }

    #[test]
    fn test_scenario_hello_world() {
        let tokens = vec![
            Token::word("Hello", Some("spk_0"))
                .with_times(0.0, 1.0)
                .with_confidence(0.9),
            Token::punctuation(","),
            Token::word("world", Some("spk_0"))
                .with_times(1.1, 1.5)
                .with_confidence(0.85),
        ];

        let rows = segment(&tokens, &identities(), &SegmenterConfig::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].transcript, "Hello, world");
        assert_eq!(rows[0].speaker, "Alex");
        assert!((rows[0].confidence_min.unwrap() - 0.85).abs() < 1e-9);
        assert!((rows[0].confidence_max.unwrap() - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_scenario_silence_gap_splits_rows() {
        let tokens = vec![
            Token::word("first", Some("spk_0"))
                .with_times(0.0, 1.0)
                .with_confidence(0.9),
            Token::word("second", Some("spk_0"))
                .with_times(4.0, 4.5)
                .with_confidence(0.9),
        ];
        let config = SegmenterConfig {
            silence_threshold: 1.5,
            ..SegmenterConfig::default()
        };

        let rows = segment(&tokens, &identities(), &config);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].transcript, "first");
        assert_eq!(rows[1].transcript, "second");
    }

    #[test]
    fn test_ids_strictly_increasing_and_gapless() {
        let tokens = vec![
            Token::word("a", Some("spk_0"))
                .with_times(0.0, 0.5)
                .with_confidence(0.9),
            Token::punctuation("."),
            Token::word("b", Some("spk_1"))
                .with_times(0.6, 1.0)
                .with_confidence(0.9),
            Token::punctuation("."),
            Token::word("c", Some("spk_0"))
                .with_times(4.0, 4.5)
                .with_confidence(0.9),
        ];

        let rows = segment(&tokens, &identities(), &SegmenterConfig::default());
        assert!(!rows.is_empty());
        for (position, row) in rows.iter().enumerate() {
            assert_eq!(row.id, position as u32 + 1);
        }
    }

    #[test]
    fn test_segment_is_idempotent() {
        let tokens = vec![
            Token::word("Same", Some("spk_0"))
                .with_times(0.0, 0.4)
                .with_confidence(0.91),
            Token::word("again", Some("spk_1"))
                .with_times(0.5, 0.9)
                .with_confidence(0.72),
            Token::punctuation("!"),
        ];

        let first = segment(&tokens, &identities(), &SegmenterConfig::default());
        let second = segment(&tokens, &identities(), &SegmenterConfig::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_row_time_span_invariant() {
        let tokens = vec![
            Token::word("Up", Some("spk_0"))
                .with_times(0.0, 0.5)
                .with_confidence(0.9),
            Token::punctuation("."),
            Token::word("Next", Some("spk_0"))
                .with_times(0.9, 1.4)
                .with_confidence(0.9),
        ];

        let rows = segment(&tokens, &identities(), &SegmenterConfig::default());
        for row in &rows {
            if let (Some(start), Some(end)) = (row.start_time, row.end_time) {
                assert!(start <= end, "row {} spans {start}..{end}", row.id);
            }
        }
    }

    #[test]
    fn test_all_rows_carry_normalized_notes() {
        let tokens = vec![
            Token::word("ok", Some("spk_0"))
                .with_times(0.0, 0.2)
                .with_confidence(0.9),
            Token::word("silent", Some("spk_0")).with_times(0.3, 0.6),
        ];
        let config = SegmenterConfig {
            silence_threshold: 5.0,
            ..SegmenterConfig::default()
        };

        let rows = segment(&tokens, &identities(), &config);
        for row in &rows {
            assert_ne!(row.note, Note::Clear);
        }
    }
}
