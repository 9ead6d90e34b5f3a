use serde::{Deserialize, Serialize};

use super::{Token, TokenKind};

/// Root of an Amazon Transcribe job output file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranscribeResponse {
    pub results: TranscribeResults,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranscribeResults {
    /// Diarization summary, absent when the job ran without speaker labels
    #[serde(default)]
    pub speaker_labels: Option<SpeakerLabels>,
    /// Recognized items in time order
    #[serde(default)]
    pub items: Vec<TranscribeItem>,
    /// Per-speaker segment spans, used for audio clip extraction
    #[serde(default)]
    pub audio_segments: Vec<AudioSegment>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpeakerLabels {
    #[serde(default)]
    pub speakers: Option<u32>,
}

/// A single recognized item (word or punctuation mark)
///
/// Transcribe encodes timestamps and confidences as decimal strings, and
/// omits timing entirely on punctuation items.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranscribeItem {
    #[serde(default)]
    pub speaker_label: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub alternatives: Vec<TranscribeAlternative>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranscribeAlternative {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub confidence: Option<String>,
}

/// A diarized audio span from `results.audio_segments`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AudioSegment {
    #[serde(default)]
    pub speaker_label: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub transcript: Option<String>,
}

impl TranscribeResponse {
    /// Number of distinct speakers the diarization reported
    pub fn speaker_count(&self) -> u32 {
        self.results
            .speaker_labels
            .as_ref()
            .and_then(|l| l.speakers)
            .unwrap_or(0)
    }

    /// Convert every item into the engine's token representation
    pub fn tokens(&self) -> Vec<Token> {
        self.results.items.iter().map(Token::from_item).collect()
    }
}

impl TranscribeItem {
    fn first_alternative(&self) -> Option<&TranscribeAlternative> {
        self.alternatives.first()
    }
}

impl AudioSegment {
    pub fn start_seconds(&self) -> Option<f64> {
        parse_decimal(self.start_time.as_deref())
    }

    pub fn end_seconds(&self) -> Option<f64> {
        parse_decimal(self.end_time.as_deref())
    }
}

/// Parse a Transcribe decimal string; malformed values count as absent
fn parse_decimal(value: Option<&str>) -> Option<f64> {
    value.and_then(|v| v.parse::<f64>().ok())
}

impl Token {
    /// Build a token from a Transcribe item, keeping missing fields absent
    pub fn from_item(item: &TranscribeItem) -> Self {
        let alternative = item.first_alternative();
        let kind = if item.item_type == "punctuation" {
            TokenKind::Punctuation
        } else {
            TokenKind::Word
        };

        Self {
            speaker_label: item.speaker_label.clone(),
            start_time: parse_decimal(item.start_time.as_deref()),
            end_time: parse_decimal(item.end_time.as_deref()),
            content: alternative.and_then(|a| a.content.clone()),
            confidence: alternative.and_then(|a| parse_decimal(a.confidence.as_deref())),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transcribe_response() {
        let json = r#"{
            "results": {
                "speaker_labels": {"speakers": 2},
                "items": [
                    {
                        "speaker_label": "spk_0",
                        "start_time": "0.5",
                        "end_time": "0.8",
                        "type": "pronunciation",
                        "alternatives": [{"content": "hello", "confidence": "0.95"}]
                    },
                    {
                        "type": "punctuation",
                        "alternatives": [{"content": ".", "confidence": "0.0"}]
                    }
                ],
                "audio_segments": [
                    {"speaker_label": "spk_0", "start_time": "0.5", "end_time": "0.8"}
                ]
            }
        }"#;

        let response: TranscribeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.speaker_count(), 2);

        let tokens = response.tokens();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].speaker_label.as_deref(), Some("spk_0"));
        assert_eq!(tokens[0].start_time, Some(0.5));
        assert_eq!(tokens[0].content.as_deref(), Some("hello"));
        assert_eq!(tokens[0].kind, TokenKind::Word);

        assert_eq!(tokens[1].kind, TokenKind::Punctuation);
        assert_eq!(tokens[1].start_time, None);
        assert_eq!(tokens[1].confidence, Some(0.0));

        assert_eq!(response.results.audio_segments.len(), 1);
        assert_eq!(response.results.audio_segments[0].end_seconds(), Some(0.8));
    }

    #[test]
    fn test_malformed_decimal_is_absent() {
        assert_eq!(parse_decimal(Some("not-a-number")), None);
        assert_eq!(parse_decimal(Some("2.5")), Some(2.5));
        assert_eq!(parse_decimal(None), None);
    }
}
