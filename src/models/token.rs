use serde::{Deserialize, Serialize};

/// Whether a token is a spoken word or a punctuation mark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Word,
    Punctuation,
}

/// One recognized unit from the speech-recognition output
///
/// Every field except `kind` is optional: the engine treats missing timing,
/// speaker, and confidence data as "unknown", never as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Raw diarization tag, e.g. "spk_0"
    pub speaker_label: Option<String>,
    /// Start timestamp in seconds
    pub start_time: Option<f64>,
    /// End timestamp in seconds
    pub end_time: Option<f64>,
    /// Recognized text; tokens with no content are skipped entirely
    pub content: Option<String>,
    /// Recognition confidence in [0, 1]
    pub confidence: Option<f64>,
    pub kind: TokenKind,
}

impl Token {
    /// A word token with the fields most tests care about
    pub fn word(content: &str, speaker_label: Option<&str>) -> Self {
        Self {
            speaker_label: speaker_label.map(str::to_string),
            start_time: None,
            end_time: None,
            content: Some(content.to_string()),
            confidence: None,
            kind: TokenKind::Word,
        }
    }

    /// A punctuation token carrying only its mark
    pub fn punctuation(content: &str) -> Self {
        Self {
            speaker_label: None,
            start_time: None,
            end_time: None,
            content: Some(content.to_string()),
            confidence: None,
            kind: TokenKind::Punctuation,
        }
    }

    pub fn with_times(mut self, start: f64, end: f64) -> Self {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Tokens with empty or absent content carry nothing to segment
    pub fn has_content(&self) -> bool {
        self.content.as_deref().is_some_and(|c| !c.is_empty())
    }

    pub fn is_punctuation(&self) -> bool {
        self.kind == TokenKind::Punctuation
    }
}

/// A contiguous run of tokens attributed to one speaker
///
/// Turns exist only while the segmentation pipeline runs; they reference
/// tokens by index into the original sequence and are discarded once rows
/// are built.
#[derive(Debug, Clone)]
pub struct Turn {
    pub speaker_label: Option<String>,
    /// Indices into the original token sequence
    pub token_indices: Vec<usize>,
    pub start_time: Option<f64>,
    /// Last known token end time
    pub end_time: Option<f64>,
    /// Incrementally built transcript text
    pub text: String,
}

impl Turn {
    /// Open an empty turn for the given speaker starting at `start_time`
    pub fn open(speaker_label: Option<String>, start_time: Option<f64>) -> Self {
        Self {
            speaker_label,
            token_indices: Vec::new(),
            start_time,
            end_time: None,
            text: String::new(),
        }
    }

    /// Append a token: record its index, extend the text, and advance the
    /// end time when the token carries one.
    ///
    /// The first content seeds the text verbatim; later words get one
    /// preceding space, punctuation gets none.
    pub fn push_token(&mut self, index: usize, token: &Token) {
        self.token_indices.push(index);

        if let Some(content) = token.content.as_deref() {
            if !self.text.is_empty() && !token.is_punctuation() {
                self.text.push(' ');
            }
            self.text.push_str(content);
        }

        if let Some(end) = token.end_time {
            self.end_time = Some(end);
        }
    }

    pub fn token_count(&self) -> usize {
        self.token_indices.len()
    }
}
