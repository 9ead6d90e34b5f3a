pub mod audio;
pub mod checks;
pub mod io;
pub mod models;
pub mod review;
pub mod segment;
pub mod speakers;

pub use checks::{detect_issues, DetectorError, DetectorOptions, MisalignmentDetector};
pub use io::{parse_transcribe_file, parse_transcribe_json, CsvWriter};
pub use models::{Issue, IssueType, Note, Row, Token, TokenKind, TranscribeResponse};
pub use review::ReviewReporter;
pub use segment::{segment, SegmenterConfig};
pub use speakers::{resolve_speaker_identities, unnamed_speaker_clips};
