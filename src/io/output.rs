use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::info;

use crate::models::Row;

const HEADER: [&str; 8] = [
    "ID",
    "Speaker",
    "Transcript",
    "Confidence Min",
    "Confidence Max",
    "Confidence Mean",
    "Confidence Median",
    "Note",
];

/// The writer refuses a row sequence containing a run of rows the builder
/// flagged as errors; recurring failures need investigation, not a CSV.
#[derive(Debug, Error)]
#[error("{count} consecutive error rows starting at row {first_id}; refusing to write transcript")]
pub struct ConsecutiveErrors {
    pub first_id: u32,
    pub count: usize,
}

/// Writes rows to a fixed 8-column CSV in the output directory
pub struct CsvWriter {
    output_dir: PathBuf,
    /// Consecutive `error` rows tolerated before the writer gives up
    max_consecutive_errors: usize,
}

impl CsvWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            max_consecutive_errors: 3,
        }
    }

    /// Write `rows` to `<base_filename>.csv`, suffixing `.1`, `.2`, … when
    /// the name is taken. Returns the path written.
    pub fn write_transcript(&self, rows: &[Row], base_filename: &str) -> Result<PathBuf> {
        if let Some(run) = longest_error_run(rows) {
            if run.count >= self.max_consecutive_errors {
                return Err(run.into());
            }
        }

        let path = self.unique_path(base_filename);
        let mut file = std::fs::File::create(&path)
            .with_context(|| format!("Failed to create file: {path:?}"))?;

        writeln!(file, "{}", HEADER.join(","))?;
        for row in rows {
            writeln!(file, "{}", format_row(row))?;
        }

        info!(path = %path.display(), rows = rows.len(), "wrote transcript");
        Ok(path)
    }

    fn unique_path(&self, base_filename: &str) -> PathBuf {
        let mut candidate = self.output_dir.join(format!("{base_filename}.csv"));
        let mut index = 1;
        while candidate.exists() {
            candidate = self.output_dir.join(format!("{base_filename}.{index}.csv"));
            index += 1;
        }
        candidate
    }
}

/// Longest run of consecutive rows with `note == error`
fn longest_error_run(rows: &[Row]) -> Option<ConsecutiveErrors> {
    let mut best: Option<ConsecutiveErrors> = None;
    let mut current: Option<ConsecutiveErrors> = None;

    for row in rows {
        if row.note.is_error() {
            let run = current.get_or_insert(ConsecutiveErrors {
                first_id: row.id,
                count: 0,
            });
            run.count += 1;
        } else {
            if let Some(run) = current.take() {
                if best.as_ref().is_none_or(|b| run.count > b.count) {
                    best = Some(run);
                }
            }
        }
    }
    if let Some(run) = current {
        if best.as_ref().is_none_or(|b| run.count > b.count) {
            best = Some(run);
        }
    }
    best
}

fn format_row(row: &Row) -> String {
    [
        row.id.to_string(),
        escape(&row.speaker),
        escape(&row.transcript),
        format_confidence(row.confidence_min),
        format_confidence(row.confidence_max),
        format_confidence(row.confidence_mean),
        format_confidence(row.confidence_median),
        escape(row.note.as_str()),
    ]
    .join(",")
}

/// Absent statistics become empty cells; present ones round to 3 decimals
fn format_confidence(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.3}")).unwrap_or_default()
}

/// Quote a field when it contains a delimiter, quote, or newline
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
