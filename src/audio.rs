use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tokio::process::Command;
use tracing::{info, warn};

use crate::models::TranscribeResponse;

/// Outcome of one extraction run
#[derive(Debug, Default)]
pub struct ExtractionSummary {
    /// Clips written, one per speaker label
    pub clips: Vec<PathBuf>,
    /// Speakers whose ffmpeg invocation failed
    pub failures: usize,
}

/// Check that ffmpeg is installed and runnable
pub async fn verify_ffmpeg() -> Result<()> {
    let output = Command::new("ffmpeg")
        .arg("-version")
        .output()
        .await
        .context("ffmpeg is not installed or not in PATH")?;
    if !output.status.success() {
        bail!("ffmpeg -version exited with {}", output.status);
    }
    Ok(())
}

/// Diarized spans per speaker label, skipping segments with missing or
/// malformed fields
pub fn group_spans_by_speaker(response: &TranscribeResponse) -> BTreeMap<String, Vec<(f64, f64)>> {
    let mut spans: BTreeMap<String, Vec<(f64, f64)>> = BTreeMap::new();
    for segment in &response.results.audio_segments {
        let (Some(label), Some(start), Some(end)) = (
            segment.speaker_label.clone(),
            segment.start_seconds(),
            segment.end_seconds(),
        ) else {
            continue;
        };
        spans.entry(label).or_default().push((start, end));
    }
    spans
}

/// Cut one concatenated audio clip per speaker from the source recording
///
/// Each speaker's diarized spans become an ffmpeg concat manifest; a failed
/// speaker is logged and skipped so the others still extract.
pub async fn extract_speaker_audio(
    response: &TranscribeResponse,
    audio_path: &Path,
    output_dir: &Path,
) -> Result<ExtractionSummary> {
    let spans_by_speaker = group_spans_by_speaker(response);
    info!(speakers = spans_by_speaker.len(), "extracting speaker audio");

    let mut summary = ExtractionSummary::default();
    for (label, spans) in &spans_by_speaker {
        match extract_one_speaker(label, spans, audio_path, output_dir).await {
            Ok(clip) => {
                let total: f64 = spans.iter().map(|(start, end)| end - start).sum();
                info!(
                    speaker = label.as_str(),
                    segments = spans.len(),
                    seconds = format!("{total:.2}"),
                    clip = %clip.display(),
                    "extracted speaker clip"
                );
                summary.clips.push(clip);
            }
            Err(error) => {
                warn!(speaker = label.as_str(), %error, "failed to extract speaker clip");
                summary.failures += 1;
            }
        }
    }

    Ok(summary)
}

async fn extract_one_speaker(
    label: &str,
    spans: &[(f64, f64)],
    audio_path: &Path,
    output_dir: &Path,
) -> Result<PathBuf> {
    let manifest_path = output_dir.join(format!("{label}_segments.txt"));
    let clip_path = output_dir.join(format!("{label}.m4a"));

    let mut manifest = String::new();
    for (start, end) in spans {
        manifest.push_str(&format!(
            "file '{}'\ninpoint {start}\noutpoint {end}\n",
            audio_path.display()
        ));
    }
    std::fs::write(&manifest_path, manifest)
        .with_context(|| format!("Failed to write manifest: {manifest_path:?}"))?;

    let output = Command::new("ffmpeg")
        .args(["-hide_banner", "-loglevel", "error", "-y", "-f", "concat", "-safe", "0", "-i"])
        .arg(&manifest_path)
        .args(["-c", "copy"])
        .arg(&clip_path)
        .output()
        .await
        .context("Failed to run ffmpeg")?;

    // Manifest is scratch either way
    let _ = std::fs::remove_file(&manifest_path);

    if !output.status.success() {
        bail!(
            "ffmpeg failed for {label}: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(clip_path)
}
