use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;

// Renamed clip: spk_<n>_<display name>.m4a
static NAMED_CLIP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^spk_(\d+)_(.+)\.m4a$").expect("valid regex"));

// As-extracted clip, not yet identified
static UNNAMED_CLIP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^spk_\d+\.m4a$").expect("valid regex"));

/// Build the speaker label → display name map from renamed audio clips
///
/// A clip renamed to `spk_0_Alex.m4a` binds label `spk_0` to `Alex`. Files
/// that don't match the pattern are ignored.
pub fn resolve_speaker_identities(output_dir: &Path) -> Result<HashMap<String, String>> {
    let mut identities = HashMap::new();

    for entry in list_file_names(output_dir)? {
        if let Some(captures) = NAMED_CLIP.captures(&entry) {
            let label = format!("spk_{}", &captures[1]);
            identities.insert(label, captures[2].to_string());
        }
    }

    Ok(identities)
}

/// Clips still carrying their extraction name, awaiting identification
pub fn unnamed_speaker_clips(output_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut clips: Vec<PathBuf> = list_file_names(output_dir)?
        .into_iter()
        .filter(|name| UNNAMED_CLIP.is_match(name))
        .map(|name| output_dir.join(name))
        .collect();
    clips.sort();
    Ok(clips)
}

fn list_file_names(dir: &Path) -> Result<Vec<String>> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("Failed to read directory: {dir:?}"))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read entry in {dir:?}"))?;
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn test_resolve_identities_from_renamed_clips() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "spk_0_Alex.m4a");
        touch(dir.path(), "spk_1_Blake Smith.m4a");
        touch(dir.path(), "transcript.json");

        let identities = resolve_speaker_identities(dir.path()).unwrap();
        assert_eq!(identities.len(), 2);
        assert_eq!(identities.get("spk_0").map(String::as_str), Some("Alex"));
        assert_eq!(
            identities.get("spk_1").map(String::as_str),
            Some("Blake Smith")
        );
    }

    #[test]
    fn test_unnamed_clips_are_not_identities() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "spk_0.m4a");
        touch(dir.path(), "spk_1_Casey.m4a");

        let identities = resolve_speaker_identities(dir.path()).unwrap();
        assert_eq!(identities.len(), 1);

        let unnamed = unnamed_speaker_clips(dir.path()).unwrap();
        assert_eq!(unnamed.len(), 1);
        assert!(unnamed[0].ends_with("spk_0.m4a"));
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve_speaker_identities(dir.path()).unwrap().is_empty());
        assert!(unnamed_speaker_clips(dir.path()).unwrap().is_empty());
    }
}
