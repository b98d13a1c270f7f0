use std::fs;
use std::path::{Path, PathBuf};

use crate::models::error::MixerError;
use crate::models::recording_result::RecordingMetadata;

/// Path of the JSON sidecar for a recording: `{recording}.metadata.json`.
pub fn metadata_path(recording_path: &Path) -> PathBuf {
    recording_path.with_extension("metadata.json")
}

/// Write recording metadata as a JSON sidecar file.
pub fn write_metadata(metadata: &RecordingMetadata, recording_path: &Path) -> Result<(), MixerError> {
    let json = serde_json::to_string_pretty(metadata)
        .map_err(|e| MixerError::StorageError(format!("failed to serialize metadata: {}", e)))?;
    fs::write(metadata_path(recording_path), json)
        .map_err(|e| MixerError::StorageError(format!("failed to write metadata: {}", e)))?;
    Ok(())
}

/// Read recording metadata from a JSON sidecar file.
pub fn read_metadata(recording_path: &Path) -> Result<RecordingMetadata, MixerError> {
    let json = fs::read_to_string(metadata_path(recording_path))
        .map_err(|e| MixerError::StorageError(format!("failed to read metadata: {}", e)))?;
    serde_json::from_str(&json)
        .map_err(|e| MixerError::StorageError(format!("failed to parse metadata: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::audio_models::{SampleSpec, SourceDescriptor};

    #[test]
    fn sidecar_round_trip() {
        let recording = std::env::temp_dir().join("priority_mixer_test_sidecar.wav");
        let sources = [SourceDescriptor::microphone(), SourceDescriptor::new("Source1", 10)];
        let metadata = RecordingMetadata::new(
            1.5,
            &recording.to_string_lossy(),
            "abc123",
            &SampleSpec::default(),
            0.2,
            &sources,
        );

        write_metadata(&metadata, &recording).unwrap();
        let loaded = read_metadata(&recording).unwrap();

        assert_eq!(loaded, metadata);
        assert_eq!(loaded.sources[0].priority, i32::MAX);
        assert!(metadata_path(&recording).to_string_lossy().ends_with(".metadata.json"));

        fs::remove_file(metadata_path(&recording)).ok();
    }

    #[test]
    fn missing_sidecar_is_storage_error() {
        let recording = std::env::temp_dir().join("priority_mixer_test_no_sidecar.wav");
        assert!(matches!(read_metadata(&recording), Err(MixerError::StorageError(_))));
    }
}
