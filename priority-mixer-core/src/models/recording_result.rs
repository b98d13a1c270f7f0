use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::audio_models::{SampleSpec, SourceDescriptor};

/// Result returned when a recording of the mix is finalized.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingResult {
    pub file_path: PathBuf,
    pub duration_secs: f64,
    pub metadata: RecordingMetadata,
    pub checksum: String,
}

/// One source that fed the recorded mix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedSource {
    pub name: String,
    pub priority: i32,
}

/// Metadata stored as a JSON sidecar next to a recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingMetadata {
    pub id: String,
    pub duration_secs: f64,
    pub file_path: String,
    pub checksum: String,
    pub created_at: String,
    pub sample_rate: u32,
    pub channels: u8,
    pub attenuation_factor: f64,
    pub sources: Vec<RecordedSource>,
}

impl RecordingMetadata {
    pub fn new(
        duration_secs: f64,
        file_path: &str,
        checksum: &str,
        spec: &SampleSpec,
        attenuation_factor: f64,
        sources: &[SourceDescriptor],
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            duration_secs,
            file_path: file_path.to_string(),
            checksum: checksum.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            sample_rate: spec.rate,
            channels: spec.channels,
            attenuation_factor,
            sources: sources
                .iter()
                .map(|s| RecordedSource {
                    name: s.name.clone(),
                    priority: s.priority,
                })
                .collect(),
        }
    }
}
