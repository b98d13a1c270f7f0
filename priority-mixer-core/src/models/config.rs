use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::audio_models::{OutputDescriptor, SampleSpec, SourceDescriptor};
use super::error::MixerError;

/// Configuration for a mix session.
///
/// Every field is optional in the JSON form; missing keys fall back to
/// [`MixerConfiguration::default`], which reproduces the classic setup of a
/// microphone plus two lower-priority sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MixerConfiguration {
    /// Volume cut applied per non-primary source, in `[0, 1]` (default: 0.2).
    pub attenuation_factor: f64,

    /// Samples per frame read from each source (default: 1024).
    pub frame_size: usize,

    pub sample_spec: SampleSpec,

    /// Capture streams, opened in this order.
    pub sources: Vec<SourceDescriptor>,

    pub output: OutputDescriptor,

    /// PulseAudio server to connect to, or None for the default.
    pub server: Option<String>,

    /// Also record the mixed output to this WAV file.
    pub record_path: Option<PathBuf>,
}

impl MixerConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        if !self.attenuation_factor.is_finite()
            || !(0.0..=1.0).contains(&self.attenuation_factor)
        {
            return Err(format!(
                "attenuation factor must be within [0, 1], got {}",
                self.attenuation_factor
            ));
        }
        if self.sample_spec.rate == 0 {
            return Err("sample rate must be positive".into());
        }
        if ![1, 2].contains(&self.sample_spec.channels) {
            return Err(format!(
                "unsupported channel count: {}",
                self.sample_spec.channels
            ));
        }
        if self.frame_size == 0 {
            return Err("frame size must be positive".into());
        }
        if self.frame_size % self.sample_spec.channels as usize != 0 {
            return Err(format!(
                "frame size {} is not a multiple of {} channels",
                self.frame_size, self.sample_spec.channels
            ));
        }
        if self.sources.is_empty() {
            return Err("at least one source is required".into());
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, MixerError> {
        serde_json::from_str(json)
            .map_err(|e| MixerError::ConfigurationFailed(format!("invalid config: {}", e)))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, MixerError> {
        let json = fs::read_to_string(path).map_err(|e| {
            MixerError::ConfigurationFailed(format!(
                "failed to read {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&json)
    }
}

impl Default for MixerConfiguration {
    fn default() -> Self {
        Self {
            attenuation_factor: 0.2,
            frame_size: 1024,
            sample_spec: SampleSpec::default(),
            sources: vec![
                SourceDescriptor::microphone(),
                SourceDescriptor::new("Source1", 10),
                SourceDescriptor::new("Source2", 5),
            ],
            output: OutputDescriptor::default(),
            server: None,
            record_path: None,
        }
    }
}
