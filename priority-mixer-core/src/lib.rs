//! # priority-mixer-core
//!
//! Platform-agnostic core of the priority mixer.
//!
//! Reads one fixed-size frame from every capture source, sums the frames,
//! attenuates the sum when more than one source is present, and writes the
//! result to a playback stream. Platform backends (PulseAudio) implement the
//! `AudioBackend` trait and plug into the generic `MixSession`.
//!
//! ## Architecture
//!
//! ```text
//! priority-mixer-core (this crate)
//! ├── traits/       ← AudioBackend, CaptureStream, PlaybackStream, MixDelegate
//! ├── models/       ← MixerError, MixState, MixerConfiguration, AudioSource, etc.
//! ├── processing/   ← PriorityMixer, PCM byte conversion, WAV header generation
//! ├── session/      ← MixSession (the blocking mix loop), StopHandle
//! └── storage/      ← WavRecorder, metadata sidecar
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::audio_models::{
    AudioSource, MixLevels, MixStats, OutputDescriptor, SampleSpec, SourceDescriptor,
};
pub use models::config::MixerConfiguration;
pub use models::error::MixerError;
pub use models::recording_result::{RecordingMetadata, RecordingResult};
pub use models::state::MixState;
pub use processing::priority_mixer::PriorityMixer;
pub use session::mix_session::{MixMonitor, MixSession, MixSummary, StopHandle};
pub use storage::wav_recorder::WavRecorder;
pub use traits::audio_backend::{AudioBackend, CaptureStream, PlaybackStream};
pub use traits::mix_delegate::MixDelegate;
