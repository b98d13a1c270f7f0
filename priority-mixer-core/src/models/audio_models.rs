use serde::{Deserialize, Serialize};

/// PCM sample layout shared by every stream in a session.
///
/// Samples are always signed 16-bit little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleSpec {
    pub rate: u32,
    pub channels: u8,
}

impl SampleSpec {
    pub const BYTES_PER_SAMPLE: usize = 2;

    /// Bytes needed to hold `samples` interleaved samples.
    pub fn bytes_for(&self, samples: usize) -> usize {
        samples * Self::BYTES_PER_SAMPLE
    }
}

impl Default for SampleSpec {
    fn default() -> Self {
        Self {
            rate: 44100,
            channels: 1,
        }
    }
}

/// A capture stream to open at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDescriptor {
    /// Client name the stream registers under.
    pub name: String,
    #[serde(default = "default_record_stream")]
    pub stream_name: String,
    /// Backend device name, or None for the default source.
    #[serde(default)]
    pub device: Option<String>,
    pub priority: i32,
}

fn default_record_stream() -> String {
    "record".into()
}

impl SourceDescriptor {
    pub fn new(name: impl Into<String>, priority: i32) -> Self {
        Self {
            name: name.into(),
            stream_name: default_record_stream(),
            device: None,
            priority,
        }
    }

    /// The default microphone, which always wins the priority sort.
    pub fn microphone() -> Self {
        Self::new("Microphone", i32::MAX)
    }
}

/// The playback stream the mix is written to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutputDescriptor {
    pub name: String,
    pub stream_name: String,
    pub device: Option<String>,
}

impl Default for OutputDescriptor {
    fn default() -> Self {
        Self {
            name: "PriorityAudioOut".into(),
            stream_name: "playback".into(),
            device: None,
        }
    }
}

/// An opened capture stream together with its static priority.
///
/// The stream is exclusively owned; dropping the source releases it.
#[derive(Debug)]
pub struct AudioSource<S> {
    pub name: String,
    pub priority: i32,
    pub stream: S,
}

impl<S> AudioSource<S> {
    pub fn new(name: impl Into<String>, priority: i32, stream: S) -> Self {
        Self {
            name: name.into(),
            priority,
            stream,
        }
    }
}

/// Level metering of the last written frame (RMS and peak, 0.0–1.0).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MixLevels {
    pub rms_level: f32,
    pub peak_level: f32,
}

/// Counters for debugging a mix session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MixStats {
    pub iterations: u64,
    pub frames_read: u64,
    /// Iterations where a read failure cut the inner read pass short.
    pub partial_iterations: u64,
    pub read_errors: u64,
    pub bytes_written: u64,
}
