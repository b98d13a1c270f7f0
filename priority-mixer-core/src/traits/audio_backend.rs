use crate::models::audio_models::{OutputDescriptor, SampleSpec, SourceDescriptor};
use crate::models::error::MixerError;

/// A blocking capture stream.
///
/// Dropping the stream releases the underlying device handle.
pub trait CaptureStream {
    /// Block until `frame` is completely filled with samples.
    fn read_frame(&mut self, frame: &mut [i16]) -> Result<(), MixerError>;
}

/// A blocking playback stream.
///
/// Dropping the stream releases the underlying device handle.
pub trait PlaybackStream {
    /// Block until all of `frame` has been handed to the device.
    fn write_frame(&mut self, frame: &[i16]) -> Result<(), MixerError>;

    /// Block until everything written so far has been played.
    fn drain(&mut self) -> Result<(), MixerError>;
}

/// Interface for platform-specific audio backends.
///
/// Implemented by:
/// - `PulseBackend` (Linux, PulseAudio simple API)
pub trait AudioBackend {
    type Capture: CaptureStream;
    type Playback: PlaybackStream;

    /// Open a recording stream for `source`.
    fn open_capture(
        &self,
        source: &SourceDescriptor,
        spec: &SampleSpec,
    ) -> Result<Self::Capture, MixerError>;

    /// Open the playback stream the mix is written to.
    fn open_playback(
        &self,
        output: &OutputDescriptor,
        spec: &SampleSpec,
    ) -> Result<Self::Playback, MixerError>;
}
