//! PulseAudio simple-API streams.
//!
//! Every stream is a `pa_simple` connection with blocking read/write. The
//! connection is freed when the wrapping `Simple` is dropped.

use libpulse_binding::error::PAErr;
use libpulse_binding::sample::{Format, Spec};
use libpulse_binding::stream::Direction;
use libpulse_simple_binding::Simple;

use priority_mixer_core::models::audio_models::{OutputDescriptor, SampleSpec, SourceDescriptor};
use priority_mixer_core::models::error::MixerError;
use priority_mixer_core::processing::pcm;
use priority_mixer_core::traits::audio_backend::{AudioBackend, CaptureStream, PlaybackStream};

/// Opens PulseAudio streams, optionally on a non-default server.
#[derive(Debug, Clone, Default)]
pub struct PulseBackend {
    server: Option<String>,
}

impl PulseBackend {
    pub fn new(server: Option<String>) -> Self {
        Self { server }
    }

    fn connect(
        &self,
        name: &str,
        direction: Direction,
        device: Option<&str>,
        stream_name: &str,
        spec: &SampleSpec,
    ) -> Result<Simple, MixerError> {
        let open_failed = |reason: String| MixerError::DeviceOpenFailed {
            name: name.to_string(),
            reason,
        };
        let ss = pulse_spec(spec).map_err(open_failed)?;
        Simple::new(
            self.server.as_deref(),
            name,
            direction,
            device,
            stream_name,
            &ss,
            None,
            None,
        )
        .map_err(|e| open_failed(describe(e)))
    }
}

impl AudioBackend for PulseBackend {
    type Capture = PulseCapture;
    type Playback = PulsePlayback;

    fn open_capture(
        &self,
        source: &SourceDescriptor,
        spec: &SampleSpec,
    ) -> Result<PulseCapture, MixerError> {
        let simple = self.connect(
            &source.name,
            Direction::Record,
            source.device.as_deref(),
            &source.stream_name,
            spec,
        )?;
        log::debug!(
            "pa_simple record stream {} on {}",
            source.name,
            source.device.as_deref().unwrap_or("default source")
        );
        Ok(PulseCapture {
            name: source.name.clone(),
            simple,
            scratch: Vec::new(),
        })
    }

    fn open_playback(
        &self,
        output: &OutputDescriptor,
        spec: &SampleSpec,
    ) -> Result<PulsePlayback, MixerError> {
        let simple = self.connect(
            &output.name,
            Direction::Playback,
            output.device.as_deref(),
            &output.stream_name,
            spec,
        )?;
        log::debug!(
            "pa_simple playback stream {} on {}",
            output.name,
            output.device.as_deref().unwrap_or("default sink")
        );
        Ok(PulsePlayback {
            name: output.name.clone(),
            simple,
            scratch: Vec::new(),
        })
    }
}

/// Blocking PulseAudio recording stream.
pub struct PulseCapture {
    name: String,
    simple: Simple,
    scratch: Vec<u8>,
}

impl CaptureStream for PulseCapture {
    fn read_frame(&mut self, frame: &mut [i16]) -> Result<(), MixerError> {
        self.scratch.resize(frame.len() * 2, 0);
        self.simple
            .read(&mut self.scratch)
            .map_err(|e| MixerError::ReadFailed {
                name: self.name.clone(),
                reason: format!("pa_simple_read failed: {}", describe(e)),
            })?;
        pcm::le_bytes_to_samples(&self.scratch, frame)
    }
}

impl Drop for PulseCapture {
    fn drop(&mut self) {
        log::debug!("Released record stream {}", self.name);
    }
}

/// Blocking PulseAudio playback stream.
pub struct PulsePlayback {
    name: String,
    simple: Simple,
    scratch: Vec<u8>,
}

impl PlaybackStream for PulsePlayback {
    fn write_frame(&mut self, frame: &[i16]) -> Result<(), MixerError> {
        pcm::samples_to_le_bytes(frame, &mut self.scratch);
        self.simple
            .write(&self.scratch)
            .map_err(|e| MixerError::WriteFailed(format!("pa_simple_write failed: {}", describe(e))))
    }

    fn drain(&mut self) -> Result<(), MixerError> {
        self.simple
            .drain()
            .map_err(|e| MixerError::WriteFailed(format!("pa_simple_drain failed: {}", describe(e))))
    }
}

impl Drop for PulsePlayback {
    fn drop(&mut self) {
        log::debug!("Released playback stream {}", self.name);
    }
}

/// Map a session sample spec onto PulseAudio's, always signed 16-bit LE.
fn pulse_spec(spec: &SampleSpec) -> Result<Spec, String> {
    let ss = Spec {
        format: Format::S16le,
        channels: spec.channels,
        rate: spec.rate,
    };
    if !ss.is_valid() {
        return Err(format!(
            "invalid sample spec: {} Hz, {} channels",
            spec.rate, spec.channels
        ));
    }
    Ok(ss)
}

fn describe(err: PAErr) -> String {
    format!("{}", err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_spec_is_s16le_mono_44k() {
        let ss = pulse_spec(&SampleSpec::default()).unwrap();
        assert_eq!(ss.format, Format::S16le);
        assert_eq!(ss.channels, 1);
        assert_eq!(ss.rate, 44100);
    }

    #[test]
    fn rejects_zero_rate() {
        let spec = SampleSpec { rate: 0, channels: 1 };
        assert!(pulse_spec(&spec).is_err());
    }

    #[test]
    fn rejects_zero_channels() {
        let spec = SampleSpec { rate: 44100, channels: 0 };
        assert!(pulse_spec(&spec).unwrap_err().contains("0 channels"));
    }
}
