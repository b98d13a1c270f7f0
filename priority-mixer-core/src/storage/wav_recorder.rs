use std::fs::{self, File};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::models::audio_models::SampleSpec;
use crate::models::error::MixerError;
use crate::processing::{pcm, wav_format};

/// Largest PCM payload whose RIFF chunk size (`36 + data`) still fits in a u32.
const MAX_DATA_BYTES: u64 = u32::MAX as u64 - 36;

/// Streaming WAV writer for the mixed output.
///
/// ## File Format
///
/// ```text
/// [44-byte WAV header]
/// [raw 16-bit little-endian PCM data...]
/// ```
///
/// The header is written with a zero data size on [`open`](Self::open) and
/// rewritten with the final sizes on [`close`](Self::close).
pub struct WavRecorder {
    file_path: PathBuf,
    spec: SampleSpec,
    file: Option<BufWriter<File>>,
    data_bytes: u64,
    max_data_bytes: u64,
    scratch: Vec<u8>,
}

impl WavRecorder {
    pub fn new(file_path: PathBuf, spec: SampleSpec) -> Self {
        Self {
            file_path,
            spec,
            file: None,
            data_bytes: 0,
            max_data_bytes: MAX_DATA_BYTES,
            scratch: Vec::new(),
        }
    }

    /// Create the file and write the initial header.
    pub fn open(&mut self) -> Result<(), MixerError> {
        if self.file.is_some() {
            return Ok(());
        }

        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    MixerError::StorageError(format!("failed to create directory: {}", e))
                })?;
            }
        }

        let file = File::create(&self.file_path)
            .map_err(|e| MixerError::StorageError(format!("failed to create file: {}", e)))?;
        let mut file = BufWriter::new(file);

        let header = wav_format::generate_wav_header(&self.spec, 0);
        file.write_all(&header)
            .map_err(|e| MixerError::StorageError(format!("write failed: {}", e)))?;

        self.file = Some(file);
        self.data_bytes = 0;
        log::debug!("Recording mix to {}", self.file_path.display());
        Ok(())
    }

    /// Append one frame of samples.
    ///
    /// Fails without writing once the frame would push the file past the
    /// 4 GiB WAV size limit.
    pub fn write_samples(&mut self, samples: &[i16]) -> Result<(), MixerError> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| MixerError::StorageError("file is not open for writing".into()))?;

        let frame_bytes = (samples.len() * SampleSpec::BYTES_PER_SAMPLE) as u64;
        if self.data_bytes + frame_bytes > self.max_data_bytes {
            return Err(MixerError::StorageError(format!(
                "WAV size limit reached after {} bytes",
                self.data_bytes
            )));
        }

        pcm::samples_to_le_bytes(samples, &mut self.scratch);
        file.write_all(&self.scratch)
            .map_err(|e| MixerError::StorageError(format!("write failed: {}", e)))?;
        self.data_bytes += self.scratch.len() as u64;
        Ok(())
    }

    /// Finalize the file: rewrite the header sizes and compute a SHA-256 checksum.
    pub fn close(&mut self) -> Result<String, MixerError> {
        let mut file = self
            .file
            .take()
            .ok_or_else(|| MixerError::StorageError("file is not open".into()))?;

        let data_size = u32::try_from(self.data_bytes).unwrap_or(u32::MAX);
        let header = wav_format::generate_wav_header(&self.spec, data_size);

        file.seek(SeekFrom::Start(0))
            .map_err(|e| MixerError::StorageError(e.to_string()))?;
        file.write_all(&header)
            .map_err(|e| MixerError::StorageError(e.to_string()))?;
        file.flush()
            .map_err(|e| MixerError::StorageError(e.to_string()))?;
        drop(file);

        sha256_file(&self.file_path)
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// PCM bytes written so far, excluding the header.
    pub fn data_bytes(&self) -> u64 {
        self.data_bytes
    }

    /// Seconds of audio written so far.
    pub fn duration_secs(&self) -> f64 {
        let bytes_per_second =
            self.spec.rate as u64 * self.spec.channels as u64 * SampleSpec::BYTES_PER_SAMPLE as u64;
        if bytes_per_second == 0 {
            return 0.0;
        }
        self.data_bytes as f64 / bytes_per_second as f64
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

/// Compute SHA-256 hex digest of a file.
fn sha256_file(path: &Path) -> Result<String, MixerError> {
    let data = fs::read(path).map_err(|e| {
        MixerError::StorageError(format!("failed to read file for checksum: {}", e))
    })?;
    let digest = Sha256::digest(&data);
    Ok(hex_encode(&digest))
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("priority_mixer_test_{}", name))
    }

    #[test]
    fn write_mono_wav() {
        let path = temp_file_path("mono.wav");
        let mut recorder = WavRecorder::new(path.clone(), SampleSpec::default());
        recorder.open().unwrap();

        recorder.write_samples(&[1, -1, 300, 0]).unwrap();
        recorder.write_samples(&[7; 4]).unwrap();
        assert_eq!(recorder.data_bytes(), 16);

        let checksum = recorder.close().unwrap();
        assert_eq!(checksum.len(), 64);
        assert!(!recorder.is_open());

        let file_data = fs::read(&path).unwrap();
        assert_eq!(file_data.len(), 44 + 16);
        assert_eq!(&file_data[0..4], b"RIFF");
        assert_eq!(wav_format::data_size(&file_data), Some(16));
        assert_eq!(&file_data[44..46], &1i16.to_le_bytes());
        assert_eq!(&file_data[46..48], &(-1i16).to_le_bytes());

        let expected = hex_encode(&Sha256::digest(&file_data));
        assert_eq!(checksum, expected);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn write_before_open_fails() {
        let mut recorder = WavRecorder::new(temp_file_path("unopened.wav"), SampleSpec::default());
        assert!(matches!(
            recorder.write_samples(&[0; 4]),
            Err(MixerError::StorageError(_))
        ));
        assert!(recorder.close().is_err());
    }

    #[test]
    fn size_limit_stops_writes_and_keeps_header_valid() {
        let path = temp_file_path("limit.wav");
        let mut recorder = WavRecorder::new(path.clone(), SampleSpec::default());
        recorder.max_data_bytes = 10;
        recorder.open().unwrap();

        recorder.write_samples(&[1; 4]).unwrap();
        assert!(matches!(
            recorder.write_samples(&[2; 4]),
            Err(MixerError::StorageError(_))
        ));
        assert_eq!(recorder.data_bytes(), 8);

        recorder.close().unwrap();
        let file_data = fs::read(&path).unwrap();
        assert_eq!(file_data.len(), 44 + 8);
        assert_eq!(wav_format::data_size(&file_data), Some(8));

        fs::remove_file(&path).ok();
    }

    #[test]
    fn default_limit_fits_riff_chunk_size() {
        let recorder = WavRecorder::new(temp_file_path("unused.wav"), SampleSpec::default());
        assert_eq!(recorder.max_data_bytes + 36, u32::MAX as u64);
    }

    #[test]
    fn duration_follows_sample_rate() {
        let path = temp_file_path("duration.wav");
        let spec = SampleSpec { rate: 1000, channels: 1 };
        let mut recorder = WavRecorder::new(path.clone(), spec);
        recorder.open().unwrap();
        recorder.write_samples(&[0; 500]).unwrap();

        assert!((recorder.duration_secs() - 0.5).abs() < 1e-9);

        recorder.close().unwrap();
        fs::remove_file(&path).ok();
    }
}
