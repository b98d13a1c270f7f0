//! Conversion between i16 samples and signed 16-bit little-endian PCM bytes.

use crate::models::error::MixerError;

/// Encode samples as little-endian bytes into `out`, replacing its contents.
///
/// Output length = `samples.len() * 2` bytes.
pub fn samples_to_le_bytes(samples: &[i16], out: &mut Vec<u8>) {
    out.clear();
    out.reserve(samples.len() * 2);
    for &sample in samples {
        out.extend_from_slice(&sample.to_le_bytes());
    }
}

/// Decode little-endian PCM bytes into `samples`.
///
/// `bytes` must hold exactly two bytes per sample.
pub fn le_bytes_to_samples(bytes: &[u8], samples: &mut [i16]) -> Result<(), MixerError> {
    if bytes.len() != samples.len() * 2 {
        return Err(MixerError::Unknown(format!(
            "expected {} PCM bytes, got {}",
            samples.len() * 2,
            bytes.len()
        )));
    }
    for (sample, pair) in samples.iter_mut().zip(bytes.chunks_exact(2)) {
        *sample = i16::from_le_bytes([pair[0], pair[1]]);
    }
    Ok(())
}
