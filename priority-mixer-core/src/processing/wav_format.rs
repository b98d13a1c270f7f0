//! WAV file format utilities.
//!
//! Generates standard 44-byte RIFF WAV headers for 16-bit PCM.

use crate::models::audio_models::SampleSpec;

/// Size of the standard WAV RIFF header in bytes.
pub const WAV_HEADER_SIZE: usize = 44;

const BIT_DEPTH: u16 = 16;

/// Generate a 44-byte WAV RIFF header for 16-bit PCM.
///
/// Layout:
/// ```text
/// [0-3]    "RIFF"
/// [4-7]    file size - 8 (36 + data_size, saturating)
/// [8-11]   "WAVE"
/// [12-15]  "fmt "
/// [16-19]  16 (PCM format chunk size)
/// [20-21]  1 (PCM format code)
/// [22-23]  channels
/// [24-27]  sample_rate
/// [28-31]  byte_rate = sample_rate * channels * 2
/// [32-33]  block_align = channels * 2
/// [34-35]  16
/// [36-39]  "data"
/// [40-43]  data_size
/// ```
pub fn generate_wav_header(spec: &SampleSpec, data_size: u32) -> [u8; WAV_HEADER_SIZE] {
    let channels = spec.channels as u16;
    let byte_rate = spec.rate * channels as u32 * BIT_DEPTH as u32 / 8;
    let block_align = channels * BIT_DEPTH / 8;
    let chunk_size = data_size.saturating_add(36);

    let mut header = [0u8; WAV_HEADER_SIZE];

    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&chunk_size.to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");

    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes());
    header[20..22].copy_from_slice(&1u16.to_le_bytes());
    header[22..24].copy_from_slice(&channels.to_le_bytes());
    header[24..28].copy_from_slice(&spec.rate.to_le_bytes());
    header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    header[32..34].copy_from_slice(&block_align.to_le_bytes());
    header[34..36].copy_from_slice(&BIT_DEPTH.to_le_bytes());

    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_size.to_le_bytes());

    header
}

/// Read the data-size field at offset 40.
pub fn data_size(header: &[u8]) -> Option<u32> {
    let bytes = header.get(40..44)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_magic() {
        let header = generate_wav_header(&SampleSpec::default(), 0);
        assert_eq!(header.len(), 44);
        assert_eq!(&header[0..4], b"RIFF");
        assert_eq!(&header[8..12], b"WAVE");
        assert_eq!(&header[12..16], b"fmt ");
        assert_eq!(&header[36..40], b"data");
        assert_eq!(u16::from_le_bytes([header[20], header[21]]), 1);
    }

    #[test]
    fn header_44khz_mono() {
        let header = generate_wav_header(&SampleSpec::default(), 2048);

        assert_eq!(u16::from_le_bytes([header[22], header[23]]), 1);
        assert_eq!(u32::from_le_bytes([header[24], header[25], header[26], header[27]]), 44100);
        assert_eq!(u32::from_le_bytes([header[28], header[29], header[30], header[31]]), 88200);
        assert_eq!(u16::from_le_bytes([header[32], header[33]]), 2);
        assert_eq!(u16::from_le_bytes([header[34], header[35]]), 16);
        assert_eq!(data_size(&header), Some(2048));
        assert_eq!(u32::from_le_bytes([header[4], header[5], header[6], header[7]]), 36 + 2048);
    }

    #[test]
    fn header_stereo_block_align() {
        let spec = SampleSpec { rate: 48000, channels: 2 };
        let header = generate_wav_header(&spec, 0);
        assert_eq!(u32::from_le_bytes([header[28], header[29], header[30], header[31]]), 192000);
        assert_eq!(u16::from_le_bytes([header[32], header[33]]), 4);
    }

    #[test]
    fn chunk_size_saturates_near_u32_max() {
        for size in [u32::MAX - 36, u32::MAX - 10, u32::MAX] {
            let header = generate_wav_header(&SampleSpec::default(), size);
            let chunk_size = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
            assert_eq!(chunk_size, size.saturating_add(36));
            assert_eq!(data_size(&header), Some(size));
        }
        let header = generate_wav_header(&SampleSpec::default(), u32::MAX);
        assert_eq!(u32::from_le_bytes([header[4], header[5], header[6], header[7]]), u32::MAX);
    }

    #[test]
    fn data_size_of_short_slice() {
        assert_eq!(data_size(&[0u8; 10]), None);
    }
}
