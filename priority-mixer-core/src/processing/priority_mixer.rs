use crate::models::audio_models::AudioSource;

/// Pure-math priority mixer.
///
/// All operations work on `&[i16]` frames with no platform dependencies.
///
/// Mixing is a plain wrapping sum of every source. When more than one source
/// is present the whole sum is scaled by `1 - attenuation_factor` once per
/// non-primary source, so three sources at the default factor end up at
/// `0.8 * 0.8` of the raw sum.
#[derive(Debug, Clone)]
pub struct PriorityMixer {
    pub attenuation_factor: f64,
}

impl PriorityMixer {
    pub fn new(attenuation_factor: f64) -> Self {
        Self { attenuation_factor }
    }

    /// Stable sort, highest priority first.
    pub fn sort_by_priority<S>(sources: &mut [AudioSource<S>]) {
        sources.sort_by(|a, b| b.priority.cmp(&a.priority));
    }

    /// Add `frame` into `acc` sample by sample with 16-bit wraparound.
    ///
    /// If the slices differ in length, the extra samples are ignored.
    pub fn accumulate(acc: &mut [i16], frame: &[i16]) {
        for (out, &sample) in acc.iter_mut().zip(frame) {
            *out = out.wrapping_add(sample);
        }
    }

    /// Scale `acc` by the per-source gain once for each source after the first.
    ///
    /// Each pass truncates toward zero, so the result can differ by one LSB
    /// from a single multiplication by [`Self::compounded_gain`].
    pub fn attenuate(&self, acc: &mut [i16], source_count: usize) {
        if source_count <= 1 {
            return;
        }
        let gain = self.gain();
        for _ in 1..source_count {
            for sample in acc.iter_mut() {
                *sample = (*sample as f64 * gain) as i16;
            }
        }
    }

    /// Gain applied per non-primary source.
    pub fn gain(&self) -> f64 {
        1.0 - self.attenuation_factor
    }

    /// Overall gain [`Self::attenuate`] applies for `source_count` sources.
    pub fn compounded_gain(&self, source_count: usize) -> f64 {
        if source_count <= 1 {
            return 1.0;
        }
        self.gain().powi(source_count as i32 - 1)
    }

    /// RMS level of a frame, normalized to 0.0–1.0.
    pub fn rms_level(samples: &[i16]) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = samples
            .iter()
            .map(|&s| {
                let v = s as f64 / i16::MAX as f64;
                v * v
            })
            .sum();
        ((sum_sq / samples.len() as f64).sqrt() as f32).min(1.0)
    }

    /// Peak absolute level of a frame, normalized to 0.0–1.0.
    pub fn peak_level(samples: &[i16]) -> f32 {
        let peak = samples
            .iter()
            .map(|s| s.unsigned_abs())
            .max()
            .unwrap_or(0);
        (peak as f32 / i16::MAX as f32).min(1.0)
    }
}

impl Default for PriorityMixer {
    fn default() -> Self {
        Self::new(0.2)
    }
}
