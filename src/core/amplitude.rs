use serde::{Deserialize, Serialize};

use crate::audio::source::AudioFrame;

/// Which analysis buffer a component reacts to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseMode {
    /// Time-domain buffer, centered at 128 and rectified.
    Signal,
    /// Frequency-domain magnitude bins.
    Frequency,
}

impl Default for ResponseMode {
    fn default() -> Self {
        Self::Frequency
    }
}

/// Scalar summaries of one analysis buffer, all in [0, 1].
#[derive(Clone, Debug, Default)]
pub struct Amplitudes {
    pub per_bin: Vec<f32>,
    pub average: f32,
    pub peak: f32,
}

impl Amplitudes {
    /// Amplitude of the bin mapped from index `i` of a `len`-element sequence.
    /// Used to spread particles/vertices uniformly over the analysis bins.
    pub fn bin_for(&self, i: usize, len: usize) -> f32 {
        if self.per_bin.is_empty() || len == 0 {
            return 0.0;
        }
        let idx = (i * self.per_bin.len()) / len;
        self.per_bin[idx.min(self.per_bin.len() - 1)]
    }
}

/// Reduce an audio frame to per-bin/average/peak amplitudes.
///
/// `signal`: per-bin |s-128|/128. `frequency`: per-bin s/255.
/// A zero-length frame yields all zeros.
pub fn measure(frame: &AudioFrame, mode: ResponseMode) -> Amplitudes {
    let bytes = match mode {
        ResponseMode::Signal => &frame.time_domain,
        ResponseMode::Frequency => &frame.frequency,
    };
    if bytes.is_empty() {
        return Amplitudes::default();
    }

    let mut per_bin = Vec::with_capacity(bytes.len());
    let mut sum = 0.0f32;
    let mut peak = 0.0f32;
    for &b in bytes {
        let v = match mode {
            ResponseMode::Signal => (b as f32 - 128.0).abs() / 128.0,
            ResponseMode::Frequency => b as f32 / 255.0,
        };
        sum += v;
        if v > peak {
            peak = v;
        }
        per_bin.push(v);
    }

    Amplitudes {
        average: sum / bytes.len() as f32,
        peak,
        per_bin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(time: Vec<u8>, freq: Vec<u8>) -> AudioFrame {
        let n = time.len().max(freq.len());
        AudioFrame {
            time_domain: time,
            frequency: freq,
            buffer_length: n,
            sample_rate: 48_000,
        }
    }

    #[test]
    fn silent_time_domain_measures_zero() {
        let f = frame(vec![128; 1024], vec![0; 1024]);
        let a = measure(&f, ResponseMode::Signal);
        assert_eq!(a.average, 0.0);
        assert_eq!(a.peak, 0.0);
        assert!(a.per_bin.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn full_scale_frequency_measures_one() {
        let f = frame(vec![128; 8], vec![255; 8]);
        let a = measure(&f, ResponseMode::Frequency);
        assert_eq!(a.average, 1.0);
        assert_eq!(a.peak, 1.0);
    }

    #[test]
    fn signal_mode_rectifies_both_sides() {
        // 0 and 255 are (almost) symmetric full-scale excursions.
        let f = frame(vec![0, 255], vec![]);
        let a = measure(&f, ResponseMode::Signal);
        assert_eq!(a.per_bin[0], 1.0);
        assert!((a.per_bin[1] - 127.0 / 128.0).abs() < 1e-6);
        assert_eq!(a.peak, 1.0);
    }

    #[test]
    fn empty_buffer_yields_zeros() {
        let f = frame(vec![], vec![]);
        let a = measure(&f, ResponseMode::Frequency);
        assert_eq!(a.average, 0.0);
        assert_eq!(a.peak, 0.0);
        assert!(a.per_bin.is_empty());
    }

    #[test]
    fn bin_for_spreads_uniformly() {
        let f = frame(vec![], (0..=255).map(|i| i as u8).collect());
        let a = measure(&f, ResponseMode::Frequency);
        // First element maps to bin 0, last to the top quarter of bins.
        assert_eq!(a.bin_for(0, 1024), a.per_bin[0]);
        let hi = a.bin_for(1023, 1024);
        assert!(hi > 0.9);
    }
}
