//! Wav file source, paced to the wall clock so the visualization runs at
//! the file's real-time speed. Past the end it goes silent.

use std::path::Path;

pub struct WavSource {
    samples: Vec<f32>,
    pub channels: u16,
    pub sample_rate: u32,
    cursor: usize,
}

impl WavSource {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, hound::Error> {
        let mut reader = hound::WavReader::open(path)?;
        let spec = reader.spec();
        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => {
                reader.samples::<f32>().collect::<Result<_, _>>()?
            }
            hound::SampleFormat::Int => {
                let full_scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / full_scale))
                    .collect::<Result<_, _>>()?
            }
        };
        Ok(Self {
            samples,
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            cursor: 0,
        })
    }

    /// Interleaved samples from the last read position up to `elapsed`
    /// seconds of playback. Empty once the file is exhausted.
    pub fn take_until(&mut self, elapsed: f32, out: &mut Vec<f32>) {
        out.clear();
        let target_frame = (elapsed.max(0.0) as f64 * self.sample_rate as f64) as usize;
        let target = (target_frame * self.channels as usize).min(self.samples.len());
        if target > self.cursor {
            out.extend_from_slice(&self.samples[self.cursor..target]);
            self.cursor = target;
        }
    }

    pub fn finished(&self) -> bool {
        self.cursor >= self.samples.len()
    }
}
