//! The frame contract between audio acquisition and the render core.

/// One tick's worth of analysis data, byte-quantized the way the render
/// core consumes it. Read-only downstream; only history rings keep copies.
#[derive(Clone, Debug)]
pub struct AudioFrame {
    /// Waveform samples centered at 128.
    pub time_domain: Vec<u8>,
    /// Per-bin spectral magnitudes, 0..=255.
    pub frequency: Vec<u8>,
    pub buffer_length: usize,
    pub sample_rate: u32,
}

impl AudioFrame {
    /// The quiet-signal baseline: centered time domain, empty spectrum.
    pub fn silent(buffer_length: usize, sample_rate: u32) -> Self {
        Self {
            time_domain: vec![128; buffer_length],
            frequency: vec![0; buffer_length],
            buffer_length,
            sample_rate,
        }
    }
}

/// Synchronous pull accessor the render loop calls once per tick.
pub trait AudioFrameSource {
    fn buffer_length(&self) -> usize;
    fn sample_rate(&self) -> u32;
    fn next_frame(&mut self) -> AudioFrame;
}

/// Source for a missing or muted input; everything downstream proceeds at
/// the quiet baseline.
#[derive(Clone, Debug)]
pub struct SilentSource {
    pub buffer_length: usize,
    pub sample_rate: u32,
}

impl SilentSource {
    pub fn new(buffer_length: usize, sample_rate: u32) -> Self {
        Self {
            buffer_length,
            sample_rate,
        }
    }
}

impl AudioFrameSource for SilentSource {
    fn buffer_length(&self) -> usize {
        self.buffer_length
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn next_frame(&mut self) -> AudioFrame {
        AudioFrame::silent(self.buffer_length, self.sample_rate)
    }
}
