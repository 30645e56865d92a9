//! Byte-quantized analyser over a rolling sample window.
//!
//! Mirrors the analysis the render core was written against: a Hann-windowed
//! magnitude spectrum with temporal smoothing mapped onto a -100..-30 dB byte
//! scale, and time-domain bytes centered at 128. One analyser per channel;
//! the stereo pair feeds the phase-scope mode.

use std::collections::VecDeque;
use std::sync::Arc;

use rustfft::num_complex::Complex32;
use rustfft::FftPlanner;

use crate::audio::source::{AudioFrame, AudioFrameSource};

pub const DEFAULT_FFT_SIZE: usize = 2048;

const MIN_DB: f32 = -100.0;
const MAX_DB: f32 = -30.0;
/// Temporal smoothing of linear magnitudes between frames.
const SMOOTHING: f32 = 0.8;

/// Periodic Hann window, w[i] = 0.5 · (1 - cos(2πi/N)).
fn hann_window_periodic(n: usize) -> Vec<f32> {
    match n {
        0 => Vec::new(),
        1 => vec![1.0],
        _ => {
            let two_pi = std::f32::consts::PI * 2.0;
            let n_f = n as f32;
            (0..n)
                .map(|i| 0.5 * (1.0 - (two_pi * i as f32 / n_f).cos()))
                .collect()
        }
    }
}

pub struct Analyser {
    fft_size: usize,
    sample_rate: u32,
    window: Vec<f32>,
    samples: VecDeque<f32>,
    smoothed: Vec<f32>,
    fft: Arc<dyn rustfft::Fft<f32>>,
    scratch: Vec<Complex32>,
}

impl Analyser {
    pub fn new(fft_size: usize, sample_rate: u32) -> Self {
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(fft_size);
        Self {
            fft_size,
            sample_rate,
            window: hann_window_periodic(fft_size),
            samples: VecDeque::from(vec![0.0; fft_size]),
            smoothed: vec![0.0; fft_size / 2],
            fft,
            scratch: vec![Complex32::new(0.0, 0.0); fft_size],
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Half the fft size, the length of every frame buffer.
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Swap the analysis resolution; smoothing state restarts, the sample
    /// window is kept (truncated or padded with silence).
    pub fn set_fft_size(&mut self, fft_size: usize) {
        if fft_size == self.fft_size {
            return;
        }
        let mut planner = FftPlanner::<f32>::new();
        self.fft = planner.plan_fft_forward(fft_size);
        self.window = hann_window_periodic(fft_size);
        self.smoothed = vec![0.0; fft_size / 2];
        self.scratch = vec![Complex32::new(0.0, 0.0); fft_size];
        while self.samples.len() > fft_size {
            self.samples.pop_front();
        }
        while self.samples.len() < fft_size {
            self.samples.push_front(0.0);
        }
        self.fft_size = fft_size;
    }

    pub fn push_samples(&mut self, samples: &[f32]) {
        for &s in samples {
            if self.samples.len() == self.fft_size {
                self.samples.pop_front();
            }
            self.samples.push_back(s);
        }
    }

    /// Most recent `bin_count` samples, quantized around 128.
    fn byte_time_domain(&self) -> Vec<u8> {
        let n = self.bin_count();
        self.samples
            .iter()
            .skip(self.fft_size - n)
            .map(|&s| (128.0 + s * 128.0).clamp(0.0, 255.0) as u8)
            .collect()
    }

    /// Windowed magnitude spectrum on the byte dB scale, advancing the
    /// temporal smoothing state.
    fn byte_frequency(&mut self) -> Vec<u8> {
        for (i, (&s, &w)) in self.samples.iter().zip(&self.window).enumerate() {
            self.scratch[i] = Complex32::new(s * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        let n = self.bin_count();
        let inv_n = 1.0 / self.fft_size as f32;
        let db_span = MAX_DB - MIN_DB;
        let mut out = Vec::with_capacity(n);
        for k in 0..n {
            let mag = self.scratch[k].norm() * inv_n;
            let sm = &mut self.smoothed[k];
            *sm = SMOOTHING * *sm + (1.0 - SMOOTHING) * mag;
            let db = 20.0 * (*sm).max(1e-10).log10();
            let byte = ((db - MIN_DB) / db_span * 255.0).clamp(0.0, 255.0);
            out.push(byte as u8);
        }
        out
    }
}

impl AudioFrameSource for Analyser {
    fn buffer_length(&self) -> usize {
        self.bin_count()
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn next_frame(&mut self) -> AudioFrame {
        AudioFrame {
            time_domain: self.byte_time_domain(),
            frequency: self.byte_frequency(),
            buffer_length: self.bin_count(),
            sample_rate: self.sample_rate,
        }
    }
}

/// Mono analysis plus an independently windowed pair for the stereo mode.
pub struct StereoAnalyser {
    pub mono: Analyser,
    pub left: Analyser,
    pub right: Analyser,
}

impl StereoAnalyser {
    pub fn new(fft_size: usize, sample_rate: u32) -> Self {
        Self {
            mono: Analyser::new(fft_size, sample_rate),
            left: Analyser::new(fft_size, sample_rate),
            right: Analyser::new(fft_size, sample_rate),
        }
    }

    /// Feed interleaved device samples into all three windows.
    pub fn push_interleaved(&mut self, samples: &[f32], channels: u16) {
        match channels {
            0 => {}
            1 => {
                self.mono.push_samples(samples);
                self.left.push_samples(samples);
                self.right.push_samples(samples);
            }
            _ => {
                let ch = channels as usize;
                for frame in samples.chunks_exact(ch) {
                    let l = frame[0];
                    let r = frame[1];
                    self.mono.push_samples(&[(l + r) * 0.5]);
                    self.left.push_samples(&[l]);
                    self.right.push_samples(&[r]);
                }
            }
        }
    }
}
