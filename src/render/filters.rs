//! Post-process pixel filter chain with audio-driven intensity.
//!
//! Exactly one effect runs per frame, on raw pixel data, after the mode has
//! drawn. Effective intensity = configured intensity × live audio level
//! (frequency average, or the beat detector's gate). Filters are pure given
//! `(framebuffer, intensity, rng)`.

use rand::rngs::SmallRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::audio::source::AudioFrame;
use crate::core::amplitude::{self, ResponseMode};
use crate::render::surface::{Blend, DrawSurface, Rect, Rgba};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FilterEffect {
    None,
    Grain,
    Scanlines,
    Chromatic,
    Glitch,
    Vhs,
}

impl Default for FilterEffect {
    fn default() -> Self {
        Self::None
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FilterResponse {
    Frequency,
    Beat,
}

impl Default for FilterResponse {
    fn default() -> Self {
        Self::Frequency
    }
}

/// Bass threshold on the byte scale and the refractory window, both taken
/// from the shipped product.
const BEAT_THRESHOLD: f32 = 180.0;
const BEAT_REFRACTORY_SEC: f32 = 0.2;
const BEAT_RELEASE_SEC: f32 = 0.1;
const BASS_BINS: usize = 10;

/// Threshold gate over the bass band with a refractory window, so one kick
/// drum hit registers once.
#[derive(Clone, Debug)]
pub struct BeatDetector {
    last_beat: f32,
    active: bool,
}

impl Default for BeatDetector {
    fn default() -> Self {
        Self {
            last_beat: f32::NEG_INFINITY,
            active: false,
        }
    }
}

impl BeatDetector {
    pub fn update(&mut self, frequency: &[u8], elapsed: f32) -> bool {
        let n = frequency.len().min(BASS_BINS);
        if n == 0 {
            self.active = false;
            return false;
        }
        let bass: f32 =
            frequency[..n].iter().map(|&b| b as f32).sum::<f32>() / n as f32;
        if bass > BEAT_THRESHOLD && elapsed - self.last_beat > BEAT_REFRACTORY_SEC {
            self.active = true;
            self.last_beat = elapsed;
        } else if elapsed - self.last_beat > BEAT_RELEASE_SEC {
            self.active = false;
        }
        self.active
    }
}

/// Live audio level in [0, 1]-ish multiplying the configured intensity.
pub fn audio_level(
    frame: &AudioFrame,
    response: FilterResponse,
    strength: f32,
    beat: &mut BeatDetector,
    elapsed: f32,
) -> f32 {
    match response {
        FilterResponse::Frequency => {
            amplitude::measure(frame, ResponseMode::Frequency).average * strength
        }
        FilterResponse::Beat => {
            if beat.update(&frame.frequency, elapsed) {
                1.0 * strength
            } else {
                0.2 * strength
            }
        }
    }
}

/// Per-pixel additive noise of the given byte amplitude.
fn grain(surface: &mut dyn DrawSurface, amplitude: f32, rng: &mut SmallRng) {
    if amplitude <= 0.0 {
        return;
    }
    for px in surface.data_mut().chunks_exact_mut(4) {
        let noise = (rng.random::<f32>() - 0.5) * amplitude;
        for c in &mut px[..3] {
            *c = (*c as f32 + noise).clamp(0.0, 255.0) as u8;
        }
    }
}

/// The always-on film grain every mode finishes with (amplitude ±5).
pub fn film_grain(surface: &mut dyn DrawSurface, rng: &mut SmallRng) {
    grain(surface, 10.0, rng);
}

fn scanlines(surface: &mut dyn DrawSurface, intensity: f32) {
    if intensity <= 0.0 {
        return;
    }
    let w = surface.width() as i32;
    let h = surface.height() as i32;
    let alpha = 0.3 + intensity * 0.7;
    let line_height = 2i32;
    let gap = (4.0 - intensity * 2.0).floor().max(1.0) as i32;
    let band = Rgba::BLACK.with_alpha(alpha);
    let mut y = 0;
    while y < h {
        surface.fill_rect(0, y, w, line_height, band);
        y += line_height + gap;
    }
    // Soften the banding: screen-blend a one-pixel-shifted copy at low
    // opacity, standing in for the original's blurred overlay pass.
    let full = Rect::full(surface);
    surface.blit_self(full, 0, 1, Blend::Screen, intensity * 0.3);
}

fn chromatic(surface: &mut dyn DrawSurface, intensity: f32) {
    let offset = (intensity * 8.0).floor() as i32;
    if offset < 1 {
        return;
    }
    let (w, h) = (surface.width(), surface.height());
    let snapshot = surface.data().to_vec();
    surface.clear(Rgba::BLACK);
    for dx in [-offset, 0, offset] {
        surface.blit_image(&snapshot, w, h, dx, 0, Blend::Screen, 0.8);
    }
}

fn glitch(surface: &mut dyn DrawSurface, intensity: f32, rng: &mut SmallRng) {
    if rng.random::<f32>() > intensity {
        return;
    }
    let w = surface.width() as i32;
    let h = surface.height() as i32;
    if h == 0 {
        return;
    }
    let slices = (intensity * 10.0).floor() as i32;
    for _ in 0..slices {
        let slice_h = rng.random_range(5..25);
        let y = rng.random_range(0..h);
        let offset = (rng.random::<f32>() - 0.5) * 50.0 * intensity;
        surface.blit_self(
            Rect {
                x: 0,
                y,
                w,
                h: slice_h,
            },
            offset as i32,
            y,
            Blend::Source,
            1.0,
        );
    }
}

fn vhs(surface: &mut dyn DrawSurface, intensity: f32, rng: &mut SmallRng) {
    let w = surface.width();
    let h = surface.height();
    let data = surface.data_mut();

    // Horizontal noise lines, each row independently triggered.
    for y in 0..h {
        if rng.random::<f32>() < intensity * 0.1 {
            let row_intensity = rng.random::<f32>() * intensity;
            let row = &mut data[y * w * 4..(y + 1) * w * 4];
            for px in row.chunks_exact_mut(4) {
                let noise = (rng.random::<f32>() - 0.5) * 100.0 * row_intensity;
                for c in &mut px[..3] {
                    *c = (*c as f32 + noise).clamp(0.0, 255.0) as u8;
                }
            }
        }
    }

    // Sparse per-pixel channel jitter.
    for px in data.chunks_exact_mut(4) {
        if rng.random::<f32>() < intensity * 0.05 {
            let jit = [50.0, 30.0, 40.0];
            for (c, amp) in px[..3].iter_mut().zip(jit) {
                let d = (rng.random::<f32>() - 0.5) * amp * intensity;
                *c = (*c as f32 + d).clamp(0.0, 255.0) as u8;
            }
        }
    }
}

/// Apply the selected effect at the already audio-scaled intensity.
pub fn apply(
    surface: &mut dyn DrawSurface,
    effect: FilterEffect,
    intensity: f32,
    rng: &mut SmallRng,
) {
    let intensity = intensity.clamp(0.0, 1.0);
    match effect {
        FilterEffect::None => {}
        FilterEffect::Grain => grain(surface, 255.0 * intensity, rng),
        FilterEffect::Scanlines => scanlines(surface, intensity),
        FilterEffect::Chromatic => chromatic(surface, intensity),
        FilterEffect::Glitch => glitch(surface, intensity, rng),
        FilterEffect::Vhs => vhs(surface, intensity, rng),
    }
}
