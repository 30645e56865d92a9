//! Per-tick orchestration: owns the per-mode state, dispatches the selected
//! render routine, then runs the post-process chain.
//!
//! A failed tick is reported to the caller, logged there and skipped; the
//! next tick proceeds independently since nearly all geometry is recomputed
//! per frame.

use std::fmt;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::config::Configuration;
use crate::core::expr::EquationSet;
use crate::core::smoothing::{HistoryRing, SmoothedTrace};
use crate::life::automaton::CellGrid;
use crate::render::filters::{self, BeatDetector};
use crate::render::modes;
use crate::render::modes::particles::ParticleCloud;
use crate::render::modes::sheet::SheetStyle;
use crate::render::surface::DrawSurface;
use crate::render::{RenderInput, RenderMode};

/// Number of history slices kept for the sheet modes.
const HISTORY_DEPTH: usize = 50;

#[derive(Debug)]
pub struct RenderError {
    pub mode: RenderMode,
    pub reason: String,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "render mode {} failed: {}", self.mode.id(), self.reason)
    }
}

impl std::error::Error for RenderError {}

/// All state that survives across ticks, keyed to one drawing surface.
pub struct VisualEngine {
    trace: SmoothedTrace,
    history: HistoryRing,
    cloud: ParticleCloud,
    mesh_eqs: EquationSet,
    life: Option<CellGrid>,
    beat: BeatDetector,
    rng: SmallRng,
}

impl VisualEngine {
    pub fn new(cfg: &Configuration, seed: u64) -> Self {
        Self {
            trace: SmoothedTrace::default(),
            history: HistoryRing::new(HISTORY_DEPTH),
            cloud: ParticleCloud::new(&cfg.particles, seed),
            mesh_eqs: EquationSet::from_sources(&cfg.mesh.eq_x, &cfg.mesh.eq_y, &cfg.mesh.eq_z),
            life: None,
            beat: BeatDetector::default(),
            rng: SmallRng::seed_from_u64(seed ^ 0x9E37_79B9),
        }
    }

    /// Rebuild the particle array on demand (the UI's "regenerate" action).
    pub fn regenerate_particles(&mut self, cfg: &Configuration) {
        self.cloud
            .regenerate(cfg.particles.count, cfg.particles.base_size);
    }

    /// One full pass: state sync, mode draw, film grain, filter chain.
    pub fn render_tick(
        &mut self,
        surface: &mut dyn DrawSurface,
        input: &RenderInput,
    ) -> Result<(), RenderError> {
        let mode = input.cfg.mode;
        if surface.width() == 0 || surface.height() == 0 {
            return Err(RenderError {
                mode,
                reason: "surface has zero area".to_string(),
            });
        }

        // Snapshot-driven state swaps happen between draws, never mid-draw.
        self.cloud.sync(&input.cfg.particles);

        match mode {
            RenderMode::Waveform => modes::waveform::render(surface, input, &mut self.trace),
            RenderMode::Spectrum => modes::spectrum::render(surface, input),
            RenderMode::Spectrogram2d => modes::spectrogram::render(surface, input),
            RenderMode::Spectrogram3d => {
                modes::sheet::render(surface, input, &mut self.history, SheetStyle::Spectrum)
            }
            RenderMode::SheetFlat => {
                modes::sheet::render(surface, input, &mut self.history, SheetStyle::Flat)
            }
            RenderMode::SheetTop => {
                modes::sheet::render(surface, input, &mut self.history, SheetStyle::Top)
            }
            RenderMode::Stereo => modes::stereo::render(surface, input),
            RenderMode::Particles => self.cloud.render(surface, input),
            RenderMode::Mesh => modes::mesh::render(surface, input, &mut self.mesh_eqs),
            RenderMode::FourierShape => modes::fourier_shape::render(surface, input),
            RenderMode::Polygon => modes::polygon::render(surface, input),
            RenderMode::Orbitals => modes::orbitals::render(surface, input),
            RenderMode::Life => modes::life::render(surface, input, &mut self.life),
        }

        // The spectrogram surface is its own history; grain would smear it.
        if mode != RenderMode::Spectrogram2d {
            filters::film_grain(surface, &mut self.rng);
        }

        let fcfg = &input.cfg.filter;
        let level = filters::audio_level(
            input.frame,
            fcfg.response,
            fcfg.response_strength,
            &mut self.beat,
            input.elapsed,
        );
        filters::apply(surface, fcfg.effect, fcfg.intensity * level, &mut self.rng);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::source::AudioFrame;
    use crate::render::surface::Framebuffer;
    use crate::render::theme::Theme;

    fn noisy_frame(n: usize) -> AudioFrame {
        AudioFrame {
            time_domain: (0..n).map(|i| (i * 37 % 256) as u8).collect(),
            frequency: (0..n).map(|i| (i * 11 % 256) as u8).collect(),
            buffer_length: n,
            sample_rate: 48_000,
        }
    }

    #[test]
    fn every_mode_renders_without_error() {
        let mut cfg = Configuration::default();
        cfg.mesh.resolution = 8;
        cfg.particles.count = 200;
        let cfg = cfg.clamped();
        let theme = Theme::default();
        let frame = noisy_frame(256);
        let mut engine = VisualEngine::new(&cfg, 1);
        let mut fb = Framebuffer::new(120, 90);

        for &mode in RenderMode::ALL {
            let mut cfg = cfg.clone();
            cfg.mode = mode;
            let input = RenderInput {
                frame: &frame,
                stereo: None,
                cfg: &cfg,
                theme: &theme,
                elapsed: 0.5,
            };
            engine
                .render_tick(&mut fb, &input)
                .unwrap_or_else(|e| panic!("{mode:?}: {e}"));
        }
    }

    #[test]
    fn zero_area_surface_is_rejected_not_fatal() {
        let cfg = Configuration::default().clamped();
        let theme = Theme::default();
        let frame = noisy_frame(64);
        let mut engine = VisualEngine::new(&cfg, 1);
        let mut fb = Framebuffer::new(0, 0);
        let input = RenderInput {
            frame: &frame,
            stereo: None,
            cfg: &cfg,
            theme: &theme,
            elapsed: 0.0,
        };
        let err = engine.render_tick(&mut fb, &input).unwrap_err();
        assert_eq!(err.mode, RenderMode::Waveform);

        // The next tick on a healthy surface succeeds.
        let mut fb = Framebuffer::new(32, 32);
        assert!(engine.render_tick(&mut fb, &input).is_ok());
    }
}
