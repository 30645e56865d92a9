//! Parametric particle cloud driven by the equation set.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::ParticleConfig;
use crate::core::amplitude;
use crate::core::expr::EquationSet;
use crate::core::transform::{project, Rotation3};
use crate::render::grid::draw_grid;
use crate::render::surface::{DrawSurface, Rgba};
use crate::render::RenderInput;

const PERSPECTIVE: f32 = 500.0;
const BASE_RADIUS: f32 = 200.0;

#[derive(Clone, Copy, Debug)]
pub struct Particle {
    /// Fixed surface coordinates in [0, 1), stable across frames.
    pub u: f32,
    pub v: f32,
    pub size: f32,
    pub hue: f32,
}

pub struct ParticleCloud {
    pub particles: Vec<Particle>,
    base_size: f32,
    eqs: EquationSet,
    rng: SmallRng,
}

impl ParticleCloud {
    pub fn new(cfg: &ParticleConfig, seed: u64) -> Self {
        let mut cloud = Self {
            particles: Vec::new(),
            base_size: cfg.base_size,
            eqs: EquationSet::from_sources(&cfg.eq_x, &cfg.eq_y, &cfg.eq_z),
            rng: SmallRng::seed_from_u64(seed),
        };
        cloud.regenerate(cfg.count, cfg.base_size);
        cloud
    }

    /// Bulk reallocation; the render loop sees the old array until the new
    /// one is fully built.
    pub fn regenerate(&mut self, count: usize, base_size: f32) {
        let mut next = Vec::with_capacity(count);
        for _ in 0..count {
            next.push(Particle {
                u: self.rng.random::<f32>(),
                v: self.rng.random::<f32>(),
                size: base_size,
                hue: self.rng.random::<f32>() * 360.0,
            });
        }
        self.particles = next;
        self.base_size = base_size;
    }

    /// Fold in a fresh configuration snapshot: count changes rebuild the
    /// cloud, size changes mutate in place, equation edits recompile with
    /// the last good function as fallback.
    pub fn sync(&mut self, cfg: &ParticleConfig) {
        if self.particles.len() != cfg.count {
            self.regenerate(cfg.count, cfg.base_size);
        } else if (self.base_size - cfg.base_size).abs() > f32::EPSILON {
            for p in &mut self.particles {
                p.size = cfg.base_size;
            }
            self.base_size = cfg.base_size;
        }
        self.eqs.refresh(&cfg.eq_x, &cfg.eq_y, &cfg.eq_z);
    }

    pub fn render(&self, surface: &mut dyn DrawSurface, input: &RenderInput) {
        let w = surface.width() as i32;
        let h = surface.height() as i32;
        let (cx, cy) = (w as f32 / 2.0, h as f32 / 2.0);
        let pcfg = &input.cfg.particles;

        let amps = amplitude::measure(input.frame, pcfg.response);

        // Particle clouds layer onto a translucent wash, or the theme's own
        // backdrop when it defines one.
        match input.theme.background {
            Some(bg) => surface.fill_rect(0, 0, w, h, bg),
            None => surface.fill_rect(0, 0, w, h, Rgba::BLACK.with_alpha(0.2)),
        }

        let drive = pcfg.audio_rotation.value(amps.average, amps.peak);
        let rot = Rotation3::from_axes(&pcfg.rotation, input.elapsed, drive);
        let morphed_a = amps.average + pcfg.audio_morph.value(amps.average, amps.peak);

        let len = self.particles.len();
        for (i, p) in self.particles.iter().enumerate() {
            let amp = amps.bin_for(i, len);
            let pt = self.eqs.eval(p.u, p.v, input.elapsed, morphed_a);
            let radius = BASE_RADIUS * (1.0 + 0.5 * amp);
            let [x, y] = project(pt, rot, PERSPECTIVE, radius);
            surface.fill_circle(cx + x, cy + y, p.size, input.theme.glow);
        }

        draw_grid(surface, input.theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParticleConfig;

    #[test]
    fn regenerate_rebuilds_in_bulk() {
        let cfg = ParticleConfig::default();
        let mut cloud = ParticleCloud::new(&cfg, 11);
        assert_eq!(cloud.particles.len(), cfg.count);
        assert!(cloud
            .particles
            .iter()
            .all(|p| (0.0..1.0).contains(&p.u) && (0.0..1.0).contains(&p.v)));

        let mut bigger = cfg.clone();
        bigger.count = 4321;
        cloud.sync(&bigger);
        assert_eq!(cloud.particles.len(), 4321);
    }

    #[test]
    fn size_change_mutates_in_place_keeping_uv() {
        let cfg = ParticleConfig::default();
        let mut cloud = ParticleCloud::new(&cfg, 11);
        let uv_before: Vec<(f32, f32)> =
            cloud.particles.iter().map(|p| (p.u, p.v)).collect();

        let mut resized = cfg.clone();
        resized.base_size = 7.5;
        cloud.sync(&resized);
        let uv_after: Vec<(f32, f32)> =
            cloud.particles.iter().map(|p| (p.u, p.v)).collect();
        assert_eq!(uv_before, uv_after);
        assert!(cloud.particles.iter().all(|p| p.size == 7.5));
    }

    #[test]
    fn bad_equation_edit_keeps_previous_geometry() {
        let cfg = ParticleConfig::default();
        let mut cloud = ParticleCloud::new(&cfg, 11);
        let before = cloud.eqs.eval(0.3, 0.7, 0.0, 0.5);

        let mut broken = cfg.clone();
        broken.eq_x = "sin(".to_string();
        cloud.sync(&broken);
        let after = cloud.eqs.eval(0.3, 0.7, 0.0, 0.5);
        assert_eq!(before, after);
    }
}
