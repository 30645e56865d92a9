//! Harmonic orbital system: one body per harmonic, radius and pace keyed to
//! its frequency bin. Bodies are derived per frame; nothing persists.

use crate::core::amplitude::{self, ResponseMode};
use crate::core::transform::perspective_scale;
use crate::render::grid::draw_grid;
use crate::render::surface::DrawSurface;
use crate::render::{afterglow, RenderInput};

const PATH_STEPS: usize = 64;

pub fn render(surface: &mut dyn DrawSurface, input: &RenderInput) {
    let w = surface.width() as f32;
    let h = surface.height() as f32;
    let (cx, cy) = (w / 2.0, h / 2.0);
    let base_r = w.min(h) * 0.12;

    afterglow(surface, input.cfg.afterglow);
    draw_grid(surface, input.theme);

    let amps = amplitude::measure(input.frame, ResponseMode::Frequency);
    if amps.per_bin.is_empty() {
        return;
    }

    let ocfg = &input.cfg.orbitals;
    // Body count rides the Fourier harmonic setting for visual consistency.
    let n = input.cfg.fourier.harmonics.clamp(4, 48);
    let tilt = ocfg.tilt_deg.to_radians();
    let (tilt_sin, tilt_cos) = tilt.sin_cos();

    for k in 1..=n {
        let idx = (k * (amps.per_bin.len() - 1)) / n;
        let amp = amps.per_bin[idx];
        let orbit_r = base_r * (k as f32 * 0.5) * (0.8 + amp);
        let speed = ocfg.spin * (0.2 + 0.05 * k as f32);
        let angle = input.elapsed * speed * 2.0 * std::f32::consts::PI;

        if ocfg.show_paths {
            let mut path = Vec::with_capacity(PATH_STEPS + 1);
            for i in 0..=PATH_STEPS {
                let a2 = (i as f32 / PATH_STEPS as f32) * std::f32::consts::PI * 2.0;
                let (x, y) = if ocfg.enable_3d {
                    let x3 = orbit_r * a2.cos();
                    let y3 = orbit_r * a2.sin() * tilt_cos;
                    let z3 = orbit_r * a2.sin() * tilt_sin;
                    let scale = perspective_scale(ocfg.depth, -z3);
                    (x3 * scale, y3 * scale)
                } else {
                    (orbit_r * a2.cos(), orbit_r * a2.sin())
                };
                path.push([cx + x, cy + y]);
            }
            surface.stroke_polyline(&path, input.cfg.line_width, input.theme.glow);
        }

        let px3 = orbit_r * angle.cos();
        let py3 = orbit_r * angle.sin() * if ocfg.enable_3d { tilt_cos } else { 1.0 };
        let pz3 = if ocfg.enable_3d {
            orbit_r * angle.sin() * tilt_sin
        } else {
            0.0
        };
        let scale = perspective_scale(ocfg.depth, -pz3);
        let size = (ocfg.planet_size * (0.6 + amp)).max(1.0) * scale;
        surface.fill_circle(cx + px3 * scale, cy + py3 * scale, size, input.theme.glow);
    }
}
