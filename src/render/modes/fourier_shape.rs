//! Radial shape reconstructed from the truncated harmonic series.

use crate::core::fourier;
use crate::render::grid::draw_grid;
use crate::render::surface::DrawSurface;
use crate::render::{afterglow, RenderInput};

const SEGMENTS: usize = 360;

pub fn render(surface: &mut dyn DrawSurface, input: &RenderInput) {
    let w = surface.width() as f32;
    let h = surface.height() as f32;
    let (cx, cy) = (w / 2.0, h / 2.0);
    let base_radius = w.min(h) * 0.25;

    afterglow(surface, input.cfg.afterglow);
    draw_grid(surface, input.theme);

    let fcfg = &input.cfg.fourier;
    let coeffs = fourier::estimate(&input.frame.time_domain, fcfg.harmonics);
    let radius =
        base_radius + fourier::radial_offset(&coeffs, base_radius, fcfg.contribution);

    let mut points = Vec::with_capacity(SEGMENTS + 1);
    for i in 0..=SEGMENTS {
        let angle = 2.0 * std::f32::consts::PI * i as f32 / SEGMENTS as f32;
        points.push([cx + radius * angle.cos(), cy + radius * angle.sin()]);
    }
    surface.stroke_polyline(&points, input.cfg.line_width, input.theme.glow);
}
