//! Morphing polygon: side count follows the average amplitude, each vertex
//! radius warps with the instantaneous signal.

use crate::core::amplitude::{self, ResponseMode};
use crate::render::grid::draw_grid;
use crate::render::surface::DrawSurface;
use crate::render::{afterglow, RenderInput};

pub fn render(surface: &mut dyn DrawSurface, input: &RenderInput) {
    let w = surface.width() as f32;
    let h = surface.height() as f32;
    let (cx, cy) = (w / 2.0, h / 2.0);
    let base_r = w.min(h) * 0.3;

    afterglow(surface, input.cfg.afterglow);
    draw_grid(surface, input.theme);

    let n = input.frame.buffer_length;
    if n == 0 {
        return;
    }
    let amps = amplitude::measure(input.frame, ResponseMode::Signal);
    let sides = (3.0 + amps.average * 9.0).floor().max(3.0) as usize;
    let angle_offset = input.elapsed * 0.8 * (1.0 + amps.average);

    let mut points = Vec::with_capacity(sides + 1);
    for i in 0..=sides {
        let t = i as f32 / sides as f32;
        let idx = ((t * (n - 1) as f32) as usize).min(n - 1);
        let warp = amps.per_bin[idx] * 0.25;
        let r = base_r * (0.8 + warp);
        let angle = angle_offset + t * std::f32::consts::PI * 2.0;
        points.push([cx + r * angle.cos(), cy + r * angle.sin()]);
    }
    surface.stroke_polyline(&points, input.cfg.line_width, input.theme.glow);
}
