//! Left/right phase scope: one channel on X, the other on Y.

use crate::render::grid::draw_grid;
use crate::render::surface::DrawSurface;
use crate::render::{afterglow, RenderInput};

pub fn render(surface: &mut dyn DrawSurface, input: &RenderInput) {
    let w = surface.width() as f32;
    let h = surface.height() as f32;
    let scale = w.min(h) * 0.4;
    let (cx, cy) = (w / 2.0, h / 2.0);

    afterglow(surface, input.cfg.afterglow);
    draw_grid(surface, input.theme);

    // A mono input plots the diagonal.
    let (left, right) = match input.stereo {
        Some((l, r)) => (l, r),
        None => (input.frame, input.frame),
    };
    let n = left.buffer_length.min(right.buffer_length);
    if n == 0 {
        return;
    }

    let mut points = Vec::with_capacity(n);
    for i in 0..n {
        let x = (left.time_domain[i] as f32 / 128.0 - 1.0) * scale + cx;
        let y = (right.time_domain[i] as f32 / 128.0 - 1.0) * scale + cy;
        points.push([x, y]);
    }
    let width = if input.theme.simplified {
        input.cfg.line_width + 1.0
    } else {
        input.cfg.line_width
    };
    surface.stroke_polyline(&points, width, input.theme.glow);
}
