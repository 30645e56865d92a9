//! Smoothed time-domain trace with the reference grid.

use crate::core::smoothing::SmoothedTrace;
use crate::render::grid::draw_grid;
use crate::render::surface::{DrawSurface, Rgba};
use crate::render::{afterglow, RenderInput};

pub fn render(surface: &mut dyn DrawSurface, input: &RenderInput, trace: &mut SmoothedTrace) {
    let w = surface.width() as f32;
    let h = surface.height() as f32;
    let n = input.frame.buffer_length;

    afterglow(surface, input.cfg.afterglow);
    draw_grid(surface, input.theme);
    if n == 0 {
        return;
    }

    trace.ensure_len(n, h / 2.0);
    let slice_w = w / n as f32;
    let mut points = Vec::with_capacity(n);
    let mut x = 0.0f32;
    for (i, &s) in input.frame.time_domain.iter().enumerate() {
        let target = (s as f32 / 128.0) * (h / 2.0);
        let y = trace.follow(i, target, input.cfg.smoothing);
        points.push([x, y]);
        x += slice_w;
    }

    if input.theme.simplified {
        // Flat poster look: sky above the trace, ground below, black outline.
        let sky = Rgba::from_hex("#C8F4FF").unwrap_or(Rgba::WHITE);
        let ground = Rgba::from_hex("#FFD5D5").unwrap_or(Rgba::WHITE);

        let mut above: Vec<[f32; 2]> = Vec::with_capacity(n + 2);
        above.push([0.0, 0.0]);
        above.extend_from_slice(&points);
        above.push([w, 0.0]);
        surface.fill_polygon(&above, sky);

        let mut below: Vec<[f32; 2]> = Vec::with_capacity(n + 2);
        below.push([0.0, h]);
        below.extend_from_slice(&points);
        below.push([w, h]);
        surface.fill_polygon(&below, ground);
    }

    let (width, color) = if input.theme.simplified {
        (input.cfg.line_width + 1.0, Rgba::BLACK)
    } else {
        (input.cfg.line_width, input.theme.glow)
    };
    surface.stroke_polyline(&points, width, color);
}
