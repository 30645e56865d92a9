//! Frequency bars. The analyser runs at the coarse fft size in this mode.

use crate::render::grid::draw_grid;
use crate::render::surface::DrawSurface;
use crate::render::{afterglow, RenderInput};

pub fn render(surface: &mut dyn DrawSurface, input: &RenderInput) {
    let w = surface.width() as f32;
    let h = surface.height() as f32;
    let n = input.frame.buffer_length;

    afterglow(surface, input.cfg.afterglow);
    draw_grid(surface, input.theme);
    if n == 0 {
        return;
    }

    let slot = w / n as f32;
    let bar_w = (slot * input.cfg.line_width).ceil().max(1.0) as i32;
    for (i, &s) in input.frame.frequency.iter().enumerate() {
        let bar_h = s as f32 * 1.2;
        surface.fill_rect(
            (i as f32 * slot) as i32,
            (h - bar_h) as i32,
            bar_w,
            bar_h.ceil() as i32,
            input.theme.glow,
        );
    }
}
