//! Scrolling 2D spectrogram. The surface itself is the rolling history:
//! everything shifts left one pixel and the newest column lands on the
//! right edge, so this mode skips the afterglow/grid/grain dressing.

use crate::render::surface::{Blend, DrawSurface, Rect, Rgba};
use crate::render::RenderInput;

/// Heatmap ramp: blue through cyan and yellow to red, brighter when louder.
fn amplitude_color(a: f32) -> Rgba {
    let hue = (240.0 - a * 240.0).rem_euclid(360.0);
    Rgba::from_hsl(hue, 1.0, 0.4 + a * 0.4)
}

pub fn render(surface: &mut dyn DrawSurface, input: &RenderInput) {
    let w = surface.width() as i32;
    let h = surface.height() as i32;
    let n = input.frame.buffer_length;
    if n == 0 || w < 2 {
        return;
    }

    surface.blit_self(
        Rect {
            x: 1,
            y: 0,
            w: w - 1,
            h,
        },
        0,
        0,
        Blend::Source,
        1.0,
    );

    let bar_h = h as f32 / n as f32;
    for (i, &s) in input.frame.frequency.iter().enumerate() {
        let value = s as f32 / 255.0;
        let y = h as f32 - (i as f32 + 1.0) * bar_h;
        surface.fill_rect(
            w - 1,
            y as i32,
            1,
            bar_h.ceil().max(1.0) as i32,
            amplitude_color(value),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_maps_blue_loud_maps_red() {
        let cold = amplitude_color(0.0);
        let hot = amplitude_color(1.0);
        assert!(cold.b() > cold.r());
        assert!(hot.r() > hot.b());
    }
}
