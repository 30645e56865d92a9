//! Faint reference grid drawn under most modes: 100 px graticule with
//! emphasized center axes, tinted from the theme border color.

use crate::render::surface::DrawSurface;
use crate::render::theme::Theme;

const STEP: usize = 100;

pub fn draw_grid(surface: &mut dyn DrawSurface, theme: &Theme) {
    let w = surface.width() as i32;
    let h = surface.height() as i32;
    let faint = theme.border.with_alpha(0.2);
    let strong = theme.border.with_alpha(0.4);

    let mut x = 0;
    while x <= w {
        surface.fill_rect(x, 0, 1, h, faint);
        x += STEP as i32;
    }
    let mut y = 0;
    while y <= h {
        surface.fill_rect(0, y, w, 1, faint);
        y += STEP as i32;
    }

    surface.fill_rect(w / 2, 0, 1, h, strong);
    surface.fill_rect(0, h / 2, w, 1, strong);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::surface::{Framebuffer, Rgba};

    #[test]
    fn grid_marks_center_axes() {
        let mut fb = Framebuffer::new(200, 200);
        let theme = Theme::default();
        draw_grid(&mut fb, &theme);
        let center = fb.pixel(100, 50);
        assert_ne!(center, Rgba::BLACK);
        // In-between space stays untouched.
        assert_eq!(fb.pixel(50, 50), Rgba::BLACK);
    }
}
