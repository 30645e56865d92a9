//! History-sheet modes: stacked snapshots receding into Z.
//!
//! One parameterized renderer covers the flat/top waveform sheets and the 3D
//! spectrogram; they differ only in data source, tilt and scaling constants.

use crate::core::smoothing::HistoryRing;
use crate::core::transform::{perspective_scale, Rotation3, Vec3};
use crate::render::grid::draw_grid;
use crate::render::surface::{DrawSurface, Rgba};
use crate::render::{afterglow, RenderInput};

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum SheetStyle {
    /// Waveform sheets with a slow Y-axis spin, no perspective shrink.
    Flat,
    /// Waveform sheets tilted toward a top-down view, perspective applied.
    Top,
    /// Frequency sheets at a shallower tilt with a sparser point stride.
    Spectrum,
}

pub fn render(
    surface: &mut dyn DrawSurface,
    input: &RenderInput,
    history: &mut HistoryRing,
    style: SheetStyle,
) {
    let w = surface.width() as f32;
    let h = surface.height() as f32;
    let n = input.frame.buffer_length;

    let snapshot = match style {
        SheetStyle::Spectrum => &input.frame.frequency,
        _ => &input.frame.time_domain,
    };
    history.push(snapshot);

    afterglow(surface, input.cfg.afterglow);
    draw_grid(surface, input.theme);
    if n == 0 {
        return;
    }

    let (cx, cy) = match style {
        SheetStyle::Spectrum => (w / 2.0, h / 1.5),
        _ => (w / 2.0, h / 2.0),
    };
    let (perspective, amplitude, slice_w, depth_spacing, tilt) = match style {
        SheetStyle::Flat => (600.0, h / 4.0, w / n as f32, 10.0, 0.0),
        SheetStyle::Top => (
            600.0,
            h / 4.0,
            w / n as f32,
            10.0,
            -std::f32::consts::FRAC_PI_3,
        ),
        SheetStyle::Spectrum => (
            750.0,
            h / 3.0,
            w / n as f32 / 2.0,
            20.0,
            -std::f32::consts::FRAC_PI_4,
        ),
    };
    let step = match style {
        SheetStyle::Spectrum => (n / 256).max(1),
        _ => 1,
    };
    let line_width = match style {
        SheetStyle::Spectrum => 2.0,
        _ => input.cfg.line_width,
    };
    let spin = Rotation3::around_y(input.elapsed * 0.3);
    let (tilt_sin, tilt_cos) = tilt.sin_cos();

    let mut points: Vec<[f32; 2]> = Vec::with_capacity(n / step + 1);
    for (layer, sheet) in history.iter().enumerate() {
        let z3d = -(layer as f32) * depth_spacing;
        let color = match style {
            SheetStyle::Spectrum => input.theme.glow,
            _ => Rgba::from_hsl((layer as f32 * 6.0) % 360.0, 1.0, 0.6).with_alpha(0.7),
        };

        points.clear();
        let mut i = 0;
        while i < sheet.len().min(n) {
            let s = sheet[i];
            let (x3d, y3d) = match style {
                SheetStyle::Spectrum => {
                    let v = s as f32 / 255.0;
                    (
                        (i as f32 - n as f32 / 2.0) * slice_w,
                        -v * amplitude * input.cfg.smoothing,
                    )
                }
                _ => {
                    let v = s as f32 / 128.0 - 1.0;
                    (
                        (i as f32 - n as f32 / 2.0) * slice_w * 0.6,
                        v * amplitude * input.cfg.smoothing,
                    )
                }
            };

            let (x2, y2) = if style == SheetStyle::Flat {
                // Spin around Y; the sheet keeps its screen-space height.
                let r = spin.apply(Vec3::new(x3d, y3d, z3d));
                (r.x, y3d)
            } else {
                let y_tilt = y3d * tilt_cos - z3d * tilt_sin;
                let z_tilt = y3d * tilt_sin + z3d * tilt_cos;
                let scale = perspective_scale(perspective, -z_tilt);
                (x3d * scale, y_tilt * scale)
            };
            points.push([cx + x2, cy + y2]);
            i += step;
        }
        surface.stroke_polyline(&points, line_width, color);
    }
}
