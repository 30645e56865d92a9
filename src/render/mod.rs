pub mod filters;
pub mod grid;
pub mod modes;
pub mod scheduler;
pub mod surface;
pub mod theme;

use serde::{Deserialize, Serialize};

use crate::audio::source::AudioFrame;
use crate::config::Configuration;
use crate::render::surface::{DrawSurface, Rgba};
use crate::render::theme::Theme;

/// Identifier of one render routine in the registry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RenderMode {
    Waveform,
    Spectrum,
    Spectrogram2d,
    Spectrogram3d,
    SheetFlat,
    SheetTop,
    Stereo,
    Particles,
    Mesh,
    FourierShape,
    Polygon,
    Orbitals,
    Life,
}

impl Default for RenderMode {
    fn default() -> Self {
        Self::Waveform
    }
}

impl RenderMode {
    pub const ALL: &'static [RenderMode] = &[
        RenderMode::Waveform,
        RenderMode::Spectrum,
        RenderMode::Spectrogram2d,
        RenderMode::Spectrogram3d,
        RenderMode::SheetFlat,
        RenderMode::SheetTop,
        RenderMode::Stereo,
        RenderMode::Particles,
        RenderMode::Mesh,
        RenderMode::FourierShape,
        RenderMode::Polygon,
        RenderMode::Orbitals,
        RenderMode::Life,
    ];

    pub fn id(self) -> &'static str {
        match self {
            RenderMode::Waveform => "waveform",
            RenderMode::Spectrum => "spectrum",
            RenderMode::Spectrogram2d => "spectrogram2d",
            RenderMode::Spectrogram3d => "spectrogram3d",
            RenderMode::SheetFlat => "sheet-flat",
            RenderMode::SheetTop => "sheet-top",
            RenderMode::Stereo => "stereo",
            RenderMode::Particles => "particles",
            RenderMode::Mesh => "mesh",
            RenderMode::FourierShape => "fourier-shape",
            RenderMode::Polygon => "polygon",
            RenderMode::Orbitals => "orbitals",
            RenderMode::Life => "life",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RenderMode::Waveform => "Waveform",
            RenderMode::Spectrum => "Spectrum",
            RenderMode::Spectrogram2d => "2D Spectrogram",
            RenderMode::Spectrogram3d => "3D Spectrogram",
            RenderMode::SheetFlat => "3D Waveform (flat)",
            RenderMode::SheetTop => "3D Waveform (top)",
            RenderMode::Stereo => "Stereo Phase",
            RenderMode::Particles => "Particle Cloud",
            RenderMode::Mesh => "3D Mesh",
            RenderMode::FourierShape => "Fourier Series Shape",
            RenderMode::Polygon => "Polygon Morph",
            RenderMode::Orbitals => "Harmonic Orbitals",
            RenderMode::Life => "Game of Life",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.id() == id)
    }

    /// The spectrum mode runs the analyser at a coarser resolution.
    pub fn fft_size(self) -> usize {
        match self {
            RenderMode::Spectrum => 1024,
            _ => 2048,
        }
    }
}

/// Everything a render routine receives for one tick.
pub struct RenderInput<'a> {
    pub frame: &'a AudioFrame,
    /// Left/right analysis pair; present when the input is stereo.
    pub stereo: Option<(&'a AudioFrame, &'a AudioFrame)>,
    pub cfg: &'a Configuration,
    pub theme: &'a Theme,
    pub elapsed: f32,
}

/// Partial-opacity redraw of the background. Opacity at or below 1 fades the
/// previous frame toward black; above 1 the frame is lifted slightly instead.
pub fn afterglow(surface: &mut dyn DrawSurface, opacity: f32) {
    let opacity = opacity.clamp(0.0, 1.5);
    if opacity <= 1.0 {
        let w = surface.width() as i32;
        let h = surface.height() as i32;
        surface.fill_rect(0, 0, w, h, Rgba::BLACK.with_alpha(1.0 - opacity));
    } else {
        let lift = ((opacity - 1.0) * 16.0) as u8;
        for px in surface.data_mut().chunks_exact_mut(4) {
            for c in &mut px[..3] {
                *c = c.saturating_add(lift);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::surface::Framebuffer;

    #[test]
    fn mode_ids_round_trip() {
        for &m in RenderMode::ALL {
            assert_eq!(RenderMode::from_id(m.id()), Some(m));
        }
        assert_eq!(RenderMode::from_id("bogus"), None);
    }

    #[test]
    fn afterglow_below_one_fades_toward_black() {
        let mut fb = Framebuffer::new(2, 2);
        fb.clear(Rgba::rgb(200, 200, 200));
        afterglow(&mut fb, 0.5);
        let p = fb.pixel(0, 0);
        assert!(p.r() < 200 && p.r() > 50);
    }

    #[test]
    fn afterglow_at_one_preserves_the_frame() {
        let mut fb = Framebuffer::new(2, 2);
        fb.clear(Rgba::rgb(123, 45, 67));
        afterglow(&mut fb, 1.0);
        assert_eq!(fb.pixel(1, 1), Rgba::rgb(123, 45, 67));
    }

    #[test]
    fn afterglow_above_one_brightens_slightly() {
        let mut fb = Framebuffer::new(2, 2);
        fb.clear(Rgba::rgb(100, 100, 100));
        afterglow(&mut fb, 1.5);
        let p = fb.pixel(0, 0);
        assert!(p.r() > 100 && p.r() <= 110);
    }
}
