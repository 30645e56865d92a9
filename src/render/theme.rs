//! Named color themes. The core only consumes the resolved `Theme`; the
//! table itself is configuration data.

use crate::render::surface::Rgba;

#[derive(Clone, Debug)]
pub struct Theme {
    pub glow: Rgba,
    pub border: Rgba,
    pub label: Rgba,
    pub background: Option<Rgba>,
    /// Flat "cartoon" outline rendering instead of glow styling.
    pub simplified: bool,
}

impl Default for Theme {
    fn default() -> Self {
        by_name("green")
    }
}

pub const THEME_NAMES: &[&str] = &[
    "green",
    "blue",
    "amber",
    "red",
    "cartoon",
    "scientific",
    "modern",
    "retro",
    "viking",
    "cyberpunk",
    "space",
    "magma",
    "aurora",
    "storm",
    "ocean",
    "lava",
    "pastel",
    "minimal",
];

fn hex(s: &str) -> Rgba {
    Rgba::from_hex(s).unwrap_or(Rgba::WHITE)
}

fn theme(glow: &str, border: &str, label: &str, background: Option<&str>) -> Theme {
    Theme {
        glow: hex(glow),
        border: hex(border),
        label: hex(label),
        background: background.map(hex),
        simplified: false,
    }
}

/// Look a theme up by name; unknown names fall back to `green`.
pub fn by_name(name: &str) -> Theme {
    match name {
        "blue" => theme("#00CFFF", "#00CFFF", "#00CFFF", None),
        "amber" => theme("#FFB347", "#FFB347", "#FFB347", None),
        "red" => theme("#FF4444", "#FF4444", "#FF4444", None),
        "cartoon" => Theme {
            glow: Rgba::BLACK,
            border: Rgba::BLACK,
            label: Rgba::WHITE,
            background: None,
            simplified: true,
        },
        "scientific" => theme("#39FF14", "#1BFF00", "#A9FFB0", None),
        "modern" => theme("#00E0FF", "#00FFFF", "#D0F7FF", Some("#0A0A0A")),
        "retro" => theme("#FF6EC7", "#FF4FD8", "#FFD6F5", Some("#240024")),
        "viking" => theme("#C19A6B", "#8B5A2B", "#FFDFA6", Some("#1A0F07")),
        "cyberpunk" => theme("#FF00FF", "#00FFFF", "#FFEA00", Some("#0A0014")),
        "space" => theme("#7DF9FF", "#2B65EC", "#A3D5FF", Some("#000814")),
        "magma" => theme("#FF4500", "#FF2400", "#FFD580", Some("#1B0000")),
        "aurora" => theme("#76FF7A", "#4DEEEA", "#F2F2F2", Some("#001F33")),
        "storm" => theme("#C0C0C0", "#E0E0E0", "#FFFFFF", Some("#1C1C1C")),
        "ocean" => theme("#00BFFF", "#0077BE", "#E0FFFF", Some("#001F3F")),
        "lava" => theme("#FF2400", "#FF7F00", "#FFD580", Some("#200000")),
        "pastel" => theme("#FFC3A0", "#FFB6C1", "#FFF0F5", Some("#2A2A2A")),
        "minimal" => theme("#FFFFFF", "#FFFFFF", "#FFFFFF", Some("#000000")),
        _ => theme("#00FF99", "#00FF00", "#00FF00", None),
    }
}
