use crate::render::RenderMode;

#[derive(Clone, Debug)]
pub struct FrameStats {
    pub tick: u64,
    pub elapsed: f32,
    pub render_ms: f32,
    pub average_level: f32,
    pub peak_level: f32,
    pub mode: RenderMode,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self {
            tick: 0,
            elapsed: 0.0,
            render_ms: 0.0,
            average_level: 0.0,
            peak_level: 0.0,
            mode: RenderMode::Waveform,
        }
    }
}

/// One finished frame handed from the render worker to the egui shell.
#[derive(Clone, Debug, Default)]
pub struct UiFrame {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
    /// Normalized time-domain copy for the signal inspector, in [-1, 1].
    pub wave: Vec<f32>,
    /// Normalized spectrum copy for the signal inspector, in [0, 1].
    pub spectrum: Vec<f32>,
    pub stats: FrameStats,
}

impl UiFrame {
    pub fn empty() -> Self {
        Self::default()
    }
}
