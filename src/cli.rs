use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Path to config TOML
    #[arg(long, default_value = "chromascope.toml")]
    pub config: String,

    /// Visualize a wav file instead of the capture device
    #[arg(long)]
    pub wav: Option<String>,

    /// Capture from the default input device
    #[arg(long, default_value_t = true, num_args = 0..=1, default_missing_value = "true")]
    pub mic: bool,

    /// Render mode id override (e.g. waveform, particles, life)
    #[arg(long)]
    pub mode: Option<String>,

    /// Run without GUI (headless smoke render)
    #[arg(long, default_value_t = false)]
    pub nogui: bool,

    /// Number of frames to render in headless mode
    #[arg(long, default_value_t = 300)]
    pub frames: u32,
}
