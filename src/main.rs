// Entry point: launches the egui/eframe shell and the render worker.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use chromascope::app::{self, App};
use chromascope::cli::Args;
use chromascope::config::AppConfig;
use chromascope::render::RenderMode;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut config = AppConfig::load_or_default(&args.config);

    if let Some(id) = args.mode.as_deref() {
        match RenderMode::from_id(id) {
            Some(mode) => config.visual.mode = mode,
            None => eprintln!("Unknown mode id `{id}`; keeping configured mode"),
        }
    }

    if args.nogui {
        app::run_headless(&args, &config);
        return Ok(());
    }

    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_for_ctrlc = stop_flag.clone();
    ctrlc::set_handler(move || {
        stop_flag_for_ctrlc.store(true, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl-C handler");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Chromascope",
        native_options,
        Box::new(move |cc| Ok(Box::new(App::new(cc, args, config, stop_flag.clone())))),
    )
}
