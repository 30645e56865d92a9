//! App shell and the render worker thread.
//!
//! The worker owns the frame loop: drain control messages, pull audio, run
//! one render tick, hand the finished framebuffer to the UI. The UI drains
//! to the newest frame each repaint and never blocks the worker.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::{info, trace, warn};

use crate::audio::analyser::{StereoAnalyser, DEFAULT_FFT_SIZE};
use crate::audio::capture::CaptureInput;
use crate::audio::player::WavSource;
use crate::audio::source::AudioFrameSource;
use crate::cli::Args;
use crate::config::{AppConfig, Configuration};
use crate::core::amplitude::{self, ResponseMode};
use crate::render::scheduler::VisualEngine;
use crate::render::surface::{DrawSurface, Framebuffer};
use crate::render::theme::{self, Theme};
use crate::render::RenderInput;
use crate::ui::viewdata::{FrameStats, UiFrame};
use crate::ui::windows::{self, ControlsState};

/// UI → worker messages. Snapshots are swapped in whole between ticks.
pub enum ControlMsg {
    Config(Box<Configuration>),
    Theme(String),
    RegenerateParticles,
}

enum InputStage {
    Silent,
    Capture(CaptureInput),
    Wav(WavSource),
}

fn select_input(args: &Args, config: &AppConfig) -> InputStage {
    if let Some(path) = &args.wav {
        match WavSource::load(path) {
            Ok(wav) => {
                info!("visualizing {path} ({} Hz)", wav.sample_rate);
                return InputStage::Wav(wav);
            }
            Err(err) => warn!("failed to load wav {path}: {err}; trying capture"),
        }
    }
    if args.mic {
        match CaptureInput::open(config.audio.latency_ms) {
            Ok(cap) => {
                info!(
                    "capturing {} ch at {} Hz",
                    cap.channels, cap.sample_rate
                );
                return InputStage::Capture(cap);
            }
            Err(err) => warn!("audio capture unavailable: {err}; rendering silence"),
        }
    }
    InputStage::Silent
}

pub struct App {
    ui_frame_rx: Receiver<UiFrame>,
    ctrl_tx: Sender<ControlMsg>,
    last_frame: UiFrame,
    texture: Option<egui::TextureHandle>,
    controls: ControlsState,
    worker_handle: Option<thread::JoinHandle<()>>,
    exiting: Arc<AtomicBool>,
}

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        args: Args,
        config: AppConfig,
        stop_flag: Arc<AtomicBool>,
    ) -> Self {
        let (ui_frame_tx, ui_frame_rx) = bounded::<UiFrame>(8);
        let (ctrl_tx, ctrl_rx) = bounded::<ControlMsg>(64);

        let input = select_input(&args, &config);
        let controls = ControlsState::new(config.visual.clone().clamped(), config.theme.clone());

        let stop_worker = stop_flag.clone();
        let worker_handle = Some(
            thread::Builder::new()
                .name("render-worker".into())
                .spawn(move || worker_loop(config, input, ui_frame_tx, ctrl_rx, stop_worker))
                .expect("spawn render worker"),
        );

        cc.egui_ctx.set_pixels_per_point(1.25);

        Self {
            ui_frame_rx,
            ctrl_tx,
            last_frame: UiFrame::empty(),
            texture: None,
            controls,
            worker_handle,
            exiting: stop_flag,
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.exiting.load(Ordering::SeqCst) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        // Pull newest frame (drain to latest).
        while let Ok(f) = self.ui_frame_rx.try_recv() {
            self.last_frame = f;
        }

        let msgs = windows::main_window(ctx, &self.last_frame, &mut self.texture, &mut self.controls);
        for msg in msgs {
            let _ = self.ctrl_tx.try_send(msg);
        }

        ctx.request_repaint_after(Duration::from_millis(16));
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.exiting.store(true, Ordering::SeqCst);
        if let Some(handle) = self.worker_handle.take() {
            let _ = handle.join();
        }
    }
}

fn worker_loop(
    config: AppConfig,
    mut input: InputStage,
    ui_tx: Sender<UiFrame>,
    ctrl_rx: Receiver<ControlMsg>,
    exiting: Arc<AtomicBool>,
) {
    let mut visual = config.visual.clone().clamped();
    let mut theme: Theme = theme::by_name(&config.theme);
    let fps = if config.render.fps.is_finite() {
        config.render.fps.clamp(1.0, 240.0)
    } else {
        60.0
    };
    let tick_duration = Duration::from_secs_f32(1.0 / fps);

    let sample_rate = match &input {
        InputStage::Capture(cap) => cap.sample_rate,
        InputStage::Wav(wav) => wav.sample_rate,
        InputStage::Silent => config.audio.sample_rate,
    };
    let stereo_input = match &input {
        InputStage::Capture(cap) => cap.channels >= 2,
        InputStage::Wav(wav) => wav.channels >= 2,
        InputStage::Silent => false,
    };

    let mut analysers = StereoAnalyser::new(DEFAULT_FFT_SIZE, sample_rate);
    let mut engine = VisualEngine::new(&visual, 0xC0FF_EE00);
    let mut surface = Framebuffer::new(config.render.width.max(16), config.render.height.max(16));
    let mut scratch: Vec<f32> = Vec::new();

    let start = Instant::now();
    let mut next_deadline = Instant::now();
    let mut tick: u64 = 0;

    loop {
        if exiting.load(Ordering::SeqCst) {
            info!("render worker stopping");
            break;
        }
        next_deadline += tick_duration;

        while let Ok(msg) = ctrl_rx.try_recv() {
            match msg {
                ControlMsg::Config(cfg) => visual = cfg.clamped(),
                ControlMsg::Theme(name) => theme = theme::by_name(&name),
                ControlMsg::RegenerateParticles => engine.regenerate_particles(&visual),
            }
        }

        let elapsed = start.elapsed().as_secs_f32();
        match &mut input {
            InputStage::Silent => {}
            InputStage::Capture(cap) => {
                let channels = cap.channels;
                cap.drain(&mut scratch);
                analysers.push_interleaved(&scratch, channels);
            }
            InputStage::Wav(wav) => {
                let channels = wav.channels;
                wav.take_until(elapsed, &mut scratch);
                analysers.push_interleaved(&scratch, channels);
            }
        }

        analysers.mono.set_fft_size(visual.mode.fft_size());
        let frame = analysers.mono.next_frame();
        let stereo_frames =
            stereo_input.then(|| (analysers.left.next_frame(), analysers.right.next_frame()));

        let render_input = RenderInput {
            frame: &frame,
            stereo: stereo_frames.as_ref().map(|(l, r)| (l, r)),
            cfg: &visual,
            theme: &theme,
            elapsed,
        };

        let t0 = Instant::now();
        match engine.render_tick(&mut surface, &render_input) {
            Ok(()) => {
                let amps = amplitude::measure(&frame, ResponseMode::Signal);
                let ui_frame = UiFrame {
                    width: surface.width(),
                    height: surface.height(),
                    rgba: surface.data().to_vec(),
                    wave: frame
                        .time_domain
                        .iter()
                        .map(|&b| b as f32 / 128.0 - 1.0)
                        .collect(),
                    spectrum: frame.frequency.iter().map(|&b| b as f32 / 255.0).collect(),
                    stats: FrameStats {
                        tick,
                        elapsed,
                        render_ms: t0.elapsed().as_secs_f32() * 1000.0,
                        average_level: amps.average,
                        peak_level: amps.peak,
                        mode: visual.mode,
                    },
                };
                let _ = ui_tx.try_send(ui_frame);
            }
            // Failed ticks are skipped; the next one starts clean.
            Err(err) => warn!("{err}; tick skipped"),
        }

        tick += 1;
        let now = Instant::now();
        if now < next_deadline {
            thread::sleep(next_deadline - now);
        } else {
            next_deadline = now;
            trace!("render worker overrun");
        }
    }
}

/// Headless smoke render: fixed tick count, simulated clock, no pacing.
pub fn run_headless(args: &Args, config: &AppConfig) {
    let visual = config.visual.clone().clamped();
    let theme = theme::by_name(&config.theme);

    let mut input = if args.wav.is_some() {
        select_input(args, config)
    } else {
        InputStage::Silent
    };
    let sample_rate = match &input {
        InputStage::Wav(wav) => wav.sample_rate,
        _ => config.audio.sample_rate,
    };

    let fps = 60.0;
    let mut analysers = StereoAnalyser::new(DEFAULT_FFT_SIZE, sample_rate);
    let mut engine = VisualEngine::new(&visual, 0xC0FF_EE00);
    let mut surface = Framebuffer::new(config.render.width.max(16), config.render.height.max(16));
    let mut scratch: Vec<f32> = Vec::new();

    let started = Instant::now();
    let mut rendered = 0u32;
    for tick in 0..args.frames {
        let elapsed = tick as f32 / fps;
        if let InputStage::Wav(wav) = &mut input {
            let channels = wav.channels;
            wav.take_until(elapsed, &mut scratch);
            analysers.push_interleaved(&scratch, channels);
        }
        analysers.mono.set_fft_size(visual.mode.fft_size());
        let frame = analysers.mono.next_frame();
        let render_input = RenderInput {
            frame: &frame,
            stereo: None,
            cfg: &visual,
            theme: &theme,
            elapsed,
        };
        match engine.render_tick(&mut surface, &render_input) {
            Ok(()) => rendered += 1,
            Err(err) => warn!("{err}; tick skipped"),
        }
    }
    info!(
        "headless render: {}/{} frames of {} in {:.1} ms",
        rendered,
        args.frames,
        visual.mode.id(),
        started.elapsed().as_secs_f32() * 1000.0
    );
}
