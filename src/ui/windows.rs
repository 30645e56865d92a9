//! egui shell: framebuffer texture, controls panel, signal inspector.
//!
//! Widgets edit a local `Configuration` copy; whenever anything changes the
//! whole snapshot is sent to the render worker, which swaps it in between
//! ticks. No render code ever reads UI state directly.

use egui::{
    CentralPanel, ColorImage, ComboBox, ScrollArea, Slider, TextureHandle, TopBottomPanel, Vec2,
};
use egui_plot::{Line, Plot, PlotPoints};

use crate::app::ControlMsg;
use crate::config::Configuration;
use crate::core::expr;
use crate::core::transform::RotationAxes;
use crate::render::filters::{FilterEffect, FilterResponse};
use crate::render::theme::THEME_NAMES;
use crate::render::RenderMode;
use crate::ui::viewdata::UiFrame;

pub struct ControlsState {
    pub visual: Configuration,
    pub theme_name: String,
    pub show_inspector: bool,
    preset_name: String,
}

impl ControlsState {
    pub fn new(visual: Configuration, theme_name: String) -> Self {
        Self {
            visual,
            theme_name,
            show_inspector: false,
            preset_name: "sphere".to_string(),
        }
    }
}

fn rotation_controls(ui: &mut egui::Ui, rot: &mut RotationAxes) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        changed |= ui.checkbox(&mut rot.enable_x, "X").changed();
        changed |= ui
            .add(Slider::new(&mut rot.speed_x, 0.0..=2.0).text("speed"))
            .changed();
    });
    ui.horizontal(|ui| {
        changed |= ui.checkbox(&mut rot.enable_y, "Y").changed();
        changed |= ui
            .add(Slider::new(&mut rot.speed_y, 0.0..=2.0).text("speed"))
            .changed();
    });
    ui.horizontal(|ui| {
        changed |= ui.checkbox(&mut rot.enable_z, "Z").changed();
        changed |= ui
            .add(Slider::new(&mut rot.speed_z, 0.0..=2.0).text("speed"))
            .changed();
    });
    changed
}

fn equation_controls(
    ui: &mut egui::Ui,
    eq_x: &mut String,
    eq_y: &mut String,
    eq_z: &mut String,
    preset_name: &mut String,
) -> bool {
    let mut changed = false;
    ComboBox::from_label("Preset")
        .selected_text(preset_name.clone())
        .show_ui(ui, |ui| {
            for p in expr::PRESETS {
                if ui
                    .selectable_value(preset_name, p.name.to_string(), p.name)
                    .changed()
                {
                    *eq_x = p.x.to_string();
                    *eq_y = p.y.to_string();
                    *eq_z = p.z.to_string();
                    changed = true;
                }
            }
        });
    // Intermediate edits are safe to ship: a source that fails to compile
    // keeps the previous good function.
    ui.label("x(u,v,t,a)");
    changed |= ui.text_edit_singleline(eq_x).changed();
    ui.label("y(u,v,t,a)");
    changed |= ui.text_edit_singleline(eq_y).changed();
    ui.label("z(u,v,t,a)");
    changed |= ui.text_edit_singleline(eq_z).changed();
    changed
}

fn wave_plot(ui: &mut egui::Ui, samples: &[f32]) {
    let points: PlotPoints = samples
        .iter()
        .enumerate()
        .map(|(i, s)| [i as f64, *s as f64])
        .collect();
    Plot::new("inspector_wave")
        .height(140.0)
        .allow_scroll(false)
        .allow_drag(false)
        .include_y(-1.0)
        .include_y(1.0)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new("wave", points));
        });
}

fn spectrum_plot(ui: &mut egui::Ui, bins: &[f32]) {
    let points: PlotPoints = bins
        .iter()
        .enumerate()
        .map(|(i, s)| [i as f64, *s as f64])
        .collect();
    Plot::new("inspector_spectrum")
        .height(140.0)
        .allow_scroll(false)
        .allow_drag(false)
        .include_y(0.0)
        .include_y(1.0)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new("spectrum", points));
        });
}

pub fn main_window(
    ctx: &egui::Context,
    frame: &UiFrame,
    texture: &mut Option<TextureHandle>,
    state: &mut ControlsState,
) -> Vec<ControlMsg> {
    let mut msgs = Vec::new();
    let mut visual_changed = false;

    TopBottomPanel::top("top").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading("Chromascope");
            ui.separator();

            ComboBox::from_label("Mode")
                .selected_text(state.visual.mode.label())
                .show_ui(ui, |ui| {
                    for &m in RenderMode::ALL {
                        visual_changed |= ui
                            .selectable_value(&mut state.visual.mode, m, m.label())
                            .changed();
                    }
                });

            ComboBox::from_label("Theme")
                .selected_text(state.theme_name.clone())
                .show_ui(ui, |ui| {
                    for &name in THEME_NAMES {
                        if ui
                            .selectable_value(&mut state.theme_name, name.to_string(), name)
                            .changed()
                        {
                            msgs.push(ControlMsg::Theme(state.theme_name.clone()));
                        }
                    }
                });

            ui.checkbox(&mut state.show_inspector, "Inspector");
            ui.separator();
            ui.label(format!(
                "tick {}  {:.1} ms  avg {:.2}  peak {:.2}",
                frame.stats.tick,
                frame.stats.render_ms,
                frame.stats.average_level,
                frame.stats.peak_level,
            ));
        });
    });

    egui::SidePanel::right("controls")
        .default_width(320.0)
        .show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Display");
                visual_changed |= ui
                    .add(Slider::new(&mut state.visual.afterglow, 0.0..=1.5).text("Afterglow"))
                    .changed();
                visual_changed |= ui
                    .add(Slider::new(&mut state.visual.line_width, 1.0..=10.0).text("Line width"))
                    .changed();
                visual_changed |= ui
                    .add(Slider::new(&mut state.visual.smoothing, 0.0..=0.95).text("Smoothing"))
                    .changed();
                ui.separator();

                match state.visual.mode {
                    RenderMode::Particles => {
                        ui.heading("Particles");
                        let p = &mut state.visual.particles;
                        visual_changed |= ui
                            .add(Slider::new(&mut p.count, 100..=20_000).text("Count"))
                            .changed();
                        visual_changed |= ui
                            .add(Slider::new(&mut p.base_size, 0.5..=10.0).text("Size"))
                            .changed();
                        visual_changed |=
                            equation_controls(ui, &mut p.eq_x, &mut p.eq_y, &mut p.eq_z, &mut state.preset_name);
                        ui.label("Rotation");
                        visual_changed |= rotation_controls(ui, &mut p.rotation);
                        ui.horizontal(|ui| {
                            visual_changed |=
                                ui.checkbox(&mut p.audio_rotation.enabled, "Audio spin").changed();
                            visual_changed |= ui
                                .add(Slider::new(&mut p.audio_rotation.intensity, 0.0..=2.0))
                                .changed();
                        });
                        ui.horizontal(|ui| {
                            visual_changed |=
                                ui.checkbox(&mut p.audio_morph.enabled, "Audio morph").changed();
                            visual_changed |= ui
                                .add(Slider::new(&mut p.audio_morph.intensity, 0.0..=2.0))
                                .changed();
                        });
                        if ui.button("Regenerate").clicked() {
                            msgs.push(ControlMsg::RegenerateParticles);
                        }
                    }
                    RenderMode::Mesh => {
                        ui.heading("Mesh");
                        let m = &mut state.visual.mesh;
                        visual_changed |= ui
                            .add(Slider::new(&mut m.resolution, 2..=96).text("Resolution"))
                            .changed();
                        visual_changed |= ui.checkbox(&mut m.wireframe, "Wireframe").changed();
                        visual_changed |= ui.checkbox(&mut m.filled, "Filled").changed();
                        visual_changed |=
                            equation_controls(ui, &mut m.eq_x, &mut m.eq_y, &mut m.eq_z, &mut state.preset_name);
                        ui.label("Rotation");
                        visual_changed |= rotation_controls(ui, &mut m.rotation);
                    }
                    RenderMode::FourierShape | RenderMode::Orbitals => {
                        ui.heading("Harmonics");
                        let f = &mut state.visual.fourier;
                        visual_changed |= ui
                            .add(Slider::new(&mut f.harmonics, 1..=128).text("Harmonics"))
                            .changed();
                        visual_changed |= ui
                            .add(Slider::new(&mut f.contribution, 0.0..=1.0).text("Contribution"))
                            .changed();
                        if state.visual.mode == RenderMode::Orbitals {
                            ui.heading("Orbitals");
                            let o = &mut state.visual.orbitals;
                            visual_changed |= ui.checkbox(&mut o.show_paths, "Show paths").changed();
                            visual_changed |= ui.checkbox(&mut o.enable_3d, "3D").changed();
                            visual_changed |= ui
                                .add(Slider::new(&mut o.planet_size, 0.5..=20.0).text("Planet size"))
                                .changed();
                            visual_changed |= ui
                                .add(Slider::new(&mut o.tilt_deg, -90.0..=90.0).text("Tilt °"))
                                .changed();
                            visual_changed |= ui
                                .add(Slider::new(&mut o.depth, 100.0..=5000.0).text("Depth"))
                                .changed();
                            visual_changed |= ui
                                .add(Slider::new(&mut o.spin, 0.0..=4.0).text("Spin"))
                                .changed();
                        }
                    }
                    RenderMode::Life => {
                        ui.heading("Game of Life");
                        let l = &mut state.visual.life;
                        visual_changed |= ui
                            .add(Slider::new(&mut l.cell_size, 1..=24).text("Cell size"))
                            .changed();
                        visual_changed |= ui
                            .add(Slider::new(&mut l.reseed, 0.0..=1.0).text("Reseed"))
                            .changed();
                        visual_changed |= ui
                            .add(Slider::new(&mut l.birth_boost, 0.0..=1.0).text("Birth boost"))
                            .changed();
                        visual_changed |= ui
                            .add(Slider::new(&mut l.survival_boost, 0.0..=1.0).text("Survival boost"))
                            .changed();
                    }
                    _ => {}
                }

                ui.separator();
                ui.heading("Filter");
                let f = &mut state.visual.filter;
                ComboBox::from_label("Effect")
                    .selected_text(format!("{:?}", f.effect))
                    .show_ui(ui, |ui| {
                        for effect in [
                            FilterEffect::None,
                            FilterEffect::Grain,
                            FilterEffect::Scanlines,
                            FilterEffect::Chromatic,
                            FilterEffect::Glitch,
                            FilterEffect::Vhs,
                        ] {
                            visual_changed |= ui
                                .selectable_value(&mut f.effect, effect, format!("{effect:?}"))
                                .changed();
                        }
                    });
                visual_changed |= ui
                    .add(Slider::new(&mut f.intensity, 0.0..=1.0).text("Intensity"))
                    .changed();
                ComboBox::from_label("Response")
                    .selected_text(format!("{:?}", f.response))
                    .show_ui(ui, |ui| {
                        for r in [FilterResponse::Frequency, FilterResponse::Beat] {
                            visual_changed |= ui
                                .selectable_value(&mut f.response, r, format!("{r:?}"))
                                .changed();
                        }
                    });
                visual_changed |= ui
                    .add(Slider::new(&mut f.response_strength, 0.0..=4.0).text("Strength"))
                    .changed();
            });
        });

    CentralPanel::default().show(ctx, |ui| {
        if frame.width > 0 && frame.height > 0 && frame.rgba.len() == frame.width * frame.height * 4
        {
            let img = ColorImage::from_rgba_unmultiplied([frame.width, frame.height], &frame.rgba);
            let tex = texture.get_or_insert_with(|| {
                ui.ctx()
                    .load_texture("framebuffer", img.clone(), egui::TextureOptions::NEAREST)
            });
            tex.set(img, egui::TextureOptions::NEAREST);

            // Fit the frame into the available panel, preserving aspect.
            let avail = ui.available_size();
            let aspect = frame.width as f32 / frame.height as f32;
            let mut size = Vec2::new(avail.x, avail.x / aspect);
            if size.y > avail.y {
                size = Vec2::new(avail.y * aspect, avail.y);
            }
            ui.centered_and_justified(|ui| {
                ui.image((tex.id(), size));
            });
        } else {
            ui.label("Waiting for the first frame…");
        }
    });

    if state.show_inspector {
        egui::Window::new("Signal inspector")
            .default_width(420.0)
            .show(ctx, |ui| {
                ui.label("Time domain");
                wave_plot(ui, &frame.wave);
                ui.label("Spectrum");
                spectrum_plot(ui, &frame.spectrum);
            });
    }

    if visual_changed {
        msgs.push(ControlMsg::Config(Box::new(state.visual.clone())));
    }
    msgs
}
