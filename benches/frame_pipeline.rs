//! Benchmarks for the per-frame hot path.
//!
//! Run:
//! - cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chromascope::audio::source::AudioFrame;
use chromascope::config::Configuration;
use chromascope::render::scheduler::VisualEngine;
use chromascope::render::surface::Framebuffer;
use chromascope::render::theme;
use chromascope::render::{RenderInput, RenderMode};

const SIZES: [(usize, usize); 2] = [(480, 270), (960, 540)];

fn busy_frame(n: usize) -> AudioFrame {
    AudioFrame {
        time_domain: (0..n)
            .map(|i| (128.0 + ((i as f32) * 0.11).sin() * 100.0) as u8)
            .collect(),
        frequency: (0..n).map(|i| (255 - (i % 256)) as u8).collect(),
        buffer_length: n,
        sample_rate: 48_000,
    }
}

fn bench_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_tick");
    group.sample_size(30);

    for &(w, h) in &SIZES {
        for mode in [
            RenderMode::Waveform,
            RenderMode::Particles,
            RenderMode::Mesh,
            RenderMode::Life,
        ] {
            let mut cfg = Configuration::default();
            cfg.mode = mode;
            cfg.particles.count = 2000;
            cfg.mesh.resolution = 30;
            let cfg = cfg.clamped();
            let theme = theme::by_name("green");
            let frame = busy_frame(mode.fft_size() / 2);
            let mut engine = VisualEngine::new(&cfg, 1);
            let mut fb = Framebuffer::new(w, h);

            group.bench_with_input(
                BenchmarkId::new(mode.id(), format!("{w}x{h}")),
                &cfg,
                |b, cfg| {
                    let mut elapsed = 0.0f32;
                    b.iter(|| {
                        elapsed += 0.016;
                        let input = RenderInput {
                            frame: &frame,
                            stereo: None,
                            cfg,
                            theme: &theme,
                            elapsed,
                        };
                        engine.render_tick(&mut fb, black_box(&input)).unwrap();
                    });
                },
            );
        }
    }
    group.finish();
}

fn bench_filters(c: &mut Criterion) {
    use chromascope::render::filters::{self, FilterEffect};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    let mut group = c.benchmark_group("filters");
    group.sample_size(30);

    for effect in [
        FilterEffect::Grain,
        FilterEffect::Scanlines,
        FilterEffect::Chromatic,
        FilterEffect::Glitch,
        FilterEffect::Vhs,
    ] {
        let mut fb = Framebuffer::new(960, 540);
        let mut rng = SmallRng::seed_from_u64(7);
        group.bench_function(format!("{effect:?}"), |b| {
            b.iter(|| {
                filters::apply(&mut fb, effect, black_box(0.8), &mut rng);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_modes, bench_filters);
criterion_main!(benches);
