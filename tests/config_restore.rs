use std::fs;

use chromascope::config::AppConfig;
use chromascope::render::RenderMode;

fn unique_path(name: &str) -> std::path::PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!(
        "chromascope_it_config_{}_{}",
        name,
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    p
}

#[test]
fn first_run_writes_defaults_second_run_reads_them_back() {
    let path = unique_path("roundtrip.toml");
    let path_str = path.to_string_lossy().to_string();
    let _ = fs::remove_file(&path);

    let first = AppConfig::load_or_default(&path_str);
    assert!(path.exists());

    // The generated file is fully commented: parsing it back yields the
    // same defaults.
    let second = AppConfig::load_or_default(&path_str);
    assert_eq!(first.render.width, second.render.width);
    assert_eq!(first.theme, second.theme);
    assert_eq!(first.visual.mode, second.visual.mode);
    assert_eq!(first.visual.particles.count, second.visual.particles.count);

    let _ = fs::remove_file(&path);
}

#[test]
fn user_settings_survive_a_reload() {
    let path = unique_path("user.toml");
    let path_str = path.to_string_lossy().to_string();

    let mut custom = AppConfig::default();
    custom.visual.mode = RenderMode::Orbitals;
    custom.visual.fourier.harmonics = 48;
    custom.visual.life.cell_size = 8;
    custom.theme = "magma".to_string();
    fs::write(&path, toml::to_string_pretty(&custom).unwrap()).unwrap();

    let loaded = AppConfig::load_or_default(&path_str);
    assert_eq!(loaded.visual.mode, RenderMode::Orbitals);
    assert_eq!(loaded.visual.fourier.harmonics, 48);
    assert_eq!(loaded.visual.life.cell_size, 8);
    assert_eq!(loaded.theme, "magma");

    let _ = fs::remove_file(&path);
}

#[test]
fn garbage_config_falls_back_to_defaults() {
    let path = unique_path("garbage.toml");
    let path_str = path.to_string_lossy().to_string();
    fs::write(&path, "not = [valid").unwrap();

    let cfg = AppConfig::load_or_default(&path_str);
    assert_eq!(cfg.render.width, 960);
    assert_eq!(cfg.visual.mode, RenderMode::Waveform);

    let _ = fs::remove_file(&path);
}
