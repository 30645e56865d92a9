use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::amplitude::ResponseMode;
use crate::core::expr;
use crate::core::transform::RotationAxes;
use crate::render::filters::{FilterEffect, FilterResponse};
use crate::render::RenderMode;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "RenderConfig::default_width")]
    pub width: usize,
    #[serde(default = "RenderConfig::default_height")]
    pub height: usize,
    #[serde(default = "RenderConfig::default_fps")]
    pub fps: f32,
}

impl RenderConfig {
    fn default_width() -> usize {
        960
    }
    fn default_height() -> usize {
        540
    }
    fn default_fps() -> f32 {
        60.0
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: Self::default_width(),
            height: Self::default_height(),
            fps: Self::default_fps(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "AudioConfig::default_latency_ms")]
    pub latency_ms: f32,
    #[serde(default = "AudioConfig::default_sample_rate")]
    pub sample_rate: u32,
}

impl AudioConfig {
    fn default_latency_ms() -> f32 {
        50.0
    }
    fn default_sample_rate() -> u32 {
        48_000
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            latency_ms: Self::default_latency_ms(),
            sample_rate: Self::default_sample_rate(),
        }
    }
}

/// Audio-driven modulation of a parameter (extra rotation, equation morph).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AudioDrive {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub source: DriveSource,
    #[serde(default = "AudioDrive::default_intensity")]
    pub intensity: f32,
}

impl AudioDrive {
    fn default_intensity() -> f32 {
        1.0
    }

    /// Resolve the modulation value from the measured amplitudes.
    pub fn value(&self, average: f32, peak: f32) -> f32 {
        if !self.enabled {
            return 0.0;
        }
        match self.source {
            DriveSource::Average => average * self.intensity,
            DriveSource::Peak => peak * self.intensity,
        }
    }
}

impl Default for AudioDrive {
    fn default() -> Self {
        Self {
            enabled: false,
            source: DriveSource::default(),
            intensity: Self::default_intensity(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DriveSource {
    Average,
    Peak,
}

impl Default for DriveSource {
    fn default() -> Self {
        Self::Average
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParticleConfig {
    #[serde(default = "ParticleConfig::default_count")]
    pub count: usize,
    #[serde(default = "ParticleConfig::default_base_size")]
    pub base_size: f32,
    #[serde(default)]
    pub response: ResponseMode,
    #[serde(default)]
    pub rotation: RotationAxes,
    #[serde(default = "ParticleConfig::default_eq_x")]
    pub eq_x: String,
    #[serde(default = "ParticleConfig::default_eq_y")]
    pub eq_y: String,
    #[serde(default = "ParticleConfig::default_eq_z")]
    pub eq_z: String,
    #[serde(default)]
    pub audio_rotation: AudioDrive,
    #[serde(default = "ParticleConfig::default_audio_morph")]
    pub audio_morph: AudioDrive,
}

impl ParticleConfig {
    fn default_count() -> usize {
        2000
    }
    fn default_base_size() -> f32 {
        2.0
    }
    fn default_eq_x() -> String {
        expr::preset("sphere").unwrap().x.to_string()
    }
    fn default_eq_y() -> String {
        expr::preset("sphere").unwrap().y.to_string()
    }
    fn default_eq_z() -> String {
        expr::preset("sphere").unwrap().z.to_string()
    }
    fn default_audio_morph() -> AudioDrive {
        AudioDrive {
            enabled: false,
            source: DriveSource::Average,
            intensity: 0.5,
        }
    }
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: Self::default_count(),
            base_size: Self::default_base_size(),
            response: ResponseMode::Frequency,
            rotation: RotationAxes::default(),
            eq_x: Self::default_eq_x(),
            eq_y: Self::default_eq_y(),
            eq_z: Self::default_eq_z(),
            audio_rotation: AudioDrive::default(),
            audio_morph: Self::default_audio_morph(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeshConfig {
    #[serde(default)]
    pub response: ResponseMode,
    #[serde(default = "MeshConfig::default_resolution")]
    pub resolution: usize,
    #[serde(default = "MeshConfig::default_wireframe")]
    pub wireframe: bool,
    #[serde(default)]
    pub filled: bool,
    #[serde(default)]
    pub rotation: RotationAxes,
    #[serde(default = "ParticleConfig::default_eq_x")]
    pub eq_x: String,
    #[serde(default = "ParticleConfig::default_eq_y")]
    pub eq_y: String,
    #[serde(default = "ParticleConfig::default_eq_z")]
    pub eq_z: String,
}

impl MeshConfig {
    fn default_resolution() -> usize {
        30
    }
    fn default_wireframe() -> bool {
        true
    }
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            response: ResponseMode::Frequency,
            resolution: Self::default_resolution(),
            wireframe: Self::default_wireframe(),
            filled: false,
            rotation: RotationAxes::default(),
            eq_x: ParticleConfig::default_eq_x(),
            eq_y: ParticleConfig::default_eq_y(),
            eq_z: ParticleConfig::default_eq_z(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FourierConfig {
    #[serde(default = "FourierConfig::default_harmonics")]
    pub harmonics: usize,
    #[serde(default = "FourierConfig::default_contribution")]
    pub contribution: f32,
}

impl FourierConfig {
    fn default_harmonics() -> usize {
        16
    }
    fn default_contribution() -> f32 {
        0.2
    }
}

impl Default for FourierConfig {
    fn default() -> Self {
        Self {
            harmonics: Self::default_harmonics(),
            contribution: Self::default_contribution(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrbitalsConfig {
    #[serde(default = "OrbitalsConfig::default_show_paths")]
    pub show_paths: bool,
    #[serde(default = "OrbitalsConfig::default_planet_size")]
    pub planet_size: f32,
    #[serde(default = "OrbitalsConfig::default_enable_3d")]
    pub enable_3d: bool,
    #[serde(default = "OrbitalsConfig::default_tilt_deg")]
    pub tilt_deg: f32,
    #[serde(default = "OrbitalsConfig::default_depth")]
    pub depth: f32,
    #[serde(default = "OrbitalsConfig::default_spin")]
    pub spin: f32,
}

impl OrbitalsConfig {
    fn default_show_paths() -> bool {
        true
    }
    fn default_planet_size() -> f32 {
        3.0
    }
    fn default_enable_3d() -> bool {
        true
    }
    fn default_tilt_deg() -> f32 {
        -30.0
    }
    fn default_depth() -> f32 {
        700.0
    }
    fn default_spin() -> f32 {
        0.4
    }
}

impl Default for OrbitalsConfig {
    fn default() -> Self {
        Self {
            show_paths: Self::default_show_paths(),
            planet_size: Self::default_planet_size(),
            enable_3d: Self::default_enable_3d(),
            tilt_deg: Self::default_tilt_deg(),
            depth: Self::default_depth(),
            spin: Self::default_spin(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LifeConfig {
    #[serde(default = "LifeConfig::default_cell_size")]
    pub cell_size: usize,
    #[serde(default = "LifeConfig::default_reseed")]
    pub reseed: f32,
    #[serde(default = "LifeConfig::default_birth_boost")]
    pub birth_boost: f32,
    #[serde(default = "LifeConfig::default_survival_boost")]
    pub survival_boost: f32,
}

impl LifeConfig {
    fn default_cell_size() -> usize {
        3
    }
    fn default_reseed() -> f32 {
        0.3
    }
    fn default_birth_boost() -> f32 {
        0.3
    }
    fn default_survival_boost() -> f32 {
        0.45
    }
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            cell_size: Self::default_cell_size(),
            reseed: Self::default_reseed(),
            birth_boost: Self::default_birth_boost(),
            survival_boost: Self::default_survival_boost(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterConfig {
    #[serde(default)]
    pub effect: FilterEffect,
    #[serde(default = "FilterConfig::default_intensity")]
    pub intensity: f32,
    #[serde(default)]
    pub response: FilterResponse,
    #[serde(default = "FilterConfig::default_response_strength")]
    pub response_strength: f32,
}

impl FilterConfig {
    fn default_intensity() -> f32 {
        0.5
    }
    fn default_response_strength() -> f32 {
        1.0
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            effect: FilterEffect::None,
            intensity: Self::default_intensity(),
            response: FilterResponse::Frequency,
            response_strength: Self::default_response_strength(),
        }
    }
}

/// The per-tick snapshot every render routine receives. No render code
/// reads settings from anywhere else.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Configuration {
    #[serde(default)]
    pub mode: RenderMode,
    #[serde(default = "Configuration::default_afterglow")]
    pub afterglow: f32,
    #[serde(default = "Configuration::default_line_width")]
    pub line_width: f32,
    #[serde(default = "Configuration::default_smoothing")]
    pub smoothing: f32,
    #[serde(default)]
    pub particles: ParticleConfig,
    #[serde(default)]
    pub mesh: MeshConfig,
    #[serde(default)]
    pub fourier: FourierConfig,
    #[serde(default)]
    pub orbitals: OrbitalsConfig,
    #[serde(default)]
    pub life: LifeConfig,
    #[serde(default)]
    pub filter: FilterConfig,
}

impl Configuration {
    fn default_afterglow() -> f32 {
        0.92
    }
    fn default_line_width() -> f32 {
        2.0
    }
    fn default_smoothing() -> f32 {
        0.2
    }

    /// Pull every numeric field into its documented interval; non-finite
    /// values fall back to defaults. The render loop never sees raw input.
    pub fn clamped(mut self) -> Self {
        fn clamp_f(v: f32, lo: f32, hi: f32, fallback: f32) -> f32 {
            if v.is_finite() {
                v.clamp(lo, hi)
            } else {
                fallback
            }
        }
        self.afterglow = clamp_f(self.afterglow, 0.0, 1.5, Self::default_afterglow());
        self.line_width = clamp_f(self.line_width, 1.0, 10.0, Self::default_line_width());
        self.smoothing = clamp_f(self.smoothing, 0.0, 0.95, Self::default_smoothing());

        self.particles.count = self.particles.count.clamp(100, 20_000);
        self.particles.base_size = clamp_f(
            self.particles.base_size,
            0.5,
            20.0,
            ParticleConfig::default_base_size(),
        );
        self.mesh.resolution = self.mesh.resolution.clamp(2, 96);
        self.fourier.harmonics = self.fourier.harmonics.clamp(1, 128);
        self.fourier.contribution = clamp_f(
            self.fourier.contribution,
            0.0,
            1.0,
            FourierConfig::default_contribution(),
        );
        self.orbitals.planet_size = clamp_f(self.orbitals.planet_size, 0.5, 20.0, 3.0);
        self.orbitals.tilt_deg = clamp_f(self.orbitals.tilt_deg, -90.0, 90.0, -30.0);
        self.orbitals.depth = clamp_f(self.orbitals.depth, 100.0, 5000.0, 700.0);
        self.orbitals.spin = clamp_f(self.orbitals.spin, 0.0, 4.0, 0.4);
        self.life.cell_size = self.life.cell_size.clamp(1, 24);
        self.life.reseed = clamp_f(self.life.reseed, 0.0, 1.0, LifeConfig::default_reseed());
        self.life.birth_boost = clamp_f(self.life.birth_boost, 0.0, 1.0, 0.3);
        self.life.survival_boost = clamp_f(self.life.survival_boost, 0.0, 1.0, 0.45);
        self.filter.intensity = clamp_f(
            self.filter.intensity,
            0.0,
            1.0,
            FilterConfig::default_intensity(),
        );
        self.filter.response_strength = clamp_f(self.filter.response_strength, 0.0, 4.0, 1.0);
        self
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            mode: RenderMode::default(),
            afterglow: Self::default_afterglow(),
            line_width: Self::default_line_width(),
            smoothing: Self::default_smoothing(),
            particles: ParticleConfig::default(),
            mesh: MeshConfig::default(),
            fourier: FourierConfig::default(),
            orbitals: OrbitalsConfig::default(),
            life: LifeConfig::default(),
            filter: FilterConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default = "AppConfig::default_theme")]
    pub theme: String,
    #[serde(default)]
    pub visual: Configuration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            audio: AudioConfig::default(),
            theme: Self::default_theme(),
            visual: Configuration::default(),
        }
    }
}

impl AppConfig {
    fn default_theme() -> String {
        "green".to_string()
    }

    pub fn load_or_default(path: &str) -> Self {
        let path_obj = Path::new(path);
        if path_obj.exists() {
            match fs::read_to_string(path_obj) {
                Ok(contents) => match toml::from_str::<AppConfig>(&contents) {
                    Ok(cfg) => return cfg,
                    Err(err) => {
                        eprintln!("Failed to parse config {path}: {err}. Using defaults.");
                    }
                },
                Err(err) => {
                    eprintln!("Failed to read config {path}: {err}. Using defaults.");
                }
            }
            return Self::default();
        }

        // File does not exist: write commented defaults and return them.
        let default_cfg = Self::default();
        match toml::to_string_pretty(&default_cfg) {
            Ok(text) => {
                let mut commented = String::new();
                for line in text.lines() {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        commented.push('\n');
                    } else if trimmed.starts_with('[') && trimmed.ends_with(']') {
                        commented.push_str(line);
                        commented.push('\n');
                    } else {
                        commented.push_str("# ");
                        commented.push_str(line);
                        commented.push('\n');
                    }
                }
                if let Err(err) = fs::write(path_obj, commented) {
                    eprintln!("Failed to write default config to {path}: {err}");
                }
            }
            Err(_) => {
                eprintln!("Failed to serialize default config; continuing with defaults");
            }
        }
        default_cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn unique_path(name: &str) -> std::path::PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!(
            "chromascope_config_test_{}_{}",
            name,
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        p
    }

    #[test]
    fn load_or_default_writes_commented_defaults() {
        let path = unique_path("defaults.toml");
        let path_str = path.to_string_lossy().to_string();
        let _ = fs::remove_file(&path);

        let cfg = AppConfig::load_or_default(&path_str);
        assert!(path.exists(), "config file should be created");
        assert_eq!(cfg.render.width, 960);
        assert_eq!(cfg.audio.sample_rate, 48_000);
        assert_eq!(cfg.theme, "green");
        assert_eq!(cfg.visual.afterglow, 0.92);

        let contents = fs::read_to_string(&path).expect("read written config");
        assert!(contents.contains("[render]"));
        assert!(
            contents.lines().any(|l| l.starts_with("# ")),
            "values should be commented out"
        );

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn load_or_default_reads_existing() {
        let path = unique_path("custom.toml");
        let path_str = path.to_string_lossy().to_string();
        let mut custom = AppConfig::default();
        custom.render.width = 640;
        custom.theme = "cyberpunk".to_string();
        custom.visual.mode = RenderMode::Particles;
        custom.visual.particles.count = 5000;
        let text = toml::to_string_pretty(&custom).unwrap();
        fs::write(&path, text).unwrap();

        let cfg = AppConfig::load_or_default(&path_str);
        assert_eq!(cfg.render.width, 640);
        assert_eq!(cfg.theme, "cyberpunk");
        assert_eq!(cfg.visual.mode, RenderMode::Particles);
        assert_eq!(cfg.visual.particles.count, 5000);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn clamped_repairs_out_of_range_values() {
        let mut cfg = Configuration::default();
        cfg.afterglow = 9.0;
        cfg.smoothing = f32::NAN;
        cfg.particles.count = 5;
        cfg.fourier.harmonics = 100_000;
        cfg.life.cell_size = 0;
        cfg.filter.intensity = -3.0;
        let cfg = cfg.clamped();
        assert_eq!(cfg.afterglow, 1.5);
        assert_eq!(cfg.smoothing, 0.2);
        assert_eq!(cfg.particles.count, 100);
        assert_eq!(cfg.fourier.harmonics, 128);
        assert_eq!(cfg.life.cell_size, 1);
        assert_eq!(cfg.filter.intensity, 0.0);
    }

    #[test]
    fn default_equations_are_the_sphere_preset() {
        let cfg = ParticleConfig::default();
        assert_eq!(cfg.eq_x, "sin(pi*v)*cos(2*pi*u)");
        assert_eq!(cfg.eq_z, "cos(pi*v)");
    }
}
