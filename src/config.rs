use std::path::PathBuf;

use crate::renderer::RenderMode;
use crate::surface::NormalMode;
use crate::surface::presets::find_preset;
use crate::surface::tessellator::{DEFAULT_STEP, U_RANGE};

pub const TEXTURE_ENV: &str = "TWISTED_TORUS_TEXTURE";
pub const STEP_ENV: &str = "TWISTED_TORUS_STEP";
pub const PRESET_ENV: &str = "TWISTED_TORUS_PRESET";

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub title: String,
    pub window_size: (u32, u32),
    /// Image file for the surface; `None` uses the built-in checker.
    pub texture_path: Option<PathBuf>,
    pub preset: usize,
    pub step: f64,
    pub normal_mode: NormalMode,
    pub render_mode: RenderMode,
    pub legacy_a_key_fallthrough: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Twisted Torus".to_string(),
            window_size: (1280, 900),
            texture_path: None,
            preset: 0,
            step: DEFAULT_STEP,
            normal_mode: NormalMode::Unit,
            render_mode: RenderMode::Textured,
            legacy_a_key_fallthrough: false,
        }
    }
}

impl ViewerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`; unusable values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup(TEXTURE_ENV) {
            let path = path.trim();
            config.texture_path = if path.is_empty() {
                None
            } else {
                Some(PathBuf::from(path))
            };
        }

        if let Some(raw) = lookup(STEP_ENV) {
            match raw.trim().parse::<f64>() {
                Ok(step) if step.is_finite() && step > 0.0 && step <= U_RANGE => config.step = step,
                _ => log::warn!("ignoring {STEP_ENV}={raw:?}, keeping step {}", config.step),
            }
        }

        if let Some(name) = lookup(PRESET_ENV) {
            match find_preset(name.trim()) {
                Some(index) => config.preset = index,
                None => log::warn!("unknown preset {name:?}, keeping the default shape"),
            }
        }

        config
    }
}
