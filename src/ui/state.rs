use crate::config::ViewerConfig;
use crate::renderer::SceneSettings;
use crate::surface::normal::NormalDeltas;
use crate::surface::{NormalMode, SHAPE_PRESETS, ShapeParams, SurfaceError, TessellationSettings};

pub struct UiState {
    pub selected_preset: usize,

    pub major_radius: f64,
    pub amplitude: f64,
    pub lobes: u32,
    pub zoom: f64,

    pub step_u: f64,
    pub step_v: f64,
    pub normal_deltas: NormalDeltas,
    pub normal_mode: NormalMode,

    pub scene: SceneSettings,
    pub legacy_a_key_fallthrough: bool,

    pub texture_path: String,

    pub show_help: bool,
    pub show_stats: bool,
    pub mesh_needs_build: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self::from_config(&ViewerConfig::default())
    }
}

impl UiState {
    pub fn from_config(config: &ViewerConfig) -> Self {
        let preset = config.preset.min(SHAPE_PRESETS.len().saturating_sub(1));
        let params = SHAPE_PRESETS
            .get(preset)
            .map(|p| p.params)
            .unwrap_or_else(ShapeParams::reference);

        let scene = SceneSettings {
            render_mode: config.render_mode,
            ..SceneSettings::default()
        };

        Self {
            selected_preset: preset,

            major_radius: params.major_radius,
            amplitude: params.amplitude,
            lobes: params.lobes,
            zoom: params.zoom,

            step_u: config.step,
            step_v: config.step,
            normal_deltas: NormalDeltas::default(),
            normal_mode: config.normal_mode,

            scene,
            legacy_a_key_fallthrough: config.legacy_a_key_fallthrough,

            texture_path: config
                .texture_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),

            show_help: true,
            show_stats: true,
            mesh_needs_build: true,
        }
    }

    pub fn apply_preset(&mut self, index: usize) {
        let Some(preset) = SHAPE_PRESETS.get(index) else {
            return;
        };
        self.selected_preset = index;
        self.major_radius = preset.params.major_radius;
        self.amplitude = preset.params.amplitude;
        self.lobes = preset.params.lobes;
        self.zoom = preset.params.zoom;
        self.mesh_needs_build = true;
    }

    pub fn shape_params(&self) -> Result<ShapeParams, SurfaceError> {
        ShapeParams::new(self.major_radius, self.amplitude, self.lobes, self.zoom)
    }

    pub fn tessellation_settings(&self) -> TessellationSettings {
        TessellationSettings {
            deltas: self.normal_deltas,
            normal_mode: self.normal_mode,
            ..TessellationSettings::with_steps(self.step_u, self.step_v)
        }
    }
}
