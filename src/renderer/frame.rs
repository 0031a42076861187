use glam::{Mat4, Vec2, Vec3, Vec4};

use super::camera::SceneCamera;

/// How the strip is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Lit triangle strip, textured when a texture is loaded.
    #[default]
    Textured,
    /// Unlit line strip in a flat colour.
    Wireframe,
}

impl RenderMode {
    pub const ALL: [RenderMode; 2] = [RenderMode::Textured, RenderMode::Wireframe];

    pub fn label(self) -> &'static str {
        match self {
            RenderMode::Textured => "Textured",
            RenderMode::Wireframe => "Wireframe",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
    pub base_color: Vec4,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Vec3::splat(0.15),
            diffuse: Vec3::new(0.85, 0.8, 0.7),
            specular: Vec3::splat(0.6),
            shininess: 32.0,
            base_color: Vec4::new(0.9, 0.75, 0.35, 1.0),
        }
    }
}

pub const WIREFRAME_COLOR: Vec4 = Vec4::new(1.0, 1.0, 0.0, 1.0);

/// Scene settings that only change through the UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneSettings {
    pub material: Material,
    /// Radius of the light orbit in eye space.
    pub light_radius: f32,
    /// Height of the light orbit plane above the eye.
    pub light_height: f32,
    pub texture_angle: f32,
    pub render_mode: RenderMode,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            material: Material::default(),
            light_radius: 5.0,
            light_height: 2.0,
            texture_angle: 0.0,
            render_mode: RenderMode::Textured,
        }
    }
}

/// Per-frame inputs gathered from the window and interaction state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInputs {
    pub view: Mat4,
    pub aspect: f32,
    pub light_angle: f32,
    pub point: Vec2,
    pub has_texture: bool,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    pub model_view_projection: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub light_position: [f32; 3],
    pub shininess: f32,
    pub light_direction: [f32; 3],
    pub texture_angle: f32,
    pub ambient_color: [f32; 3],
    pub use_texture: u32,
    pub diffuse_color: [f32; 3],
    pub lit: u32,
    pub specular_color: [f32; 3],
    pub _pad0: f32,
    pub texture_point: [f32; 2],
    pub _pad1: [f32; 2],
}

/// Eye-space position of the light for orbit angle `t`.
pub fn light_position(settings: &SceneSettings, t: f32) -> Vec3 {
    let origin = model_origin();
    Vec3::new(
        origin.x + settings.light_radius * t.cos(),
        origin.y + settings.light_height,
        origin.z + settings.light_radius * t.sin(),
    )
}

fn model_origin() -> Vec3 {
    let camera = SceneCamera::default();
    Vec3::new(0.0, 0.0, -camera.distance)
}

pub fn compose_frame(settings: &SceneSettings, inputs: &FrameInputs) -> FrameUniforms {
    let camera = SceneCamera::with_aspect(inputs.aspect);

    let model_view = camera.model_view(inputs.view);
    let mvp = camera.projection_matrix() * model_view;
    let normal_matrix = model_view.inverse().transpose();

    let light = light_position(settings, inputs.light_angle);
    let direction = (model_origin() - light).normalize_or_zero();

    let (color, lit, use_texture) = match settings.render_mode {
        RenderMode::Textured => (settings.material.base_color, 1, inputs.has_texture as u32),
        RenderMode::Wireframe => (WIREFRAME_COLOR, 0, 0),
    };

    let material = &settings.material;
    FrameUniforms {
        model_view_projection: mvp.to_cols_array_2d(),
        normal_matrix: normal_matrix.to_cols_array_2d(),
        model_view: model_view.to_cols_array_2d(),
        color: color.to_array(),
        light_position: light.to_array(),
        shininess: material.shininess,
        light_direction: direction.to_array(),
        texture_angle: settings.texture_angle,
        ambient_color: material.ambient.to_array(),
        use_texture,
        diffuse_color: material.diffuse.to_array(),
        lit,
        specular_color: material.specular.to_array(),
        _pad0: 0.0,
        texture_point: inputs.point.to_array(),
        _pad1: [0.0; 2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    fn inputs(view: Mat4, light_angle: f32) -> FrameInputs {
        FrameInputs {
            view,
            aspect: 1.5,
            light_angle,
            point: Vec2::new(0.3, -0.2),
            has_texture: true,
        }
    }

    #[test]
    fn test_uniform_layout_is_std140_sized() {
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 304);
        assert_eq!(std::mem::size_of::<FrameUniforms>() % 16, 0);
    }

    #[test]
    fn test_normal_matrix_is_inverse_transpose() {
        let view = Mat4::from_quat(Quat::from_rotation_y(0.4) * Quat::from_rotation_x(-1.1));
        let frame = compose_frame(&SceneSettings::default(), &inputs(view, 0.0));

        let model_view = Mat4::from_cols_array_2d(&frame.model_view);
        let normal = Mat4::from_cols_array_2d(&frame.normal_matrix);
        let product = normal.transpose() * model_view;
        assert!(product.abs_diff_eq(Mat4::IDENTITY, 1e-4));
    }

    #[test]
    fn test_mvp_is_projection_times_model_view() {
        let frame = compose_frame(&SceneSettings::default(), &inputs(Mat4::IDENTITY, 0.0));
        let camera = SceneCamera::with_aspect(1.5);
        let expected = camera.projection_matrix() * Mat4::from_cols_array_2d(&frame.model_view);
        assert!(Mat4::from_cols_array_2d(&frame.model_view_projection).abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn test_light_stays_on_orbit() {
        let settings = SceneSettings::default();
        let center = model_origin() + Vec3::Y * settings.light_height;
        for step in 0..40 {
            let t = step as f32 * 0.1;
            let light = light_position(&settings, t);
            assert!(((light - center).length() - settings.light_radius).abs() < 1e-4);
        }
    }

    #[test]
    fn test_light_direction_points_at_model() {
        let settings = SceneSettings::default();
        let frame = compose_frame(&settings, &inputs(Mat4::IDENTITY, 1.3));
        let light = Vec3::from_array(frame.light_position);
        let direction = Vec3::from_array(frame.light_direction);
        let expected = (Vec3::new(0.0, 0.0, -10.0) - light).normalize();
        assert!((direction - expected).length() < 1e-5);
    }

    #[test]
    fn test_wireframe_is_flat_yellow() {
        let settings = SceneSettings {
            render_mode: RenderMode::Wireframe,
            ..SceneSettings::default()
        };
        let frame = compose_frame(&settings, &inputs(Mat4::IDENTITY, 0.0));
        assert_eq!(frame.color, [1.0, 1.0, 0.0, 1.0]);
        assert_eq!(frame.lit, 0);
        assert_eq!(frame.use_texture, 0);
    }

    #[test]
    fn test_texture_switch_follows_availability() {
        let settings = SceneSettings::default();
        let mut frame_inputs = inputs(Mat4::IDENTITY, 0.0);
        assert_eq!(compose_frame(&settings, &frame_inputs).use_texture, 1);
        frame_inputs.has_texture = false;
        let frame = compose_frame(&settings, &frame_inputs);
        assert_eq!(frame.use_texture, 0);
        assert_eq!(frame.texture_point, [0.3, -0.2]);
    }
}
