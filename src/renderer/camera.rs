use std::f32::consts::PI;

use glam::{Mat4, Quat, Vec2, Vec3};

/// Mouse-driven rotator. Dragging spins the model about the screen axis
/// perpendicular to the drag.
pub struct Trackball {
    pub rotation: Quat,
    pub sensitivity: f32,
}

impl Default for Trackball {
    fn default() -> Self {
        Self {
            rotation: Quat::IDENTITY,
            sensitivity: 0.008,
        }
    }
}

impl Trackball {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_quat(self.rotation)
    }

    pub fn process_mouse_movement(&mut self, delta: Vec2) {
        let length = delta.length();
        if length <= f32::EPSILON {
            return;
        }

        // screen y grows downward
        let axis = Vec3::new(delta.y, delta.x, 0.0) / length;
        let spin = Quat::from_axis_angle(axis, length * self.sensitivity);
        self.rotation = (spin * self.rotation).normalize();
    }

    pub fn reset(&mut self) {
        self.rotation = Quat::IDENTITY;
    }
}

/// Fixed viewing setup: narrow perspective looking at the model placed ten
/// units in front of the eye, pre-tilted about the (1, 1, 0) axis.
pub struct SceneCamera {
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub distance: f32,
    pub tilt_axis: Vec3,
    pub tilt_angle: f32,
}

impl Default for SceneCamera {
    fn default() -> Self {
        Self {
            fov: PI / 8.0,
            aspect: 1.0,
            near: 8.0,
            far: 12.0,
            distance: 10.0,
            tilt_axis: Vec3::new(0.707, 0.707, 0.0),
            tilt_angle: 0.7,
        }
    }
}

impl SceneCamera {
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn model_view(&self, view: Mat4) -> Mat4 {
        let tilt = Mat4::from_axis_angle(self.tilt_axis.normalize(), self.tilt_angle);
        let offset = Mat4::from_translation(Vec3::new(0.0, 0.0, -self.distance));
        offset * tilt * view
    }

    /// Non-finite or non-positive aspects keep the square default.
    pub fn with_aspect(aspect: f32) -> Self {
        let mut camera = Self::default();
        if aspect.is_finite() && aspect > 0.0 {
            camera.aspect = aspect;
        }
        camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trackball_starts_at_identity() {
        let trackball = Trackball::default();
        assert_eq!(trackball.view_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_horizontal_drag_spins_about_y() {
        let mut trackball = Trackball::default();
        trackball.process_mouse_movement(Vec2::new(100.0, 0.0));
        let (axis, angle) = trackball.rotation.to_axis_angle();
        assert!((axis - Vec3::Y).length() < 1e-5);
        assert!((angle - 0.8).abs() < 1e-5);

        trackball.reset();
        assert_eq!(trackball.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_zero_drag_is_ignored() {
        let mut trackball = Trackball::default();
        trackball.process_mouse_movement(Vec2::ZERO);
        assert_eq!(trackball.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_model_origin_sits_in_front_of_eye() {
        let camera = SceneCamera::default();
        let origin = camera.model_view(Mat4::IDENTITY).transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(0.0, 0.0, -10.0)).length() < 1e-6);

        let clip = camera.projection_matrix() * origin.extend(1.0);
        let ndc_z = clip.z / clip.w;
        assert!(ndc_z > 0.0 && ndc_z < 1.0);
    }

    #[test]
    fn test_degenerate_aspect_falls_back_to_square() {
        assert_eq!(SceneCamera::with_aspect(2.0).aspect, 2.0);
        assert_eq!(SceneCamera::with_aspect(0.0).aspect, 1.0);
        assert_eq!(SceneCamera::with_aspect(f32::NAN).aspect, 1.0);
    }
}
