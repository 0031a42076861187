use glam::Vec2;
use winit::keyboard::KeyCode;

pub const LIGHT_STEP: f32 = 0.1;
pub const POINT_STEP: f32 = 0.1;

/// State driven by discrete key presses: the light orbit angle `t` and the
/// texture rotation `point`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InteractionState {
    pub light_angle: f32,
    pub point: Vec2,
}

impl InteractionState {
    /// Returns true when the key changed the state.
    ///
    /// With `legacy_fallthrough`, 'A' also applies the 'W' step.
    pub fn handle_key(&mut self, key: KeyCode, legacy_fallthrough: bool) -> bool {
        match key {
            KeyCode::ArrowLeft => self.light_angle -= LIGHT_STEP,
            KeyCode::ArrowRight => self.light_angle += LIGHT_STEP,
            KeyCode::KeyD => self.point.x += POINT_STEP,
            KeyCode::KeyA => {
                self.point.x -= POINT_STEP;
                if legacy_fallthrough {
                    self.point.y += POINT_STEP;
                }
            }
            KeyCode::KeyW => self.point.y += POINT_STEP,
            KeyCode::KeyS => self.point.y -= POINT_STEP,
            _ => return false,
        }
        true
    }
}

/// Pointer state for the trackball.
#[derive(Debug, Default)]
pub struct PointerState {
    pub dragging: bool,
    pub last_position: Option<Vec2>,
}

impl PointerState {
    /// Records a cursor move and returns the drag delta since the last move.
    pub fn moved_to(&mut self, position: Vec2) -> Option<Vec2> {
        let delta = match (self.dragging, self.last_position) {
            (true, Some(last)) => Some(position - last),
            _ => None,
        };
        self.last_position = Some(position);
        delta
    }
}
