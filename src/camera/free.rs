use super::{CameraMovement, ViewSource};
use crate::sim::Float3;

pub const YAW: f32 = -90.0;
pub const PITCH: f32 = 0.0;
pub const SPEED: f32 = 5.0;
pub const SENSITIVITY: f32 = 0.1;
pub const ZOOM: f32 = 45.0;

pub const PITCH_LIMIT: f32 = 89.0;
pub const MIN_ZOOM: f32 = 1.0;
pub const MAX_ZOOM: f32 = 45.0;

/// Fly-through camera driven by Euler angles in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct FreeCamera {
    pub position: Float3,
    pub front: Float3,
    pub up: Float3,
    pub right: Float3,
    pub world_up: Float3,
    pub yaw: f32,
    pub pitch: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    /// Vertical field of view in degrees.
    pub zoom: f32,
}

impl FreeCamera {
    pub fn new(position: Float3, world_up: Float3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            front: Float3::BACK,
            up: world_up,
            right: Float3::RIGHT,
            world_up,
            yaw,
            pitch,
            movement_speed: SPEED,
            mouse_sensitivity: SENSITIVITY,
            zoom: ZOOM,
        };
        camera.update_vectors();
        camera
    }

    pub fn process_keyboard(&mut self, direction: CameraMovement, dt: f32) {
        let velocity = self.movement_speed * dt;
        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
        }
    }

    /// Applies a mouse delta. With `constrain_pitch` the pitch stays within
    /// +/-89 degrees so the view never flips over the pole.
    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32, constrain_pitch: bool) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch += y_offset * self.mouse_sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }
        self.update_vectors();
    }

    pub fn process_mouse_scroll(&mut self, y_offset: f32) {
        self.zoom = (self.zoom - y_offset).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        let front = Float3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos());
        self.front = front.normalize();
        // Unconstrained pitch can line front up with world up; keep the old
        // basis rather than collapsing it.
        if let Some(right) = self.front.cross(self.world_up).try_normalize() {
            self.right = right;
            self.up = right.cross(self.front).normalize();
        }
    }
}

impl Default for FreeCamera {
    fn default() -> Self {
        Self::new(Float3::ZERO, Float3::UP, YAW, PITCH)
    }
}

impl ViewSource for FreeCamera {
    fn eye(&self) -> Float3 {
        self.position
    }

    fn front(&self) -> Float3 {
        self.front
    }

    fn up(&self) -> Float3 {
        self.up
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TOLERANCE: f32 = 1e-5;

    #[test]
    fn default_looks_down_negative_z() {
        let camera = FreeCamera::default();
        assert_relative_eq!(camera.front.x, 0.0, epsilon = TOLERANCE);
        assert_relative_eq!(camera.front.z, -1.0, epsilon = TOLERANCE);
        assert_relative_eq!(camera.right.x, 1.0, epsilon = TOLERANCE);
        assert_relative_eq!(camera.up.y, 1.0, epsilon = TOLERANCE);
    }

    #[test]
    fn keyboard_moves_along_basis() {
        let mut camera = FreeCamera::default();
        camera.process_keyboard(CameraMovement::Forward, 1.0);
        assert_relative_eq!(camera.position.z, -SPEED, epsilon = TOLERANCE);
        camera.process_keyboard(CameraMovement::Right, 0.5);
        assert_relative_eq!(camera.position.x, SPEED * 0.5, epsilon = TOLERANCE);
        camera.process_keyboard(CameraMovement::Backward, 1.0);
        camera.process_keyboard(CameraMovement::Left, 0.5);
        assert_relative_eq!(camera.position.magnitude(), 0.0, epsilon = 1e-4);
    }

    #[test]
    fn pitch_clamps_at_limit() {
        let mut camera = FreeCamera::default();
        // 20 x 100 x 0.1 = 200 degrees requested.
        for _ in 0..20 {
            camera.process_mouse_movement(0.0, 100.0, true);
        }
        assert_eq!(camera.pitch, 89.0);

        for _ in 0..40 {
            camera.process_mouse_movement(0.0, -100.0, true);
        }
        assert_eq!(camera.pitch, -89.0);
    }

    #[test]
    fn unconstrained_pitch_is_not_clamped() {
        let mut camera = FreeCamera::default();
        camera.process_mouse_movement(0.0, 1000.0, false);
        assert_relative_eq!(camera.pitch, 100.0, epsilon = TOLERANCE);
        assert!(camera.front.is_finite());
    }

    #[test]
    fn yaw_turns_front() {
        let mut camera = FreeCamera::default();
        // -90 + 90 = 0 degrees yaw: looking down +X.
        camera.process_mouse_movement(900.0, 0.0, true);
        assert_relative_eq!(camera.front.x, 1.0, epsilon = TOLERANCE);
        assert_relative_eq!(camera.right.z, 1.0, epsilon = TOLERANCE);
    }

    #[test]
    fn zoom_clamps_both_ends() {
        let mut camera = FreeCamera::default();
        camera.process_mouse_scroll(50.0);
        assert_eq!(camera.zoom, MIN_ZOOM);

        camera.process_mouse_scroll(-10.0);
        assert_relative_eq!(camera.zoom, 11.0, epsilon = TOLERANCE);

        camera.process_mouse_scroll(-60.0);
        assert_eq!(camera.zoom, MAX_ZOOM);
    }

    #[test]
    fn basis_is_orthonormal_after_look() {
        let mut camera = FreeCamera::default();
        camera.process_mouse_movement(123.0, 321.0, true);
        assert_relative_eq!(camera.front.dot(camera.right), 0.0, epsilon = TOLERANCE);
        assert_relative_eq!(camera.front.dot(camera.up), 0.0, epsilon = TOLERANCE);
        assert_relative_eq!(camera.up.magnitude(), 1.0, epsilon = TOLERANCE);
    }
}
