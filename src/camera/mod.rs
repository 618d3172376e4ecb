//! Cameras: free flight and riding the track.
//!
//! Both produce a view matrix through [`ViewSource`]. [`CameraRig`] owns one
//! of each and routes input according to the current mode.

mod free;
mod on_track;

pub use free::{
    FreeCamera, MAX_ZOOM, MIN_ZOOM, PITCH, PITCH_LIMIT, SENSITIVITY, SPEED, YAW, ZOOM,
};
pub use on_track::{StepReport, TrackMotionController, TrackState};

use tracing::info;

use crate::sim::{Float3, Matrix4, MotionParams};
use crate::track::Spline;

/// Keyboard movement, abstracted from any window system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
}

/// Anything that can be looked through.
pub trait ViewSource {
    fn eye(&self) -> Float3;
    fn front(&self) -> Float3;
    fn up(&self) -> Float3;

    fn view_matrix(&self) -> Matrix4 {
        let eye = self.eye();
        Matrix4::look_at(eye, eye + self.front(), self.up())
    }
}

pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 1000.0;

/// Free camera plus track rider, with a mode toggle between them.
///
/// Exactly one of the two is updated per frame: the rider while on the
/// track, the free camera (through input) otherwise.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CameraRig {
    pub free: FreeCamera,
    pub rider: TrackMotionController,
}

impl CameraRig {
    pub fn new(free: FreeCamera, motion: MotionParams) -> Self {
        Self {
            free,
            rider: TrackMotionController::new(motion),
        }
    }

    pub fn is_on_track(&self) -> bool {
        self.rider.is_on_track()
    }

    pub fn toggle_track_mode(&mut self) {
        self.rider.toggle();
        info!(on_track = self.rider.is_on_track(), "camera mode toggled");
    }

    /// Ignored while riding.
    pub fn process_keyboard(&mut self, direction: CameraMovement, dt: f32) {
        if !self.is_on_track() {
            self.free.process_keyboard(direction, dt);
        }
    }

    /// Ignored while riding.
    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32) {
        if !self.is_on_track() {
            self.free.process_mouse_movement(x_offset, y_offset, true);
        }
    }

    /// Zoom applies in both modes.
    pub fn process_mouse_scroll(&mut self, y_offset: f32) {
        self.free.process_mouse_scroll(y_offset);
    }

    pub fn update(&mut self, dt: f32, spline: &Spline) -> StepReport {
        if self.is_on_track() {
            self.rider.step(dt, spline)
        } else {
            StepReport::default()
        }
    }

    pub fn position(&self) -> Float3 {
        self.active().eye()
    }

    pub fn view_matrix(&self) -> Matrix4 {
        self.active().view_matrix()
    }

    pub fn projection(&self, aspect: f32) -> Matrix4 {
        Matrix4::perspective(self.free.zoom.to_radians(), aspect, NEAR_PLANE, FAR_PLANE)
    }

    fn active(&self) -> &dyn ViewSource {
        if self.is_on_track() {
            &self.rider
        } else {
            &self.free
        }
    }
}
