use serde::{Deserialize, Serialize};

use super::physics::G;

/// What happens when the track-following camera runs off the end of the
/// traversable window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LapReset {
    /// Restart at parameter 1 from the canonical world-axis frame. The camera
    /// visibly snaps once per lap.
    #[default]
    WorldAxes,
    /// Wrap the parameter back by one lap and keep the last frame, so the
    /// ride continues without a jump on closed tracks.
    CarryFrame,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionParams {
    pub gravity: f32,
    pub peak_height: f32,
    pub damping: f32,
    /// Parameter increment per micro-step.
    pub step: f32,
    /// Upper bound on micro-steps per simulation step.
    pub max_micro_steps: u32,
    pub lap_reset: LapReset,
}

impl MotionParams {
    pub fn new(
        gravity: f32,
        peak_height: f32,
        damping: f32,
        step: f32,
        max_micro_steps: u32,
        lap_reset: LapReset,
    ) -> Self {
        Self {
            gravity,
            peak_height,
            damping,
            step,
            max_micro_steps,
            lap_reset,
        }
    }
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            gravity: G,
            peak_height: 25.0,
            damping: 4.0,
            step: 0.005,
            max_micro_steps: 100_000,
            lap_reset: LapReset::WorldAxes,
        }
    }
}
