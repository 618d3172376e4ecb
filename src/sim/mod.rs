//! Math and physics primitives for track generation and motion.
//!
//! This module has no knowledge of splines or meshes.

mod frame;
mod math;
mod motion_params;

pub mod physics;

pub use frame::{FramePair, Orientation, MIN_STEP_DISTANCE};
pub use math::{Float2, Float3, Matrix4};
pub use motion_params::{LapReset, MotionParams};
pub use physics::{distance_budget, energy_speed, EPSILON, G};
