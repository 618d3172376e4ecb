//! Tunables for track building and motion.
//!
//! Every field has a default, so a JSON config only needs the values it
//! changes:
//!
//! ```json
//! { "spline": { "closed": true }, "motion": { "peak_height": 30.0 } }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, TrackError};
use crate::sim::MotionParams;
use crate::track::{RailProfile, SamplingParams, SplineParams, TrackMeshBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoasterConfig {
    pub spline: SplineParams,
    pub rail: RailProfile,
    pub sampling: SamplingParams,
    pub motion: MotionParams,
}

impl CoasterConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        finite("spline.tension", self.spline.tension)?;
        positive("rail.half_width", self.rail.half_width)?;
        finite("rail.top", self.rail.top)?;
        finite("rail.bottom", self.rail.bottom)?;
        if self.rail.bottom <= self.rail.top {
            return Err(TrackError::invalid(
                "rail.bottom",
                format!("{} must lie below top ({})", self.rail.bottom, self.rail.top),
            ));
        }
        finite("rail.offset.x", self.rail.offset.x)?;
        finite("rail.offset.y", self.rail.offset.y)?;
        positive("sampling.step", self.sampling.step)?;
        non_negative("sampling.start", self.sampling.start)?;
        non_negative("motion.gravity", self.motion.gravity)?;
        finite("motion.peak_height", self.motion.peak_height)?;
        positive("motion.damping", self.motion.damping)?;
        positive("motion.step", self.motion.step)?;
        if self.motion.max_micro_steps == 0 {
            return Err(TrackError::invalid("motion.max_micro_steps", "must be at least 1"));
        }
        Ok(())
    }

    pub fn mesh_builder(&self) -> TrackMeshBuilder {
        TrackMeshBuilder::new(self.rail, self.sampling)
    }
}

fn finite(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TrackError::invalid(name, format!("{value} is not finite")))
    }
}

fn positive(name: &'static str, value: f32) -> Result<()> {
    finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(TrackError::invalid(name, format!("{value} must be positive")))
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<()> {
    finite(name, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(TrackError::invalid(name, format!("{value} must not be negative")))
    }
}
