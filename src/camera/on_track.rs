use tracing::{debug, info, warn};

use super::ViewSource;
use crate::sim::{distance_budget, energy_speed, Float3, FramePair, LapReset, MotionParams, Orientation};
use crate::track::Spline;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackState {
    #[default]
    OffTrack,
    OnTrack,
}

/// What happened during one [`TrackMotionController::step`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepReport {
    /// Arc length actually travelled.
    pub distance: f32,
    pub micro_steps: u32,
    pub laps: u32,
    /// Micro-steps whose displacement was too small to orient the frame.
    pub degenerate_steps: u32,
    /// The micro-step cap ended the step before the budget was spent.
    pub exhausted: bool,
}

/// Camera that rides the track, pulled along by gravity.
///
/// Each step converts the energy-conservation speed at the current height
/// into an arc-length budget, then walks the spline in small parameter
/// increments until the budget is spent, re-deriving the frame at each
/// increment.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackMotionController {
    params: MotionParams,
    state: TrackState,
    u: f32,
    frames: FramePair,
}

impl TrackMotionController {
    pub fn new(params: MotionParams) -> Self {
        Self {
            params,
            state: TrackState::OffTrack,
            u: 0.0,
            frames: FramePair::new(Orientation::WORLD),
        }
    }

    pub fn params(&self) -> &MotionParams {
        &self.params
    }

    pub fn state(&self) -> TrackState {
        self.state
    }

    pub fn is_on_track(&self) -> bool {
        self.state == TrackState::OnTrack
    }

    /// Current track parameter.
    pub fn parameter(&self) -> f32 {
        self.u
    }

    pub fn frames(&self) -> &FramePair {
        &self.frames
    }

    pub fn orientation(&self) -> &Orientation {
        &self.frames.current
    }

    /// Puts the camera on the track at parameter 0 with the world-axis frame.
    pub fn enter_track(&mut self) {
        self.u = 0.0;
        self.frames.reset(Orientation::WORLD);
        self.state = TrackState::OnTrack;
        info!("camera entered track");
    }

    pub fn leave_track(&mut self) {
        self.state = TrackState::OffTrack;
        info!(u = self.u, "camera left track");
    }

    pub fn toggle(&mut self) {
        match self.state {
            TrackState::OffTrack => self.enter_track(),
            TrackState::OnTrack => self.leave_track(),
        }
    }

    /// Speed at the current height.
    pub fn speed(&self) -> f32 {
        energy_speed(
            self.params.gravity,
            self.params.peak_height,
            self.frames.current.origin.y,
        )
    }

    /// Advances the ride by `dt` seconds. Does nothing while off the track.
    ///
    /// Always returns: the number of micro-steps is capped by
    /// `max_micro_steps`, so zero-length track sections cannot stall it.
    pub fn step(&mut self, dt: f32, spline: &Spline) -> StepReport {
        let mut report = StepReport::default();
        if self.state == TrackState::OffTrack {
            return report;
        }

        self.frames.snapshot();
        let mut budget = distance_budget(self.speed(), dt, self.params.damping);
        let end = spline.segment_count() as f32;

        while budget > 0.0 {
            if report.micro_steps >= self.params.max_micro_steps {
                report.exhausted = true;
                warn!(
                    u = self.u,
                    remaining = budget,
                    limit = self.params.max_micro_steps,
                    "track motion hit micro-step limit"
                );
                break;
            }
            report.micro_steps += 1;

            if self.u > end {
                self.complete_lap(end);
                report.laps += 1;
                continue;
            }

            self.u += self.params.step;
            if self.frames.advance(spline.evaluate(self.u)) {
                let moved = self.frames.step_distance();
                budget -= moved;
                report.distance += moved;
            } else {
                report.degenerate_steps += 1;
            }
        }

        if report.degenerate_steps > 0 {
            debug!(
                count = report.degenerate_steps,
                u = self.u,
                "skipped degenerate track steps"
            );
        }
        report
    }

    fn complete_lap(&mut self, end: f32) {
        match self.params.lap_reset {
            LapReset::WorldAxes => {
                self.u = 1.0;
                self.frames.reset(Orientation::WORLD);
            }
            LapReset::CarryFrame => {
                self.u -= end;
            }
        }
        debug!(u = self.u, mode = ?self.params.lap_reset, "lap complete");
    }
}

impl Default for TrackMotionController {
    fn default() -> Self {
        Self::new(MotionParams::default())
    }
}

impl ViewSource for TrackMotionController {
    fn eye(&self) -> Float3 {
        self.frames.current.origin
    }

    fn front(&self) -> Float3 {
        self.frames.current.front
    }

    fn up(&self) -> Float3 {
        self.frames.current.up
    }
}
