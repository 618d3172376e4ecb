use super::math::Float3;

/// Displacements shorter than this leave the frame unchanged.
pub const MIN_STEP_DISTANCE: f32 = 1e-6;

/// Below this sine of the angle between the old up and the new front, the
/// right vector is too ill-conditioned to trust.
const MIN_UP_FRONT_SINE: f32 = 1e-4;

/// Local coordinate frame at a point along the track.
///
/// `front`, `up` and `right` form a right-handed orthonormal basis with
/// `right = up x front` and `up = front x right`.
///
/// C-compatible layout for FFI.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Orientation {
    pub origin: Float3,
    pub front: Float3,
    pub up: Float3,
    pub right: Float3,
}

impl Orientation {
    pub const fn new(origin: Float3, front: Float3, up: Float3, right: Float3) -> Self {
        Self {
            origin,
            front,
            up,
            right,
        }
    }

    /// Canonical world-axis frame at the origin: front +Z, up +Y, right +X.
    pub const WORLD: Self = Self::new(Float3::ZERO, Float3::FORWARD, Float3::UP, Float3::RIGHT);

    /// Reference frame used to start a mesh sweep: front +X, up +Y.
    pub fn seed(origin: Float3) -> Self {
        let front = Float3::RIGHT;
        let up = Float3::UP;
        Self::new(origin, front, up, up.cross(front))
    }

    /// Derives the frame at `origin` from this one.
    ///
    /// Front follows the displacement, and the previous up vector is carried
    /// over so the frame does not flip through loops and banked turns.
    /// Returns `None` when the step is degenerate: no displacement, or the
    /// previous up vector is parallel to the new front.
    pub fn propagate(&self, origin: Float3) -> Option<Self> {
        let delta = origin - self.origin;
        if delta.magnitude() < MIN_STEP_DISTANCE {
            return None;
        }
        let front = delta.try_normalize()?;
        let raw_right = self.up.cross(front);
        if raw_right.magnitude() < MIN_UP_FRONT_SINE {
            return None;
        }
        // Gram-Schmidt against front to cancel rounding in the cross product.
        let right = (raw_right - front * front.dot(raw_right)).try_normalize()?;
        let up = front.cross(right).try_normalize()?;
        Some(Self::new(origin, front, up, right))
    }

    pub fn is_orthonormal(&self, tolerance: f32) -> bool {
        let unit = |v: Float3| (v.magnitude() - 1.0).abs() <= tolerance;
        unit(self.front)
            && unit(self.up)
            && unit(self.right)
            && self.front.dot(self.up).abs() <= tolerance
            && self.front.dot(self.right).abs() <= tolerance
            && self.up.dot(self.right).abs() <= tolerance
    }

    /// Position offset by `lateral` along right and `vertical` along up.
    pub fn offset(&self, lateral: f32, vertical: f32) -> Float3 {
        self.origin + self.right * lateral + self.up * vertical
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::WORLD
    }
}

/// Current frame together with the frame of the previous step.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct FramePair {
    pub current: Orientation,
    pub previous: Orientation,
}

impl FramePair {
    pub const fn new(current: Orientation) -> Self {
        Self {
            current,
            previous: current,
        }
    }

    /// Replaces both frames with `frame`.
    pub fn reset(&mut self, frame: Orientation) {
        *self = Self::new(frame);
    }

    /// Records the current frame as the previous one.
    pub fn snapshot(&mut self) {
        self.previous = self.current;
    }

    /// Moves to `origin`, propagating orientation from the current frame.
    ///
    /// On a degenerate step nothing changes and `false` is returned.
    pub fn advance(&mut self, origin: Float3) -> bool {
        match self.current.propagate(origin) {
            Some(next) => {
                self.previous = self.current;
                self.current = next;
                true
            }
            None => false,
        }
    }

    /// Distance covered by the most recent step.
    pub fn step_distance(&self) -> f32 {
        self.previous.origin.distance(self.current.origin)
    }
}
