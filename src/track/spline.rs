use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackError};
use crate::sim::Float3;

/// Minimum number of control points for a Catmull-Rom loop.
pub const MIN_CONTROL_POINTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplineParams {
    pub tension: f32,
    /// Sweep the whole cyclic loop instead of stopping three points short.
    pub closed: bool,
}

impl Default for SplineParams {
    fn default() -> Self {
        Self {
            tension: 0.5,
            closed: false,
        }
    }
}

/// Ordered, cyclic sequence of at least four control points.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPoints(Vec<Float3>);

impl ControlPoints {
    pub fn new(points: Vec<Float3>) -> Result<Self> {
        if points.len() < MIN_CONTROL_POINTS {
            return Err(TrackError::TooFewControlPoints {
                found: points.len(),
            });
        }
        if let Some(i) = points.iter().position(|p| !p.is_finite()) {
            return Err(TrackError::invalid(
                "control_points",
                format!("point {i} has a non-finite coordinate"),
            ));
        }
        Ok(Self(points))
    }

    pub fn as_slice(&self) -> &[Float3] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Point at `index` with cyclic wraparound, negative indices included.
    pub fn get_wrapped(&self, index: i64) -> Float3 {
        let n = self.0.len() as i64;
        self.0[index.rem_euclid(n) as usize]
    }
}

impl TryFrom<Vec<Float3>> for ControlPoints {
    type Error = TrackError;

    fn try_from(points: Vec<Float3>) -> Result<Self> {
        Self::new(points)
    }
}

/// Catmull-Rom blend of four points at local coordinate `t` in [0, 1].
///
/// Returns `p1` at `t = 0` and `p2` at `t = 1`.
pub fn catmull_rom(p0: Float3, p1: Float3, p2: Float3, p3: Float3, tension: f32, t: f32) -> Float3 {
    let tau = tension;
    let t2 = t * t;
    let t3 = t2 * t;

    p0 * (-tau * t + 2.0 * tau * t2 - tau * t3)
        + p1 * (1.0 + (tau - 3.0) * t2 + (2.0 - tau) * t3)
        + p2 * (tau * t + (3.0 - 2.0 * tau) * t2 + (tau - 2.0) * t3)
        + p3 * (-tau * t2 + tau * t3)
}

/// Derivative of [`catmull_rom`] with respect to `t`.
pub fn catmull_rom_derivative(
    p0: Float3,
    p1: Float3,
    p2: Float3,
    p3: Float3,
    tension: f32,
    t: f32,
) -> Float3 {
    let tau = tension;
    let t2 = t * t;

    p0 * (-tau + 4.0 * tau * t - 3.0 * tau * t2)
        + p1 * (2.0 * (tau - 3.0) * t + 3.0 * (2.0 - tau) * t2)
        + p2 * (tau + 2.0 * (3.0 - 2.0 * tau) * t + 3.0 * (tau - 2.0) * t2)
        + p3 * (-2.0 * tau * t + 3.0 * tau * t2)
}

/// Piecewise Catmull-Rom curve over a cyclic control point sequence.
///
/// The track parameter `s` splits into a segment index `i = floor(s)` and a
/// local coordinate `t = s - i`. Segment `i` runs from point `i` to point
/// `i + 1` and uses points `i - 1 ..= i + 2` (all modulo the point count), so
/// the curve passes through `points[s mod N]` at every integer `s`.
#[derive(Debug, Clone, PartialEq)]
pub struct Spline {
    points: ControlPoints,
    tension: f32,
    closed: bool,
}

impl Spline {
    pub fn new(points: ControlPoints, params: SplineParams) -> Self {
        Self {
            points,
            tension: params.tension,
            closed: params.closed,
        }
    }

    pub fn from_points(points: Vec<Float3>, params: SplineParams) -> Result<Self> {
        Ok(Self::new(ControlPoints::new(points)?, params))
    }

    pub fn control_points(&self) -> &ControlPoints {
        &self.points
    }

    pub fn tension(&self) -> f32 {
        self.tension
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Length of the traversable parameter window `[0, segment_count)`.
    ///
    /// An open sweep stops three points short of the loop; a closed one
    /// covers every segment.
    pub fn segment_count(&self) -> usize {
        if self.closed {
            self.points.len()
        } else {
            self.points.len() - (MIN_CONTROL_POINTS - 1)
        }
    }

    fn window(&self, s: f32) -> ([Float3; 4], f32) {
        let i = s.floor();
        let t = s - i;
        // Reduce before converting so huge or negative parameters cannot
        // saturate the integer index.
        let base = i.rem_euclid(self.points.len() as f32) as i64;
        (
            [
                self.points.get_wrapped(base - 1),
                self.points.get_wrapped(base),
                self.points.get_wrapped(base + 1),
                self.points.get_wrapped(base + 2),
            ],
            t,
        )
    }

    /// Position on the curve at track parameter `s`.
    pub fn evaluate(&self, s: f32) -> Float3 {
        let ([p0, p1, p2, p3], t) = self.window(s);
        catmull_rom(p0, p1, p2, p3, self.tension, t)
    }

    /// Unnormalized tangent `dP/ds` at track parameter `s`.
    pub fn tangent(&self, s: f32) -> Float3 {
        let ([p0, p1, p2, p3], t) = self.window(s);
        catmull_rom_derivative(p0, p1, p2, p3, self.tension, t)
    }

    /// Highest control point elevation.
    pub fn max_height(&self) -> f32 {
        self.points
            .as_slice()
            .iter()
            .map(|p| p.y)
            .fold(f32::NEG_INFINITY, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TOLERANCE: f32 = 1e-5;

    fn square() -> Spline {
        Spline::from_points(
            vec![
                Float3::new(0.0, 0.0, 0.0),
                Float3::new(1.0, 0.0, 0.0),
                Float3::new(1.0, 0.0, 1.0),
                Float3::new(0.0, 0.0, 1.0),
            ],
            SplineParams::default(),
        )
        .unwrap()
    }

    fn assert_close(a: Float3, b: Float3) {
        assert_relative_eq!(a.x, b.x, epsilon = TOLERANCE);
        assert_relative_eq!(a.y, b.y, epsilon = TOLERANCE);
        assert_relative_eq!(a.z, b.z, epsilon = TOLERANCE);
    }

    #[test]
    fn too_few_points_is_rejected() {
        let err = ControlPoints::new(vec![Float3::ZERO; 3]).unwrap_err();
        assert!(matches!(err, TrackError::TooFewControlPoints { found: 3 }));
    }

    #[test]
    fn non_finite_point_is_rejected() {
        let mut points = vec![Float3::ZERO; 4];
        points[2].y = f32::NAN;
        assert!(matches!(
            ControlPoints::new(points),
            Err(TrackError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn blend_hits_endpoints() {
        let p = [
            Float3::new(-1.0, 0.0, 0.0),
            Float3::new(0.0, 1.0, 0.0),
            Float3::new(2.0, 1.0, 0.0),
            Float3::new(3.0, 0.0, 0.0),
        ];
        assert_close(catmull_rom(p[0], p[1], p[2], p[3], 0.5, 0.0), p[1]);
        assert_close(catmull_rom(p[0], p[1], p[2], p[3], 0.5, 1.0), p[2]);
    }

    #[test]
    fn passes_through_control_points() {
        let spline = square();
        for s in 0..8 {
            let expected = spline.control_points().as_slice()[s % 4];
            assert_close(spline.evaluate(s as f32), expected);
        }
    }

    #[test]
    fn midpoint_of_first_segment() {
        // Hand-evaluated blend weights at t = 0.5, tau = 0.5:
        // [-0.0625, 0.5625, 0.5625, -0.0625]
        let p = square().evaluate(0.5);
        assert_close(p, Float3::new(0.5, 0.0, -0.125));
    }

    #[test]
    fn periodic_over_point_count() {
        let spline = square();
        for &s in &[0.0, 0.25, 0.5, 1.75, 3.9] {
            assert_close(spline.evaluate(s), spline.evaluate(s + 4.0));
        }
    }

    #[test]
    fn extreme_parameters_wrap_without_overflow() {
        let spline = square();
        let first = spline.control_points().as_slice()[0];
        // Every f32 at this magnitude is a multiple of the point count.
        for s in [1e19, -1e19, f32::MAX, f32::MIN] {
            let p = spline.evaluate(s);
            assert!(p.is_finite(), "evaluate({s}) = {p:?}");
            assert_close(p, first);
            assert!(spline.tangent(s).is_finite());
        }
    }

    #[test]
    fn negative_parameter_wraps() {
        let spline = square();
        assert_close(spline.evaluate(-0.5), spline.evaluate(3.5));
        assert_close(spline.evaluate(-4.0), spline.control_points().as_slice()[0]);
    }

    #[test]
    fn tangent_is_continuous_across_segments() {
        let spline = square();
        let before = spline.tangent(1.0 - 1e-4);
        let after = spline.tangent(1.0);
        assert_relative_eq!(before.x, after.x, epsilon = 1e-3);
        assert_relative_eq!(before.z, after.z, epsilon = 1e-3);
    }

    #[test]
    fn tangent_at_knot_spans_neighbors() {
        // At a knot the tangent is tau * (next - previous).
        let spline = square();
        let t = spline.tangent(1.0);
        assert_close(t, Float3::new(0.5, 0.0, 0.5));
    }

    #[test]
    fn segment_count_open_and_closed() {
        let open = square();
        assert_eq!(open.segment_count(), 1);

        let closed = Spline::new(
            open.control_points().clone(),
            SplineParams {
                closed: true,
                ..SplineParams::default()
            },
        );
        assert_eq!(closed.segment_count(), 4);
    }

    #[test]
    fn max_height_picks_highest_point() {
        let spline = Spline::from_points(
            vec![
                Float3::new(0.0, 2.0, 0.0),
                Float3::new(1.0, 7.5, 0.0),
                Float3::new(2.0, -1.0, 0.0),
                Float3::new(3.0, 0.0, 0.0),
            ],
            SplineParams::default(),
        )
        .unwrap();
        assert_relative_eq!(spline.max_height(), 7.5, epsilon = TOLERANCE);
    }
}
