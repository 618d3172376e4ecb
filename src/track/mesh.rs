use serde::{Deserialize, Serialize};
use tracing::debug;

use super::spline::Spline;
use crate::error::{Result, TrackError};
use crate::sim::{Float2, Float3, Orientation};

/// Upper bound on sampled segments for a single build.
pub const MAX_SAMPLES: usize = 1 << 16;

pub const VERTICES_PER_TRIANGLE: usize = 3;
pub const TRIANGLES_PER_SEGMENT: usize = 8;
pub const VERTICES_PER_SEGMENT: usize = VERTICES_PER_TRIANGLE * TRIANGLES_PER_SEGMENT;

/// Mesh vertex as uploaded to the GPU.
///
/// `normal` is the raw face cross product: not unit length. Consumers must
/// normalize before shading, see [`TrackMesh::normalized_vertices`].
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Vertex {
    pub position: Float3,
    pub normal: Float3,
    pub tex_coords: Float2,
}

impl Vertex {
    pub const fn new(position: Float3, tex_coords: Float2) -> Self {
        Self {
            position,
            normal: Float3::ZERO,
            tex_coords,
        }
    }
}

/// Cross-section of the rail box, relative to the ride line.
///
/// The box spans `half_width` to either side along right, and from
/// `bottom` to `top` below the origin along up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RailProfile {
    pub half_width: f32,
    pub bottom: f32,
    pub top: f32,
    /// Lateral (x) and vertical (y) shift of the whole cross-section.
    pub offset: Float2,
}

impl Default for RailProfile {
    fn default() -> Self {
        Self {
            half_width: 1.0,
            bottom: 0.3,
            top: 0.1,
            offset: Float2::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingParams {
    /// First sampled track parameter.
    pub start: f32,
    pub step: f32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            start: 0.1,
            step: 0.1,
        }
    }
}

/// Non-indexed triangle list for the rails.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackMesh {
    vertices: Vec<Vertex>,
    segments: usize,
}

impl TrackMesh {
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_TRIANGLE
    }

    /// Number of rail segments swept between consecutive frames.
    pub fn segment_count(&self) -> usize {
        self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Copy of the vertices with unit-length normals.
    pub fn normalized_vertices(&self) -> Vec<Vertex> {
        self.vertices
            .iter()
            .map(|v| Vertex {
                normal: v.normal.normalize(),
                ..*v
            })
            .collect()
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Float3, Float3)> {
        let first = self.vertices.first()?.position;
        Some(self.vertices.iter().fold((first, first), |(lo, hi), v| {
            let p = v.position;
            (
                Float3::new(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z)),
                Float3::new(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z)),
            )
        }))
    }
}

/// Pushes one triangle with its face normal on all three vertices.
fn make_triangle(vertices: &mut Vec<Vertex>, a: Float3, b: Float3, c: Float3, flip_normal: bool) {
    let mut normal = (b - a).cross(c - a);
    if flip_normal {
        normal = -normal;
    }

    let mut tri = [
        Vertex::new(a, Float2::new(0.0, 1.0)),
        Vertex::new(b, Float2::new(0.0, 0.0)),
        Vertex::new(c, Float2::new(1.0, 0.0)),
    ];
    for v in &mut tri {
        v.normal += normal;
    }
    vertices.extend_from_slice(&tri);
}

/// Emits the closed rail box between two consecutive frames.
///
/// Four corners per frame, two triangles per side, normals facing outward.
pub fn make_rail_segment(
    vertices: &mut Vec<Vertex>,
    prev: &Orientation,
    cur: &Orientation,
    profile: &RailProfile,
) {
    let corners = |o: &Orientation| {
        let left = profile.offset.x - profile.half_width;
        let right = profile.offset.x + profile.half_width;
        let low = profile.offset.y - profile.bottom;
        let high = profile.offset.y - profile.top;
        [
            o.offset(left, low),
            o.offset(left, high),
            o.offset(right, low),
            o.offset(right, high),
        ]
    };
    let [a1, a2, a3, a4] = corners(prev);
    let [b1, b2, b3, b4] = corners(cur);

    // left
    make_triangle(vertices, a1, a2, b2, true);
    make_triangle(vertices, b2, b1, a1, true);
    // right
    make_triangle(vertices, a3, a4, b4, false);
    make_triangle(vertices, b4, b3, a3, false);
    // top
    make_triangle(vertices, a2, a4, b4, true);
    make_triangle(vertices, b4, b2, a2, true);
    // bottom
    make_triangle(vertices, a1, a3, b3, false);
    make_triangle(vertices, b3, b1, a1, false);
}

/// Sweeps the rail profile along a spline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrackMeshBuilder {
    pub profile: RailProfile,
    pub sampling: SamplingParams,
}

impl TrackMeshBuilder {
    pub fn new(profile: RailProfile, sampling: SamplingParams) -> Self {
        Self { profile, sampling }
    }

    /// Builds the rail mesh.
    ///
    /// Starts from a fixed reference frame at the first control point, then
    /// samples the spline at `start + k * step` while below the segment
    /// count. Samples that produce a degenerate frame are skipped.
    pub fn build(&self, spline: &Spline) -> Result<TrackMesh> {
        let SamplingParams { start, step } = self.sampling;
        if !step.is_finite() || step <= 0.0 {
            return Err(TrackError::invalid("sampling.step", format!("{step} must be positive")));
        }
        if !start.is_finite() || start < 0.0 {
            return Err(TrackError::invalid("sampling.start", format!("{start} must be non-negative")));
        }

        let end = spline.segment_count() as f32;
        let samples = ((end - start) / step).ceil().max(0.0) as usize;
        if samples > MAX_SAMPLES {
            return Err(TrackError::invalid(
                "sampling.step",
                format!("{step} yields {samples} samples, limit is {MAX_SAMPLES}"),
            ));
        }

        let mut vertices = Vec::with_capacity(samples * VERTICES_PER_SEGMENT);
        let mut current = Orientation::seed(spline.control_points().as_slice()[0]);
        let mut segments = 0usize;
        let mut skipped = 0usize;

        for k in 0..=samples {
            let u = start + k as f32 * step;
            if u >= end {
                break;
            }
            match current.propagate(spline.evaluate(u)) {
                Some(next) => {
                    make_rail_segment(&mut vertices, &current, &next, &self.profile);
                    current = next;
                    segments += 1;
                }
                None => skipped += 1,
            }
        }

        debug!(
            segments,
            skipped,
            vertices = vertices.len(),
            "built track mesh"
        );

        Ok(TrackMesh { vertices, segments })
    }
}
