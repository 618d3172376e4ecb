//! Track geometry: splines, rail meshes, control point loading.
//!
//! Control points flow through [`Spline`] into both the one-off
//! [`TrackMeshBuilder`] sweep and the per-frame camera motion.

mod course;
mod loader;
mod mesh;
mod spline;

pub use course::{Track, TRACK_MATRIX_UNIFORM};
pub use loader::{load_file, parse_control_points, ControlPointSource, FileLoader, PointEncoding};
pub use mesh::{
    make_rail_segment, RailProfile, SamplingParams, TrackMesh, TrackMeshBuilder, Vertex,
    MAX_SAMPLES, TRIANGLES_PER_SEGMENT, VERTICES_PER_SEGMENT, VERTICES_PER_TRIANGLE,
};
pub use spline::{
    catmull_rom, catmull_rom_derivative, ControlPoints, Spline, SplineParams, MIN_CONTROL_POINTS,
};
