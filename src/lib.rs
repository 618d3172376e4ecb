//! coastercam - procedural roller coaster tracks and a camera that rides them.
//!
//! # Architecture
//!
//! Layered modules with strict inward-only dependencies:
//!
//! - **sim**: Math and physics primitives (Float3, Orientation, speed law)
//! - **track**: Catmull-Rom spline, rail mesh sweep, control point loading
//! - **render**: Renderer collaborator trait and GPU handles
//! - **camera**: Free camera and the track-following camera
//! - **ffi**: C FFI bindings
//!
//! # Usage
//!
//! ```ignore
//! use coastercam::{CoasterConfig, CameraRig, FileLoader, PointEncoding, Track};
//!
//! let config = CoasterConfig::default();
//! let loader = FileLoader::new("media", PointEncoding::AUTHORED);
//! let track = Track::load(&loader, "goliath.sp", &config)?;
//! let mut rig = CameraRig::new(Default::default(), config.motion);
//! rig.toggle_track_mode();
//! rig.update(1.0 / 60.0, track.spline());
//! let view = rig.view_matrix();
//! ```
//!
//! For C, link the cdylib and use the `coaster_*` FFI functions.

pub mod camera;
pub mod config;
pub mod error;
pub mod render;
pub mod sim;
pub mod track;

#[cfg(feature = "ffi")]
pub mod ffi;

// Re-export commonly used types at crate root
pub use camera::{CameraMovement, CameraRig, FreeCamera, TrackMotionController, ViewSource};
pub use config::CoasterConfig;
pub use error::TrackError;
pub use sim::{Float3, FramePair, Matrix4, Orientation};
pub use track::{FileLoader, PointEncoding, Spline, Track, TrackMesh, TrackMeshBuilder};
