//! C FFI for coastercam.
//!
//! Functions:
//! - `coaster_default_mesh_params` - default build settings
//! - `coaster_evaluate` - spline position at a track parameter
//! - `coaster_mesh_size` / `coaster_build_mesh` - rail mesh into a caller buffer
//!
//! # Error Codes
//! - `0`: Success
//! - `-1`: Null pointer
//! - `-2`: Fewer than 4 control points
//! - `-3`: Buffer overflow (resize and retry)
//! - `-4`: Invalid parameter

use crate::config::CoasterConfig;
use crate::error::TrackError;
use crate::sim::{Float2, Float3};
use crate::track::{RailProfile, SamplingParams, Spline, SplineParams, TrackMesh, Vertex};

pub const COASTER_OK: i32 = 0;
pub const COASTER_NULL_POINTER: i32 = -1;
pub const COASTER_TOO_FEW_POINTS: i32 = -2;
pub const COASTER_BUFFER_OVERFLOW: i32 = -3;
pub const COASTER_INVALID_PARAMETER: i32 = -4;

/// Track build settings.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoasterMeshParams {
    pub tension: f32,
    /// Non-zero sweeps the whole loop.
    pub closed: u8,
    pub sample_start: f32,
    pub sample_step: f32,
    pub rail_half_width: f32,
    pub rail_bottom: f32,
    pub rail_top: f32,
}

impl CoasterMeshParams {
    fn to_config(self) -> CoasterConfig {
        CoasterConfig {
            spline: SplineParams {
                tension: self.tension,
                closed: self.closed != 0,
            },
            rail: RailProfile {
                half_width: self.rail_half_width,
                bottom: self.rail_bottom,
                top: self.rail_top,
                offset: Float2::ZERO,
            },
            sampling: SamplingParams {
                start: self.sample_start,
                step: self.sample_step,
            },
            ..CoasterConfig::default()
        }
    }
}

impl Default for CoasterMeshParams {
    fn default() -> Self {
        let config = CoasterConfig::default();
        Self {
            tension: config.spline.tension,
            closed: config.spline.closed as u8,
            sample_start: config.sampling.start,
            sample_step: config.sampling.step,
            rail_half_width: config.rail.half_width,
            rail_bottom: config.rail.bottom,
            rail_top: config.rail.top,
        }
    }
}

#[no_mangle]
pub extern "C" fn coaster_default_mesh_params() -> CoasterMeshParams {
    CoasterMeshParams::default()
}

/// Evaluate the spline through `points` at track parameter `s`.
///
/// # Safety
///
/// - `points` must be valid for `count` reads
/// - `out` must be a valid, writable pointer
#[no_mangle]
pub unsafe extern "C" fn coaster_evaluate(
    points: *const Float3,
    count: usize,
    tension: f32,
    s: f32,
    out: *mut Float3,
) -> i32 {
    if out.is_null() {
        return COASTER_NULL_POINTER;
    }
    let params = SplineParams {
        tension,
        ..SplineParams::default()
    };
    match spline_from_raw(points, count, params) {
        Ok(spline) => {
            *out = spline.evaluate(s);
            COASTER_OK
        }
        Err(code) => code,
    }
}

/// Number of vertices `coaster_build_mesh` will write, or a negative error code.
///
/// # Safety
///
/// - `points` must be valid for `count` reads
/// - `params` must be null (defaults) or point to a valid `CoasterMeshParams`
#[no_mangle]
pub unsafe extern "C" fn coaster_mesh_size(
    points: *const Float3,
    count: usize,
    params: *const CoasterMeshParams,
) -> i64 {
    match build_from_raw(points, count, params) {
        Ok(mesh) => mesh.vertex_count() as i64,
        Err(code) => code as i64,
    }
}

/// Build the rail mesh into `out`.
///
/// # Safety
///
/// - `points` must be valid for `count` reads
/// - `params` must be null (defaults) or point to a valid `CoasterMeshParams`
/// - `out` must be valid for `capacity` writes
/// - `out_count` must be a valid, writable pointer
#[no_mangle]
pub unsafe extern "C" fn coaster_build_mesh(
    points: *const Float3,
    count: usize,
    params: *const CoasterMeshParams,
    out: *mut Vertex,
    capacity: usize,
    out_count: *mut usize,
) -> i32 {
    if out.is_null() || out_count.is_null() {
        return COASTER_NULL_POINTER;
    }
    let mesh = match build_from_raw(points, count, params) {
        Ok(mesh) => mesh,
        Err(code) => return code,
    };

    let vertices = mesh.vertices();
    if vertices.len() > capacity {
        return COASTER_BUFFER_OVERFLOW;
    }
    std::ptr::copy_nonoverlapping(vertices.as_ptr(), out, vertices.len());
    *out_count = vertices.len();

    COASTER_OK
}

// --- Helpers ---

fn error_code(err: &TrackError) -> i32 {
    match err {
        TrackError::TooFewControlPoints { .. } => COASTER_TOO_FEW_POINTS,
        _ => COASTER_INVALID_PARAMETER,
    }
}

unsafe fn spline_from_raw(
    points: *const Float3,
    count: usize,
    params: SplineParams,
) -> Result<Spline, i32> {
    if points.is_null() {
        return Err(COASTER_NULL_POINTER);
    }
    let points = std::slice::from_raw_parts(points, count).to_vec();
    Spline::from_points(points, params).map_err(|e| error_code(&e))
}

unsafe fn build_from_raw(
    points: *const Float3,
    count: usize,
    params: *const CoasterMeshParams,
) -> Result<TrackMesh, i32> {
    let params = if params.is_null() {
        CoasterMeshParams::default()
    } else {
        *params
    };
    let config = params.to_config();
    config.validate().map_err(|e| error_code(&e))?;

    let spline = spline_from_raw(points, count, config.spline)?;
    config
        .mesh_builder()
        .build(&spline)
        .map_err(|e| error_code(&e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square() -> Vec<Float3> {
        vec![
            Float3::new(0.0, 0.0, 0.0),
            Float3::new(4.0, 0.0, 0.0),
            Float3::new(4.0, 0.0, 4.0),
            Float3::new(0.0, 0.0, 4.0),
        ]
    }

    #[test]
    fn evaluate_hits_control_point() {
        let points = square();
        let mut out = Float3::ZERO;
        let code = unsafe { coaster_evaluate(points.as_ptr(), points.len(), 0.5, 2.0, &mut out) };
        assert_eq!(code, COASTER_OK);
        assert_relative_eq!(out.x, 4.0, epsilon = 1e-5);
        assert_relative_eq!(out.z, 4.0, epsilon = 1e-5);
    }

    #[test]
    fn null_and_short_inputs() {
        let points = square();
        let mut out = Float3::ZERO;
        let code = unsafe { coaster_evaluate(std::ptr::null(), 4, 0.5, 0.0, &mut out) };
        assert_eq!(code, COASTER_NULL_POINTER);
        let code = unsafe { coaster_evaluate(points.as_ptr(), 3, 0.5, 0.0, &mut out) };
        assert_eq!(code, COASTER_TOO_FEW_POINTS);
    }

    #[test]
    fn build_mesh_into_buffer() {
        let points = square();
        let params = CoasterMeshParams {
            closed: 1,
            ..CoasterMeshParams::default()
        };
        let size = unsafe { coaster_mesh_size(points.as_ptr(), points.len(), &params) };
        assert!(size > 0);
        assert_eq!(size % 24, 0);

        let mut buffer = vec![Vertex::default(); size as usize];
        let mut written = 0usize;
        let code = unsafe {
            coaster_build_mesh(
                points.as_ptr(),
                points.len(),
                &params,
                buffer.as_mut_ptr(),
                buffer.len(),
                &mut written,
            )
        };
        assert_eq!(code, COASTER_OK);
        assert_eq!(written as i64, size);
    }

    #[test]
    fn build_mesh_reports_overflow() {
        let points = square();
        let mut buffer = vec![Vertex::default(); 3];
        let mut written = 0usize;
        let code = unsafe {
            coaster_build_mesh(
                points.as_ptr(),
                points.len(),
                std::ptr::null(),
                buffer.as_mut_ptr(),
                buffer.len(),
                &mut written,
            )
        };
        assert_eq!(code, COASTER_BUFFER_OVERFLOW);
        assert_eq!(written, 0);
    }

    #[test]
    fn invalid_step_is_rejected() {
        let points = square();
        let params = CoasterMeshParams {
            sample_step: 0.0,
            ..CoasterMeshParams::default()
        };
        let size = unsafe { coaster_mesh_size(points.as_ptr(), points.len(), &params) };
        assert_eq!(size, COASTER_INVALID_PARAMETER as i64);
    }
}
