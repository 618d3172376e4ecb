use tracing::{debug, info, warn};

use super::loader::ControlPointSource;
use super::mesh::TrackMesh;
use super::spline::{ControlPoints, Spline};
use crate::config::CoasterConfig;
use crate::error::Result;
use crate::render::{GpuMesh, PrimitiveKind, Renderer, TextureHandle};
use crate::sim::Matrix4;

/// Uniform name for the track model matrix.
pub const TRACK_MATRIX_UNIFORM: &str = "track";

/// A loaded track: its spline, its rail mesh and, once uploaded, the GPU
/// buffer holding that mesh.
///
/// The track exclusively owns its GPU buffer. [`Track::release`] frees it
/// at most once; calling it again is a no-op.
///
/// Dropping does not free the buffer, since no renderer is reachable at
/// that point. Call [`Track::release`] before the track goes out of scope;
/// a track dropped while still uploaded logs a warning naming the buffer.
#[derive(Debug)]
pub struct Track {
    spline: Spline,
    mesh: TrackMesh,
    gpu: Option<GpuMesh>,
}

impl Track {
    pub fn new(points: ControlPoints, config: &CoasterConfig) -> Result<Self> {
        config.validate()?;
        let spline = Spline::new(points, config.spline);
        let mesh = config.mesh_builder().build(&spline)?;
        info!(
            control_points = spline.control_points().len(),
            segments = mesh.segment_count(),
            closed = spline.is_closed(),
            "track built"
        );
        Ok(Self {
            spline,
            mesh,
            gpu: None,
        })
    }

    pub fn load(
        source: &impl ControlPointSource,
        name: &str,
        config: &CoasterConfig,
    ) -> Result<Self> {
        let points = ControlPoints::new(source.load(name)?)?;
        Self::new(points, config)
    }

    pub fn spline(&self) -> &Spline {
        &self.spline
    }

    pub fn mesh(&self) -> &TrackMesh {
        &self.mesh
    }

    /// Highest control point elevation, a natural peak height for motion.
    pub fn peak_height(&self) -> f32 {
        self.spline.max_height()
    }

    pub fn is_uploaded(&self) -> bool {
        self.gpu.is_some()
    }

    /// Uploads the mesh. Does nothing if it is already resident.
    pub fn upload(&mut self, renderer: &mut impl Renderer) {
        if self.gpu.is_some() {
            return;
        }
        let buffer = renderer.create_vertex_buffer(self.mesh.vertices());
        debug!(buffer = buffer.0, vertices = self.mesh.vertex_count(), "track uploaded");
        self.gpu = Some(GpuMesh {
            buffer,
            vertex_count: self.mesh.vertex_count(),
        });
    }

    /// Draws the uploaded mesh with `texture` bound on units 0 and 1.
    ///
    /// Returns `false` without touching the renderer if nothing is uploaded.
    pub fn draw(&self, renderer: &mut impl Renderer, texture: TextureHandle) -> bool {
        let Some(gpu) = &self.gpu else {
            return false;
        };
        renderer.bind_texture(0, texture);
        renderer.bind_texture(1, texture);
        renderer.set_matrix(TRACK_MATRIX_UNIFORM, &Matrix4::IDENTITY);
        renderer.bind_and_draw(gpu.buffer, gpu.vertex_count, PrimitiveKind::Triangles);
        true
    }

    /// Frees the GPU buffer if one is held.
    pub fn release(&mut self, renderer: &mut impl Renderer) {
        if let Some(gpu) = self.gpu.take() {
            debug!(buffer = gpu.buffer.0, "track released");
            renderer.delete_vertex_buffer(gpu.buffer);
        }
    }
}

impl Drop for Track {
    fn drop(&mut self) {
        if let Some(gpu) = &self.gpu {
            warn!(
                buffer = gpu.buffer.0,
                vertices = gpu.vertex_count,
                "track dropped without release, vertex buffer leaked"
            );
        }
    }
}
