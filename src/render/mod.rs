//! Renderer collaborator.
//!
//! The core produces vertex data and view matrices; a [`Renderer`] owns GPU
//! submission.

use crate::sim::Matrix4;
use crate::track::Vertex;

/// Opaque vertex buffer handle issued by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u32);

/// Opaque texture handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Triangles,
    Lines,
    Points,
}

pub trait Renderer {
    fn create_vertex_buffer(&mut self, vertices: &[Vertex]) -> BufferHandle;

    fn delete_vertex_buffer(&mut self, buffer: BufferHandle);

    /// Sets a 4x4 matrix uniform on the active program.
    fn set_matrix(&mut self, name: &str, matrix: &Matrix4);

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle);

    fn bind_and_draw(&mut self, buffer: BufferHandle, vertex_count: usize, kind: PrimitiveKind);
}

/// Mesh resident on the GPU. Only [`crate::track::Track`] creates these.
#[derive(Debug, PartialEq, Eq)]
pub struct GpuMesh {
    pub buffer: BufferHandle,
    pub vertex_count: usize,
}
