// ── Renderer boundary ─────────────────────────────────────────────────────────
//
// The core never draws. It hands curved geometry over as a plain vertex/index
// batch plus the wgpu vertex layout a UI pipeline needs to consume it.

use crate::mesh::{Mesh, Vertex};

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x2, // uv0
        2 => Float32x2, // uv1
        3 => Float32x4, // color
        4 => Float32x3, // normal
        5 => Float32x4, // tangent
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Curved geometry accumulated for one frame. Holds no GPU state.
///
/// Call [`clear`](Self::clear) once per frame and let each canvas append its
/// widgets; the vertices are laid out for [`Vertex::layout`].
#[derive(Clone, Debug, Default)]
pub struct HudBatch {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl HudBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Append `mesh`; its indices are offset by the vertices already present
    /// so several widgets share one buffer.
    pub fn push_mesh(&mut self, mesh: &Mesh) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(mesh.vertices().copied());
        self.indices.extend(mesh.indices(base));
    }
}
