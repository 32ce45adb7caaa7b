// ── Vertices, quads and meshes ────────────────────────────────────────────────

pub mod curve;
pub mod tessellate;

use glam::{Vec2, Vec3};

use crate::error::HudError;
use crate::geometry::Rect;

/// One UI vertex as handed to the batch renderer.
///
/// Layout matches a standard UI vertex stream: position, two UV sets, color,
/// normal and tangent. See `renderer::Vertex::layout` for the GPU side.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in the owning widget's local space.
    pub position: [f32; 3],
    pub uv0: [f32; 2],
    pub uv1: [f32; 2],
    /// Linear RGBA tint.
    pub color: [f32; 4],
    pub normal: [f32; 3],
    pub tangent: [f32; 4],
}

impl Vertex {
    /// Vertex at `position` with default normal (-Z, facing the viewer) and
    /// tangent (+X).
    pub fn new(position: Vec3, uv0: Vec2, color: [f32; 4]) -> Self {
        Self {
            position: position.to_array(),
            uv0: uv0.to_array(),
            uv1: [0.0; 2],
            color,
            normal: [0.0, 0.0, -1.0],
            tangent: [1.0, 0.0, 0.0, -1.0],
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

// ── Quad ──────────────────────────────────────────────────────────────────────

/// Four vertices in UI winding order:
///
/// ```text
/// 1──2
/// │  │
/// 0──3
/// ```
/// 0 bottom-left, 1 top-left, 2 top-right, 3 bottom-right. `2 - 1` is the
/// horizontal edge, `1 - 0` the vertical one.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Quad(pub [Vertex; 4]);

impl Quad {
    /// Quad covering `rect` (z = 0) with UVs spanning `[0, 1]`.
    pub fn from_rect(rect: Rect, color: [f32; 4]) -> Self {
        let (min, max) = (rect.min(), rect.max());
        Quad([
            Vertex::new(Vec3::new(min.x, min.y, 0.0), Vec2::new(0.0, 0.0), color),
            Vertex::new(Vec3::new(min.x, max.y, 0.0), Vec2::new(0.0, 1.0), color),
            Vertex::new(Vec3::new(max.x, max.y, 0.0), Vec2::new(1.0, 1.0), color),
            Vertex::new(Vec3::new(max.x, min.y, 0.0), Vec2::new(1.0, 0.0), color),
        ])
    }

    pub fn horizontal_edge(&self) -> Vec3 {
        self.0[2].pos() - self.0[1].pos()
    }

    pub fn vertical_edge(&self) -> Vec3 {
        self.0[1].pos() - self.0[0].pos()
    }
}

// ── Mesh ──────────────────────────────────────────────────────────────────────

/// Ordered list of quads.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub quads: Vec<Quad>,
}

impl Mesh {
    pub fn new() -> Self {
        Self { quads: Vec::new() }
    }

    pub fn from_quads(quads: Vec<Quad>) -> Self {
        Self { quads }
    }

    /// Single-quad mesh covering `rect`.
    pub fn rect(rect: Rect, color: [f32; 4]) -> Self {
        Self::from_quads(vec![Quad::from_rect(rect, color)])
    }

    /// Rebuild quads from a UI triangle stream.
    ///
    /// UI geometry always arrives as quads split into `(0,1,2)` and `(2,3,0)`,
    /// so each run of six vertices yields corners 0, 1, 2 and the fifth
    /// vertex (corner 3). Any other stream length is rejected.
    pub fn from_triangle_stream(stream: &[Vertex]) -> Result<Self, HudError> {
        if stream.len() % 6 != 0 {
            return Err(HudError::NonQuadStream(stream.len()));
        }
        let quads = stream
            .chunks_exact(6)
            .map(|t| Quad([t[0], t[1], t[2], t[4]]))
            .collect();
        Ok(Self { quads })
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.quads.len() * 4
    }

    /// Corner vertices, 4 per quad, in quad order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.quads.iter().flat_map(|q| q.0.iter())
    }

    /// Unindexed triangle list: `(0,1,2)` and `(2,3,0)` per quad.
    pub fn to_triangle_stream(&self) -> Vec<Vertex> {
        let mut out = Vec::with_capacity(self.quads.len() * 6);
        for Quad(v) in &self.quads {
            out.extend_from_slice(&[v[0], v[1], v[2], v[2], v[3], v[0]]);
        }
        out
    }

    /// Index buffer matching [`vertices`](Self::vertices), offset by `base`.
    pub fn indices(&self, base: u32) -> Vec<u32> {
        let mut out = Vec::with_capacity(self.quads.len() * 6);
        for i in 0..self.quads.len() as u32 {
            let b = base + i * 4;
            out.extend_from_slice(&[b, b + 1, b + 2, b + 2, b + 3, b]);
        }
        out
    }
}
