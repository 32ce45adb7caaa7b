// ── Vertex curving ────────────────────────────────────────────────────────────
//
// Bends tessellated widget geometry onto the curved surface. Vertices live in
// the widget's local space; they are moved into the shared canvas space,
// mapped with `SurfaceConfig::canvas_to_curved`, and moved back, so every
// widget under one canvas bends around the same sphere.

use glam::Affine3A;

use super::{Mesh, Quad, Vertex};
use crate::surface::SurfaceConfig;

/// Curve a single vertex. `to_canvas` maps widget-local to canvas-local,
/// `to_local` is its inverse.
#[inline]
pub fn curve_vertex(surface: &SurfaceConfig, vertex: Vertex, to_canvas: &Affine3A, to_local: &Affine3A) -> Vertex {
    let in_canvas = to_canvas.transform_point3(vertex.pos());
    let curved = surface.canvas_to_curved(in_canvas);
    Vertex { position: to_local.transform_point3(curved).to_array(), ..vertex }
}

/// Curve every vertex of `mesh` for a widget placed at `local_to_canvas`.
pub fn curve_mesh(surface: &SurfaceConfig, mesh: &Mesh, local_to_canvas: &Affine3A) -> Mesh {
    let to_local = local_to_canvas.inverse();
    Mesh::from_quads(
        mesh.quads
            .iter()
            .map(|Quad(v)| Quad(v.map(|vert| curve_vertex(surface, vert, local_to_canvas, &to_local))))
            .collect(),
    )
}
