// ── Tessellation ──────────────────────────────────────────────────────────────
//
// A flat quad only bends where it has vertices, so a wide quad on a curved
// canvas must be split into a grid of smaller quads first. The grid size is
// chosen so no sub-quad edge exceeds `required_size` (see
// `SurfaceConfig::required_size`).

use glam::{Vec2, Vec3};

use super::{Mesh, Quad, Vertex};

/// Small slack so an already-subdivided quad whose edge is a hair over the
/// limit after interpolation is not split again.
const EDGE_EPSILON: f32 = 1e-4;

/// How a widget's quads are subdivided.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TessellationStyle {
    /// Subdivide along the quad's own horizontal and vertical edges.
    #[default]
    Regular,
    /// Filled (progress) images: subdivide along the longer of each pair of
    /// opposite edges, since a partial fill shrinks one side only.
    Filled,
    /// Keep quads as they are (text, procedural meshes).
    Skip,
}

/// Number of sub-quads `(horizontal, vertical)` for `quad`; at least 1 each.
///
/// ```text
/// nx = ceil(|horizontal edge| / max(1, required.x))
/// ny = ceil(|vertical edge|   / max(1, required.y))
/// ```
pub fn subdivision_counts(quad: &Quad, required_size: Vec2, style: TessellationStyle) -> (u32, u32) {
    if style == TessellationStyle::Skip {
        return (1, 1);
    }
    let (horizontal, vertical) = edges(quad, style);
    let count = |len: f32, limit: f32| {
        let n = (len / limit.max(1.0) - EDGE_EPSILON).ceil();
        if n.is_finite() { (n as u32).max(1) } else { 1 }
    };
    (count(horizontal.length(), required_size.x), count(vertical.length(), required_size.y))
}

fn edges(quad: &Quad, style: TessellationStyle) -> (Vec3, Vec3) {
    let mut horizontal = quad.horizontal_edge();
    let mut vertical = quad.vertical_edge();
    if style == TessellationStyle::Filled {
        let v = &quad.0;
        let bottom = v[3].pos() - v[0].pos();
        let right = v[2].pos() - v[3].pos();
        if bottom.x >= horizontal.x {
            horizontal = bottom;
        }
        if right.y >= vertical.y {
            vertical = right;
        }
    }
    (horizontal, vertical)
}

/// Split one quad into an `nx × ny` grid, row by row from the bottom.
///
/// Positions and both UV sets are bilinearly interpolated; color, normal and
/// tangent are copied from corner 0 (colour lerps are not worth their cost
/// for UI tints).
pub fn tessellate_quad(quad: &Quad, required_size: Vec2, style: TessellationStyle) -> Vec<Quad> {
    let (nx, ny) = subdivision_counts(quad, required_size, style);
    if nx == 1 && ny == 1 {
        return vec![*quad];
    }

    let mut out = Vec::with_capacity(nx as usize * ny as usize);
    for y in 0..ny {
        let y0 = y as f32 / ny as f32;
        let y1 = (y + 1) as f32 / ny as f32;
        for x in 0..nx {
            let x0 = x as f32 / nx as f32;
            let x1 = (x + 1) as f32 / nx as f32;
            out.push(Quad([
                interpolate(quad, x0, y0),
                interpolate(quad, x0, y1),
                interpolate(quad, x1, y1),
                interpolate(quad, x1, y0),
            ]));
        }
    }
    out
}

/// Tessellate every quad of `mesh`.
pub fn tessellate(mesh: &Mesh, required_size: Vec2, style: TessellationStyle) -> Mesh {
    Mesh::from_quads(
        mesh.quads
            .iter()
            .flat_map(|q| tessellate_quad(q, required_size, style))
            .collect(),
    )
}

/// Bilinear blend of the quad corners at `(x, y)` in `[0, 1]²`, `x` running
/// along the horizontal edge and `y` along the vertical one.
fn interpolate(quad: &Quad, x: f32, y: f32) -> Vertex {
    let weights = [(1.0 - x) * (1.0 - y), (1.0 - x) * y, x * y, x * (1.0 - y)];

    let mut pos = Vec3::ZERO;
    let mut uv0 = Vec2::ZERO;
    let mut uv1 = Vec2::ZERO;
    for (v, w) in quad.0.iter().zip(weights) {
        pos += v.pos() * w;
        uv0 += Vec2::from_array(v.uv0) * w;
        uv1 += Vec2::from_array(v.uv1) * w;
    }

    Vertex {
        position: pos.to_array(),
        uv0: uv0.to_array(),
        uv1: uv1.to_array(),
        ..quad.0[0]
    }
}
