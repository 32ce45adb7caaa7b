// ── Collider proxy mesh ───────────────────────────────────────────────────────
//
// Curving is a vertex-only effect, invisible to ray intersection. The collider
// is a coarse triangle mesh of the same surface, built with the same
// `canvas_to_curved` mapping as the rendered geometry but at the quality
// independent `collider_segment_size`, so its resolution never depends on any
// widget's tessellation.

use glam::{Vec2, Vec3};

use crate::geometry::{Ray, RayHit, RayIntersect, Rect, ray_triangle};
use crate::mesh::Mesh;
use crate::mesh::tessellate::{TessellationStyle, tessellate};
use crate::surface::SurfaceConfig;

/// Triangle mesh in canvas-local space.
#[derive(Clone, Debug, PartialEq)]
pub struct ColliderMesh {
    vertices: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
    generation: u64,
}

impl ColliderMesh {
    pub fn vertices(&self) -> &[Vec3] { &self.vertices }
    pub fn triangles(&self) -> &[[u32; 3]] { &self.triangles }

    /// Generation of the surface snapshot this mesh was built from.
    pub fn generation(&self) -> u64 { self.generation }

    fn corners(&self, tri: &[u32; 3]) -> (Vec3, Vec3, Vec3) {
        (
            self.vertices[tri[0] as usize],
            self.vertices[tri[1] as usize],
            self.vertices[tri[2] as usize],
        )
    }
}

impl RayIntersect for ColliderMesh {
    /// Nearest hit over all triangles. `ray` must be in canvas-local space.
    fn intersect(&self, ray: &Ray) -> Option<RayHit> {
        self.triangles
            .iter()
            .filter_map(|tri| {
                let (a, b, c) = self.corners(tri);
                ray_triangle(ray, a, b, c)
            })
            .min_by(|a, b| a.total_cmp(b))
            .map(|t| RayHit { point: ray.at(t), distance: t })
    }
}

/// Build the collider for `surface`.
///
/// Returns `None` when the canvas does not block raycasts (it is then
/// untouchable) or its size is invalid. A flat surface yields the bare
/// canvas rectangle as two triangles.
pub fn build_collider(surface: &SurfaceConfig) -> Option<ColliderMesh> {
    if !surface.blocks_raycasts() || surface.validate().is_err() {
        return None;
    }

    let flat = Mesh::rect(Rect::centered(surface.canvas_size()), [1.0; 4]);
    let mesh = if surface.is_flat() {
        flat
    } else {
        tessellate(&flat, surface.collider_segment_size(), TessellationStyle::Regular)
    };

    let vertices: Vec<Vec3> = mesh.vertices().map(|v| surface.canvas_to_curved(v.pos())).collect();
    let triangles = (0..mesh.len() as u32)
        .flat_map(|q| {
            let i = q * 4;
            [[i, i + 1, i + 2], [i + 3, i, i + 2]]
        })
        .collect();

    log::debug!(
        "collider rebuilt: {} vertices, angle {}°, canvas {}",
        vertices.len(),
        surface.angle(),
        surface.canvas_size()
    );

    Some(ColliderMesh { vertices, triangles, generation: surface.generation() })
}

/// `true` when `point` lies on the canvas rectangle, edges included.
pub fn on_canvas(surface: &SurfaceConfig, point: Vec2) -> bool {
    let half = surface.canvas_size() * 0.5;
    point.x.abs() <= half.x && point.y.abs() <= half.y
}
