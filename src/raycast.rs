// ── Raycasting onto the curved canvas ─────────────────────────────────────────
//
// Turns a world-space pointer ray into the flat canvas point it lands on, then
// reuses ordinary rectangle hit-testing to find the widgets under it:
//
//   1. flat canvas / curvature off   → plain ray vs canvas-plane test
//      curved canvas                 → ray vs collider mesh, then the exact
//                                      sphere near that hit
//   2. hit point → canvas space → (theta, elevation) → flat (x, y)
//   3. flat point → world → screen, through the event camera
//   4. screen point → every drawn raycast-target graphic whose rectangle
//      contains it, topmost first

use glam::{Affine3A, Vec2, Vec3};

use crate::camera::EventCamera;
use crate::collider::{ColliderMesh, on_canvas};
use crate::geometry::{Ray, RayIntersect, ray_plane_z0, ray_sphere_roots};
use crate::graphic::{Graphic, GraphicRegistry, WidgetId};
use crate::surface::SurfaceConfig;

/// A foreign collider that can block the pointer before it reaches the canvas.
/// Shapes are intersected with the world-space ray.
#[derive(Clone, Copy)]
pub struct Occluder<'a> {
    /// Physics layer, `0..32`.
    pub layer: u32,
    pub shape: &'a dyn RayIntersect,
}

/// Where a ray landed on the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasPoint {
    /// Flat canvas-local coordinates (centre origin, y up).
    pub point: Vec2,
    /// The actual 3D hit, world space.
    pub world_point: Vec3,
    /// Distance from the ray origin to `world_point`.
    pub distance: f32,
}

/// A pointer ray that hit the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct CanvasHit {
    pub canvas_point: Vec2,
    /// `canvas_point` projected through the event camera, in pixels.
    pub screen_point: Vec2,
    pub world_point: Vec3,
    pub distance: f32,
    /// Widgets under the pointer, topmost first.
    pub widgets: Vec<WidgetId>,
}

/// Borrowed view of everything one canvas needs to answer a raycast.
#[derive(Clone, Copy)]
pub struct RaycastMapper<'a> {
    pub surface: &'a SurfaceConfig,
    /// Canvas local space → world space.
    pub canvas_to_world: Affine3A,
    pub collider: Option<&'a ColliderMesh>,
    pub curvature_enabled: bool,
}

impl<'a> RaycastMapper<'a> {
    fn uses_flat_path(&self) -> bool {
        self.surface.is_flat() || !self.curvature_enabled
    }

    /// Map a world-space ray to the flat canvas point under it.
    ///
    /// `None` is a miss: the canvas does not block raycasts, the ray passes
    /// beside it, leaves its angular extent, or an occluder on a considered
    /// layer is closer.
    pub fn map_ray(&self, ray: &Ray, occluders: &[Occluder<'_>]) -> Option<CanvasPoint> {
        if !self.surface.blocks_raycasts() {
            return None;
        }
        let local_ray = ray.transformed(&self.canvas_to_world.inverse());

        let (collider_hit, local_hit, point) = if self.uses_flat_path() {
            let hit = local_ray.at(ray_plane_z0(&local_ray)?);
            let point = hit.truncate();
            if !on_canvas(self.surface, point) {
                return None;
            }
            (hit, hit, point)
        } else {
            let hit = self.collider?.intersect(&local_ray)?;
            let (surface_hit, point) = self.refine(&local_ray, hit.point)?;
            (hit.point, surface_hit, point)
        };

        let world_point = self.canvas_to_world.transform_point3(local_hit);
        let distance = world_point.distance(ray.origin);
        let collider_distance = self.canvas_to_world.transform_point3(collider_hit).distance(ray.origin);

        let mask = self.surface.layer_mask();
        let blocked = occluders
            .iter()
            .filter(|o| mask & (1u32 << o.layer.min(31)) != 0)
            .filter_map(|o| o.shape.intersect(ray))
            .any(|hit| hit.distance < collider_distance);
        if blocked {
            log::trace!("canvas hit at {point} blocked by an occluder");
            return None;
        }

        Some(CanvasPoint { point, world_point, distance })
    }

    /// Move a collider hit onto the sphere the collider approximates.
    ///
    /// The collider is made of flat chords, so its hit sits up to a sagitta
    /// inside the surface and the inverse map would drift. The ray is
    /// re-intersected with the exact sphere from the collider hit, taking the
    /// root closest to it; if that lands outside the angular extent the
    /// collider hit is mapped as is.
    fn refine(&self, local_ray: &Ray, collider_hit: Vec3) -> Option<(Vec3, Vec2)> {
        let surface = self.surface;
        let from_hit = Ray { origin: collider_hit, direction: local_ray.direction };
        let on_sphere = ray_sphere_roots(&from_hit, surface.center(), surface.curve_radius().abs())
            .map(|(near, far)| if near.abs() <= far.abs() { near } else { far })
            .map(|t| from_hit.at(t));

        on_sphere
            .and_then(|p| Some((p, surface.curved_to_canvas(p)?)))
            .or_else(|| Some((collider_hit, surface.curved_to_canvas(collider_hit)?)))
    }

    /// Flat canvas point → pixel position in `camera`'s viewport.
    pub fn canvas_to_screen(&self, camera: &EventCamera, point: Vec2) -> Option<Vec2> {
        camera.world_to_screen(self.canvas_to_world.transform_point3(point.extend(0.0)))
    }

    /// Full pointer query: map the ray, project the result to the screen and
    /// collect the graphics under it.
    pub fn raycast(
        &self,
        camera: &EventCamera,
        graphics: &GraphicRegistry,
        ray: &Ray,
        occluders: &[Occluder<'_>],
    ) -> Option<CanvasHit> {
        if !self.surface.interactable() {
            return None;
        }
        let hit = self.map_ray(ray, occluders)?;
        let screen_point = self.canvas_to_screen(camera, hit.point)?;
        let widgets = graphics_under_point(camera, self.canvas_to_world, graphics, screen_point);
        Some(CanvasHit {
            canvas_point: hit.point,
            screen_point,
            world_point: hit.world_point,
            distance: hit.distance,
            widgets,
        })
    }
}

/// Graphics whose rectangle contains `screen` as seen through `camera`,
/// sorted by descending depth (stable: equal depths keep registration
/// order). Undrawn graphics and non-raycast-targets are skipped.
pub fn graphics_under_point(
    camera: &EventCamera,
    canvas_to_world: Affine3A,
    graphics: &GraphicRegistry,
    screen: Vec2,
) -> Vec<WidgetId> {
    let ray = camera.screen_point_to_ray(screen);
    let mut hits: Vec<&Graphic> = graphics
        .iter()
        .filter(|g| g.is_drawn() && g.raycast_target)
        .filter(|g| contains_screen_ray(g, canvas_to_world, &ray))
        .collect();
    hits.sort_by(|a, b| b.depth.cmp(&a.depth));
    hits.into_iter().map(|g| g.id).collect()
}

fn contains_screen_ray(graphic: &Graphic, canvas_to_world: Affine3A, ray: &Ray) -> bool {
    let world_to_local = (canvas_to_world * graphic.local_to_canvas).inverse();
    let local_ray = ray.transformed(&world_to_local);
    match ray_plane_z0(&local_ray) {
        Some(t) => {
            let p = local_ray.at(t).truncate();
            graphic.rect.contains(p) && graphic.raycast(p)
        }
        None => false,
    }
}
