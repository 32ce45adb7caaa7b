use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

use crate::geometry::Ray;

/// The camera a canvas receives pointer events through.
///
/// Screen space is in pixels with the origin at the top-left corner and y
/// pointing down. Depth follows the wgpu convention (`[0, 1]`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EventCamera {
    /// World → view transform.
    pub view: Mat4,
    /// View → clip transform.
    pub projection: Mat4,
    /// Viewport size in pixels.
    pub viewport: Vec2,
}

impl EventCamera {
    /// Right-handed perspective camera at `eye` looking at `target`.
    pub fn perspective(eye: Vec3, target: Vec3, up: Vec3, fov_y_degrees: f32, viewport: Vec2) -> Self {
        let aspect = if viewport.y > 0.0 { viewport.x / viewport.y } else { 1.0 };
        Self {
            view: Mat4::look_at_rh(eye, target, up),
            projection: Mat4::perspective_rh(fov_y_degrees.to_radians(), aspect, 0.1, 10_000.0),
            viewport,
        }
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Project a world point to pixel coordinates; `None` when it is behind
    /// the camera.
    pub fn world_to_screen(&self, point: Vec3) -> Option<Vec2> {
        let clip = self.view_proj() * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.xy() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.x,
            (1.0 - ndc.y) * 0.5 * self.viewport.y,
        ))
    }

    /// Ray from the near plane through the pixel `screen`.
    pub fn screen_point_to_ray(&self, screen: Vec2) -> Ray {
        let ndc = Vec2::new(
            screen.x / self.viewport.x * 2.0 - 1.0,
            1.0 - screen.y / self.viewport.y * 2.0,
        );
        let inv = self.view_proj().inverse();
        let near = inv.project_point3(ndc.extend(0.0));
        let far = inv.project_point3(ndc.extend(1.0));
        Ray::through(near, far)
    }
}
