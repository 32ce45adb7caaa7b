// =============================================================================
// GEOMETRY.RS — Ray and rectangle primitives for the curved HUD
//
// Small building blocks shared by the tessellator, the collider and the
// raycaster:
// - Linear remapping (the angular <-> planar conversion is built on it)
// - Approximate vector comparison (float-tolerant change detection)
// - Rays, ray/triangle and ray/plane intersection
// - Axis-aligned rectangles for widget hit-testing
// =============================================================================

use glam::{Affine3A, Vec2, Vec3};

/// Default tolerance (squared distance) for [`almost_equal`].
pub const ALMOST_EQUAL_EPSILON: f32 = 0.01;

/// Barycentric slack so rays through shared triangle edges never slip
/// between two neighbours.
const BARYCENTRIC_EPSILON: f32 = 1e-5;

/// Below this, a ray is treated as parallel to a plane or triangle.
const PARALLEL_EPSILON: f32 = 1e-7;

/// Linearly map `value` from `[from_lo, from_hi]` onto `[to_lo, to_hi]`.
///
/// Not clamped: values outside the source range extrapolate. Reversed target
/// ranges are fine, which is how a negative arc angle flips the mapping.
#[inline]
pub fn remap(value: f32, from_lo: f32, from_hi: f32, to_lo: f32, to_hi: f32) -> f32 {
    (value - from_lo) / (from_hi - from_lo) * (to_hi - to_lo) + to_lo
}

/// Approximate comparison: `true` when the squared distance between `a` and
/// `b` is below `accuracy`.
///
/// Use for: change detection on transforms, where exact float equality
/// flickers from frame to frame.
#[inline]
pub fn almost_equal(a: Vec3, b: Vec3, accuracy: f32) -> bool {
    (a - b).length_squared() < accuracy
}

// =============================================================================
// RAYS
// =============================================================================

/// A ray with a unit-length direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Build a ray; `direction` is normalised (a zero direction stays zero
    /// and never intersects anything).
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction: direction.normalize_or_zero() }
    }

    /// Ray from `origin` passing through `target`.
    pub fn through(origin: Vec3, target: Vec3) -> Self {
        Self::new(origin, target - origin)
    }

    /// Point at distance `t` along the ray.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Express this ray in another space. The direction is re-normalised,
    /// so distances measured on the result are in the target space's units.
    pub fn transformed(&self, transform: &Affine3A) -> Ray {
        Ray::new(
            transform.transform_point3(self.origin),
            transform.transform_vector3(self.direction),
        )
    }
}

/// Result of a successful ray intersection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Intersection point, in the space of the ray that was cast.
    pub point: Vec3,
    /// Distance from the ray origin to `point`.
    pub distance: f32,
}

/// Anything a ray can be intersected with.
///
/// This is the physics boundary: the raycaster only needs "nearest hit
/// point and distance, or nothing".
pub trait RayIntersect {
    fn intersect(&self, ray: &Ray) -> Option<RayHit>;
}

/// Möller–Trumbore ray/triangle intersection, two-sided.
///
/// Returns the distance along the ray, or `None` on a miss or when the hit
/// lies behind the origin.
pub fn ray_triangle(ray: &Ray, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    let edge1 = b - a;
    let edge2 = c - a;
    let p = ray.direction.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() < PARALLEL_EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;

    let s = ray.origin - a;
    let u = s.dot(p) * inv_det;
    if u < -BARYCENTRIC_EPSILON || u > 1.0 + BARYCENTRIC_EPSILON {
        return None;
    }

    let q = s.cross(edge1);
    let v = ray.direction.dot(q) * inv_det;
    if v < -BARYCENTRIC_EPSILON || u + v > 1.0 + BARYCENTRIC_EPSILON {
        return None;
    }

    let t = edge2.dot(q) * inv_det;
    (t >= 0.0).then_some(t)
}

/// Intersect a ray with the local `z = 0` plane (the plane every flat canvas
/// and widget rectangle lives in).
pub fn ray_plane_z0(ray: &Ray) -> Option<f32> {
    if ray.direction.z.abs() < PARALLEL_EPSILON {
        return None;
    }
    let t = -ray.origin.z / ray.direction.z;
    (t >= 0.0).then_some(t)
}

/// Both signed distances `(near, far)` at which the infinite line through
/// `ray` meets the sphere of `radius` around `center`. Roots behind the
/// origin are kept; `None` when the line misses the sphere.
pub fn ray_sphere_roots(ray: &Ray, center: Vec3, radius: f32) -> Option<(f32, f32)> {
    let oc = ray.origin - center;
    let b = ray.direction.dot(oc);
    let disc = b * b - (oc.length_squared() - radius * radius);
    if disc < 0.0 || ray.direction == Vec3::ZERO {
        return None;
    }
    let root = disc.sqrt();
    Some((-b - root, -b + root))
}

// =============================================================================
// RECTANGLES
// =============================================================================

/// Axis-aligned rectangle: `x`, `y` is the minimum corner (bottom-left in the
/// y-up canvas space), `width` × `height` the extent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle of `size` centred on the origin (a centre-pivot layout rect).
    pub fn centered(size: Vec2) -> Self {
        Self::new(-size.x * 0.5, -size.y * 0.5, size.x, size.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    /// Half-open containment: the min edges are inside, the max edges are not.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }

    /// `p` expressed as `[0, 1]` coordinates across the rectangle.
    pub fn normalized(&self, p: Vec2) -> Vec2 {
        (p - self.min()) / self.size()
    }
}
