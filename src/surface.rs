// ── SurfaceConfig ─────────────────────────────────────────────────────────────
//
// Curvature parameters of one canvas and the canonical canvas → curved-surface
// transform. Rendering (vertex curving) and hit-testing (collider + inverse
// mapping) both go through this file so what is drawn and what can be hit
// never diverge.
//
// Canvas-local space is y-up with the canvas centred on the origin and lying
// in the z = 0 plane. The curved surface is a section of a sphere of radius
// `r` whose centre sits at (0, 0, -r): the canvas centre stays at the origin
// and the edges bend towards -z (towards the viewer) for positive angles and
// away from it for negative ones.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use crate::error::HudError;
use crate::geometry::remap;

/// Smallest arc magnitude used by the mapping formula, in degrees.
///
/// An angle of exactly 0 means "flat" but the radius formula divides by the
/// angle, so the curved code paths (collider, inverse mapping) substitute
/// this value instead of dividing by zero.
pub const MIN_ANGLE: f32 = 1.0;

/// Segments a full 360° circle is approximated with before quality scaling.
pub const BASE_CIRCLE_SEGMENTS: f32 = 24.0;

/// Default divisor applied to the collider segment size for visual geometry.
pub const DEFAULT_TESSELLATION_QUALITY: f32 = 10.0;

/// Angular slack (degrees) accepted at the canvas border by the inverse map.
const EXTENT_TOLERANCE: f32 = 0.01;

/// Immutable curvature snapshot for one canvas.
///
/// Every change that affects geometry produces a new snapshot with a bumped
/// `generation`, so per-widget caches can detect staleness by comparing a
/// single integer. The radius is derived when the snapshot is built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceConfig {
    angle: f32,
    canvas_size: Vec2,
    radius: f32,
    tessellation_quality: f32,
    interactable: bool,
    blocks_raycasts: bool,
    raycast_own_layer_only: bool,
    layer: u32,
    generation: u64,
}

impl SurfaceConfig {
    /// New snapshot for a canvas of `canvas_size` curved over `angle` degrees.
    pub fn new(canvas_size: Vec2, angle: f32) -> Self {
        let mut config = Self {
            angle,
            canvas_size,
            radius: 0.0,
            tessellation_quality: DEFAULT_TESSELLATION_QUALITY,
            interactable: true,
            blocks_raycasts: true,
            raycast_own_layer_only: false,
            layer: 0,
            generation: 0,
        };
        config.radius = config.compute_radius();
        config
    }

    // ── Mutation (copy-on-write) ──────────────────────────────────────────────

    /// Snapshot with a new horizontal arc angle. Any value is accepted; 0 is
    /// flat, the sign selects the curvature direction.
    pub fn with_angle(self, angle: f32) -> Self {
        if angle != 0.0 && angle.abs() < MIN_ANGLE {
            log::debug!(
                "{}",
                HudError::GeometryDegenerate { requested: angle, clamped: MIN_ANGLE.copysign(angle) }
            );
        }
        self.rebuilt(|c| c.angle = angle)
    }

    pub fn with_canvas_size(self, canvas_size: Vec2) -> Self {
        self.rebuilt(|c| c.canvas_size = canvas_size)
    }

    /// Snapshot with a new quality divisor, clamped to `[0.01, 10]`.
    pub fn with_tessellation_quality(self, quality: f32) -> Self {
        self.rebuilt(|c| c.tessellation_quality = quality.clamp(0.01, 10.0))
    }

    // Interaction flags do not affect geometry: no generation bump.

    pub fn with_interactable(mut self, interactable: bool) -> Self {
        self.interactable = interactable;
        self
    }

    pub fn with_blocks_raycasts(mut self, blocks_raycasts: bool) -> Self {
        self.blocks_raycasts = blocks_raycasts;
        self
    }

    pub fn with_raycast_own_layer_only(mut self, own_layer_only: bool) -> Self {
        self.raycast_own_layer_only = own_layer_only;
        self
    }

    pub fn with_layer(mut self, layer: u32) -> Self {
        self.layer = layer.min(31);
        self
    }

    fn rebuilt(mut self, change: impl FnOnce(&mut Self)) -> Self {
        change(&mut self);
        self.radius = self.compute_radius();
        self.generation += 1;
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    /// Requested horizontal arc angle in degrees (0 = flat).
    pub fn angle(&self) -> f32 { self.angle }

    /// Vertical arc angle in degrees, derived from the aspect ratio so both
    /// directions share one sphere: `angle * height / width`.
    pub fn vertical_angle(&self) -> f32 {
        Self::vertical_for(self.angle, self.canvas_size)
    }

    pub fn canvas_size(&self) -> Vec2 { self.canvas_size }
    pub fn tessellation_quality(&self) -> f32 { self.tessellation_quality }
    pub fn interactable(&self) -> bool { self.interactable }
    pub fn blocks_raycasts(&self) -> bool { self.blocks_raycasts }
    pub fn raycast_own_layer_only(&self) -> bool { self.raycast_own_layer_only }
    pub fn layer(&self) -> u32 { self.layer }

    /// Monotonic marker bumped on every geometry-affecting change.
    pub fn generation(&self) -> u64 { self.generation }

    /// `true` when the canvas is not curved at all.
    pub fn is_flat(&self) -> bool { self.angle == 0.0 }

    /// Layers the raycaster considers: only this canvas's layer, or all.
    pub fn layer_mask(&self) -> u32 {
        if self.raycast_own_layer_only { 1 << self.layer } else { u32::MAX }
    }

    /// Radius of the curved surface in canvas units; `None` while flat.
    /// Negative for negative angles.
    pub fn radius(&self) -> Option<f32> {
        (!self.is_flat()).then_some(self.radius)
    }

    /// The angle the mapping formula actually uses: the requested angle with
    /// magnitudes below [`MIN_ANGLE`] (including 0) raised to it.
    pub fn effective_angle(&self) -> f32 {
        if self.angle.abs() < MIN_ANGLE {
            MIN_ANGLE.copysign(if self.angle == 0.0 { 1.0 } else { self.angle })
        } else {
            self.angle
        }
    }

    /// Radius derived from [`effective_angle`](Self::effective_angle); always
    /// finite for a valid canvas size.
    pub fn curve_radius(&self) -> f32 { self.radius }

    /// Err when either canvas dimension is not a positive, finite number.
    pub fn validate(&self) -> Result<(), HudError> {
        let Vec2 { x: width, y: height } = self.canvas_size;
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            Ok(())
        } else {
            Err(HudError::Configuration { width, height })
        }
    }

    fn compute_radius(&self) -> f32 {
        if self.validate().is_err() {
            return 0.0;
        }
        self.canvas_size.x / (TAU * (self.effective_angle() / 360.0))
    }

    fn vertical_for(angle: f32, size: Vec2) -> f32 {
        if size.x == 0.0 { 0.0 } else { angle * (size.y / size.x) }
    }

    // ── Tessellation density ──────────────────────────────────────────────────

    /// Largest sub-quad (width, height) the collider may use before the chord
    /// error becomes visible. Quality independent.
    ///
    /// ```text
    /// seg_w = min(w / 4, w / (|angle| / 360 * BASE_CIRCLE_SEGMENTS / 2))
    /// seg_h = seg_w * h / w
    /// ```
    /// A flat canvas needs no subdivision: the whole canvas size is returned.
    pub fn collider_segment_size(&self) -> Vec2 {
        let Vec2 { x: w, y: h } = self.canvas_size;
        if self.is_flat() || self.validate().is_err() {
            return self.canvas_size;
        }
        let arc_fraction = remap(self.effective_angle().abs(), 0.0, 360.0, 0.0, 1.0);
        let seg_w = (w / 4.0).min(w / (arc_fraction * BASE_CIRCLE_SEGMENTS * 0.5));
        Vec2::new(seg_w, seg_w * h / w)
    }

    /// Largest sub-quad size for rendered widget geometry: the collider size
    /// divided by the tessellation quality. Flat canvases are not subdivided.
    pub fn required_size(&self) -> Vec2 {
        if self.is_flat() {
            return self.canvas_size;
        }
        self.collider_segment_size() / self.tessellation_quality
    }

    // ── Forward / inverse mapping ─────────────────────────────────────────────

    /// Map a canvas-local point onto the curved surface (canvas-local units).
    ///
    /// ```text
    /// theta = remap(x / w, -0.5, 0.5, -angle / 2, angle / 2)
    /// gamma = remap(y / h, -0.5, 0.5, 90 - vangle / 2, 90 + vangle / 2)
    /// r     = radius - z      (angle > 0)      radius + z   (angle < 0)
    /// out   = (sin γ sin θ r,  -r cos γ,  sin γ cos θ r - radius)
    /// ```
    /// `gamma` is evaluated through its elevation `gamma - 90°` so the canvas
    /// centre lands exactly on the origin. A flat surface is the identity;
    /// non-finite results collapse to the origin.
    pub fn canvas_to_curved(&self, pos: Vec3) -> Vec3 {
        if self.is_flat() || self.validate().is_err() {
            return pos;
        }
        let angle = self.effective_angle();
        let vangle = Self::vertical_for(angle, self.canvas_size);
        let radius = self.radius;
        let r = if angle > 0.0 { radius - pos.z } else { radius + pos.z };

        let theta = remap(pos.x / self.canvas_size.x, -0.5, 0.5, -angle / 2.0, angle / 2.0).to_radians();
        let elevation = remap(pos.y / self.canvas_size.y, -0.5, 0.5, -vangle / 2.0, vangle / 2.0).to_radians();

        // sin(gamma) = cos(elevation), -cos(gamma) = sin(elevation)
        let ring = elevation.cos() * r;
        let out = Vec3::new(ring * theta.sin(), r * elevation.sin(), ring * theta.cos() - radius);
        if out.is_finite() { out } else { Vec3::ZERO }
    }

    /// Centre of the sphere the canvas is wrapped around, canvas-local.
    pub fn center(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, -self.radius)
    }

    /// Recover flat canvas coordinates from a point on (or near) the curved
    /// surface.
    ///
    /// Only the linear remap step is inverted: `theta` and the elevation are
    /// read straight off the direction from the sphere centre to `pos`, which
    /// makes the result independent of the point's distance from the centre.
    /// Returns `None` when the direction falls outside the canvas's angular
    /// extent. A flat surface returns `(x, y)` unchanged.
    pub fn curved_to_canvas(&self, pos: Vec3) -> Option<Vec2> {
        if self.validate().is_err() {
            return None;
        }
        if self.is_flat() {
            return Some(pos.truncate());
        }
        let angle = self.effective_angle();
        let vangle = Self::vertical_for(angle, self.canvas_size);

        // For negative angles the radius is negative and the surface lies on
        // the far side of the centre; flip so the direction is the same unit
        // vector the forward map was built from.
        let dir = ((pos - self.center()) * angle.signum()).normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }

        let theta = dir.x.atan2(dir.z).to_degrees();
        let elevation = dir.y.atan2(Vec2::new(dir.x, dir.z).length()).to_degrees();

        let (half_h, half_v) = (angle.abs() / 2.0, vangle.abs() / 2.0);
        if theta.abs() > half_h + EXTENT_TOLERANCE || elevation.abs() > half_v + EXTENT_TOLERANCE {
            return None;
        }

        let Vec2 { x: w, y: h } = self.canvas_size;
        Some(Vec2::new(
            remap(theta, -angle / 2.0, angle / 2.0, -w / 2.0, w / 2.0),
            remap(elevation, -vangle / 2.0, vangle / 2.0, -h / 2.0, h / 2.0),
        ))
    }
}
