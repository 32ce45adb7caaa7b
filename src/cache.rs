// ── Per-widget geometry cache ─────────────────────────────────────────────────
//
// Decides, once per frame, how much work a widget needs:
//
//   full re-tessellation  size / fill / tint / glyph UV / surface generation
//                         changed, or the widget rotated into or out of
//                         alignment with the canvas up axis
//   re-curve only         moved horizontally or in depth, or rotated or
//                         scaled in any direction (yaw included)
//   nothing               otherwise (pure vertical moves included)
//
// Re-curving reuses the tessellated snapshot; tessellation always implies
// curving.

use glam::{Affine3A, Mat3A, Vec2, Vec3};

use crate::geometry::{almost_equal, ALMOST_EQUAL_EPSILON};
use crate::mesh::Mesh;

/// Squared per-axis movement that counts as a horizontal or depth move.
const MOVE_EPSILON: f32 = 0.00001;
/// Tolerance for up-vector comparison.
const UP_EPSILON: f32 = 0.0001;
/// Per-element tolerance for the rotation/scale part of the placement.
const BASIS_EPSILON: f32 = 0.0001;

/// What the owning layout reports about a widget this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WidgetState {
    /// Size of the widget's layout rectangle.
    pub rect_size: Vec2,
    /// Widget local space → canvas local space.
    pub local_to_canvas: Affine3A,
    pub color: [f32; 4],
    /// Fill / progress amount for filled images, 1.0 otherwise.
    pub fill_amount: f32,
    /// UV of the first glyph vertex for text; changes when the glyph atlas is
    /// rebuilt.
    pub text_uv0: Option<Vec2>,
}

impl WidgetState {
    pub fn new(rect_size: Vec2, local_to_canvas: Affine3A) -> Self {
        Self { rect_size, local_to_canvas, color: [1.0; 4], fill_amount: 1.0, text_uv0: None }
    }

    /// Widget origin in canvas space.
    pub fn canvas_position(&self) -> Vec3 {
        self.local_to_canvas.transform_point3(Vec3::ZERO)
    }

    /// Widget up axis in canvas space.
    pub fn canvas_up(&self) -> Vec3 {
        self.local_to_canvas.transform_vector3(Vec3::Y).normalize_or_zero()
    }
}

/// Cached geometry and dirty flags for one widget.
///
/// Created on first draw and never dropped; staleness is expressed through
/// the flags, which start out set.
#[derive(Clone, Debug)]
pub struct GeometryCache {
    rect_size: Vec2,
    position: Vec3,
    up: Vec3,
    basis: Mat3A,
    color: [f32; 4],
    fill_amount: f32,
    text_uv0: Option<Vec2>,
    generation: Option<u64>,
    tessellated: Option<Mesh>,
    curved: Mesh,
    tessellation_required: bool,
    curving_required: bool,
}

impl Default for GeometryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryCache {
    pub fn new() -> Self {
        Self {
            rect_size: Vec2::ZERO,
            position: Vec3::ZERO,
            up: Vec3::ZERO,
            basis: Mat3A::ZERO,
            color: [0.0; 4],
            fill_amount: 0.0,
            text_uv0: None,
            generation: None,
            tessellated: None,
            curved: Mesh::new(),
            tessellation_required: true,
            curving_required: true,
        }
    }

    pub fn tessellation_required(&self) -> bool { self.tessellation_required }
    pub fn curving_required(&self) -> bool { self.curving_required }

    /// `true` when either flag is set.
    pub fn is_dirty(&self) -> bool {
        self.tessellation_required || self.curving_required
    }

    /// The last tessellated (pre-curve) snapshot, if any.
    pub fn tessellated(&self) -> Option<&Mesh> { self.tessellated.as_ref() }

    /// The last curved output.
    pub fn curved(&self) -> &Mesh { &self.curved }

    /// Force a full rebuild next frame (material or font atlas changed).
    pub fn invalidate(&mut self) {
        self.tessellation_required = true;
    }

    /// Compare `state` against the cached snapshot and raise the flags.
    pub fn check(&mut self, state: &WidgetState, generation: u64) {
        if self.generation != Some(generation) || self.tessellated.is_none() {
            self.tessellation_required = true;
        }

        if !self.tessellation_required {
            if state.rect_size != self.rect_size {
                log::trace!("tessellation required: size {:?} -> {:?}", self.rect_size, state.rect_size);
                self.tessellation_required = true;
            } else if state.color != self.color {
                self.tessellation_required = true;
                self.color = state.color;
            } else if state.fill_amount != self.fill_amount {
                self.tessellation_required = true;
                self.fill_amount = state.fill_amount;
            }
        }

        if state.text_uv0.is_some() && state.text_uv0 != self.text_uv0 {
            log::trace!("tessellation required: glyph atlas changed");
            self.text_uv0 = state.text_uv0;
            self.tessellation_required = true;
        }

        if self.is_dirty() {
            return;
        }

        let position = state.canvas_position();
        if !almost_equal(position, self.position, ALMOST_EQUAL_EPSILON) {
            let delta = position - self.position;
            // Sliding along the cylinder axis keeps the bend unchanged.
            if delta.x * delta.x > MOVE_EPSILON || delta.z * delta.z > MOVE_EPSILON {
                self.position = position;
                self.curving_required = true;
            }
        }

        let up = state.canvas_up();
        if !almost_equal(self.up, up, UP_EPSILON) {
            let now_aligned = almost_equal(up, Vec3::Y, UP_EPSILON);
            let was_aligned = almost_equal(self.up, Vec3::Y, UP_EPSILON);
            // Axis-aligned widgets are tessellated differently from rotated ones.
            if now_aligned != was_aligned {
                self.tessellation_required = true;
            }
            self.up = up;
            self.curving_required = true;
        }

        let basis = state.local_to_canvas.matrix3;
        if !self.basis.abs_diff_eq(basis, BASIS_EPSILON) {
            self.basis = basis;
            self.curving_required = true;
        }
    }

    /// Record a fresh tessellation for `state`; clears the tessellation flag
    /// and leaves curving pending.
    pub fn store_tessellation(&mut self, mesh: Mesh, state: &WidgetState, generation: u64) {
        self.tessellated = Some(mesh);
        self.rect_size = state.rect_size;
        self.color = state.color;
        self.fill_amount = state.fill_amount;
        self.generation = Some(generation);
        self.tessellation_required = false;
        self.curving_required = true;
    }

    /// Record the curved output for `state`; clears the curving flag.
    pub fn store_curved(&mut self, mesh: Mesh, state: &WidgetState) {
        self.curved = mesh;
        self.position = state.canvas_position();
        self.up = state.canvas_up();
        self.basis = state.local_to_canvas.matrix3;
        self.curving_required = false;
    }
}
