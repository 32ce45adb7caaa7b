// ── Interactive graphics ──────────────────────────────────────────────────────
//
// What the raycaster tests against once a pointer has been mapped back onto
// the flat canvas: plain rectangles, each with a render depth, a raycast
// target flag and an optional alpha mask.

use glam::{Affine3A, Vec2};

use crate::geometry::Rect;

/// Identifier the surrounding UI uses for a widget.
pub type WidgetId = u32;

/// Render depth of a graphic the canvas has not drawn this frame.
pub const NOT_DRAWN: i32 = -1;

/// Per-pixel alpha used for fine-grained hit tests on non-rectangular
/// graphics.
#[derive(Clone, Debug, PartialEq)]
pub struct AlphaMask {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
    /// Minimum alpha (inclusive) a pixel needs to count as a hit.
    pub threshold: u8,
}

impl AlphaMask {
    /// Mask from row-major alpha values, first row at the top. Returns `None`
    /// when `alpha` does not hold `width * height` entries.
    pub fn new(width: u32, height: u32, alpha: Vec<u8>, threshold: u8) -> Option<Self> {
        (width > 0 && height > 0 && alpha.len() == width as usize * height as usize)
            .then_some(Self { width, height, alpha, threshold })
    }

    /// Alpha at normalised coordinates (`(0, 0)` bottom-left, `(1, 1)`
    /// top-right); nearest-pixel lookup, clamped to the mask.
    pub fn sample(&self, uv: Vec2) -> u8 {
        let px = ((uv.x * self.width as f32) as i64).clamp(0, self.width as i64 - 1) as u32;
        let row_from_bottom = ((uv.y * self.height as f32) as i64).clamp(0, self.height as i64 - 1) as u32;
        let py = self.height - 1 - row_from_bottom;
        self.alpha[py as usize * self.width as usize + px as usize]
    }

    pub fn passes(&self, uv: Vec2) -> bool {
        self.threshold == 0 || self.sample(uv) >= self.threshold
    }
}

/// One raycastable UI graphic.
#[derive(Clone, Debug, PartialEq)]
pub struct Graphic {
    pub id: WidgetId,
    /// Draw order assigned by the canvas; higher is on top, [`NOT_DRAWN`]
    /// when not rendered.
    pub depth: i32,
    pub raycast_target: bool,
    /// Layout rectangle in the graphic's local space.
    pub rect: Rect,
    /// Graphic local space → canvas local space.
    pub local_to_canvas: Affine3A,
    pub alpha_mask: Option<AlphaMask>,
}

impl Graphic {
    /// A drawn, raycastable graphic at depth 0 placed at the canvas origin.
    pub fn new(id: WidgetId, rect: Rect) -> Self {
        Self {
            id,
            depth: 0,
            raycast_target: true,
            rect,
            local_to_canvas: Affine3A::IDENTITY,
            alpha_mask: None,
        }
    }

    pub fn with_depth(mut self, depth: i32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_transform(mut self, local_to_canvas: Affine3A) -> Self {
        self.local_to_canvas = local_to_canvas;
        self
    }

    pub fn with_alpha_mask(mut self, mask: AlphaMask) -> Self {
        self.alpha_mask = Some(mask);
        self
    }

    pub fn is_drawn(&self) -> bool {
        self.depth != NOT_DRAWN
    }

    /// Fine-grained hit predicate for a point already known to be inside
    /// `rect` (graphic-local).
    pub fn raycast(&self, local: Vec2) -> bool {
        match &self.alpha_mask {
            Some(mask) => mask.passes(self.rect.normalized(local)),
            None => true,
        }
    }
}

/// All graphics registered on one canvas, in registration order.
#[derive(Clone, Debug, Default)]
pub struct GraphicRegistry {
    graphics: Vec<Graphic>,
}

impl GraphicRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `graphic`, replacing any previous graphic with the same id.
    pub fn register(&mut self, graphic: Graphic) {
        match self.graphics.iter_mut().find(|g| g.id == graphic.id) {
            Some(existing) => *existing = graphic,
            None => self.graphics.push(graphic),
        }
    }

    pub fn unregister(&mut self, id: WidgetId) -> Option<Graphic> {
        let idx = self.graphics.iter().position(|g| g.id == id)?;
        Some(self.graphics.remove(idx))
    }

    pub fn get(&self, id: WidgetId) -> Option<&Graphic> {
        self.graphics.iter().find(|g| g.id == id)
    }

    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut Graphic> {
        self.graphics.iter_mut().find(|g| g.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Graphic> {
        self.graphics.iter()
    }

    pub fn len(&self) -> usize {
        self.graphics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphics.is_empty()
    }
}
