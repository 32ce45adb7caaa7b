// ── CurvedCanvas ──────────────────────────────────────────────────────────────
//
// Owner of one curved surface. It is the only writer of its SurfaceConfig and
// keeps everything derived from it (collider, per-widget caches) in step:
// every mutation that changes geometry rebuilds the collider before it
// returns, so a raycast issued later in the same tick already sees it.

use std::collections::HashMap;

use glam::{Affine3A, Vec2};

use crate::cache::{GeometryCache, WidgetState};
use crate::camera::EventCamera;
use crate::collider::{ColliderMesh, build_collider};
use crate::error::HudError;
use crate::geometry::Ray;
use crate::graphic::{GraphicRegistry, WidgetId};
use crate::mesh::curve::curve_mesh;
use crate::mesh::tessellate::{TessellationStyle, tessellate};
use crate::mesh::{Mesh, Vertex};
use crate::raycast::{CanvasHit, CanvasPoint, Occluder, RaycastMapper};
use crate::renderer::HudBatch;
use crate::settings::CanvasSettings;
use crate::surface::SurfaceConfig;

/// The four operations a rendering/input pipeline needs from a curved
/// surface.
pub trait CurvedSurface {
    /// Subdivide flat widget geometry for this surface.
    fn tessellate(&self, mesh: &Mesh, style: TessellationStyle) -> Mesh;
    /// Bend tessellated geometry of a widget placed at `local_to_canvas`.
    fn curve(&self, mesh: &Mesh, local_to_canvas: &Affine3A) -> Mesh;
    /// Fresh collider for the current configuration.
    fn build_collider(&self) -> Option<ColliderMesh>;
    /// Pointer query; `None` on a miss.
    fn raycast(&mut self, ray: &Ray, occluders: &[Occluder<'_>]) -> Option<CanvasHit>;
}

/// One widget's input for this frame.
#[derive(Clone, Copy, Debug)]
pub struct WidgetFrame<'a> {
    pub id: WidgetId,
    pub state: WidgetState,
    pub style: TessellationStyle,
    /// Flat geometry in widget-local space, as a quad-based triangle stream.
    pub triangles: &'a [Vertex],
}

pub struct CurvedCanvas {
    surface: SurfaceConfig,
    canvas_to_world: Affine3A,
    curvature_enabled: bool,
    camera: Option<EventCamera>,
    collider: Option<ColliderMesh>,
    graphics: GraphicRegistry,
    caches: HashMap<WidgetId, GeometryCache>,
    objects_under_pointer: Vec<WidgetId>,
    camera_warned: bool,
    size_error_logged: bool,
}

impl CurvedCanvas {
    pub fn new(surface: SurfaceConfig) -> Self {
        Self {
            collider: build_collider(&surface),
            surface,
            canvas_to_world: Affine3A::IDENTITY,
            curvature_enabled: true,
            camera: None,
            graphics: GraphicRegistry::new(),
            caches: HashMap::new(),
            objects_under_pointer: Vec::new(),
            camera_warned: false,
            size_error_logged: false,
        }
    }

    pub fn from_settings(settings: &CanvasSettings) -> Self {
        Self::new(settings.to_surface())
    }

    // ── Configuration ─────────────────────────────────────────────────────────

    pub fn surface(&self) -> &SurfaceConfig {
        &self.surface
    }

    /// Change the horizontal arc. Marks every widget dirty (through the
    /// generation) and rebuilds the collider immediately.
    pub fn set_angle(&mut self, angle: f32) {
        if angle != self.surface.angle() {
            self.apply(self.surface.with_angle(angle));
        }
    }

    pub fn set_canvas_size(&mut self, size: Vec2) {
        if size != self.surface.canvas_size() {
            self.apply(self.surface.with_canvas_size(size));
            if self.surface.validate().is_ok() {
                self.size_error_logged = false;
            }
        }
    }

    pub fn set_tessellation_quality(&mut self, quality: f32) {
        self.apply(self.surface.with_tessellation_quality(quality));
    }

    /// `false` removes the collider (the canvas becomes untouchable); `true`
    /// rebuilds it.
    pub fn set_blocks_raycasts(&mut self, blocks: bool) {
        if blocks != self.surface.blocks_raycasts() {
            self.apply(self.surface.with_blocks_raycasts(blocks));
        }
    }

    pub fn set_interactable(&mut self, interactable: bool) {
        self.surface = self.surface.with_interactable(interactable);
    }

    pub fn set_raycast_own_layer_only(&mut self, own_layer_only: bool) {
        self.surface = self.surface.with_raycast_own_layer_only(own_layer_only);
    }

    pub fn set_layer(&mut self, layer: u32) {
        self.surface = self.surface.with_layer(layer);
    }

    // The collider only depends on angle and size; quality changes skip it.
    fn apply(&mut self, next: SurfaceConfig) {
        let geometry_changed =
            next.angle() != self.surface.angle() || next.canvas_size() != self.surface.canvas_size();
        let started_blocking = next.blocks_raycasts() && !self.surface.blocks_raycasts();
        self.surface = next;

        if !self.surface.blocks_raycasts() {
            self.collider = None;
        } else if geometry_changed || started_blocking || self.collider.is_none() {
            self.collider = build_collider(&self.surface);
        }
    }

    /// Turn the curve effect on or off. Off renders and raycasts the canvas
    /// as flat; every widget is rebuilt on the next draw.
    pub fn set_curvature_enabled(&mut self, enabled: bool) {
        if enabled != self.curvature_enabled {
            self.curvature_enabled = enabled;
            self.invalidate_all();
        }
    }

    pub fn curvature_enabled(&self) -> bool {
        self.curvature_enabled
    }

    /// Canvas local space → world space. Moving the canvas does not touch the
    /// collider: it lives in canvas space.
    pub fn set_transform(&mut self, canvas_to_world: Affine3A) {
        self.canvas_to_world = canvas_to_world;
    }

    pub fn transform(&self) -> Affine3A {
        self.canvas_to_world
    }

    /// Assign (or remove) the event camera. Raycasting stays disabled while
    /// there is none.
    pub fn set_camera(&mut self, camera: Option<EventCamera>) {
        self.camera = camera;
        self.camera_warned = false;
    }

    pub fn camera(&self) -> Option<&EventCamera> {
        self.camera.as_ref()
    }

    pub fn raycasting_enabled(&self) -> bool {
        self.camera.is_some()
    }

    pub fn collider(&self) -> Option<&ColliderMesh> {
        self.collider.as_ref()
    }

    pub fn graphics(&self) -> &GraphicRegistry {
        &self.graphics
    }

    pub fn graphics_mut(&mut self) -> &mut GraphicRegistry {
        &mut self.graphics
    }

    fn bends(&self) -> bool {
        self.curvature_enabled && !self.surface.is_flat()
    }

    // ── Geometry ──────────────────────────────────────────────────────────────

    pub fn geometry_cache(&self, id: WidgetId) -> Option<&GeometryCache> {
        self.caches.get(&id)
    }

    /// Force a full rebuild of one widget (its material or font atlas
    /// changed behind the layout's back).
    pub fn invalidate_widget(&mut self, id: WidgetId) {
        if let Some(cache) = self.caches.get_mut(&id) {
            cache.invalidate();
        }
    }

    pub fn invalidate_all(&mut self) {
        self.caches.values_mut().for_each(GeometryCache::invalidate);
    }

    /// Bring one widget's curved geometry up to date and return it.
    ///
    /// Runs the dirty checks, re-tessellates and/or re-curves only as much as
    /// needed, and otherwise returns the cached mesh untouched.
    ///
    /// # Errors
    /// [`HudError::Configuration`] for an invalid canvas size,
    /// [`HudError::NonQuadStream`] for geometry that is not quad based. The
    /// widget's cache keeps its flags so the next frame retries.
    pub fn curve_widget<'s>(&'s mut self, frame: &WidgetFrame<'_>) -> Result<&'s Mesh, HudError> {
        self.surface.validate()?;
        let bend = self.bends();
        let surface = &self.surface;
        let generation = surface.generation();

        let cache = self.caches.entry(frame.id).or_default();
        cache.check(&frame.state, generation);

        if cache.is_dirty() {
            if cache.tessellation_required() {
                let flat = Mesh::from_triangle_stream(frame.triangles)?;
                let mesh = if bend { tessellate(&flat, surface.required_size(), frame.style) } else { flat };
                cache.store_tessellation(mesh, &frame.state, generation);
            }
            let curved = match cache.tessellated() {
                Some(mesh) if bend => curve_mesh(surface, mesh, &frame.state.local_to_canvas),
                Some(mesh) => mesh.clone(),
                None => Mesh::new(),
            };
            cache.store_curved(curved, &frame.state);
        }
        Ok(cache.curved())
    }

    /// Per-frame draw: curve every widget and append the results to `batch`.
    /// Failures are logged and the widget is skipped; the loop never aborts.
    pub fn draw(&mut self, frames: &[WidgetFrame<'_>], batch: &mut HudBatch) {
        for frame in frames {
            let result = self.curve_widget(frame).map(|mesh| batch.push_mesh(mesh));
            if let Err(e) = result {
                self.report(frame.id, e);
            }
        }
    }

    fn report(&mut self, id: WidgetId, error: HudError) {
        match error {
            HudError::Configuration { .. } => {
                if !self.size_error_logged {
                    log::error!("{error}");
                    self.size_error_logged = true;
                }
            }
            other => log::warn!("widget {id} skipped: {other}"),
        }
    }

    // ── Raycasting ────────────────────────────────────────────────────────────

    /// Borrowed raycasting view of this canvas.
    pub fn mapper(&self) -> RaycastMapper<'_> {
        RaycastMapper {
            surface: &self.surface,
            canvas_to_world: self.canvas_to_world,
            collider: self.collider.as_ref(),
            curvature_enabled: self.curvature_enabled,
        }
    }

    /// Map a world ray to flat canvas coordinates without touching widgets;
    /// does not need a camera.
    pub fn map_ray(&self, ray: &Ray, occluders: &[Occluder<'_>]) -> Option<CanvasPoint> {
        self.mapper().map_ray(ray, occluders)
    }

    fn event_camera(&mut self) -> Option<EventCamera> {
        if self.camera.is_none() && !self.camera_warned {
            log::warn!("{}", HudError::MissingDependency("event camera"));
            self.camera_warned = true;
        }
        self.camera
    }

    /// Widgets under `ray`, topmost first, without updating
    /// [`objects_under_pointer`](Self::objects_under_pointer).
    pub fn objects_hit_by_ray(&mut self, ray: &Ray) -> Vec<WidgetId> {
        let Some(camera) = self.event_camera() else {
            return Vec::new();
        };
        self.mapper()
            .raycast(&camera, &self.graphics, ray, &[])
            .map(|hit| hit.widgets)
            .unwrap_or_default()
    }

    /// Widgets found by the last pointer raycast.
    pub fn objects_under_pointer(&self) -> &[WidgetId] {
        &self.objects_under_pointer
    }
}

impl CurvedSurface for CurvedCanvas {
    fn tessellate(&self, mesh: &Mesh, style: TessellationStyle) -> Mesh {
        if self.bends() { tessellate(mesh, self.surface.required_size(), style) } else { mesh.clone() }
    }

    fn curve(&self, mesh: &Mesh, local_to_canvas: &Affine3A) -> Mesh {
        if self.bends() { curve_mesh(&self.surface, mesh, local_to_canvas) } else { mesh.clone() }
    }

    fn build_collider(&self) -> Option<ColliderMesh> {
        build_collider(&self.surface)
    }

    fn raycast(&mut self, ray: &Ray, occluders: &[Occluder<'_>]) -> Option<CanvasHit> {
        self.objects_under_pointer.clear();
        if !self.surface.interactable() {
            return None;
        }
        let camera = self.event_camera()?;
        let hit = self.mapper().raycast(&camera, &self.graphics, ray, occluders);
        self.objects_under_pointer = hit.as_ref().map(|h| h.widgets.clone()).unwrap_or_default();
        hit
    }
}
