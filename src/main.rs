// Headless walkthrough: builds a curved canvas, bends a few widgets into a
// vertex batch and fires pointer rays at it. Pass a settings JSON path to
// override the default canvas.
use std::error::Error;

use glam::{Affine3A, Vec2, Vec3};

use curved_hud::cache::WidgetState;
use curved_hud::camera::EventCamera;
use curved_hud::geometry::{Ray, Rect};
use curved_hud::graphic::Graphic;
use curved_hud::mesh::{Mesh, Vertex};
use curved_hud::mesh::tessellate::TessellationStyle;
use curved_hud::renderer::HudBatch;
use curved_hud::{CanvasSettings, CurvedCanvas, CurvedSurface, WidgetFrame};

// ── Palette ─────────────────────────────────────────────────────────────────
const PANEL_BG: [f32; 4] = [0.06, 0.09, 0.09, 0.85];
const HP_FILL: [f32; 4] = [0.05, 0.75, 0.15, 1.0];
const UI_ACCENT: [f32; 4] = [0.20, 0.90, 0.70, 1.0];

struct Widget {
    id: u32,
    rect: Rect,
    position: Vec2,
    depth: i32,
    color: [f32; 4],
    style: TessellationStyle,
}

fn load_settings() -> Result<CanvasSettings, Box<dyn Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)?;
            log::info!("loading canvas settings from {path}");
            Ok(CanvasSettings::from_json(&json)?)
        }
        None => Ok(CanvasSettings::default()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let settings = load_settings()?;
    let mut canvas = CurvedCanvas::from_settings(&settings);
    let size = canvas.surface().canvas_size();
    log::info!(
        "canvas {}x{} at {}° (vertical {:.2}°), radius {:?}",
        size.x,
        size.y,
        canvas.surface().angle(),
        canvas.surface().vertical_angle(),
        canvas.surface().radius()
    );

    // Pointer rays are answered only once an event camera is assigned.
    let miss = canvas.raycast(&Ray::new(Vec3::new(0.0, 0.0, -2000.0), Vec3::Z), &[]);
    log::info!("raycast without camera: {miss:?}");

    canvas.set_camera(Some(EventCamera::perspective(
        Vec3::new(0.0, 0.0, -2000.0),
        Vec3::ZERO,
        Vec3::Y,
        60.0,
        Vec2::new(1920.0, 1080.0),
    )));

    let widgets = [
        Widget {
            id: 1,
            rect: Rect::centered(size * 0.9),
            position: Vec2::ZERO,
            depth: 0,
            color: PANEL_BG,
            style: TessellationStyle::Regular,
        },
        Widget {
            id: 2,
            rect: Rect::new(0.0, -20.0, size.x * 0.4, 40.0),
            position: Vec2::new(-size.x * 0.4, size.y * 0.3),
            depth: 2,
            color: HP_FILL,
            style: TessellationStyle::Filled,
        },
        Widget {
            id: 3,
            rect: Rect::centered(Vec2::new(200.0, 100.0)),
            position: Vec2::new(size.x * 0.3, 0.0),
            depth: 1,
            color: UI_ACCENT,
            style: TessellationStyle::Regular,
        },
    ];

    let streams: Vec<_> = widgets.iter().map(|w| Mesh::rect(w.rect, w.color).to_triangle_stream()).collect();
    for w in &widgets {
        let transform = Affine3A::from_translation(w.position.extend(0.0));
        canvas
            .graphics_mut()
            .register(Graphic::new(w.id, w.rect).with_depth(w.depth).with_transform(transform));
    }

    let frames: Vec<WidgetFrame<'_>> = widgets
        .iter()
        .zip(&streams)
        .map(|(w, triangles)| {
            let mut state = WidgetState::new(w.rect.size(), Affine3A::from_translation(w.position.extend(0.0)));
            state.color = w.color;
            WidgetFrame { id: w.id, state, style: w.style, triangles }
        })
        .collect();

    let mut batch = HudBatch::new();
    for frame in 0..2 {
        batch.clear();
        canvas.draw(&frames, &mut batch);
        log::info!(
            "frame {frame}: {} vertices ({} bytes each), {} indices",
            batch.vertices.len(),
            Vertex::layout().array_stride,
            batch.indices.len()
        );
    }

    let targets = [
        Vec3::ZERO,
        canvas.surface().canvas_to_curved(Vec3::new(size.x * 0.3, 0.0, 0.0)),
        canvas.surface().canvas_to_curved(Vec3::new(-size.x * 0.3, size.y * 0.3, 0.0)),
        Vec3::new(size.x * 4.0, 0.0, 0.0),
    ];
    let eye = Vec3::new(0.0, 0.0, -2000.0);
    for target in targets {
        let ray = Ray::through(eye, target);
        match canvas.raycast(&ray, &[]) {
            Some(hit) => log::info!(
                "ray to {target}: canvas {} screen {} widgets {:?}",
                hit.canvas_point,
                hit.screen_point,
                hit.widgets
            ),
            None => log::info!("ray to {target}: miss"),
        }
    }

    canvas.set_angle(-settings.angle);
    let hit = canvas.map_ray(&Ray::new(eye, Vec3::Z), &[]);
    log::info!("after flipping to {}°: centre ray maps to {:?}", canvas.surface().angle(), hit.map(|h| h.point));

    Ok(())
}
