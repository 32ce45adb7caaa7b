use curved_hud::camera::EventCamera;
use curved_hud::collider::build_collider;
use curved_hud::geometry::{Ray, RayHit, RayIntersect, Rect};
use curved_hud::graphic::{Graphic, GraphicRegistry, NOT_DRAWN};
use curved_hud::raycast::*;
use curved_hud::surface::SurfaceConfig;
use glam::{Affine3A, Vec2, Vec3};

const EYE: Vec3 = Vec3::new(0.0, 0.0, -2000.0);

fn camera() -> EventCamera {
    EventCamera::perspective(EYE, Vec3::ZERO, Vec3::Y, 60.0, Vec2::new(1280.0, 720.0))
}

fn canvas(angle: f32) -> SurfaceConfig {
    SurfaceConfig::new(Vec2::new(1000.0, 500.0), angle)
}

/// Infinite wall facing -z at a fixed depth.
struct Wall {
    z: f32,
}

impl RayIntersect for Wall {
    fn intersect(&self, ray: &Ray) -> Option<RayHit> {
        if ray.direction.z.abs() < 1e-6 {
            return None;
        }
        let t = (self.z - ray.origin.z) / ray.direction.z;
        (t >= 0.0).then(|| RayHit { point: ray.at(t), distance: t })
    }
}

#[test]
fn test_straight_ray_hits_canvas_centre() {
    let s = canvas(90.0);
    let collider = build_collider(&s);
    let mapper = RaycastMapper { surface: &s, canvas_to_world: Affine3A::IDENTITY, collider: collider.as_ref(), curvature_enabled: true };
    let hit = mapper.map_ray(&Ray::new(EYE, Vec3::Z), &[]).unwrap();
    assert!(hit.point.length() < 1e-2, "{}", hit.point);
    assert!((hit.distance - 2000.0).abs() < 1e-2);
}

#[test]
fn test_ray_from_sphere_centre_maps_exactly() {
    let s = canvas(90.0);
    let collider = build_collider(&s);
    let mapper = RaycastMapper { surface: &s, canvas_to_world: Affine3A::IDENTITY, collider: collider.as_ref(), curvature_enabled: true };
    let target = s.canvas_to_curved(Vec3::new(250.0, 0.0, 0.0));
    let hit = mapper.map_ray(&Ray::through(s.center(), target), &[]).unwrap();
    assert!((hit.point - Vec2::new(250.0, 0.0)).length() < 0.1, "{}", hit.point);
}

#[test]
fn test_camera_ray_maps_onto_surface_not_chord() {
    for (angle, x) in [(180.0, 250.0), (90.0, 300.0), (90.0, 375.0), (-90.0, 200.0)] {
        let s = canvas(angle);
        let collider = build_collider(&s);
        let mapper = RaycastMapper { surface: &s, canvas_to_world: Affine3A::IDENTITY, collider: collider.as_ref(), curvature_enabled: true };
        let target = s.canvas_to_curved(Vec3::new(x, 0.0, 0.0));
        let hit = mapper.map_ray(&Ray::through(EYE, target), &[]).unwrap();
        assert!((hit.point - Vec2::new(x, 0.0)).length() < 0.5, "angle {angle}: {}", hit.point);
        assert!((hit.world_point - target).length() < 0.5);
    }
}

#[test]
fn test_ray_beside_canvas_misses() {
    let s = canvas(90.0);
    let collider = build_collider(&s);
    let mapper = RaycastMapper { surface: &s, canvas_to_world: Affine3A::IDENTITY, collider: collider.as_ref(), curvature_enabled: true };
    assert!(mapper.map_ray(&Ray::through(EYE, Vec3::new(4000.0, 0.0, 0.0)), &[]).is_none());
}

#[test]
fn test_flat_canvas_uses_plane() {
    let s = canvas(0.0);
    let mapper = RaycastMapper { surface: &s, canvas_to_world: Affine3A::IDENTITY, collider: None, curvature_enabled: true };
    let hit = mapper.map_ray(&Ray::new(Vec3::new(100.0, 50.0, -10.0), Vec3::Z), &[]).unwrap();
    assert!((hit.point - Vec2::new(100.0, 50.0)).length() < 1e-4);
    assert!(mapper.map_ray(&Ray::new(Vec3::new(600.0, 0.0, -10.0), Vec3::Z), &[]).is_none());
}

#[test]
fn test_curvature_off_maps_as_flat() {
    let s = canvas(90.0);
    let mapper = RaycastMapper { surface: &s, canvas_to_world: Affine3A::IDENTITY, collider: None, curvature_enabled: false };
    let hit = mapper.map_ray(&Ray::new(Vec3::new(300.0, 0.0, -10.0), Vec3::Z), &[]).unwrap();
    assert!((hit.point - Vec2::new(300.0, 0.0)).length() < 1e-4);
}

#[test]
fn test_canvas_transform_is_respected() {
    let s = canvas(90.0);
    let collider = build_collider(&s);
    let mapper = RaycastMapper {
        surface: &s,
        canvas_to_world: Affine3A::from_translation(Vec3::new(0.0, 0.0, 500.0)),
        collider: collider.as_ref(),
        curvature_enabled: true,
    };
    let hit = mapper.map_ray(&Ray::new(EYE, Vec3::Z), &[]).unwrap();
    assert!(hit.point.length() < 1e-2);
    assert!((hit.world_point.z - 500.0).abs() < 1e-2);
    assert!((hit.distance - 2500.0).abs() < 1e-2);
}

#[test]
fn test_not_blocking_canvas_is_untouchable() {
    let s = canvas(0.0).with_blocks_raycasts(false);
    let mapper = RaycastMapper { surface: &s, canvas_to_world: Affine3A::IDENTITY, collider: None, curvature_enabled: true };
    assert!(mapper.map_ray(&Ray::new(EYE, Vec3::Z), &[]).is_none());
}

#[test]
fn test_closer_occluder_blocks() {
    let s = canvas(90.0);
    let collider = build_collider(&s);
    let mapper = RaycastMapper { surface: &s, canvas_to_world: Affine3A::IDENTITY, collider: collider.as_ref(), curvature_enabled: true };
    let near = Wall { z: -1000.0 };
    let far = Wall { z: 1000.0 };
    let ray = Ray::new(EYE, Vec3::Z);
    assert!(mapper.map_ray(&ray, &[Occluder { layer: 0, shape: &near }]).is_none());
    assert!(mapper.map_ray(&ray, &[Occluder { layer: 0, shape: &far }]).is_some());
}

#[test]
fn test_own_layer_only_ignores_other_layers() {
    let s = canvas(90.0).with_layer(5).with_raycast_own_layer_only(true);
    let collider = build_collider(&s);
    let mapper = RaycastMapper { surface: &s, canvas_to_world: Affine3A::IDENTITY, collider: collider.as_ref(), curvature_enabled: true };
    let wall = Wall { z: -1000.0 };
    let ray = Ray::new(EYE, Vec3::Z);
    assert!(mapper.map_ray(&ray, &[Occluder { layer: 3, shape: &wall }]).is_some());
    assert!(mapper.map_ray(&ray, &[Occluder { layer: 5, shape: &wall }]).is_none());
}

#[test]
fn test_graphics_sorted_topmost_first() {
    let s = canvas(90.0);
    let collider = build_collider(&s);
    let mapper = RaycastMapper { surface: &s, canvas_to_world: Affine3A::IDENTITY, collider: collider.as_ref(), curvature_enabled: true };

    let mut graphics = GraphicRegistry::new();
    graphics.register(Graphic::new(1, Rect::centered(Vec2::new(900.0, 450.0))));
    graphics.register(Graphic::new(2, Rect::centered(Vec2::new(200.0, 100.0))).with_depth(2));
    graphics.register(Graphic::new(3, Rect::centered(Vec2::new(300.0, 150.0))).with_depth(1));
    graphics.register(Graphic::new(4, Rect::centered(Vec2::new(300.0, 150.0))).with_depth(NOT_DRAWN));
    let mut passive = Graphic::new(5, Rect::centered(Vec2::new(300.0, 150.0))).with_depth(3);
    passive.raycast_target = false;
    graphics.register(passive);

    let hit = mapper.raycast(&camera(), &graphics, &Ray::new(EYE, Vec3::Z), &[]).unwrap();
    assert_eq!(hit.widgets, vec![2, 3, 1]);
    assert!((hit.screen_point - Vec2::new(640.0, 360.0)).length() < 0.5);
}

#[test]
fn test_off_centre_hit_finds_placed_graphic() {
    let s = canvas(90.0);
    let collider = build_collider(&s);
    let mapper = RaycastMapper { surface: &s, canvas_to_world: Affine3A::IDENTITY, collider: collider.as_ref(), curvature_enabled: true };

    let mut graphics = GraphicRegistry::new();
    graphics.register(Graphic::new(1, Rect::centered(Vec2::new(900.0, 450.0))));
    graphics.register(
        Graphic::new(3, Rect::centered(Vec2::new(100.0, 100.0)))
            .with_depth(1)
            .with_transform(Affine3A::from_translation(Vec3::new(300.0, 0.0, 0.0))),
    );

    let target = s.canvas_to_curved(Vec3::new(300.0, 0.0, 0.0));
    let hit = mapper.raycast(&camera(), &graphics, &Ray::through(EYE, target), &[]).unwrap();
    assert!((hit.canvas_point - Vec2::new(300.0, 0.0)).length() < 0.5, "{}", hit.canvas_point);
    assert_eq!(hit.widgets, vec![3, 1]);
}

#[test]
fn test_non_interactable_canvas_reports_nothing() {
    let s = canvas(90.0).with_interactable(false);
    let collider = build_collider(&s);
    let mapper = RaycastMapper { surface: &s, canvas_to_world: Affine3A::IDENTITY, collider: collider.as_ref(), curvature_enabled: true };
    let graphics = GraphicRegistry::new();
    assert!(mapper.raycast(&camera(), &graphics, &Ray::new(EYE, Vec3::Z), &[]).is_none());
    assert!(mapper.map_ray(&Ray::new(EYE, Vec3::Z), &[]).is_some());
}

#[test]
fn test_alpha_mask_rejects_transparent_pixels() {
    use curved_hud::graphic::AlphaMask;

    let s = canvas(90.0);
    let collider = build_collider(&s);
    let mapper = RaycastMapper { surface: &s, canvas_to_world: Affine3A::IDENTITY, collider: collider.as_ref(), curvature_enabled: true };

    let mut graphics = GraphicRegistry::new();
    let clear = AlphaMask::new(1, 1, vec![0], 128).unwrap();
    graphics.register(Graphic::new(7, Rect::centered(Vec2::new(200.0, 200.0))).with_alpha_mask(clear));

    let hit = mapper.raycast(&camera(), &graphics, &Ray::new(EYE, Vec3::Z), &[]).unwrap();
    assert!(hit.widgets.is_empty());
}
