use curved_hud::collider::*;
use curved_hud::geometry::{Ray, RayIntersect};
use curved_hud::surface::SurfaceConfig;
use glam::{Vec2, Vec3};

fn canvas(angle: f32) -> SurfaceConfig {
    SurfaceConfig::new(Vec2::new(1000.0, 500.0), angle)
}

#[test]
fn test_collider_vertices_lie_on_surface() {
    let s = canvas(90.0);
    let c = build_collider(&s).unwrap();
    let r = s.radius().unwrap();
    for v in c.vertices() {
        assert!((v.distance(s.center()) - r).abs() < 0.05, "{v}");
    }
}

#[test]
fn test_half_circle_uses_finer_segments() {
    // 180° → segment width 1000 / 6, a 6 x 6 grid.
    let c = build_collider(&canvas(180.0)).unwrap();
    assert_eq!(c.triangles().len(), 6 * 6 * 2);
}

#[test]
fn test_collider_ignores_tessellation_quality() {
    let coarse = build_collider(&canvas(90.0).with_tessellation_quality(1.0)).unwrap();
    let fine = build_collider(&canvas(90.0).with_tessellation_quality(10.0)).unwrap();
    assert_eq!(coarse.triangles().len(), fine.triangles().len());
}

#[test]
fn test_invalid_size_builds_nothing() {
    let s = SurfaceConfig::new(Vec2::new(-1.0, 500.0), 90.0);
    assert!(build_collider(&s).is_none());
}

#[test]
fn test_ray_hits_nearest_triangle() {
    let c = build_collider(&canvas(90.0)).unwrap();
    let hit = c.intersect(&Ray::new(Vec3::new(0.0, 0.0, -2000.0), Vec3::Z)).unwrap();
    assert!(hit.point.length() < 1e-2, "{}", hit.point);
    assert!((hit.distance - 2000.0).abs() < 1e-2);
}

#[test]
fn test_ray_hits_from_both_sides() {
    let c = build_collider(&canvas(90.0)).unwrap();
    let hit = c.intersect(&Ray::new(Vec3::new(0.0, 0.0, 100.0), -Vec3::Z));
    assert!(hit.is_some());
}

#[test]
fn test_ray_pointing_away_misses() {
    let c = build_collider(&canvas(90.0)).unwrap();
    assert!(c.intersect(&Ray::new(Vec3::new(0.0, 0.0, -2000.0), -Vec3::Z)).is_none());
}

#[test]
fn test_on_canvas_includes_edges() {
    let s = canvas(0.0);
    assert!(on_canvas(&s, Vec2::new(500.0, 250.0)));
    assert!(on_canvas(&s, Vec2::new(-500.0, -250.0)));
    assert!(!on_canvas(&s, Vec2::new(500.5, 0.0)));
}
