use curved_hud::cache::*;
use curved_hud::mesh::Mesh;
use glam::{Affine3A, Quat, Vec2, Vec3};

fn state_at(position: Vec3) -> WidgetState {
    WidgetState::new(Vec2::new(100.0, 50.0), Affine3A::from_translation(position))
}

fn built(state: &WidgetState) -> GeometryCache {
    let mut cache = GeometryCache::new();
    cache.check(state, 0);
    cache.store_tessellation(Mesh::new(), state, 0);
    cache.store_curved(Mesh::new(), state);
    cache
}

#[test]
fn test_vertical_move_needs_no_work() {
    let mut cache = built(&state_at(Vec3::ZERO));
    cache.check(&state_at(Vec3::new(0.0, 80.0, 0.0)), 0);
    assert!(!cache.tessellation_required());
    assert!(!cache.curving_required());
}

#[test]
fn test_horizontal_move_recurves_only() {
    let mut cache = built(&state_at(Vec3::ZERO));
    cache.check(&state_at(Vec3::new(40.0, 0.0, 0.0)), 0);
    assert!(!cache.tessellation_required());
    assert!(cache.curving_required());
}

#[test]
fn test_depth_move_recurves_only() {
    let mut cache = built(&state_at(Vec3::ZERO));
    cache.check(&state_at(Vec3::new(0.0, 0.0, -5.0)), 0);
    assert!(!cache.tessellation_required());
    assert!(cache.curving_required());
}

#[test]
fn test_tiny_jitter_is_ignored() {
    let mut cache = built(&state_at(Vec3::ZERO));
    cache.check(&state_at(Vec3::new(0.001, 0.0, 0.001)), 0);
    assert!(!cache.is_dirty());
}

#[test]
fn test_size_change_retessellates() {
    let state = state_at(Vec3::ZERO);
    let mut cache = built(&state);
    let mut bigger = state;
    bigger.rect_size = Vec2::new(120.0, 50.0);
    cache.check(&bigger, 0);
    assert!(cache.tessellation_required());
}

#[test]
fn test_tint_and_fill_changes_retessellate() {
    let state = state_at(Vec3::ZERO);

    let mut cache = built(&state);
    let mut tinted = state;
    tinted.color = [1.0, 0.0, 0.0, 1.0];
    cache.check(&tinted, 0);
    assert!(cache.tessellation_required());

    let mut cache = built(&state);
    let mut filled = state;
    filled.fill_amount = 0.5;
    cache.check(&filled, 0);
    assert!(cache.tessellation_required());
}

#[test]
fn test_glyph_atlas_rebuild_retessellates() {
    let mut state = state_at(Vec3::ZERO);
    state.text_uv0 = Some(Vec2::new(0.1, 0.2));
    let mut cache = built(&state);
    cache.check(&state, 0);
    cache.store_tessellation(Mesh::new(), &state, 0);
    cache.store_curved(Mesh::new(), &state);
    cache.check(&state, 0);
    assert!(!cache.is_dirty());

    state.text_uv0 = Some(Vec2::new(0.3, 0.2));
    cache.check(&state, 0);
    assert!(cache.tessellation_required());
}

#[test]
fn test_rotating_out_of_alignment_retessellates() {
    let mut cache = built(&state_at(Vec3::ZERO));
    let tilted = WidgetState::new(Vec2::new(100.0, 50.0), Affine3A::from_rotation_z(30f32.to_radians()));
    cache.check(&tilted, 0);
    assert!(cache.tessellation_required());
}

#[test]
fn test_rotating_while_unaligned_recurves_only() {
    let rotated = |deg: f32| {
        WidgetState::new(
            Vec2::new(100.0, 50.0),
            Affine3A::from_quat(Quat::from_rotation_z(deg.to_radians())),
        )
    };
    let mut cache = built(&rotated(30.0));
    cache.check(&rotated(40.0), 0);
    assert!(!cache.tessellation_required());
    assert!(cache.curving_required());
}

#[test]
fn test_stored_tessellation_leaves_curving_pending() {
    let state = state_at(Vec3::ZERO);
    let mut cache = GeometryCache::new();
    cache.check(&state, 3);
    cache.store_tessellation(Mesh::new(), &state, 3);
    assert!(!cache.tessellation_required());
    assert!(cache.curving_required());
    assert!(cache.tessellated().is_some());
}

#[test]
fn test_yaw_recurves_only() {
    let position = Vec3::new(200.0, 0.0, 0.0);
    let mut cache = built(&state_at(position));
    let yawed = WidgetState::new(
        Vec2::new(100.0, 50.0),
        Affine3A::from_rotation_translation(Quat::from_rotation_y(40f32.to_radians()), position),
    );
    cache.check(&yawed, 0);
    assert!(!cache.tessellation_required());
    assert!(cache.curving_required());
}

#[test]
fn test_scale_change_recurves() {
    let mut cache = built(&state_at(Vec3::ZERO));
    let scaled = WidgetState::new(Vec2::new(100.0, 50.0), Affine3A::from_scale(Vec3::new(1.5, 1.0, 1.0)));
    cache.check(&scaled, 0);
    assert!(cache.curving_required());
}
